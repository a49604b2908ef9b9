//! Request/response document: an ordered key-value tree
//!
//! Every command reads its input from a `Document` and writes its result into
//! one. Keys keep insertion order so a document read from a JSON file is
//! written back in the same order.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::error::{DomainError, DomainResult};

/// Ordered mapping from string keys to JSON-compatible values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

/// Conversion from a stored value into a typed field.
///
/// Conversions are lenient in the way CLI input needs: numbers and booleans
/// stored as strings are accepted, and any scalar reads as a string.
pub trait FromValue: Sized {
    /// Type name used in mismatch errors.
    const TYPE_NAME: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for String {
    const TYPE_NAME: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    const TYPE_NAME: &'static str = "integer";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromValue for u64 {
    const TYPE_NAME: &'static str = "non-negative integer";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromValue for u32 {
    const TYPE_NAME: &'static str = "non-negative integer";

    fn from_value(value: &Value) -> Option<Self> {
        u64::from_value(value).and_then(|n| u32::try_from(n).ok())
    }
}

impl FromValue for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            Value::String(s) => parse_bool(s),
            _ => None,
        }
    }
}

impl FromValue for Document {
    const TYPE_NAME: &'static str = "object";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_object().cloned().map(Document)
    }
}

/// Parse the boolean spellings accepted on the command line.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('.').filter(|s| !s.is_empty()).collect()
}

impl Document {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Parse JSON text. The top level must be an object.
    pub fn from_json_str(text: &str) -> DomainResult<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| DomainError::MalformedJson(e.to_string()))?;
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(DomainError::MalformedJson(format!(
                "expected a JSON object, found {}",
                kind_of(&other)
            ))),
        }
    }

    /// Compact JSON serialization.
    pub fn to_json_string(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }

    /// Indented JSON serialization.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.to_json_string())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Top-level keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Raw value at a dotted path, e.g. `"processed.block_num"`.
    pub fn value(&self, path: &str) -> Option<&Value> {
        self.value_in(&split_path(path))
    }

    /// Raw value at a hierarchical path.
    pub fn value_in(&self, segments: &[&str]) -> Option<&Value> {
        let (first, rest) = segments.split_first()?;
        let mut current = self.0.get(*first)?;
        for segment in rest {
            current = current.as_object()?.get(*segment)?;
        }
        Some(current)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.value(path).is_some()
    }

    /// Typed lookup at a dotted path.
    ///
    /// # Errors
    /// - `MissingField` if nothing is stored at `path`
    /// - `FieldTypeMismatch` if the stored value does not convert to `T`
    pub fn get<T: FromValue>(&self, path: &str) -> DomainResult<T> {
        let value = self
            .value(path)
            .ok_or_else(|| DomainError::MissingField(path.to_string()))?;
        T::from_value(value).ok_or_else(|| DomainError::FieldTypeMismatch {
            field: path.to_string(),
            expected: T::TYPE_NAME,
            found: value.to_string(),
        })
    }

    /// Typed lookup at a hierarchical path.
    pub fn get_in<T: FromValue>(&self, segments: &[&str]) -> DomainResult<T> {
        self.get(&segments.join("."))
    }

    /// Insert or overwrite the value at a dotted path.
    ///
    /// Missing intermediate objects are created; a scalar in the way is replaced.
    pub fn put(&mut self, path: &str, value: impl Into<Value>) {
        let segments = split_path(path);
        self.put_in(&segments, value);
    }

    /// Insert or overwrite the value at a hierarchical path.
    pub fn put_in(&mut self, segments: &[&str], value: impl Into<Value>) {
        let Some((last, parents)) = segments.split_last() else {
            return;
        };
        let mut map = &mut self.0;
        for segment in parents {
            let entry = map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            let Value::Object(inner) = entry else {
                return;
            };
            map = inner;
        }
        map.insert(last.to_string(), value.into());
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Object(doc.0)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json_string())
    }
}

/// Short JSON type name for error messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
