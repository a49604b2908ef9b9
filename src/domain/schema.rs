//! Static per-command declarations: input fields and output lines
//!
//! A `CommandSpec` drives both the argument surface (positional order, long and
//! short flags) and validation of a request document, so the two input modes
//! share a single source of truth.

use std::fmt::{self, Write as _};

use serde_json::Value;

use crate::domain::document::{parse_bool, Document, FromValue};

/// Declared type of an input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Boolean,
}

impl FieldType {
    /// Parse a raw CLI token into a value of this type.
    pub fn coerce(self, raw: &str) -> Option<Value> {
        match self {
            FieldType::String => Some(Value::String(raw.to_string())),
            FieldType::Integer => raw.trim().parse::<i64>().ok().map(Value::from),
            FieldType::Boolean => parse_bool(raw).map(Value::Bool),
        }
    }

    /// Convert a stored value to this type's canonical JSON form.
    ///
    /// `"60"` becomes `60` for an integer, `123` becomes `"123"` for a string.
    pub fn normalize(self, value: &Value) -> Option<Value> {
        match self {
            FieldType::String => String::from_value(value).map(Value::String),
            FieldType::Integer => i64::from_value(value).map(Value::from),
            FieldType::Boolean => bool::from_value(value).map(Value::Bool),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            FieldType::String => "\"<string>\"",
            FieldType::Integer => "<int>",
            FieldType::Boolean => "<true|false>",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Default value of an optional field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Str(&'static str),
    Int(i64),
    Bool(bool),
}

impl FieldDefault {
    pub fn to_value(self) -> Value {
        match self {
            FieldDefault::Str(s) => Value::String(s.to_string()),
            FieldDefault::Int(n) => Value::from(n),
            FieldDefault::Bool(b) => Value::Bool(b),
        }
    }
}

impl fmt::Display for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDefault::Str(s) => write!(f, "\"{s}\""),
            FieldDefault::Int(n) => write!(f, "{n}"),
            FieldDefault::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Declaration of one input field.
///
/// A field is required exactly when it has no default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub short: Option<char>,
    pub kind: FieldType,
    pub default: Option<FieldDefault>,
    /// Bound from unnamed tokens, in declaration order
    pub positional: bool,
    pub help: &'static str,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldType) -> Self {
        Self {
            name,
            short: None,
            kind,
            default: None,
            positional: false,
            help: "",
        }
    }

    pub const fn short(self, short: char) -> Self {
        Self {
            short: Some(short),
            ..self
        }
    }

    pub const fn default(self, default: FieldDefault) -> Self {
        Self {
            default: Some(default),
            ..self
        }
    }

    pub const fn positional(self) -> Self {
        Self {
            positional: true,
            ..self
        }
    }

    pub const fn help(self, help: &'static str) -> Self {
        Self { help, ..self }
    }

    pub fn required(&self) -> bool {
        self.default.is_none()
    }
}

/// One labeled line of human-readable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputLine {
    /// Dotted path into the response document
    pub path: &'static str,
    pub label: &'static str,
    /// `{}` is replaced by the value
    pub format: &'static str,
}

impl OutputLine {
    pub const fn new(path: &'static str, label: &'static str) -> Self {
        Self {
            path,
            label,
            format: "{}",
        }
    }

    pub const fn format(self, format: &'static str) -> Self {
        Self { format, ..self }
    }
}

/// Ordered output declaration of a command.
pub type OutputSpec = [OutputLine];

/// Static description of a command: name, inputs, outputs.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub verb: &'static str,
    pub noun: &'static str,
    pub about: &'static str,
    pub fields: &'static [FieldSpec],
    pub output: &'static OutputSpec,
}

/// Flags handled outside field binding; fields must not reuse them.
pub const RESERVED_LONG: &[&str] = &[
    "json",
    "json-file",
    "raw",
    "help",
    "verbose",
    "project-dir",
    "version",
];
pub const RESERVED_SHORT: &[char] = &['j', 'h', 'v', 'C', 'V'];

impl CommandSpec {
    /// Full command name, e.g. "create account".
    pub fn name(&self) -> String {
        format!("{} {}", self.verb, self.noun)
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_by_short(&self, short: char) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.short == Some(short))
    }

    pub fn positional_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|f| f.positional)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|f| f.required())
    }

    /// Fill absent optional fields with their declared defaults.
    pub fn apply_defaults(&self, request: &mut Document) {
        for field in self.fields {
            if let Some(default) = field.default {
                if !request.contains(field.name) {
                    request.put(field.name, default.to_value());
                }
            }
        }
    }

    /// Usage text in both input forms, followed by the field table.
    pub fn usage(&self, program: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.about);

        let positional: String = self
            .positional_fields()
            .map(|f| format!(" [{}]", f.name))
            .collect();
        let _ = writeln!(
            out,
            "Usage: {program} {} {}{positional} [OPTIONS]",
            self.verb, self.noun
        );

        if !self.fields.is_empty() {
            let members = self
                .fields
                .iter()
                .map(|f| format!("\"{}\":{}", f.name, f.kind.placeholder()))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(
                out,
                "Usage: {program} {} {} [-j '{{{members}}}'] [OPTIONS]",
                self.verb, self.noun
            );
            let _ = writeln!(out);
            let _ = writeln!(out, "Fields:");
            for field in self.fields {
                let flag = match field.short {
                    Some(c) => format!("-{c}, --{}", field.name),
                    None => format!("    --{}", field.name),
                };
                let suffix = match field.default {
                    Some(d) => format!(" [default: {d}]"),
                    None => " (required)".to_string(),
                };
                // a boolean takes its value only in the `--flag=value` form
                let value = match field.kind {
                    FieldType::Boolean => format!("[=<{}>]", field.kind),
                    kind => format!(" <{kind}>"),
                };
                let _ = writeln!(
                    out,
                    "  {:<28} {}{suffix}",
                    format!("{flag}{value}"),
                    field.help
                );
            }
        }
        out
    }
}
