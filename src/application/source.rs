//! Argument sources: positional tokens, a JSON literal, or a JSON file
//!
//! Exactly one source is chosen per invocation. When a JSON source is given,
//! positional tokens are dropped, never merged.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use serde_json::Value;
use tracing::debug;

use crate::application::error_ext::IoResultExt;
use crate::application::{ApplicationResult, InputError};
use crate::domain::schema::{FieldSpec, FieldType};
use crate::domain::{CommandSpec, DomainError, Document};
use crate::infrastructure::traits::FileSystem;

/// Where a command's request document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentSource {
    /// Unnamed tokens plus `--flag value` / `-f value` pairs
    Positional(Vec<String>),
    /// JSON text given with `-j`
    JsonLiteral(String),
    /// JSON file given with `--json-file`
    JsonFile(PathBuf),
}

/// A command's raw token stream split into its source and the raw flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub source: ArgumentSource,
    /// `--raw` was given
    pub raw: bool,
}

impl Invocation {
    /// Extract `-j/--json`, `--json-file` and `--raw` from the tokens.
    ///
    /// Remaining tokens form the positional source unless a JSON source was
    /// selected, in which case they are ignored.
    pub fn parse(tokens: &[String]) -> Result<Self, InputError> {
        let mut json: Option<String> = None;
        let mut json_file: Option<PathBuf> = None;
        let mut raw = false;
        let mut rest = Vec::new();

        let mut iter = tokens.iter();
        while let Some(token) = iter.next() {
            match token.as_str() {
                "--" => {
                    rest.push(token.clone());
                    rest.extend(iter.by_ref().cloned());
                }
                "--raw" => raw = true,
                "-j" | "--json" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| InputError::MissingValue(token.clone()))?;
                    json = Some(value.clone());
                }
                "--json-file" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| InputError::MissingValue(token.clone()))?;
                    json_file = Some(PathBuf::from(value));
                }
                t => {
                    if let Some(value) = t.strip_prefix("--json=") {
                        json = Some(value.to_string());
                    } else if let Some(value) = t.strip_prefix("--json-file=") {
                        json_file = Some(PathBuf::from(value));
                    } else {
                        rest.push(token.clone());
                    }
                }
            }
        }

        let source = match (json, json_file) {
            (Some(_), Some(_)) => return Err(InputError::ConflictingSources),
            (Some(text), None) => ArgumentSource::JsonLiteral(text),
            (None, Some(path)) => ArgumentSource::JsonFile(path),
            (None, None) => {
                return Ok(Self {
                    source: ArgumentSource::Positional(rest),
                    raw,
                })
            }
        };
        if !rest.is_empty() {
            debug!("JSON input given, ignoring tokens: {:?}", rest);
        }

        Ok(Self { source, raw })
    }
}

impl ArgumentSource {
    /// Produce the request document for `spec` from this source.
    pub fn resolve(&self, spec: &CommandSpec, fs: &dyn FileSystem) -> ApplicationResult<Document> {
        match self {
            ArgumentSource::Positional(tokens) => Ok(bind_tokens(spec, tokens)?),
            ArgumentSource::JsonLiteral(text) => Ok(parse_json(text, "--json")?),
            ArgumentSource::JsonFile(path) => {
                if !fs.exists(path) {
                    return Err(InputError::FileNotFound(path.clone()).into());
                }
                let text = match fs.read_to_string(path) {
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {
                        return Err(InputError::FileNotFound(path.clone()).into())
                    }
                    other => other.with_path_context("read JSON file", path)?,
                };
                Ok(parse_json(&text, &path.display().to_string())?)
            }
        }
    }
}

/// Parse a JSON request; `origin` names the input in error messages.
pub fn parse_json(text: &str, origin: &str) -> Result<Document, InputError> {
    Document::from_json_str(text).map_err(|e| match e {
        DomainError::MalformedJson(message) => InputError::MalformedJson {
            origin: origin.to_string(),
            message,
        },
        other => InputError::MalformedJson {
            origin: origin.to_string(),
            message: other.to_string(),
        },
    })
}

fn looks_like_flag(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-') && token.parse::<f64>().is_err()
}

fn coerce(field: &FieldSpec, raw: &str) -> Result<Value, InputError> {
    field
        .kind
        .coerce(raw)
        .ok_or_else(|| InputError::TypeCoercion {
            field: field.name.to_string(),
            expected: field.kind.name(),
            value: raw.to_string(),
        })
}

/// Bind CLI tokens to the declared fields of `spec`.
///
/// Flags bind by long or short name. Unnamed tokens fill the positional
/// fields not already bound by a flag, in declaration order. Unbound optional
/// fields get their default. The document lists fields in declaration order.
pub fn bind_tokens(spec: &CommandSpec, tokens: &[String]) -> Result<Document, InputError> {
    let mut bound: HashMap<&'static str, Value> = HashMap::new();
    let mut unnamed: Vec<&String> = Vec::new();

    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        i += 1;

        if token == "--" {
            unnamed.extend(tokens[i..].iter());
            break;
        }
        if !looks_like_flag(token) {
            unnamed.push(token);
            continue;
        }

        let (field, inline) = match token.strip_prefix("--") {
            Some(long) => {
                let (name, inline) = match long.split_once('=') {
                    Some((n, v)) => (n, Some(v.to_string())),
                    None => (long, None),
                };
                let field = spec
                    .field(name)
                    .ok_or_else(|| InputError::UnknownFlag(token.clone()))?;
                (field, inline)
            }
            None => {
                let mut chars = token[1..].chars();
                let short = chars.next().unwrap_or('-');
                let attached: String = chars.collect();
                let attached = attached.strip_prefix('=').unwrap_or(&attached).to_string();
                let field = spec
                    .field_by_short(short)
                    .ok_or_else(|| InputError::UnknownFlag(token.clone()))?;
                (field, (!attached.is_empty()).then_some(attached))
            }
        };

        let value = match (inline, field.kind) {
            (Some(v), _) => coerce(field, &v)?,
            // a bare boolean flag never consumes the next token
            (None, FieldType::Boolean) => Value::Bool(true),
            (None, _) => {
                let next = tokens
                    .get(i)
                    .ok_or_else(|| InputError::MissingValue(token.clone()))?;
                i += 1;
                coerce(field, next)?
            }
        };
        bound.insert(field.name, value);
    }

    let mut open_slots = spec
        .positional_fields()
        .filter(|f| !bound.contains_key(f.name))
        .collect::<Vec<_>>()
        .into_iter();
    for token in unnamed {
        let field = open_slots
            .next()
            .ok_or_else(|| InputError::UnexpectedArgument(token.clone()))?;
        bound.insert(field.name, coerce(field, token)?);
    }

    let mut request = Document::new();
    for field in spec.fields {
        if let Some(value) = bound.remove(field.name) {
            request.put(field.name, value);
        } else if let Some(default) = field.default {
            request.put(field.name, default.to_value());
        }
    }
    Ok(request)
}
