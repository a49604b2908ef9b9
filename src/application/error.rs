//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Raw input could not be turned into a request document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("malformed JSON in {origin}: {message}")]
    MalformedJson { origin: String, message: String },

    #[error("JSON file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("cannot parse '{value}' as {expected} for field '{field}'")]
    TypeCoercion {
        field: String,
        expected: &'static str,
        value: String,
    },

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("flag {0} requires a value")]
    MissingValue(String),

    #[error("--json and --json-file cannot be used together")]
    ConflictingSources,
}

/// A request document does not satisfy the command's field declarations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{command}: missing required field '{field}'")]
    MissingField { command: String, field: String },

    #[error("{command}: field '{field}' must be {expected}, got {found}")]
    FieldTypeMismatch {
        command: String,
        field: String,
        expected: &'static str,
        found: String,
    },
}

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Input(#[from] InputError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{command} failed: {message}")]
    Execution {
        command: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// Execution failure reported by an operation collaborator.
    pub fn execution(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            command: command.into(),
            message: message.into(),
            source: None,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
