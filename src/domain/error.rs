//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent lookups and conversions on request/response documents.
/// These are independent of where the document came from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("missing field: {0}")]
    MissingField(String),

    #[error("field '{field}' is not a valid {expected}: {found}")]
    FieldTypeMismatch {
        field: String,
        expected: &'static str,
        found: String,
    },

    #[error("malformed JSON: {0}")]
    MalformedJson(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
