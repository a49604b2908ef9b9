//! Domain layer: documents, command declarations, operation inputs
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod document;
pub mod entities;
pub mod error;
pub mod schema;

pub use document::{Document, FromValue};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use schema::{CommandSpec, FieldDefault, FieldSpec, FieldType, OutputLine, OutputSpec};
