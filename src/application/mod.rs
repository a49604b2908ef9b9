//! Application layer: argument sources, driver, commands, rendering
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod commands;
pub mod driver;
pub mod error;
pub mod error_ext;
pub mod render;
pub mod services;
pub mod source;

pub use commands::{Command, CommandKind};
pub use driver::{normalize, OptionsDriver, Rendered};
pub use error::{ApplicationError, ApplicationResult, InputError, ValidationError};
pub use error_ext::IoResultExt;
pub use render::render;
pub use source::{ArgumentSource, Invocation};
