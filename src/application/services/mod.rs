//! Application services
//!
//! Concrete service implementations behind the I/O boundary traits.
//! Services depend on `CommandRunner` and `Settings` but are themselves
//! concrete structs.

mod cleos;

pub use cleos::{parse_key_pair, CleosOperations};
