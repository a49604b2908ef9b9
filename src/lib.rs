//! teos: command-line client for an EOSIO-style blockchain
//!
//! Each command declares its input fields and output lines once. The options
//! driver resolves a request from positional tokens or JSON, validates it,
//! hands it to a `ChainOperations` implementation and renders the response
//! as labeled lines or raw JSON.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
