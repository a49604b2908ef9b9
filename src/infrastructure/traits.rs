//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing the driver and
//! commands to be tested with mock implementations.

use std::io;
use std::path::Path;
use std::process::Output;

use crate::application::ApplicationResult;
use crate::domain::{BlockRef, Document, NewAccount};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;
}

/// External command runner abstraction.
pub trait CommandRunner: Send + Sync {
    /// Run a command with arguments.
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output>;
}

/// Blockchain operations, one per command.
///
/// Implementations receive validated values only; any failure they return is
/// reported to the user unchanged.
pub trait ChainOperations: Send + Sync {
    /// Generate a key pair. Returns `{"privateKey", "publicKey"}`.
    fn create_key(&self, name: &str) -> ApplicationResult<Document>;

    /// Create an account. Returns the pushed transaction.
    fn create_account(&self, account: &NewAccount) -> ApplicationResult<Document>;

    /// Current chain information.
    fn get_info(&self) -> ApplicationResult<Document>;

    /// A full block.
    fn get_block(&self, block: &BlockRef) -> ApplicationResult<Document>;

    /// Accounts controlled by a public key. Returns `{"account_names": [...]}`.
    fn get_accounts(&self, public_key: &str) -> ApplicationResult<Document>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Real command runner implementation.
#[derive(Debug, Default)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output> {
        std::process::Command::new(cmd).args(args).output()
    }
}
