//! Service container for dependency injection
//!
//! Wires the driver to its collaborators.

use std::sync::Arc;

use crate::application::services::CleosOperations;
use crate::application::OptionsDriver;
use crate::config::Settings;
use crate::infrastructure::traits::{
    ChainOperations, CommandRunner, FileSystem, RealCommandRunner, RealFileSystem,
};

/// Container holding the shared settings and I/O collaborators.
pub struct ServiceContainer {
    /// Application settings, read-only after loading
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Chain operations
    pub ops: Arc<dyn ChainOperations>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let settings = Arc::new(settings);
        let cmd: Arc<dyn CommandRunner> = Arc::new(RealCommandRunner);
        let ops = Arc::new(CleosOperations::new(cmd, Arc::clone(&settings)));
        Self {
            settings,
            fs: Arc::new(RealFileSystem),
            ops,
        }
    }

    /// Driver sharing this container's collaborators.
    pub fn driver(&self) -> OptionsDriver {
        OptionsDriver::new(
            Arc::clone(&self.settings),
            Arc::clone(&self.fs),
            Arc::clone(&self.ops),
        )
    }
}
