//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/teos/teos.toml`
//! 3. Local config: `<dir>/.teos.toml` (best effort, unreadable files are skipped)
//! 4. Environment variables: `TEOS_*` prefix
//!
//! Settings are loaded once per process and passed explicitly to the driver.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, Document};
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Unified configuration for teos.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Node RPC endpoint
    pub node_url: String,
    /// Wallet daemon endpoint (cleos default when unset)
    pub wallet_url: Option<String>,
    /// Path of the cleos executable
    pub cleos: String,
    /// Print raw JSON responses by default
    pub raw: bool,
    /// Report configuration problems
    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            node_url: "http://127.0.0.1:8888".into(),
            wallet_url: None,
            cleos: "cleos".into(),
            raw: false,
            verbose: false,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub node_url: Option<String>,
    pub wallet_url: Option<String>,
    pub cleos: Option<String>,
    pub raw: Option<bool>,
    pub verbose: Option<bool>,
}

/// Get the XDG config directory for teos.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "teos").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("teos.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".teos.toml")
}

/// Read a config file into a document without failing.
///
/// `.json` files are parsed as JSON, anything else as TOML. Any read or parse
/// problem yields an empty document; with `verbose` the problem is reported.
pub fn get_config(fs: &dyn FileSystem, path: &Path, verbose: bool) -> Document {
    let content = match fs.read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            if verbose {
                warn!("cannot read config file {}: {}", path.display(), e);
            }
            return Document::new();
        }
    };

    let parsed: Result<Value, String> = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    } else {
        toml::from_str(&content).map_err(|e| e.to_string())
    };

    match parsed {
        Ok(Value::Object(map)) => Document::from(map),
        Ok(_) => {
            if verbose {
                warn!("config file {} is not a table", path.display());
            }
            Document::new()
        }
        Err(e) => {
            if verbose {
                warn!("cannot parse config file {}: {}", path.display(), e);
            }
            Document::new()
        }
    }
}

/// Load a TOML file into RawSettings.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins if specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            node_url: overlay
                .node_url
                .clone()
                .unwrap_or_else(|| self.node_url.clone()),
            wallet_url: overlay.wallet_url.clone().or_else(|| self.wallet_url.clone()),
            cleos: overlay.cleos.clone().unwrap_or_else(|| self.cleos.clone()),
            raw: overlay.raw.unwrap_or(self.raw),
            verbose: overlay.verbose.unwrap_or(self.verbose),
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.cleos = expand_env_vars(&self.cleos);
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.teos.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_with(global_config_path().as_deref(), local_dir)
    }

    /// Load settings from an explicit global config path.
    ///
    /// The global file must parse if it exists; the local file is best effort.
    pub fn load_with(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_path {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            let doc = get_config(&RealFileSystem, &local_path, current.verbose);
            if !doc.is_empty() {
                debug!("load: local config {}", local_path.display());
                let raw: RawSettings =
                    serde_json::from_value(Value::from(doc)).map_err(|e| {
                        ApplicationError::Config {
                            message: format!("{}: {}", local_path.display(), e),
                        }
                    })?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        Ok(current)
    }

    /// Apply TEOS_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TEOS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("node_url") {
            settings.node_url = val;
        }
        if let Ok(val) = config.get_string("wallet_url") {
            settings.wallet_url = Some(val);
        }
        if let Ok(val) = config.get_string("cleos") {
            settings.cleos = val;
        }
        if let Ok(val) = config.get_bool("raw") {
            settings.raw = val;
        }
        if let Ok(val) = config.get_bool("verbose") {
            settings.verbose = val;
        }

        Ok(settings)
    }

    /// Serialize to TOML for display.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {e}"),
        })
    }
}

/// Generate a commented config template.
pub fn config_template() -> String {
    let defaults = Settings::default();
    format!(
        r#"# teos configuration
# Precedence: defaults < global < local .teos.toml < TEOS_* env vars

# Node RPC endpoint
node_url = "{}"

# Wallet daemon endpoint
# wallet_url = "http://127.0.0.1:8900"

# cleos executable (~ and $VAR are expanded)
cleos = "{}"

# Print raw JSON instead of formatted output
raw = {}

# Report unreadable config files
verbose = {}
"#,
        defaults.node_url, defaults.cleos, defaults.raw, defaults.verbose
    )
}
