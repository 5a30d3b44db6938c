//! Configuration for a plank data directory.
//!
//! Loaded from `config.toml` inside `.plank/`. Everything has a default,
//! so a missing file is not an error.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, StorageError};

/// Board-directory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlankConfig {
    /// Pretty-print the board snapshot on disk
    #[serde(default = "default_pretty_json")]
    pub pretty_json: bool,

    /// Default tracing filter when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_pretty_json() -> bool {
    true
}

fn default_log_filter() -> String {
    "plank=info".to_string()
}

impl PlankConfig {
    /// Load configuration from `<plank_dir>/config.toml` or use defaults.
    pub fn load_or_default(plank_dir: &Path) -> Result<Self> {
        let config_path = plank_dir.join("config.toml");

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)
                .map_err(|e| StorageError::Config(format!("Failed to parse config file: {}", e)))
        } else {
            Ok(Self::default())
        }
    }

    /// Write the default configuration to `<plank_dir>/config.toml`.
    pub fn write_default(plank_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(plank_dir)?;
        let config_path = plank_dir.join("config.toml");
        let config = Self::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| StorageError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

impl Default for PlankConfig {
    fn default() -> Self {
        Self {
            pretty_json: default_pretty_json(),
            log_filter: default_log_filter(),
        }
    }
}
