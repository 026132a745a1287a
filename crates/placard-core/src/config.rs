//! Placard configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::traits::ConfigManager;

/// Top-level configuration for the `placard` binary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacardConfig {
    /// Project name, used in log output.
    pub project_name: String,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// ACL evaluation settings.
    pub acl: AclConfig,
    /// Where the ACL state lives.
    pub store: StoreConfig,
}

/// Logging settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is not set.
    pub level: String,
}

/// ACL evaluation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AclConfig {
    /// Suppress ACE-level audit events on permission checks. Off by
    /// default, so every decision reaches the audit sink.
    pub administrative_mode: bool,
    /// Page size used when a listing does not ask for one.
    pub default_page_size: usize,
}

/// ACL state file settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON file holding the serialized ACL store.
    pub state_file: PathBuf,
}

impl Default for PlacardConfig {
    fn default() -> Self {
        Self {
            project_name: "placard".to_string(),
            logging: LoggingConfig::default(),
            acl: AclConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for AclConfig {
    fn default() -> Self {
        Self {
            administrative_mode: false,
            default_page_size: 20,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from("placard-state.json"),
        }
    }
}

impl ConfigManager for PlacardConfig {
    fn project_name() -> &'static str {
        "placard"
    }
}
