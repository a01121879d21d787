//! Application configuration
//!
//! Configuration types and the loader that fills them from environment
//! variables or a config file.

mod loader;

use serde::{Deserialize, Serialize};

pub use loader::{load, load_from_env, load_from_file, probe_config_paths};

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Database settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    pub path: String,
    /// Connection pool size.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

fn default_pool_size() -> u32 {
    salonkit_domain::constants::DEFAULT_POOL_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}
