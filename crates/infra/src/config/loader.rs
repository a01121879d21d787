//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `SALONKIT_DB_PATH`: Database file path (required)
//! - `SALONKIT_DB_POOL_SIZE`: Connection pool size (optional)
//! - `SALONKIT_LOG_LEVEL`: Tracing filter, e.g. `info` or `debug` (optional)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./salonkit.json` or `./salonkit.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use salonkit_domain::constants::DEFAULT_POOL_SIZE;
use salonkit_domain::{Result, SalonError};

use super::{AppConfig, DatabaseConfig};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables (a `.env` file is
/// honoured when present). If the required variables are missing, falls back
/// to loading from a config file.
///
/// # Errors
/// Returns `SalonError::Config` if configuration cannot be loaded from either
/// source.
pub fn load() -> Result<AppConfig> {
    let _ = dotenvy::dotenv();

    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// `SALONKIT_DB_PATH` is required; pool size and log level fall back to
/// defaults.
///
/// # Errors
/// Returns `SalonError::Config` if the database path is missing or a numeric
/// variable has an invalid value.
pub fn load_from_env() -> Result<AppConfig> {
    let db_path = env_var("SALONKIT_DB_PATH")?;

    let pool_size = match std::env::var("SALONKIT_DB_POOL_SIZE") {
        Ok(raw) => raw
            .parse::<u32>()
            .map_err(|e| SalonError::Config(format!("invalid pool size: {e}")))?,
        Err(_) => DEFAULT_POOL_SIZE,
    };

    let log_level =
        std::env::var("SALONKIT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    Ok(AppConfig {
        database: DatabaseConfig { path: db_path, pool_size },
        log_level,
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `SalonError::Config` if no file is found or the contents are
/// invalid.
pub fn load_from_file(path: Option<PathBuf>) -> Result<AppConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SalonError::Config(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SalonError::Config("no config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SalonError::Config(format!("failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, with the format detected by file
/// extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<AppConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SalonError::Config(format!("invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SalonError::Config(format!("invalid JSON format: {e}"))),
        _ => Err(SalonError::Config(format!("unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its parent, and the executable
/// directory for `config.{json,toml}` and `salonkit.{json,toml}`.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("salonkit.json"),
            cwd.join("salonkit.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
        ]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("salonkit.json"),
                exe_dir.join("salonkit.toml"),
            ]);
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| SalonError::Config(format!("missing required environment variable: {key}")))
}
