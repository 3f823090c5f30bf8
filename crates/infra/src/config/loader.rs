//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `WORKBASE_API_BASE_URL` is absent, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Whichever source wins, the result is validated before it is returned.
//!
//! ## Environment Variables
//! - `WORKBASE_API_BASE_URL`: Remote service base URL (required)
//! - `WORKBASE_TENANT_HEADER`: Tenant scope header name
//! - `WORKBASE_RETRY_MAX_ATTEMPTS`: Attempts per call, initial try included
//! - `WORKBASE_RETRY_BASE_DELAY_MS`: Base backoff delay
//! - `WORKBASE_RETRY_TIMEOUT_MS`: Per-attempt timeout
//! - `WORKBASE_RATE_LIMIT_MAX_REQUESTS`: Admissions per window
//! - `WORKBASE_RATE_LIMIT_WINDOW_MS`: Admission window length
//! - `WORKBASE_DB_PATH`: SQLite file for fallback records and tokens
//! - `WORKBASE_TOKEN_BACKEND`: `database` or `keychain`
//! - `WORKBASE_LOG_LEVEL`: Default log filter
//! - `WORKBASE_LOG_JSON`: Emit JSON logs (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./workbase.json` or `./workbase.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use workbase_domain::{Config, Result, TokenBackend, WorkbaseError};

const CONFIG_FILE_NAMES: [&str; 4] = ["config.json", "config.toml", "workbase.json", "workbase.toml"];
const PARENT_FILE_NAMES: [&str; 4] =
    ["../config.json", "../config.toml", "../../config.json", "../../config.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variable is missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `WorkbaseError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The loaded configuration fails validation
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `WORKBASE_API_BASE_URL` is required; every other variable falls back
/// to its default.
///
/// # Errors
/// Returns `WorkbaseError::Config` if the required variable is missing or
/// any variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();
    config.api.base_url = env_var("WORKBASE_API_BASE_URL")?;

    if let Some(header) = env_opt("WORKBASE_TENANT_HEADER") {
        config.api.tenant_header = header;
    }
    config.retry.max_attempts = env_parse("WORKBASE_RETRY_MAX_ATTEMPTS", config.retry.max_attempts)?;
    config.retry.base_delay_ms =
        env_parse("WORKBASE_RETRY_BASE_DELAY_MS", config.retry.base_delay_ms)?;
    config.retry.per_attempt_timeout_ms =
        env_parse("WORKBASE_RETRY_TIMEOUT_MS", config.retry.per_attempt_timeout_ms)?;
    config.rate_limit.max_requests =
        env_parse("WORKBASE_RATE_LIMIT_MAX_REQUESTS", config.rate_limit.max_requests)?;
    config.rate_limit.window_ms =
        env_parse("WORKBASE_RATE_LIMIT_WINDOW_MS", config.rate_limit.window_ms)?;
    if let Some(path) = env_opt("WORKBASE_DB_PATH") {
        config.storage.database_path = path;
    }
    config.storage.token_backend =
        env_parse::<TokenBackend>("WORKBASE_TOKEN_BACKEND", config.storage.token_backend)?;
    if let Some(level) = env_opt("WORKBASE_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("WORKBASE_LOG_JSON", config.logging.json);

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `WorkbaseError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The loaded configuration fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(WorkbaseError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            WorkbaseError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| WorkbaseError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| WorkbaseError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| WorkbaseError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(WorkbaseError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the working directory, its parents (up to 2 levels) and the
/// executable's directory, in that order.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf)) {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| {
            CONFIG_FILE_NAMES.iter().chain(PARENT_FILE_NAMES.iter()).map(move |name| root.join(name))
        })
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| WorkbaseError::Config(format!("Missing required environment variable: {key}")))
}

/// Optional, non-empty environment variable
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse an optional environment variable, keeping `default` when unset.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_opt(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| WorkbaseError::Config(format!("Invalid value for {key}: {e}"))),
        None => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
