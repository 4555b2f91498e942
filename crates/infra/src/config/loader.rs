//! Configuration loader
//!
//! Loads SDK configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Loads a `.env` file into the environment if one is present
//! 2. Attempts to load from environment variables
//! 3. If `LINESDK_CHANNEL_ID` is missing, falls back to a config file
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `LINESDK_CHANNEL_ID`: Login channel id (required)
//! - `LINESDK_API_BASE_URL`: API server base URL
//! - `LINESDK_OPENID_DISCOVERY_URL`: OpenID discovery document URL
//! - `LINESDK_WEB_LOGIN_PAGE_URL`: Browser login page URL
//! - `LINESDK_LINE_APP_AUTH_DISABLED`: Always log in through a browser
//!   (true/false)
//! - `LINESDK_HTTP_TIMEOUT_SECS`: HTTP request timeout in seconds
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./linesdk.toml` or `./linesdk.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};

use linesdk_domain::{LineAuthConfig, LineSdkError, Result, SdkConfig};
use url::Url;

const CONFIG_FILE_NAMES: [&str; 4] = ["linesdk.toml", "linesdk.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `LineSdkError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - A value fails validation
pub fn load() -> Result<SdkConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

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
/// Only `LINESDK_CHANNEL_ID` is required; everything else falls back to
/// the production defaults.
///
/// # Errors
/// Returns `LineSdkError::Config` if the channel id is missing or a value
/// cannot be parsed.
pub fn load_from_env() -> Result<SdkConfig> {
    let channel_id = env_var("LINESDK_CHANNEL_ID")?;
    let mut auth = LineAuthConfig::new(channel_id)
        .with_line_app_auth_disabled(env_bool("LINESDK_LINE_APP_AUTH_DISABLED", false));

    if let Some(url) = env_url("LINESDK_API_BASE_URL")? {
        auth = auth.with_api_base_url(url);
    }
    if let Some(url) = env_url("LINESDK_OPENID_DISCOVERY_URL")? {
        auth = auth.with_openid_discovery_url(url);
    }
    if let Some(url) = env_url("LINESDK_WEB_LOGIN_PAGE_URL")? {
        auth = auth.with_web_login_page_url(url);
    }

    let mut config = SdkConfig::new(auth);
    if let Ok(timeout) = std::env::var("LINESDK_HTTP_TIMEOUT_SECS") {
        config.http.timeout_secs = timeout
            .parse()
            .map_err(|e| LineSdkError::Config(format!("Invalid HTTP timeout: {}", e)))?;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `LineSdkError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid or a value fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<SdkConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(LineSdkError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            LineSdkError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| LineSdkError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<SdkConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| LineSdkError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| LineSdkError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(LineSdkError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| LineSdkError::Config(format!("Missing required environment variable: {}", key)))
}

/// Parse an optional URL from an environment variable
fn env_url(key: &str) -> Result<Option<Url>> {
    match std::env::var(key) {
        Ok(value) => Url::parse(&value)
            .map(Some)
            .map_err(|e| LineSdkError::Config(format!("Invalid URL in {}: {}", key, e))),
        Err(_) => Ok(None),
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
