//! Configuration management for the Spotify search client.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. Every value has a default, so a
//! client can be used without any configuration at all.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, fmt, path::PathBuf, time::Duration};

use crate::utils;

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_URL: &str = "SPOTIFY_API_URL";
pub const ENV_API_TOKEN: &str = "SPOTIFY_API_TOKEN";
pub const ENV_TIMEOUT: &str = "SPOTIFY_SEARCH_TIMEOUT";
pub const ENV_MAX_CACHE_AGE: &str = "SPOTIFY_SEARCH_MAX_CACHE_AGE";

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    EnvFileError(dotenv::Error),
    InvalidValue { key: String, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "cannot prepare config directory: {}", e),
            ConfigError::EnvFileError(e) => write!(f, "cannot read .env file: {}", e),
            ConfigError::InvalidValue { key, reason } => write!(f, "{}: {}", key, reason),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

impl From<dotenv::Error> for ConfigError {
    fn from(err: dotenv::Error) -> Self {
        ConfigError::EnvFileError(err)
    }
}

/// Runtime settings of a search client.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    /// Base URL of the Web API, without a trailing slash.
    pub api_url: String,
    /// Bearer token sent with every request when present.
    pub access_token: Option<String>,
    /// Per-request timeout enforced by the HTTP transport.
    pub timeout_interval: Duration,
    /// Age handed to the cache with every write. Entries older than this are
    /// misses.
    pub max_cache_age: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            access_token: None,
            timeout_interval: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_cache_age: Duration::ZERO,
        }
    }
}

impl SearchSettings {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the settings through an arbitrary key lookup, falling back to
    /// the defaults for every missing key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            settings.api_url = url.trim().trim_end_matches('/').to_string();
        }

        settings.access_token = lookup(ENV_API_TOKEN).filter(|v| !v.trim().is_empty());

        if let Some(raw) = lookup(ENV_TIMEOUT) {
            settings.timeout_interval = parse_duration(ENV_TIMEOUT, &raw)?;
        }

        if let Some(raw) = lookup(ENV_MAX_CACHE_AGE) {
            settings.max_cache_age = parse_duration(ENV_MAX_CACHE_AGE, &raw)?;
        }

        Ok(settings)
    }
}

fn parse_duration(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    utils::parse_seconds(raw).map_err(|reason| ConfigError::InvalidValue {
        key: key.to_string(),
        reason,
    })
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file lives under `spotsearch/.env` in the platform-specific local data
/// directory:
/// - Linux: `~/.local/share/spotsearch/.env`
/// - macOS: `~/Library/Application Support/spotsearch/.env`
/// - Windows: `%LOCALAPPDATA%/spotsearch/.env`
///
/// A missing file is not an error; the defaults and the process
/// environment apply instead.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or an existing file
/// cannot be parsed.
pub async fn load_env() -> Result<(), ConfigError> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if async_fs::metadata(&path).await.is_ok() {
        dotenv::from_path(&path)?;
    }
    Ok(())
}

/// Root of everything the crate stores on disk.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotsearch");
    path
}

fn env_path() -> PathBuf {
    data_dir().join(".env")
}
