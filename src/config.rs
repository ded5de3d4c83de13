//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::env::{self, VarError};
use std::path::PathBuf;

use rand::Rng;
use tracing::warn;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_STORAGE_DIR: &str = ".sketchboard";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the room server's HTTP API.
    pub api_base_url: String,
    /// Identity stamped on every outbound event.
    pub user_id: String,
    /// Directory backing the local key-value store.
    pub storage_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            user_id: random_user_id(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `SKETCHBOARD_API_URL`: room server base URL
    /// - `SKETCHBOARD_USER_ID`: default `user-<n>` with random `n` below 1000
    /// - `SKETCHBOARD_STORAGE_DIR`: default `.sketchboard`
    /// - `SKETCHBOARD_REQUEST_TIMEOUT_SECS`: default 10
    /// - `SKETCHBOARD_CONNECT_TIMEOUT_SECS`: default 5
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Empty`] if the API URL or user id is set but blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_var)
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Empty`] if the API URL or user id is set but blank.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = non_empty(&lookup, "SKETCHBOARD_API_URL")?
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let user_id = non_empty(&lookup, "SKETCHBOARD_USER_ID")?.unwrap_or_else(random_user_id);
        let storage_dir = lookup("SKETCHBOARD_STORAGE_DIR").map_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR), PathBuf::from);

        Ok(Self {
            api_base_url,
            user_id,
            storage_dir,
            request_timeout_secs: parse_u64(&lookup, "SKETCHBOARD_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout_secs: parse_u64(&lookup, "SKETCHBOARD_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        })
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, var: &'static str) -> Result<Option<String>, ConfigError> {
    match lookup(var) {
        Some(v) if v.trim().is_empty() => Err(ConfigError::Empty { var }),
        other => Ok(other),
    }
}

/// Read one variable. A value that is not valid unicode is reported and
/// treated as unset.
fn env_var(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) => Some(value),
        Err(VarError::NotPresent) => None,
        Err(e @ VarError::NotUnicode(_)) => {
            warn!(%key, error = %e, "config: ignoring variable");
            None
        }
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<u64>() {
        Ok(value) => value,
        Err(e) => {
            warn!(%key, value = %raw, error = %e, default, "config: unparseable value, using default");
            default
        }
    }
}

/// `user-<n>` with `n` in `0..1000`.
#[must_use]
pub fn random_user_id() -> String {
    format!("user-{}", rand::rng().random_range(0..1000))
}
