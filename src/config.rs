//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_VERIFY_INTERVAL_SECS: u64 = 15 * 60;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

const TOKEN_DIR_NAME: &str = ".smart-pantry";
const TOKEN_FILE_NAME: &str = "session.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The API base URL is empty or not an `http(s)` URL.
    #[error("invalid base URL: {0:?}")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API origin without a trailing slash, e.g. `http://localhost:8080`.
    pub base_url: String,
    /// Durable key-value file holding the persisted access token.
    pub token_file: PathBuf,
    /// How often the session monitor re-verifies the access token.
    pub verify_interval: Duration,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// Config for `base_url` with every other setting at its default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL is empty or does not
    /// use the `http` or `https` scheme.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            token_file: default_token_file(std::env::var("HOME").ok().as_deref()),
            verify_interval: Duration::from_secs(DEFAULT_VERIFY_INTERVAL_SECS),
            timeouts: Timeouts::default(),
        })
    }

    /// Build typed client config from environment variables, after loading
    /// a `.env` file if one is present.
    ///
    /// Optional:
    /// - `PANTRY_API_URL`: default `http://localhost:8080`
    /// - `PANTRY_TOKEN_FILE`: default `$HOME/.smart-pantry/session.json`
    /// - `PANTRY_VERIFY_INTERVAL_SECS`: default 900
    /// - `PANTRY_REQUEST_TIMEOUT_SECS`: default 30
    /// - `PANTRY_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// Intervals and timeouts below one second are raised to one second.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if `PANTRY_API_URL` is set to
    /// something that is not an `http(s)` URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = var("PANTRY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let token_file = var("PANTRY_TOKEN_FILE")
            .filter(|path| !path.trim().is_empty())
            .map_or_else(|| default_token_file(var("HOME").as_deref()), PathBuf::from);
        let verify_interval_secs =
            parse_or(var("PANTRY_VERIFY_INTERVAL_SECS"), DEFAULT_VERIFY_INTERVAL_SECS).max(1);
        let timeouts = Timeouts {
            request_secs: parse_or(var("PANTRY_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS).max(1),
            connect_secs: parse_or(var("PANTRY_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS).max(1),
        };

        Ok(Self {
            base_url: normalize_base_url(&base_url)?,
            token_file,
            verify_interval: Duration::from_secs(verify_interval_secs),
            timeouts,
        })
    }

    /// Replace the API origin.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for a non-`http(s)` URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_token_file(mut self, token_file: impl Into<PathBuf>) -> Self {
        self.token_file = token_file.into();
        self
    }

    #[must_use]
    pub fn with_verify_interval(mut self, interval: Duration) -> Self {
        self.verify_interval = interval;
        self
    }

    #[must_use]
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }
}

fn parse_or<T>(raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr,
{
    raw.and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

pub(crate) fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .is_some_and(|rest| !rest.is_empty());
    if !has_host {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn default_token_file(home: Option<&str>) -> PathBuf {
    match home.filter(|h| !h.is_empty()) {
        Some(home) => PathBuf::from(home).join(TOKEN_DIR_NAME).join(TOKEN_FILE_NAME),
        None => PathBuf::from(TOKEN_DIR_NAME).join(TOKEN_FILE_NAME),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
