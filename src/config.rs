//! API configuration parsed from environment variables.
//!
//! The upstream spec for this client left network timeouts undefined; they
//! are made explicit here and applied when the reqwest client is built.

use crate::error::ApiError;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Base URL and timeout settings shared by every HTTP call in the crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// API base URL, no trailing slash (e.g. `https://host/ssi3/v2`).
    pub base_url: String,
    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Connection-establishment timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl ApiConfig {
    /// Config with default timeouts. Trailing slashes are trimmed so path
    /// joins stay predictable.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }

    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `MSHOP_BASE_URL`
    ///
    /// Optional:
    /// - `MSHOP_REQUEST_TIMEOUT_SECS`: default 30
    /// - `MSHOP_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] when `MSHOP_BASE_URL` is not set.
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = std::env::var("MSHOP_BASE_URL")
            .map_err(|_| ApiError::Config("MSHOP_BASE_URL not set".into()))?;

        let mut config = Self::new(base_url);
        config.request_timeout_secs =
            env_parse("MSHOP_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS);
        config.connect_timeout_secs =
            env_parse("MSHOP_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS);
        Ok(config)
    }

    /// Absolute URL for an API path (`path` with or without a leading slash).
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// The credential-exchange endpoint; 401s from this URL are never retried.
    #[must_use]
    pub fn refresh_url(&self) -> String {
        self.url("auth/refresh")
    }
}

fn env_parse(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
