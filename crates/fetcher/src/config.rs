//! Fetcher configuration loaded from environment variables.

use std::time::Duration;

use common::UserId;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.example.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Where and how long to look for remote users.
///
/// Reads from environment variables:
/// - `DIRECTORY_API_URL` — base URL of the user source (default: `"https://api.example.com"`)
/// - `DIRECTORY_FETCH_TIMEOUT_MS` — per-fetch time bound (default: `5000`)
/// - `DIRECTORY_MAX_RETRIES` — attempts a caller-side retry may add (default: `3`)
///
/// The fetcher itself never retries; `max_retries` is read by callers that
/// opt into retrying.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl FetchConfig {
    /// Creates a configuration for `base_url` with default timeout and retries.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("DIRECTORY_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            timeout: std::env::var("DIRECTORY_FETCH_TIMEOUT_MS")
                .ok()
                .and_then(|ms| ms.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_TIMEOUT),
            max_retries: std::env::var("DIRECTORY_MAX_RETRIES")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(DEFAULT_MAX_RETRIES),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Builds `{base_url}/users/{id}`.
    pub fn user_url(&self, id: UserId) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}/users/{}",
            self.base_url.trim_end_matches('/'),
            id
        ))
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}
