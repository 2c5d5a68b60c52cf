//! Application configuration loaded from environment variables.

use fetcher::FetchConfig;
use pipeline::BatchConfig;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Demo configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT` — `text` or `json` (default: `text`)
/// - `DIRECTORY_REMOTE_USER_ID` — id resolved from the remote source (default: `4`)
/// - everything [`FetchConfig::from_env`] and [`BatchConfig::from_env`] read
#[derive(Debug, Clone)]
pub struct Config {
    pub fetch: FetchConfig,
    pub batch: BatchConfig,
    pub log_level: String,
    pub log_format: LogFormat,
    pub remote_user_id: u64,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            fetch: FetchConfig::from_env(),
            batch: BatchConfig::from_env(),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_format: std::env::var("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or(LogFormat::Text),
            remote_user_id: std::env::var("DIRECTORY_REMOTE_USER_ID")
                .ok()
                .and_then(|id| id.parse().ok())
                .unwrap_or(4),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            batch: BatchConfig::default(),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            remote_user_id: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.remote_user_id, 4);
        assert_eq!(config.fetch.base_url, "https://api.example.com");
        assert_eq!(config.batch.workers, 4);
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Text);
    }
}
