//! Error types for the GitHub repository activity collector.
//!
//! This module defines typed errors for the different layers of the fetch engine,
//! so that callers can tell a dead proxy from an exhausted retry budget.

use thiserror::Error;

/// Result type alias using our custom error types.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error type that encompasses all application errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("configuration error")]
    Config(#[from] ConfigError),

    /// Single request failures
    #[error("fetch error")]
    Fetch(#[from] FetchError),

    /// Date-window filtering errors
    #[error("filter error")]
    Filter(#[from] FilterError),

    /// Pagination loop errors
    #[error("collector error")]
    Collector(#[from] CollectorError),

    /// Generic errors that don't fit other categories
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable parsing failed
    #[error("failed to parse environment variables: {0}")]
    EnvParse(String),

    /// Required configuration value is missing
    #[error("missing required configuration: {0}")]
    Missing(String),

    /// Configuration value is invalid
    #[error("invalid configuration value for {field}: {message}")]
    Invalid { field: String, message: String },
}

/// Failures of a single GET request.
///
/// These never cross the fetcher boundary as errors; the fetcher logs them and
/// reports an unsuccessful [`FetchResult`](crate::model::FetchResult).
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, timeout or other transport failure
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("server error (status {status}): {message}")]
    Status { status: u16, message: String },

    /// Body was not a JSON array of records
    #[error("failed to decode response body: {0}")]
    Decode(String),

    /// Proxy address could not be used to build a client
    #[error("unusable proxy '{address}': {message}")]
    Proxy { address: String, message: String },
}

/// Errors raised while truncating a page at the end of a date window.
#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    /// Entity carries no `created_at` field
    #[error("entity at position {index} has no created_at field")]
    MissingTimestamp { index: usize },

    /// `created_at` is not in `YYYY-MM-DDTHH:MM:SSZ` format
    #[error("failed to parse timestamp '{text}': {message}")]
    InvalidTimestamp { text: String, message: String },

    /// Input is not ascending by creation time
    #[error("entities are not ascending by created_at: '{current}' follows '{previous}'")]
    Unordered { previous: String, current: String },
}

/// Terminal outcomes of a paginated collection.
#[derive(Error, Debug)]
pub enum CollectorError {
    /// Direct path kept failing on the same link
    #[error("giving up on '{url}' after {attempts} failed attempts")]
    RetriesExhausted { url: String, attempts: u32 },

    /// Neither the direct path nor any proxy has quota left
    #[error("no credential has remaining rate limit quota after {probes} probes")]
    ProxyExhausted { probes: u32 },

    /// Base URL or query could not be assembled
    #[error("invalid collection URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// Page could not be truncated at the end date
    #[error("failed to filter page")]
    Filter(#[from] FilterError),
}

impl ConfigError {
    /// Creates a new environment parse error.
    pub fn env_parse(err: impl std::fmt::Display) -> Self {
        Self::EnvParse(err.to_string())
    }

    /// Creates a new missing configuration error.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing(field.into())
    }

    /// Creates a new invalid configuration error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl FetchError {
    /// Creates a status error from HTTP status and response body.
    pub fn status(status: reqwest::StatusCode, body: String) -> Self {
        Self::Status {
            status: status.as_u16(),
            message: body,
        }
    }

    /// Creates a decode error.
    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }

    /// Creates an unusable proxy error.
    pub fn proxy(address: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Proxy {
            address: address.into(),
            message: err.to_string(),
        }
    }
}

impl FilterError {
    /// Creates a timestamp parse error.
    pub fn invalid_timestamp(text: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::InvalidTimestamp {
            text: text.into(),
            message: err.to_string(),
        }
    }

    /// Creates an ordering violation error.
    pub fn unordered(previous: impl Into<String>, current: impl Into<String>) -> Self {
        Self::Unordered {
            previous: previous.into(),
            current: current.into(),
        }
    }
}

impl CollectorError {
    /// Creates a retries exhausted error.
    pub fn retries_exhausted(url: impl Into<String>, attempts: u32) -> Self {
        Self::RetriesExhausted {
            url: url.into(),
            attempts,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod config_error {
        use super::*;

        #[test]
        fn test_env_parse_error() {
            let err = ConfigError::env_parse("invalid format");
            assert_eq!(err.to_string(), "failed to parse environment variables: invalid format");
        }

        #[test]
        fn test_missing_error() {
            let err = ConfigError::missing("ANALYZE_URL");
            assert_eq!(err.to_string(), "missing required configuration: ANALYZE_URL");
        }

        #[test]
        fn test_invalid_error() {
            let err = ConfigError::invalid("link_match", "expected strict or loose");
            assert_eq!(
                err.to_string(),
                "invalid configuration value for link_match: expected strict or loose"
            );
        }
    }

    mod fetch_error {
        use super::*;

        #[test]
        fn test_status() {
            let err = FetchError::status(reqwest::StatusCode::FORBIDDEN, "rate limited".to_string());
            assert_eq!(err.to_string(), "server error (status 403): rate limited");
        }

        #[test]
        fn test_proxy() {
            let err = FetchError::proxy("http://[bad", "invalid IPv6 address");
            assert_eq!(
                err.to_string(),
                "unusable proxy 'http://[bad': invalid IPv6 address"
            );
        }
    }

    mod filter_error {
        use super::*;

        #[test]
        fn test_unordered() {
            let err = FilterError::unordered("2024-01-02T00:00:00Z", "2024-01-01T00:00:00Z");
            assert_eq!(
                err.to_string(),
                "entities are not ascending by created_at: '2024-01-01T00:00:00Z' follows '2024-01-02T00:00:00Z'"
            );
        }

        #[test]
        fn test_missing_timestamp() {
            let err = FilterError::MissingTimestamp { index: 3 };
            assert_eq!(err.to_string(), "entity at position 3 has no created_at field");
        }
    }

    mod collector_error {
        use super::*;

        #[test]
        fn test_retries_exhausted() {
            let err = CollectorError::retries_exhausted("https://api.github.com/x", 5);
            assert_eq!(
                err.to_string(),
                "giving up on 'https://api.github.com/x' after 5 failed attempts"
            );
        }

        #[test]
        fn test_proxy_exhausted() {
            let err = CollectorError::ProxyExhausted { probes: 1 };
            assert_eq!(
                err.to_string(),
                "no credential has remaining rate limit quota after 1 probes"
            );
        }
    }

    mod error_conversion {
        use super::*;

        #[test]
        fn test_config_error_conversion() {
            let config_err = ConfigError::missing("test");
            let err: Error = config_err.into();
            assert!(matches!(err, Error::Config(_)));
        }

        #[test]
        fn test_filter_error_into_collector_error() {
            let err: CollectorError = FilterError::MissingTimestamp { index: 0 }.into();
            assert!(matches!(err, CollectorError::Filter(_)));
        }

        #[test]
        fn test_anyhow_conversion() {
            let err = Error::Collector(CollectorError::ProxyExhausted { probes: 1 });
            let anyhow_err: anyhow::Error = err.into();
            assert!(anyhow_err.to_string().contains("collector error"));
        }
    }
}
