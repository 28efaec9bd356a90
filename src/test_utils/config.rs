//! Configuration utilities for testing.
//!
//! This module provides test configuration builders and helpers for creating
//! mock configurations used throughout the test suite.

use crate::config::GithubConfig;

/// Builder for creating test GitHub configurations.
#[derive(Debug)]
pub struct TestGithubConfigBuilder {
    api_url: String,
    oauth_token: String,
    proxies: Vec<String>,
}

impl TestGithubConfigBuilder {
    /// Creates a new test config builder with default values.
    pub fn new() -> Self {
        Self {
            api_url: "http://test.local".to_string(),
            oauth_token: "test_token".to_string(),
            proxies: Vec::new(),
        }
    }

    /// Sets the API base URL for the test configuration.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Sets the OAuth token for the test configuration.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.oauth_token = token.into();
        self
    }

    /// Adds a proxy address to the test configuration.
    pub fn with_proxy(mut self, address: impl Into<String>) -> Self {
        self.proxies.push(address.into());
        self
    }

    /// Builds the GitHub configuration.
    pub fn build(self) -> GithubConfig {
        GithubConfig {
            api_url: self.api_url,
            oauth_token: self.oauth_token,
            proxies: self.proxies,
        }
    }
}

/// Creates a default test GitHub configuration.
/// This is a convenience function for simple test cases.
pub fn test_github_config() -> GithubConfig {
    TestGithubConfigBuilder::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_config_builder() {
        let config = TestGithubConfigBuilder::new()
            .with_url("http://custom.local")
            .with_token("custom_token")
            .with_proxy("http://p1:3128")
            .build();

        assert_eq!(config.api_url, "http://custom.local");
        assert_eq!(config.oauth_token, "custom_token");
        assert_eq!(config.proxy_list(), vec!["http://p1:3128".to_string()]);
    }

    #[test]
    fn test_convenience_function() {
        let config = test_github_config();
        assert_eq!(config.api_url, "http://test.local");
        assert!(config.proxies.is_empty());
    }
}
