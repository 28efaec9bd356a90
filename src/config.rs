use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde_derive::Deserialize;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::github::link::LinkMatch;
use crate::github::retry::{RetryPolicy, StallPolicy};
use crate::model::parse_timestamp;

/// Names missing variables by their full environment key.
fn env_error(prefix: &str, err: envy::Error) -> ConfigError {
    match err {
        envy::Error::MissingValue(field) => {
            ConfigError::missing(format!("{}{}", prefix, field.to_uppercase()))
        }
        other => ConfigError::env_parse(other),
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl AppConfig {
    pub fn log_level(&self) -> tracing::Level {
        tracing::Level::from_str(self.log_level.as_str()).unwrap_or(tracing::Level::INFO)
    }
}

pub(crate) fn load_app_config() -> Result<AppConfig> {
    match envy::from_env::<AppConfig>() {
        Ok(config) => Ok(config),
        Err(err) => Err(anyhow!("Failed to load AppConfig: {}", env_error("", err))),
    }
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

#[derive(Deserialize, Debug, Clone)]
pub struct GithubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    // empty token means requests on the direct path go out unauthenticated
    #[serde(default)]
    pub oauth_token: String,
    #[serde(default)]
    pub proxies: Vec<String>,
}

impl GithubConfig {
    /// Proxy addresses in configuration order, blanks dropped.
    pub fn proxy_list(&self) -> Vec<String> {
        self.proxies
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect()
    }
}

pub(crate) fn load_github_config() -> Result<GithubConfig> {
    match envy::prefixed("GITHUB_").from_env::<GithubConfig>() {
        Ok(config) => Ok(config),
        Err(err) => Err(anyhow!("Failed to load GithubConfig: {}", env_error("GITHUB_", err))),
    }
}

fn default_max_attempts() -> u32 {
    5
}

fn default_initial_backoff_ms() -> u64 {
    1000
}

fn default_max_backoff_ms() -> u64 {
    60_000
}

fn default_stall_interval_secs() -> u64 {
    60
}

fn default_link_match() -> String {
    "strict".to_string()
}

#[derive(Deserialize, Debug)]
pub struct FetchConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    // how many times to re-probe when no credential has quota; 0 fails fast
    #[serde(default)]
    pub stall_reprobes: u32,
    #[serde(default = "default_stall_interval_secs")]
    pub stall_interval_secs: u64,
    #[serde(default = "default_link_match")]
    pub link_match: String,
}

impl FetchConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
        }
    }

    pub fn stall_policy(&self) -> StallPolicy {
        StallPolicy {
            reprobes: self.stall_reprobes,
            interval: Duration::from_secs(self.stall_interval_secs),
        }
    }

    pub fn link_match(&self) -> Result<LinkMatch, ConfigError> {
        LinkMatch::from_str(&self.link_match)
    }
}

pub fn load_fetch_config() -> Result<FetchConfig> {
    match envy::prefixed("FETCH_").from_env::<FetchConfig>() {
        Ok(config) => Ok(config),
        Err(err) => Err(anyhow!("Failed to load FetchConfig: {}", env_error("FETCH_", err))),
    }
}

fn default_branch() -> String {
    "master".to_string()
}

#[derive(Deserialize, Debug)]
pub struct AnalyzeConfig {
    pub url: String,
    pub begin_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default = "default_branch")]
    pub branch: String,
}

impl AnalyzeConfig {
    /// Splits `https://github.com/<owner>/<repo>` into owner and repository name.
    pub fn repository(&self) -> Result<(String, String), ConfigError> {
        let invalid = || {
            ConfigError::invalid(
                "url",
                format!(
                    "unknown url format '{}', expected https://github.com/<owner>/<repo>",
                    self.url
                ),
            )
        };

        let url = reqwest::Url::parse(&self.url).map_err(|_| invalid())?;
        let segments: Vec<&str> = url.path().split('/').collect();
        match segments.as_slice() {
            ["", owner, repo] if !owner.is_empty() && !repo.is_empty() => {
                Ok((owner.to_string(), repo.to_string()))
            }
            _ => Err(invalid()),
        }
    }

    /// Parsed date window; bounds given in the wrong order are swapped.
    pub fn date_range(
        &self,
    ) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>), ConfigError> {
        let parse = |field: &str, value: &Option<String>| {
            value
                .as_deref()
                .map(|text| {
                    parse_timestamp(text).map_err(|_| {
                        ConfigError::invalid(field, format!("not a valid date: '{}'", text))
                    })
                })
                .transpose()
        };

        let begin = parse("begin_date", &self.begin_date)?;
        let end = parse("end_date", &self.end_date)?;

        match (begin, end) {
            (Some(b), Some(e)) if b > e => Ok((Some(e), Some(b))),
            range => Ok(range),
        }
    }
}

pub fn load_analyze_config() -> Result<AnalyzeConfig> {
    match envy::prefixed("ANALYZE_").from_env::<AnalyzeConfig>() {
        Ok(config) => Ok(config),
        Err(err) => Err(anyhow!("Failed to load AnalyzeConfig: {}", env_error("ANALYZE_", err))),
    }
}
