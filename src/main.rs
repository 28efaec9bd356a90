//! GitHub repository activity collector
//!
//! Walks the paginated GitHub REST listings of one repository and reports
//! contributor rankings together with pull request and issue counts.
//!
//! # Architecture
//!
//! Every listing goes through one [`github::PaginatedCollector`]:
//! - **Direct path** first, while the configured token has quota left
//! - **Proxy pool** next, probed in order and evicted on failure
//!
//! The report sections run concurrently and share the proxy pool.

mod config;
mod error;
mod github;
mod model;
mod report;

#[cfg(test)]
mod test_utils;

use crate::github::{Client, PaginatedCollector, ProxyPool, ProxyRotator, RateLimitProber};
use crate::model::{CollectionKind, EntityState};
use crate::report::{Analyzer, OLD_ISSUE_DAYS, OLD_PULL_REQUEST_DAYS};
use chrono::Utc;
use std::fmt::Display;
use std::sync::Arc;
use tokio::signal::ctrl_c;

/// Application entry point.
///
/// Loads configuration, wires the fetch engine and runs the report until it
/// completes or Ctrl-C is received.
#[tokio::main]
async fn main() {
    let app_config = config::load_app_config().expect("Failed to load AppConfig");
    tracing_subscriber::fmt()
        .with_max_level(app_config.log_level())
        .init();

    let github_config = config::load_github_config().expect("Failed to load GithubConfig");
    let fetch_config = config::load_fetch_config().expect("Failed to load FetchConfig");
    let analyze_config = config::load_analyze_config().expect("Failed to load AnalyzeConfig");

    let (owner, repo) = analyze_config
        .repository()
        .expect("Failed to parse repository url");
    let (begin, end) = analyze_config
        .date_range()
        .expect("Failed to parse date range");
    let link_match = fetch_config
        .link_match()
        .expect("Failed to parse link match mode");

    let api_url = github_config.api_url.clone();
    let pool = ProxyPool::new(github_config.proxy_list());
    if pool.is_empty() {
        tracing::info!("No proxies configured, using the direct path only");
    } else {
        tracing::info!(proxies = pool.len(), "Proxy pool loaded");
    }
    let client = Arc::new(Client::new(github_config));
    let rotator = ProxyRotator::new(pool, Arc::new(RateLimitProber::new(Arc::clone(&client))));
    let collector = PaginatedCollector::new(client, rotator)
        .with_link_match(link_match)
        .with_retry_policy(fetch_config.retry_policy())
        .with_stall_policy(fetch_config.stall_policy());

    let analyzer = Analyzer::new(collector, api_url, owner, repo, analyze_config.branch)
        .with_date_range(begin, end);

    tracing::info!("Running... Press Ctrl-C to terminate.");
    tokio::select! {
        _ = ctrl_c() => {
            tracing::info!("Received SIGINT. Exiting...");
        }
        _ = run_report(&analyzer) => {
            tracing::info!("Report finished.");
        }
    }
}

/// Runs every report section concurrently.
///
/// A failing section is logged and does not stop the others.
async fn run_report(analyzer: &Analyzer) {
    let now = Utc::now();

    let contributors = async {
        if let Some(ranking) = log_section("contributors", analyzer.contributors().await) {
            for (login, contributions) in ranking {
                tracing::info!("{}: {}", login, contributions);
            }
        }
    };

    let pull_requests = async {
        for state in [EntityState::Open, EntityState::Closed] {
            log_section(
                "pull requests",
                analyzer.entities(CollectionKind::PullRequests, state).await,
            );
        }
        log_section(
            "old pull requests",
            analyzer
                .old_count(CollectionKind::PullRequests, OLD_PULL_REQUEST_DAYS, now)
                .await,
        );
    };

    let issues = async {
        for state in [EntityState::Open, EntityState::Closed] {
            log_section("issues", analyzer.entities(CollectionKind::Issues, state).await);
        }
        log_section(
            "old issues",
            analyzer
                .old_count(CollectionKind::Issues, OLD_ISSUE_DAYS, now)
                .await,
        );
    };

    futures::join!(contributors, pull_requests, issues);
}

/// Logs a failed section and passes a successful one through.
fn log_section<T, E: Display>(section: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!("Section {} failed: {}", section, e);
            None
        }
    }
}
