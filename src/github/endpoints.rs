//! Endpoint and query builders for GitHub REST requests.
//!
//! This module keeps the URL templates and the query parameters for each
//! collection in one place so the report layer only names what it wants.

use crate::model::{CollectionKind, EntityState};

const RATE_LIMIT_PATH: &str = "/rate_limit";
const PER_PAGE: u32 = 100;

fn join(api_url: &str, path: &str) -> String {
    format!("{}{}", api_url.trim_end_matches('/'), path)
}

pub fn rate_limit_url(api_url: &str) -> String {
    join(api_url, RATE_LIMIT_PATH)
}

/// Base URL of a repository collection, without query.
pub fn collection_url(api_url: &str, kind: CollectionKind, owner: &str, repo: &str) -> String {
    let path = match kind {
        CollectionKind::Contributors => format!("/repos/{}/{}/contributors", owner, repo),
        CollectionKind::PullRequests => format!("/repos/{}/{}/pulls", owner, repo),
        CollectionKind::Issues => format!("/repos/{}/{}/issues", owner, repo),
    };
    join(api_url, &path)
}

/// Queries supported by the collection endpoints.
#[derive(Debug, Clone)]
pub enum QueryType {
    /// Contributor listing, oldest first
    Contributors,
    /// Pull requests or issues in one state against a base branch, oldest first
    ByState { state: EntityState, branch: String },
}

/// Builder for collection query parameters.
pub struct QueryBuilder;

impl QueryBuilder {
    /// Creates the query parameters for the given query type, in request order.
    pub fn build(query_type: QueryType) -> Vec<(&'static str, String)> {
        match query_type {
            QueryType::Contributors => vec![
                ("direction", "asc".to_string()),
                ("per_page", PER_PAGE.to_string()),
            ],
            QueryType::ByState { state, branch } => vec![
                ("direction", "asc".to_string()),
                ("state", state.to_string()),
                ("per_page", PER_PAGE.to_string()),
                ("base", branch),
            ],
        }
    }
}
