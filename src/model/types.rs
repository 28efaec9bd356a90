use reqwest::header::HeaderMap;
use std::fmt;

use super::entity::Entity;

/// Egress path used for a single request.
///
/// The direct path authenticates with the configured OAuth token; a proxy path
/// is anonymous and carries its own per-address rate limit.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Credential {
    /// Direct connection, token-authenticated when a token is configured
    Direct,
    /// Anonymous request routed through the given proxy address
    Proxy(String),
}

impl Credential {
    /// Returns the proxy address, if this credential names one.
    pub fn proxy(&self) -> Option<&str> {
        match self {
            Credential::Direct => None,
            Credential::Proxy(address) => Some(address),
        }
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Credential::Direct => write!(f, "direct"),
            Credential::Proxy(address) => write!(f, "{}", address),
        }
    }
}

/// Collections the analyzer pulls from a repository.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum CollectionKind {
    Contributors,
    PullRequests,
    Issues,
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CollectionKind::Contributors => write!(f, "contributors"),
            CollectionKind::PullRequests => write!(f, "pull requests"),
            CollectionKind::Issues => write!(f, "issues"),
        }
    }
}

/// State filter accepted by the pulls and issues endpoints.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum EntityState {
    Open,
    Closed,
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EntityState::Open => write!(f, "open"),
            EntityState::Closed => write!(f, "closed"),
        }
    }
}

/// Outcome of one GET request.
///
/// Failures carry no headers and no entities; the reason is only logged.
#[derive(Debug, Clone, Default)]
pub struct FetchResult {
    pub success: bool,
    pub headers: HeaderMap,
    pub entities: Vec<Entity>,
}

impl FetchResult {
    pub fn success(headers: HeaderMap, entities: Vec<Entity>) -> Self {
        Self {
            success: true,
            headers,
            entities,
        }
    }

    pub fn failure() -> Self {
        Self::default()
    }

    /// Returns a header value as text, ignoring values that are not valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}
