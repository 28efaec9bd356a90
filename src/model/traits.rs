use async_trait::async_trait;

use super::types::{Credential, FetchResult};

/// Trait for types that can execute one GET against the API.
///
/// Implementors must never fail past this boundary: transport, status and
/// decode problems are logged and reported as an unsuccessful [`FetchResult`].
/// Implementors must be thread-safe (Send + Sync) so that several collections
/// can share one fetcher.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` through the given credential.
    ///
    /// # Arguments
    /// * `url` - Absolute URL of the page
    /// * `credential` - Direct (token-authenticated) path or a proxy address
    async fn get(&self, url: &str, credential: &Credential) -> FetchResult;
}

/// Trait for types that report the remaining rate limit of a credential.
#[async_trait]
pub trait QuotaProbe: Send + Sync {
    /// Returns the remaining request quota for `credential`.
    ///
    /// Returns `0` whenever the quota cannot be determined, which makes the
    /// caller move on to the next credential rather than risk a throttled call.
    async fn remaining_quota(&self, credential: &Credential) -> u64;
}
