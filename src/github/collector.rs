//! Paginated collection of an entire GitHub listing.
//!
//! One page at a time: choose an egress path, fetch, truncate at the end date,
//! follow the `Link` cursor. Page N+1 is never requested before page N has
//! been folded into the result.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::filter::{filter_before, LastSeen};
use super::link::{next_link, LinkMatch};
use super::proxy::ProxyRotator;
use super::retry::{RetryPolicy, StallPolicy};
use crate::error::CollectorError;
use crate::model::{Credential, Entity, Fetcher};

pub const LINK: &str = "Link";

/// Builds the first request URL; the query is only ever attached here.
fn first_link(base_url: &str, query: &[(&str, String)]) -> Result<String, CollectorError> {
    let mut url =
        reqwest::Url::parse(base_url).map_err(|e| CollectorError::invalid_url(base_url, e))?;
    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
    }
    Ok(url.to_string())
}

pub struct PaginatedCollector {
    fetcher: Arc<dyn Fetcher>,
    rotator: ProxyRotator,
    link_match: LinkMatch,
    retry: RetryPolicy,
    stall: StallPolicy,
}

impl PaginatedCollector {
    pub fn new(fetcher: Arc<dyn Fetcher>, rotator: ProxyRotator) -> Self {
        Self {
            fetcher,
            rotator,
            link_match: LinkMatch::default(),
            retry: RetryPolicy::default(),
            stall: StallPolicy::default(),
        }
    }

    pub fn with_link_match(mut self, link_match: LinkMatch) -> Self {
        self.link_match = link_match;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_stall_policy(mut self, stall: StallPolicy) -> Self {
        self.stall = stall;
        self
    }

    /// Collects every entity of a listing, in upstream order.
    ///
    /// With `end_date`, pages must be ascending by `created_at`; collection
    /// stops at the first entity created at or after `end_date` without
    /// requesting further pages.
    ///
    /// # Errors
    /// - `RetriesExhausted` when the direct path keeps failing on one link
    /// - `ProxyExhausted` when no path has quota after the configured re-probes
    /// - `Filter` when a page violates the ordering precondition
    pub async fn collect_all(
        &self,
        base_url: &str,
        query: &[(&str, String)],
        end_date: Option<DateTime<Utc>>,
    ) -> Result<Vec<Entity>, CollectorError> {
        let mut link = Some(first_link(base_url, query)?);
        let mut collected = Vec::new();
        let mut failures = 0u32;
        let mut last_seen: Option<LastSeen> = None;

        while let Some(url) = link {
            let credential = self.choose_credential().await?;
            let result = self.fetcher.get(&url, &credential).await;

            if !result.success {
                match &credential {
                    Credential::Proxy(_) => self.rotator.evict(&credential).await,
                    Credential::Direct => {
                        failures += 1;
                        if failures >= self.retry.max_attempts {
                            return Err(CollectorError::retries_exhausted(url, failures));
                        }
                        let delay = self.retry.backoff(failures);
                        tracing::warn!(
                            url = %url,
                            attempt = failures,
                            "Request failed, retrying in {:?}",
                            delay
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
                link = Some(url);
                continue;
            }
            failures = 0;

            let next = next_link(result.header(LINK), self.link_match);

            match end_date {
                Some(end) => {
                    let filtered = filter_before(result.entities, end, &mut last_seen)?;
                    collected.extend(filtered.kept);
                    if filtered.truncated {
                        tracing::debug!(url = %url, "Reached end date, stopping");
                        break;
                    }
                }
                None => collected.extend(result.entities),
            }

            link = next;
        }

        Ok(collected)
    }

    async fn choose_credential(&self) -> Result<Credential, CollectorError> {
        let mut probes = 0u32;
        loop {
            probes += 1;
            if let Some(credential) = self.rotator.choose_credential().await {
                return Ok(credential);
            }
            if probes > self.stall.reprobes {
                return Err(CollectorError::ProxyExhausted { probes });
            }
            tracing::warn!(
                probe = probes,
                "Rate limit exhausted on every path, probing again in {:?}",
                self.stall.interval
            );
            tokio::time::sleep(self.stall.interval).await;
        }
    }
}
