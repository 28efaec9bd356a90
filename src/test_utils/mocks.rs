//! Mock implementations of the fetch engine seams for testing.
//!
//! This module provides a scripted [`Fetcher`] and a fixed-quota [`QuotaProbe`]
//! so the collector and rotator can be exercised without a network.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::model::{Credential, Entity, FetchResult, Fetcher, QuotaProbe};

/// A fetcher that replays scripted results per URL and records every call.
///
/// Results for one URL are served in order; the last one repeats. URLs with
/// no script fail.
#[derive(Default)]
pub struct MockFetcher {
    responses: Mutex<HashMap<String, VecDeque<FetchResult>>>,
    calls: Mutex<Vec<(String, Credential)>>,
}

impl MockFetcher {
    /// Creates a fetcher with no scripted pages.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, url: &str, result: FetchResult) -> Self {
        self.responses
            .get_mut()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(result);
        self
    }

    /// Scripts a successful page, optionally pointing at the next one.
    pub fn with_page(self, url: &str, entities: Vec<Entity>, next: Option<&str>) -> Self {
        let mut headers = HeaderMap::new();
        if let Some(next) = next {
            headers.insert(
                "link",
                HeaderValue::from_str(&format!(r#"<{}>; rel="next""#, next)).unwrap(),
            );
        }
        self.push(url, FetchResult::success(headers, entities))
    }

    /// Scripts a successful page with a verbatim Link header.
    pub fn with_raw_link(self, url: &str, entities: Vec<Entity>, link: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert("link", HeaderValue::from_str(link).unwrap());
        self.push(url, FetchResult::success(headers, entities))
    }

    /// Scripts a failed request.
    pub fn with_failure(self, url: &str) -> Self {
        self.push(url, FetchResult::failure())
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(u, _)| u.clone()).collect()
    }

    pub fn credentials(&self) -> Vec<Credential> {
        self.calls.lock().unwrap().iter().map(|(_, c)| c.clone()).collect()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn get(&self, url: &str, credential: &Credential) -> FetchResult {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), credential.clone()));

        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_default(),
            Some(queue) => queue.front().cloned().unwrap_or_default(),
            None => FetchResult::failure(),
        }
    }
}

/// A quota probe with fixed answers per credential; unknown credentials report 0.
#[derive(Default)]
pub struct MockQuotaProbe {
    quotas: HashMap<Credential, u64>,
    probes: Mutex<HashMap<Credential, usize>>,
}

impl MockQuotaProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the quota of the direct path.
    pub fn with_direct(mut self, quota: u64) -> Self {
        self.quotas.insert(Credential::Direct, quota);
        self
    }

    /// Sets the quota of a proxy address.
    pub fn with_proxy(mut self, address: &str, quota: u64) -> Self {
        self.quotas
            .insert(Credential::Proxy(address.to_string()), quota);
        self
    }

    /// How many times `credential` has been probed.
    pub fn probe_count(&self, credential: &Credential) -> usize {
        self.probes
            .lock()
            .unwrap()
            .get(credential)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl QuotaProbe for MockQuotaProbe {
    async fn remaining_quota(&self, credential: &Credential) -> u64 {
        *self
            .probes
            .lock()
            .unwrap()
            .entry(credential.clone())
            .or_insert(0) += 1;
        self.quotas.get(credential).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::entity_id;

    #[tokio::test]
    async fn test_mock_fetcher_replays_in_order_and_repeats_last() {
        let fetcher = MockFetcher::new()
            .with_failure("u")
            .with_page("u", vec![entity_id(1)], Some("v"));

        assert!(!fetcher.get("u", &Credential::Direct).await.success);
        let second = fetcher.get("u", &Credential::Direct).await;
        let third = fetcher.get("u", &Credential::Direct).await;

        assert!(second.success);
        assert_eq!(second.header("link"), Some(r#"<v>; rel="next""#));
        assert_eq!(third.entities, vec![entity_id(1)]);
        assert_eq!(fetcher.call_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_fetcher_unknown_url_fails() {
        let fetcher = MockFetcher::new();
        assert!(!fetcher.get("missing", &Credential::Direct).await.success);
        assert_eq!(fetcher.urls(), vec!["missing".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_quota_probe_counts() {
        let probe = MockQuotaProbe::new().with_direct(3);

        assert_eq!(probe.remaining_quota(&Credential::Direct).await, 3);
        assert_eq!(
            probe
                .remaining_quota(&Credential::Proxy("p".to_string()))
                .await,
            0
        );
        assert_eq!(probe.probe_count(&Credential::Direct), 1);
    }
}
