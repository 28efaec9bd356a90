use async_trait::async_trait;
use std::sync::Arc;

use super::client::Client;
use super::endpoints::rate_limit_url;
use crate::model::{Credential, QuotaProbe};

pub const RATE_LIMIT_REMAINING: &str = "X-RateLimit-Remaining";

/// Reads the remaining quota of a credential from the rate limit endpoint.
pub struct RateLimitProber {
    client: Arc<Client>,
}

impl RateLimitProber {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QuotaProbe for RateLimitProber {
    async fn remaining_quota(&self, credential: &Credential) -> u64 {
        let url = rate_limit_url(self.client.api_url());

        let remaining = match self.client.fetch_headers(&url, credential).await {
            Ok(headers) => headers
                .get(RATE_LIMIT_REMAINING)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
                .unwrap_or(0),
            Err(e) => {
                tracing::error!(credential = %credential, error = %e, "Rate limit probe failed");
                0
            }
        };

        tracing::info!(
            "Remaining limits for '{}' is '{}'",
            credential,
            remaining
        );
        remaining
    }
}
