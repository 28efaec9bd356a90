use std::sync::Arc;
use tokio::sync::Mutex;

use crate::model::{Credential, QuotaProbe};

/// Proxy addresses with their last known remaining quota, in insertion order.
///
/// Entries only ever leave the pool; an evicted address is never re-added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProxyPool {
    entries: Vec<(String, u64)>,
}

impl ProxyPool {
    /// Creates a pool from configured addresses; duplicates keep their first position.
    pub fn new<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries: Vec<(String, u64)> = Vec::new();
        for address in addresses {
            let address = address.into();
            if !entries.iter().any(|(a, _)| *a == address) {
                entries.push((address, 0));
            }
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, address: &str) -> bool {
        self.entries.iter().any(|(a, _)| a == address)
    }

    #[cfg(test)]
    pub fn quota(&self, address: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(a, _)| a == address)
            .map(|(_, quota)| *quota)
    }

    pub fn addresses(&self) -> Vec<String> {
        self.entries.iter().map(|(a, _)| a.clone()).collect()
    }

    fn set_quota(&mut self, address: &str, quota: u64) {
        if let Some(entry) = self.entries.iter_mut().find(|(a, _)| a == address) {
            entry.1 = quota;
        }
    }

    fn remove(&mut self, address: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(a, _)| a != address);
        self.entries.len() != before
    }
}

/// Chooses an egress path with remaining quota and evicts dead proxies.
///
/// Clones share one pool, so concurrent collections see each other's
/// evictions and quota updates.
#[derive(Clone)]
pub struct ProxyRotator {
    pool: Arc<Mutex<ProxyPool>>,
    probe: Arc<dyn QuotaProbe>,
}

impl ProxyRotator {
    pub fn new(pool: ProxyPool, probe: Arc<dyn QuotaProbe>) -> Self {
        Self {
            pool: Arc::new(Mutex::new(pool)),
            probe,
        }
    }

    /// Picks the credential for the next request.
    ///
    /// The direct path wins whenever it has quota. Otherwise every proxy is
    /// re-probed in insertion order and the first one with quota is returned.
    /// `None` means no path has quota left.
    pub async fn choose_credential(&self) -> Option<Credential> {
        if self.probe.remaining_quota(&Credential::Direct).await > 0 {
            return Some(Credential::Direct);
        }

        // Held across probes so a concurrent eviction cannot interleave.
        let mut pool = self.pool.lock().await;
        for address in pool.addresses() {
            let credential = Credential::Proxy(address.clone());
            let remaining = self.probe.remaining_quota(&credential).await;
            pool.set_quota(&address, remaining);
            if remaining > 0 {
                return Some(credential);
            }
        }

        tracing::warn!(
            proxies = pool.len(),
            "No credential with remaining rate limit quota"
        );
        None
    }

    /// Permanently removes a proxy; a no-op for the direct path or unknown addresses.
    pub async fn evict(&self, credential: &Credential) {
        let Some(address) = credential.proxy() else {
            return;
        };

        if self.pool.lock().await.remove(address) {
            tracing::error!("Wrong proxy '{}' excluded from list", address);
        }
    }

    /// Copy of the current pool.
    #[cfg(test)]
    pub async fn snapshot(&self) -> ProxyPool {
        self.pool.lock().await.clone()
    }
}
