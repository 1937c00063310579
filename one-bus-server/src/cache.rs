//! Caching layer for OneBusAway arrival responses.
//!
//! Predictions are absolute timestamps, so a cached list stays correct;
//! minutes until arrival are computed against the clock when the board is
//! built. A short TTL bounds how stale a prediction can be.
//!
//! Entries are keyed by API key as well as stop, so one caller's key is
//! never used to answer another caller.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::ArrivalPrediction;
use crate::oba::{ObaClient, ObaError};

/// Cache key: (stop id, API key).
type ArrivalsKey = (String, String);

/// Cached arrival list.
type ArrivalsEntry = Arc<Vec<ArrivalPrediction>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries. Zero disables caching.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30),
            max_capacity: 1000,
        }
    }
}

impl CacheConfig {
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }
}

/// OneBusAway client with caching.
///
/// Only successful responses are cached; a failed lookup is retried by
/// the next request, not by this one.
pub struct CachedObaClient {
    client: ObaClient,
    arrivals: Option<MokaCache<ArrivalsKey, ArrivalsEntry>>,
}

impl CachedObaClient {
    pub fn new(client: ObaClient, config: &CacheConfig) -> Self {
        let arrivals = config.is_enabled().then(|| {
            MokaCache::builder()
                .time_to_live(config.ttl)
                .max_capacity(config.max_capacity)
                .build()
        });

        Self { client, arrivals }
    }

    /// Arrivals for a stop, from cache if fresh.
    pub async fn arrivals_for_stop(
        &self,
        stop_id: &str,
        api_key: &str,
    ) -> Result<ArrivalsEntry, ObaError> {
        let Some(cache) = &self.arrivals else {
            let arrivals = self.client.arrivals_for_stop(stop_id, api_key).await?;
            return Ok(Arc::new(arrivals));
        };

        let key = (stop_id.to_string(), api_key.to_string());

        if let Some(cached) = cache.get(&key).await {
            trace!(stop_id, "arrivals cache hit");
            return Ok(cached);
        }

        let entry = Arc::new(self.client.arrivals_for_stop(stop_id, api_key).await?);
        cache.insert(key, entry.clone()).await;

        Ok(entry)
    }

    /// Number of cached stops (zero when caching is disabled).
    #[cfg(test)]
    fn cache_entry_count(&self) -> u64 {
        self.arrivals.as_ref().map_or(0, |c| c.entry_count())
    }

    #[cfg(test)]
    fn invalidate_cache(&self) {
        if let Some(cache) = &self.arrivals {
            cache.invalidate_all();
        }
    }
}
