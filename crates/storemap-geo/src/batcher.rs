//! Batched, cache-first address resolution.
//!
//! Distinct addresses are split into fixed-size batches. Members of a batch
//! resolve concurrently on the calling task (`join_all`, no spawning); the
//! next batch starts only after the whole batch settles and the inter-batch
//! delay elapses. That delay is what bounds the request rate seen by the
//! provider, independent of how wide a batch is.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use futures::future::join_all;
use storemap_core::{GeoCoordinate, ResolvedStore, StoreRecord};

use crate::cache::GeoCache;
use crate::geocoder::Geocoder;

pub const DEFAULT_BATCH_SIZE: usize = 50;
pub const DEFAULT_INTER_BATCH_DELAY: Duration = Duration::from_millis(50);

/// How a single address was settled.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Resolution {
    Cached(GeoCoordinate),
    Geocoded(GeoCoordinate),
    Failed,
}

impl Resolution {
    fn coordinate(self) -> Option<GeoCoordinate> {
        match self {
            Resolution::Cached(c) | Resolution::Geocoded(c) => Some(c),
            Resolution::Failed => None,
        }
    }
}

#[derive(Debug, Default)]
struct ResolveStats {
    batches: usize,
    cache_hits: usize,
    geocoded: usize,
    failed: usize,
}

/// Resolves store addresses through a [`GeoCache`] backed by a [`Geocoder`].
pub struct GeocodeBatcher<G> {
    geocoder: G,
    cache: GeoCache,
    batch_size: usize,
    inter_batch_delay: Duration,
}

impl<G: Geocoder> GeocodeBatcher<G> {
    /// Creates a batcher with the default policy: batches of
    /// [`DEFAULT_BATCH_SIZE`] separated by [`DEFAULT_INTER_BATCH_DELAY`].
    #[must_use]
    pub fn new(geocoder: G, cache: GeoCache) -> Self {
        Self::with_policy(geocoder, cache, DEFAULT_BATCH_SIZE, DEFAULT_INTER_BATCH_DELAY)
    }

    /// Creates a batcher with an explicit policy. A `batch_size` of zero is
    /// treated as one.
    #[must_use]
    pub fn with_policy(
        geocoder: G,
        cache: GeoCache,
        batch_size: usize,
        inter_batch_delay: Duration,
    ) -> Self {
        Self {
            geocoder,
            cache,
            batch_size: batch_size.max(1),
            inter_batch_delay,
        }
    }

    #[must_use]
    pub fn cache(&self) -> &GeoCache {
        &self.cache
    }

    /// Resolves one address: cache first, then a single provider call whose
    /// success is written back to the cache.
    ///
    /// Returns `None` when the provider fails; the failure is logged.
    pub async fn resolve(&self, address: &str) -> Option<GeoCoordinate> {
        let outcome = self.settle(address).await;
        if let Resolution::Geocoded(coordinate) = outcome {
            self.cache.put(address, coordinate);
        }
        outcome.coordinate()
    }

    /// Resolves every record's address and returns the records that resolved.
    ///
    /// Each distinct address is looked up once. Records whose address failed
    /// are dropped; no failure aborts the run. Output follows input order.
    pub async fn resolve_all(&self, records: &[StoreRecord]) -> Vec<ResolvedStore> {
        let started = Instant::now();

        let mut seen = HashSet::new();
        let addresses: Vec<&str> = records
            .iter()
            .map(|r| r.address.as_str())
            .filter(|a| seen.insert(*a))
            .collect();

        let mut coordinates: HashMap<&str, GeoCoordinate> =
            HashMap::with_capacity(addresses.len());
        let mut stats = ResolveStats::default();

        for (index, batch) in addresses.chunks(self.batch_size).enumerate() {
            let outcomes = join_all(batch.iter().map(|address| self.settle(address))).await;

            let mut fresh = Vec::new();
            for (address, outcome) in batch.iter().copied().zip(outcomes) {
                match outcome {
                    Resolution::Cached(c) => {
                        stats.cache_hits += 1;
                        coordinates.insert(address, c);
                    }
                    Resolution::Geocoded(c) => {
                        stats.geocoded += 1;
                        coordinates.insert(address, c);
                        fresh.push((address, c));
                    }
                    Resolution::Failed => stats.failed += 1,
                }
            }
            self.cache.put_many(&fresh);
            stats.batches += 1;

            tracing::debug!(batch = index, size = batch.len(), "geocode batch settled");

            if !self.inter_batch_delay.is_zero() {
                tokio::time::sleep(self.inter_batch_delay).await;
            }
        }

        let resolved: Vec<ResolvedStore> = records
            .iter()
            .filter_map(|record| {
                coordinates
                    .get(record.address.as_str())
                    .map(|c| ResolvedStore::new(record.clone(), *c))
            })
            .collect();

        tracing::info!(
            records = records.len(),
            addresses = addresses.len(),
            batches = stats.batches,
            cache_hits = stats.cache_hits,
            geocoded = stats.geocoded,
            failed = stats.failed,
            resolved = resolved.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "geocoding complete"
        );

        resolved
    }

    /// Cache lookup, then one provider call. Successes are not written back
    /// here; callers batch the writes.
    async fn settle(&self, address: &str) -> Resolution {
        if let Some(coordinate) = self.cache.get(address) {
            return Resolution::Cached(coordinate);
        }

        match self.geocoder.geocode(address).await {
            Ok(coordinate) => Resolution::Geocoded(coordinate),
            Err(error) => {
                tracing::warn!(address, error = %error, "geocode failed");
                Resolution::Failed
            }
        }
    }
}

#[cfg(test)]
#[path = "batcher_test.rs"]
mod tests;
