//! The store directory: fetch, normalize, geocode, and hold the current set.

use std::sync::{Arc, PoisonError, RwLock};

use storemap_core::{ResolvedStore, StoreRecord};
use storemap_geo::{GeocodeBatcher, Geocoder, ViewportAdjuster};

use crate::client::DataSourceClient;
use crate::error::DirectoryError;
use crate::normalize::normalize_items;

/// One load's output: the normalized records and the subset that resolved.
///
/// Both halves always come from the same load.
#[derive(Debug, Clone)]
pub struct DirectorySnapshot {
    pub records: Arc<[StoreRecord]>,
    pub stores: Arc<[ResolvedStore]>,
}

impl DirectorySnapshot {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            records: Arc::from(Vec::new()),
            stores: Arc::from(Vec::new()),
        }
    }
}

/// Owns the current set of resolved stores.
///
/// The snapshot is replaced whole on every [`StoreDirectory::load_all`];
/// readers holding an earlier `Arc` keep seeing the set they got.
pub struct StoreDirectory<G> {
    source: DataSourceClient,
    batcher: GeocodeBatcher<G>,
    current: RwLock<DirectorySnapshot>,
}

impl<G: Geocoder> StoreDirectory<G> {
    #[must_use]
    pub fn new(source: DataSourceClient, batcher: GeocodeBatcher<G>) -> Self {
        Self {
            source,
            batcher,
            current: RwLock::new(DirectorySnapshot::empty()),
        }
    }

    #[must_use]
    pub fn batcher(&self) -> &GeocodeBatcher<G> {
        &self.batcher
    }

    /// Fetches, normalizes and geocodes the full store list, then replaces
    /// the current set with the result.
    ///
    /// Every call goes back to the data source. Failures never propagate: a
    /// source error is logged and leaves the directory empty, and stores
    /// whose address cannot be resolved are left out.
    pub async fn load_all(&self) -> Arc<[ResolvedStore]> {
        let records = match self.fetch_records().await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, "failed to load store directory");
                let empty = DirectorySnapshot::empty();
                let stores = Arc::clone(&empty.stores);
                self.replace(empty);
                return stores;
            }
        };

        let stores: Arc<[ResolvedStore]> = self.batcher.resolve_all(&records).await.into();
        tracing::info!(
            usable = records.len(),
            resolved = stores.len(),
            "store directory loaded"
        );
        self.replace(DirectorySnapshot {
            records: records.into(),
            stores: Arc::clone(&stores),
        });
        stores
    }

    /// Records and resolved stores from the last load, read together.
    #[must_use]
    pub fn snapshot(&self) -> DirectorySnapshot {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The set produced by the last [`StoreDirectory::load_all`], empty
    /// before the first load.
    #[must_use]
    pub fn get_current(&self) -> Arc<[ResolvedStore]> {
        self.snapshot().stores
    }

    /// Normalized records from the last load, including those that failed to
    /// geocode. Category options are built from these.
    #[must_use]
    pub fn records(&self) -> Arc<[StoreRecord]> {
        self.snapshot().records
    }

    /// Current stores inside the adjusted viewport, in directory order.
    /// Empty while the map has no usable bounds.
    #[must_use]
    pub fn visible_stores(&self, viewport: &ViewportAdjuster) -> Vec<ResolvedStore> {
        self.get_current()
            .iter()
            .filter(|store| viewport.is_point_visible(store.coordinate.lat, store.coordinate.lng))
            .cloned()
            .collect()
    }

    async fn fetch_records(&self) -> Result<Vec<StoreRecord>, DirectoryError> {
        let items = self.source.fetch_items().await?;
        let records = normalize_items(&items);
        tracing::debug!(
            fetched = items.len(),
            usable = records.len(),
            "normalized data source items"
        );
        Ok(records)
    }

    fn replace(&self, snapshot: DirectorySnapshot) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
    }
}
