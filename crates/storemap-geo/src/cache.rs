//! Address-keyed coordinate cache.

use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use storemap_core::GeoCoordinate;

use crate::store::{KeyValueStore, MemoryStore};

/// Characters left unescaped in cache keys: alphanumerics plus
/// `- _ . ! ~ * ' ( )`, matching `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const KEY_PREFIX: &str = "geo_";

/// Derives the storage key for a raw address.
///
/// The mapping is a pure function of the address text, so the same address
/// hits the same entry no matter which store record it came from.
#[must_use]
pub fn cache_key(address: &str) -> String {
    format!("{KEY_PREFIX}{}", utf8_percent_encode(address, URI_COMPONENT))
}

/// Coordinate cache in front of the geocoding provider.
///
/// Entries never expire. Write failures are swallowed: a failed `put` just
/// means the next lookup for that address misses.
#[derive(Clone)]
pub struct GeoCache {
    store: Arc<dyn KeyValueStore>,
}

impl GeoCache {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Returns the cached coordinate for `address`.
    ///
    /// A stored value that does not decode to a valid coordinate counts as a
    /// miss.
    #[must_use]
    pub fn get(&self, address: &str) -> Option<GeoCoordinate> {
        let raw = self.store.get(&cache_key(address))?;
        match serde_json::from_str::<GeoCoordinate>(&raw) {
            Ok(coordinate) if coordinate.is_valid() => Some(coordinate),
            Ok(_) => {
                tracing::debug!(address, "cached coordinate out of range; ignoring");
                None
            }
            Err(error) => {
                tracing::debug!(address, error = %error, "cached coordinate unreadable; ignoring");
                None
            }
        }
    }

    pub fn put(&self, address: &str, coordinate: GeoCoordinate) {
        let value = match serde_json::to_string(&coordinate) {
            Ok(value) => value,
            Err(error) => {
                tracing::debug!(address, error = %error, "failed to encode coordinate for cache");
                return;
            }
        };
        if let Err(error) = self.store.set(&cache_key(address), &value) {
            tracing::debug!(address, error = %error, "geocode cache write failed");
        }
    }

    /// Stores several coordinates with a single backend write.
    pub fn put_many(&self, entries: &[(&str, GeoCoordinate)]) {
        if entries.is_empty() {
            return;
        }
        let mut pairs = Vec::with_capacity(entries.len());
        for (address, coordinate) in entries {
            match serde_json::to_string(coordinate) {
                Ok(value) => pairs.push((cache_key(address), value)),
                Err(error) => {
                    tracing::debug!(
                        address,
                        error = %error,
                        "failed to encode coordinate for cache"
                    );
                }
            }
        }
        if let Err(error) = self.store.set_many(&pairs) {
            tracing::debug!(count = pairs.len(), error = %error, "geocode cache write failed");
        }
    }
}

impl std::fmt::Debug for GeoCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoCache").finish_non_exhaustive()
    }
}
