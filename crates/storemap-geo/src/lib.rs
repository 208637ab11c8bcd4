//! Address-to-coordinate resolution and viewport math for the store map.
//!
//! [`GeocodeBatcher`] resolves addresses cache-first through a [`Geocoder`]
//! in rate-limited batches; [`ViewportAdjuster`] answers which coordinates
//! are visible once the map's UI chrome is subtracted.

pub mod batcher;
pub mod cache;
pub mod error;
pub mod geocoder;
pub mod location;
pub mod store;
pub mod viewport;

pub use batcher::{GeocodeBatcher, DEFAULT_BATCH_SIZE, DEFAULT_INTER_BATCH_DELAY};
pub use cache::{cache_key, GeoCache};
pub use error::{CacheWriteError, GeocodeError, GeolocationError};
pub use geocoder::{Geocoder, KakaoGeocoder};
pub use location::{FixedPosition, PositionProvider, UserLocator};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use viewport::{
    adjust_bounds, ChromeInsets, MapFocus, MapViewport, ViewportAdjuster, DEFAULT_CENTER,
    DEFAULT_ZOOM_LEVEL, FOCUS_ZOOM_LEVEL,
};
