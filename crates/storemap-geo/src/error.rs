use thiserror::Error;

/// Failure to resolve one address through the geocoding provider.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} geocoding \"{address}\"")]
    UnexpectedStatus { status: u16, address: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no geocoding match for \"{address}\"")]
    NoMatch { address: String },

    #[error("geocoder returned an invalid coordinate for \"{address}\": {reason}")]
    InvalidCoordinate { address: String, reason: String },

    #[error("invalid geocoder base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

/// A write to the persistent cache store that did not land.
///
/// Callers of [`crate::GeoCache::put`] never see this; it is logged and
/// dropped, which makes the next lookup for that address a miss.
#[derive(Debug, Error)]
pub enum CacheWriteError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("cache quota of {quota_bytes} bytes exceeded")]
    QuotaExceeded { quota_bytes: usize },
}

/// Reasons the device position could not be determined.
///
/// The `Display` text is meant to be shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("location is unavailable: geolocation is not supported")]
    Unsupported,

    #[error("location is unavailable: permission denied")]
    PermissionDenied,

    #[error("location is unavailable: {0}")]
    Unavailable(String),

    #[error("location is unavailable: timed out")]
    Timeout,
}
