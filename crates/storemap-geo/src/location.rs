//! The user's own position, requested on demand and remembered.

use std::future::Future;
use std::time::Duration;

use storemap_core::GeoCoordinate;

use crate::error::GeolocationError;

/// How long a position request may take before it counts as failed.
pub const POSITION_TIMEOUT: Duration = Duration::from_secs(5);

/// Source of the device position (browser geolocation, GPS, a CLI flag).
pub trait PositionProvider {
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<GeoCoordinate, GeolocationError>> + Send;
}

/// A provider that always reports the same answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Option<GeoCoordinate>);

impl PositionProvider for FixedPosition {
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<GeoCoordinate, GeolocationError>> + Send {
        let answer = self.0.ok_or(GeolocationError::Unsupported);
        async move { answer }
    }
}

/// Owns the cached user location.
///
/// The first successful fix is kept and returned on later calls without
/// asking the provider again. Failures are returned to the caller for
/// display and are not retried automatically.
#[derive(Debug)]
pub struct UserLocator<P> {
    provider: P,
    last_known: Option<GeoCoordinate>,
}

impl<P: PositionProvider> UserLocator<P> {
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            last_known: None,
        }
    }

    #[must_use]
    pub fn last_known(&self) -> Option<GeoCoordinate> {
        self.last_known
    }

    /// Returns the user's position, asking the provider only when nothing is
    /// cached yet.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`GeolocationError`], or
    /// [`GeolocationError::Timeout`] after [`POSITION_TIMEOUT`].
    pub async fn locate(&mut self) -> Result<GeoCoordinate, GeolocationError> {
        if let Some(location) = self.last_known {
            return Ok(location);
        }

        let location = tokio::time::timeout(POSITION_TIMEOUT, self.provider.current_position())
            .await
            .map_err(|_| GeolocationError::Timeout)??;

        self.last_known = Some(location);
        Ok(location)
    }
}
