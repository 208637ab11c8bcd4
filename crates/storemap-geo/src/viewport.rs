//! Visible-area math for a map partly covered by fixed UI chrome.
//!
//! The top bar and bottom sheet span the full map width, so only the
//! latitude range shrinks. Pixels are converted to degrees linearly, which
//! ignores projection curvature; that error is negligible at the
//! city-level zoom this map is used at.

use storemap_core::{GeoCoordinate, ViewportRect};

/// Yongin City Hall, the initial map centre.
pub const DEFAULT_CENTER: GeoCoordinate = GeoCoordinate::new(37.2415, 127.1775);
pub const DEFAULT_ZOOM_LEVEL: u8 = 8;
/// Zoom level used when jumping to a single store or the user's position.
pub const FOCUS_ZOOM_LEVEL: u8 = 4;

/// The raw map state as last reported by the map widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub bounds: ViewportRect,
    pub center: GeoCoordinate,
    /// Height of the map viewport in pixels.
    pub height_px: f64,
}

/// Heights of the panels drawn over the map.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChromeInsets {
    pub top_px: f64,
    pub bottom_px: f64,
}

/// A requested map re-centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapFocus {
    pub center: GeoCoordinate,
    pub level: u8,
}

/// Shrinks `raw` by the given fractions of its latitude span: `top_fraction`
/// off the north edge and `bottom_fraction` off the south edge. Longitudes
/// pass through.
#[must_use]
pub fn adjust_bounds(raw: &ViewportRect, top_fraction: f64, bottom_fraction: f64) -> ViewportRect {
    let lat_span = raw.lat_span();
    ViewportRect::from_edges(
        raw.north() - lat_span * top_fraction,
        raw.south() + lat_span * bottom_fraction,
        raw.east(),
        raw.west(),
    )
}

/// Tracks the map viewport and chrome, and answers visibility queries
/// against the part of the map the user can actually see.
#[derive(Debug, Default)]
pub struct ViewportAdjuster {
    map: Option<MapViewport>,
    chrome: ChromeInsets,
}

impl ViewportAdjuster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_chrome(chrome: ChromeInsets) -> Self {
        Self { map: None, chrome }
    }

    /// Records the map state after a pan/zoom settles.
    pub fn set_map_viewport(&mut self, viewport: MapViewport) {
        self.map = Some(viewport);
    }

    pub fn set_chrome(&mut self, chrome: ChromeInsets) {
        self.chrome = chrome;
    }

    #[must_use]
    pub fn map_viewport(&self) -> Option<&MapViewport> {
        self.map.as_ref()
    }

    #[must_use]
    pub fn chrome(&self) -> ChromeInsets {
        self.chrome
    }

    /// The visible rectangle with chrome subtracted.
    ///
    /// `None` until a map viewport has been reported, or while the reported
    /// height is not a positive number.
    #[must_use]
    pub fn compute_adjusted_bounds(&self) -> Option<ViewportRect> {
        let map = self.map.as_ref()?;
        if !(map.height_px.is_finite() && map.height_px > 0.0) {
            return None;
        }
        let top_fraction = self.chrome.top_px / map.height_px;
        let bottom_fraction = self.chrome.bottom_px / map.height_px;
        Some(adjust_bounds(&map.bounds, top_fraction, bottom_fraction))
    }

    /// Inclusive containment against [`Self::compute_adjusted_bounds`];
    /// `false` while bounds are unavailable.
    #[must_use]
    pub fn is_point_visible(&self, lat: f64, lng: f64) -> bool {
        self.compute_adjusted_bounds()
            .is_some_and(|bounds| bounds.contains(lat, lng))
    }

    /// Where to move the map so `location` sits in the middle of the
    /// unobstructed area.
    ///
    /// Shifts the current centre by the offset between `location` and the
    /// centre of the adjusted bounds. Without adjusted bounds the map is
    /// centred on `location` directly.
    #[must_use]
    pub fn focus_on(&self, location: GeoCoordinate) -> MapFocus {
        let (Some(map), Some(adjusted)) = (self.map.as_ref(), self.compute_adjusted_bounds())
        else {
            return MapFocus {
                center: location,
                level: FOCUS_ZOOM_LEVEL,
            };
        };

        let visible_center = adjusted.center();
        MapFocus {
            center: GeoCoordinate::new(
                map.center.lat + (location.lat - visible_center.lat),
                map.center.lng + (location.lng - visible_center.lng),
            ),
            level: FOCUS_ZOOM_LEVEL,
        }
    }
}
