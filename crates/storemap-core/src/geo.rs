//! Coordinate and bounding-box primitives.

use serde::{Deserialize, Serialize};

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub lat: f64,
    pub lng: f64,
}

impl GeoCoordinate {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns `true` when both components are finite and inside the
    /// latitude `[-90, 90]` / longitude `[-180, 180]` ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// An axis-aligned geographic rectangle given by its south-west and
/// north-east corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportRect {
    pub south_west: GeoCoordinate,
    pub north_east: GeoCoordinate,
}

impl ViewportRect {
    #[must_use]
    pub const fn new(south_west: GeoCoordinate, north_east: GeoCoordinate) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Builds a rectangle from its four edges.
    #[must_use]
    pub const fn from_edges(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            south_west: GeoCoordinate::new(south, west),
            north_east: GeoCoordinate::new(north, east),
        }
    }

    #[must_use]
    pub const fn north(&self) -> f64 {
        self.north_east.lat
    }

    #[must_use]
    pub const fn south(&self) -> f64 {
        self.south_west.lat
    }

    #[must_use]
    pub const fn east(&self) -> f64 {
        self.north_east.lng
    }

    #[must_use]
    pub const fn west(&self) -> f64 {
        self.south_west.lng
    }

    #[must_use]
    pub fn lat_span(&self) -> f64 {
        self.north() - self.south()
    }

    #[must_use]
    pub fn center(&self) -> GeoCoordinate {
        GeoCoordinate::new(
            (self.south() + self.north()) / 2.0,
            (self.west() + self.east()) / 2.0,
        )
    }

    /// Inclusive containment: points on any edge count as inside.
    #[must_use]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.south() && lat <= self.north() && lng >= self.west() && lng <= self.east()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> ViewportRect {
        ViewportRect::from_edges(38.0, 37.0, 128.0, 127.0)
    }

    #[test]
    fn contains_is_inclusive_on_every_edge() {
        let r = rect();
        assert!(r.contains(38.0, 127.5), "north edge");
        assert!(r.contains(37.0, 127.5), "south edge");
        assert!(r.contains(37.5, 128.0), "east edge");
        assert!(r.contains(37.5, 127.0), "west edge");
        assert!(r.contains(37.0, 127.0), "south-west corner");
    }

    #[test]
    fn contains_rejects_points_just_outside() {
        let r = rect();
        assert!(!r.contains(38.000_001, 127.5));
        assert!(!r.contains(36.999_999, 127.5));
        assert!(!r.contains(37.5, 128.000_001));
        assert!(!r.contains(37.5, 126.999_999));
    }

    #[test]
    fn center_is_midpoint_of_edges() {
        let c = rect().center();
        assert!((c.lat - 37.5).abs() < 1e-12);
        assert!((c.lng - 127.5).abs() < 1e-12);
    }

    #[test]
    fn coordinate_validity_checks_ranges_and_finiteness() {
        assert!(GeoCoordinate::new(37.24, 127.17).is_valid());
        assert!(!GeoCoordinate::new(91.0, 0.0).is_valid());
        assert!(!GeoCoordinate::new(0.0, -180.5).is_valid());
        assert!(!GeoCoordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn coordinate_serializes_as_lat_lng_object() {
        let json = serde_json::to_string(&GeoCoordinate::new(1.0, 2.0)).unwrap();
        assert_eq!(json, r#"{"lat":1.0,"lng":2.0}"#);
    }
}
