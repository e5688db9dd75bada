use geo::HaversineDistance;
use serde::{Deserialize, Serialize};

use crate::core::constants::{FALLBACK_LAT, FALLBACK_LNG};

/// Represents a geographical coordinate with latitude and longitude
///
/// Values are decimal degrees. Ranges are not validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a new coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// City-centre coordinate used when the platform has no location fix
    pub fn fallback() -> Self {
        Self::new(FALLBACK_LAT, FALLBACK_LNG)
    }

    /// Checks that both components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Checks that the coordinates are within valid WGS84 ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Great-circle distance to another coordinate in kilometres
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let a: geo::Point<f64> = (*self).into();
        let b: geo::Point<f64> = (*other).into();
        a.haversine_distance(&b) / 1000.0
    }
}

impl Default for GeoPoint {
    fn default() -> Self {
        Self::fallback()
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(point: GeoPoint) -> Self {
        geo::Point::new(point.lng, point.lat)
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// Represents a point in screen or projected coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_creation() {
        let coord = GeoPoint::new(12.9716, 77.5946);
        assert_eq!(coord.lat, 12.9716);
        assert_eq!(coord.lng, 77.5946);
        assert!(coord.is_valid());
        assert!(coord.is_finite());
    }

    #[test]
    fn test_distance_km() {
        let centre = GeoPoint::new(12.9716, 77.5946);
        let east = GeoPoint::new(12.9716, 77.6200);

        // Roughly 2.75 km along the parallel
        let d = centre.distance_km(&east);
        assert!((d - 2.75).abs() < 0.05, "got {d}");
        assert_eq!(centre.distance_km(&centre), 0.0);
    }

    #[test]
    fn test_non_finite() {
        assert!(!GeoPoint::new(f64::NAN, 77.0).is_finite());
        assert!(!GeoPoint::new(12.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
    }
}
