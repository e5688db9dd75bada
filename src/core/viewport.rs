use crate::core::constants::{
    BASE_RANGE_DEG, CLUSTER_ZOOM_FACTOR, DEFAULT_ZOOM_DELTA, MAX_ZOOM, MIN_ZOOM,
    PROJECTION_MAX_PCT, PROJECTION_MIN_PCT,
};
use crate::core::geo::{GeoPoint, Point};
use serde::{Deserialize, Serialize};

/// A position inside the viewport expressed as percentages of its height
/// (`top`) and width (`left`). `0,0` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPosition {
    pub top: f64,
    pub left: f64,
}

impl ProjectedPosition {
    pub fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }

    /// Euclidean distance in percent units
    pub fn distance_to(&self, other: &ProjectedPosition) -> f64 {
        self.as_point().distance_to(&other.as_point())
    }

    /// Screen-style point (`x = left`, `y = top`)
    pub fn as_point(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Checks both axes against an inclusive range
    pub fn within(&self, min: f64, max: f64) -> bool {
        (min..=max).contains(&self.top) && (min..=max).contains(&self.left)
    }
}

/// Manages the current view of the map: center and zoom
///
/// The visible window is a square of half-width `base_range / zoom` degrees
/// around `center` on both axes. The projection is linear: one degree of
/// longitude and one degree of latitude cover the same screen distance.
/// Latitude-dependent longitude compression is deliberately not corrected,
/// which is acceptable only for a single-city deployment area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: GeoPoint,
    /// The current zoom level
    zoom: u32,
    /// Half-width of the window at zoom 1, in degrees
    base_range: f64,
    /// The minimum allowed zoom level
    min_zoom: u32,
    /// The maximum allowed zoom level
    max_zoom: u32,
    /// Clamp range for projected percentages
    clamp: (f64, f64),
}

impl Viewport {
    /// Creates a new viewport with the default range and zoom limits
    pub fn new(center: GeoPoint, zoom: u32) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            base_range: BASE_RANGE_DEG,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            clamp: (PROJECTION_MIN_PCT, PROJECTION_MAX_PCT),
        }
    }

    /// Overrides the half-width of the window at zoom 1
    ///
    /// Non-positive or non-finite ranges keep the current one.
    pub fn with_base_range(mut self, base_range: f64) -> Self {
        if base_range.is_finite() && base_range > 0.0 {
            self.base_range = base_range;
        } else {
            log::warn!("ignoring base range {}, keeping {}", base_range, self.base_range);
        }
        self
    }

    /// Overrides the projection clamp range
    ///
    /// Inverted bounds are swapped; non-finite bounds keep the current range.
    pub fn with_clamp(mut self, min: f64, max: f64) -> Self {
        if !(min.is_finite() && max.is_finite()) {
            log::warn!("ignoring clamp range [{}, {}]", min, max);
        } else if min > max {
            self.clamp = (max, min);
        } else {
            self.clamp = (min, max);
        }
        self
    }

    /// Sets the zoom limits
    pub fn set_zoom_limits(&mut self, min_zoom: u32, max_zoom: u32) {
        self.min_zoom = min_zoom.max(1);
        self.max_zoom = max_zoom.max(self.min_zoom);
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    pub fn base_range(&self) -> f64 {
        self.base_range
    }

    pub fn clamp_range(&self) -> (f64, f64) {
        self.clamp
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: u32) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Half-width of the visible window in degrees at the current zoom
    pub fn range(&self) -> f64 {
        self.base_range / self.zoom as f64
    }

    /// Projects a coordinate to unclamped viewport percentages
    pub fn project_unclamped(&self, point: &GeoPoint) -> ProjectedPosition {
        let range = self.range();
        let top = ((self.center.lat + range - point.lat) / (range * 2.0)) * 100.0;
        let left = ((point.lng - (self.center.lng - range)) / (range * 2.0)) * 100.0;
        ProjectedPosition::new(top, left)
    }

    /// Projects a coordinate to viewport percentages clamped to the render range
    ///
    /// A non-finite component lands on the lower bound.
    pub fn project(&self, point: &GeoPoint) -> ProjectedPosition {
        let raw = self.project_unclamped(point);
        ProjectedPosition::new(self.clamp_pct(raw.top), self.clamp_pct(raw.left))
    }

    fn clamp_pct(&self, value: f64) -> f64 {
        let (min, max) = self.clamp;
        if value.is_nan() {
            min
        } else {
            value.clamp(min, max)
        }
    }

    /// Steps the zoom in by one level
    pub fn zoom_in(&mut self) -> u32 {
        self.set_zoom(self.zoom.saturating_add(DEFAULT_ZOOM_DELTA));
        self.zoom
    }

    /// Steps the zoom out by one level
    pub fn zoom_out(&mut self) -> u32 {
        self.set_zoom(self.zoom.saturating_sub(DEFAULT_ZOOM_DELTA));
        self.zoom
    }

    /// Recenters on an anchor and doubles the zoom, capped at the maximum
    pub fn zoom_into(&mut self, anchor: GeoPoint) {
        self.center = anchor;
        self.set_zoom(self.zoom.saturating_mul(CLUSTER_ZOOM_FACTOR));
        log::debug!(
            "zoomed into ({:.4}, {:.4}) at {}x",
            anchor.lat,
            anchor.lng,
            self.zoom
        );
    }

    /// Moves the center without touching the zoom
    pub fn reset_center(&mut self, center: GeoPoint) {
        self.center = center;
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(GeoPoint::fallback(), MIN_ZOOM)
    }
}
