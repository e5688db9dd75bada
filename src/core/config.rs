//! Configuration system for map display and store behaviour
//!
//! Options come either from a named profile (`MapProfile::resolve`) or from a
//! JSON document. Every field has a default so partial documents are accepted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    core::{
        constants::{
            BASE_RANGE_DEG, CLUSTER_THRESHOLD_PCT, MAX_ZOOM, MIN_ZOOM, NEAR_RADIUS_KM,
            PROJECTION_MAX_PCT, PROJECTION_MIN_PCT,
        },
        geo::GeoPoint,
    },
    MarketError, Result,
};

/// How clusters are searched for during grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClusterStrategy {
    /// Scan every existing cluster, first match wins
    #[default]
    Linear,
    /// Bucket anchors by threshold-sized grid cells
    Grid,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapProfile {
    /// Greedy clustering over a single city
    CityWide,
    /// Every donation is drawn as its own pin
    Unclustered,
    Custom(MapViewOptions),
}

impl MapProfile {
    pub fn resolve(&self) -> MapViewOptions {
        match self {
            Self::CityWide => MapViewOptions::default(),
            Self::Unclustered => MapViewOptions {
                clustering_enabled: false,
                ..MapViewOptions::default()
            },
            Self::Custom(options) => options.clone(),
        }
    }
}

impl Default for MapProfile {
    fn default() -> Self {
        Self::CityWide
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapViewOptions {
    /// Half-width of the visible window at zoom 1, in degrees
    pub base_range: f64,
    pub min_zoom: u32,
    pub max_zoom: u32,
    /// Merge distance in percent of the viewport
    pub cluster_threshold: f64,
    pub clustering_enabled: bool,
    pub strategy: ClusterStrategy,
    pub clamp_min: f64,
    pub clamp_max: f64,
    /// Center used before any location fix arrives
    pub fallback_center: GeoPoint,
}

impl Default for MapViewOptions {
    fn default() -> Self {
        Self {
            base_range: BASE_RANGE_DEG,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            cluster_threshold: CLUSTER_THRESHOLD_PCT,
            clustering_enabled: true,
            strategy: ClusterStrategy::Linear,
            clamp_min: PROJECTION_MIN_PCT,
            clamp_max: PROJECTION_MAX_PCT,
            fallback_center: GeoPoint::fallback(),
        }
    }
}

impl MapViewOptions {
    /// Rejects option sets the map view cannot honour
    pub fn validate(&self) -> Result<()> {
        if !(self.base_range.is_finite() && self.base_range > 0.0) {
            return Err(MarketError::Config(format!(
                "base_range must be positive, got {}",
                self.base_range
            )));
        }
        if self.min_zoom == 0 || self.min_zoom > self.max_zoom {
            return Err(MarketError::Config(format!(
                "invalid zoom limits {}..={}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.cluster_threshold.is_finite() && self.cluster_threshold > 0.0) {
            return Err(MarketError::Config(format!(
                "cluster_threshold must be positive, got {}",
                self.cluster_threshold
            )));
        }
        if !(self.clamp_min.is_finite() && self.clamp_max.is_finite())
            || self.clamp_min >= self.clamp_max
        {
            return Err(MarketError::Config(format!(
                "clamp range [{}, {}] must be finite with clamp_min below clamp_max",
                self.clamp_min, self.clamp_max
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Radius of the "nearby" filter
    pub near_radius_km: f64,
    /// Donor name used when a donation is posted without a profile
    pub default_donor_name: String,
    /// Location used when the platform reports no fix
    pub fallback_location: GeoPoint,
    /// Seed the demo listings when no snapshot exists
    pub seed_demo_data: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            near_radius_km: NEAR_RADIUS_KM,
            default_donor_name: "Anonymous Donor".to_string(),
            fallback_location: GeoPoint::fallback(),
            seed_demo_data: true,
        }
    }
}

/// Top-level configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MarketplaceConfig {
    pub map: MapViewOptions,
    pub store: StoreOptions,
}

impl MarketplaceConfig {
    /// Default store options with validated map options from a profile
    pub fn with_profile(profile: MapProfile) -> Result<Self> {
        let map = profile.resolve();
        map.validate()?;
        Ok(Self {
            map,
            store: StoreOptions::default(),
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.map.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        log::debug!("loading configuration from {}", path.display());
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles() {
        assert!(MapProfile::CityWide.resolve().clustering_enabled);
        assert!(!MapProfile::Unclustered.resolve().clustering_enabled);

        let custom = MapViewOptions {
            strategy: ClusterStrategy::Grid,
            ..MapViewOptions::default()
        };
        assert_eq!(MapProfile::Custom(custom.clone()).resolve(), custom);
    }

    #[test]
    fn test_partial_json() {
        let config = MarketplaceConfig::from_json_str(
            r#"{ "map": { "clustering_enabled": false, "strategy": "grid" } }"#,
        )
        .unwrap();

        assert!(!config.map.clustering_enabled);
        assert_eq!(config.map.strategy, ClusterStrategy::Grid);
        assert_eq!(config.map.max_zoom, 8);
        assert_eq!(config.store.near_radius_km, 5.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = MarketplaceConfig::from_json_str(r#"{ "map": { "min_zoom": 9 } }"#);
        assert!(matches!(err, Err(MarketError::Config(_))));

        let err = MarketplaceConfig::from_json_str(r#"{ "map": { "base_range": 0.0 } }"#);
        assert!(matches!(err, Err(MarketError::Config(_))));
    }

    #[test]
    fn test_custom_profile_validated() {
        let config = MarketplaceConfig::with_profile(MapProfile::Unclustered).unwrap();
        assert!(!config.map.clustering_enabled);

        let inverted = MapProfile::Custom(MapViewOptions {
            clamp_min: 130.0,
            clamp_max: -20.0,
            ..MapViewOptions::default()
        });
        assert!(matches!(
            MarketplaceConfig::with_profile(inverted),
            Err(MarketError::Config(_))
        ));

        let nan = MapViewOptions {
            clamp_max: f64::NAN,
            ..MapViewOptions::default()
        };
        assert!(nan.validate().is_err());
    }

}
