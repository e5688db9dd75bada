//! Core constants for the marketplace map and store.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Half-width of the visible window at zoom 1, in degrees.
pub const BASE_RANGE_DEG: f64 = 0.05;

/// Lowest zoom level the map view allows.
pub const MIN_ZOOM: u32 = 1;

/// Highest zoom level the map view allows.
pub const MAX_ZOOM: u32 = 8;

/// Programmatic +/- zoom step when calling `zoom_in/zoom_out`.
pub const DEFAULT_ZOOM_DELTA: u32 = 1;

/// Factor applied when a group pin is clicked.
pub const CLUSTER_ZOOM_FACTOR: u32 = 2;

/// Two pins closer than this (in percent of the viewport) share a cluster.
pub const CLUSTER_THRESHOLD_PCT: f64 = 8.0;

/// Projected positions are clamped to this range so slightly off-screen
/// pins still render without unbounded growth.
pub const PROJECTION_MIN_PCT: f64 = -20.0;
pub const PROJECTION_MAX_PCT: f64 = 120.0;

/// Fallback location (Bangalore city centre) used when no fix is available.
pub const FALLBACK_LAT: f64 = 12.9716;
pub const FALLBACK_LNG: f64 = 77.5946;

/// Radius used by the "nearby" donation filter.
pub const NEAR_RADIUS_KM: f64 = 5.0;

/// Storage keys, one snapshot per key.
pub const DONATIONS_KEY: &str = "mealbridge_donations";
pub const ROLE_KEY: &str = "mealbridge_role";
pub const PROFILE_KEY: &str = "mealbridge_profile";
pub const USERS_KEY: &str = "mealbridge_users";

/// Avatar assigned to freshly created profiles.
pub const DEFAULT_AVATAR_URL: &str =
    "https://images.unsplash.com/photo-1599566150163-29194dcaad36?auto=format&fit=crop&w=100&q=80";
