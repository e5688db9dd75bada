//! # MealBridge
//!
//! Core of a surplus-food marketplace connecting donors with NGOs.
//!
//! The crate provides the geo projection and pin clustering engine behind
//! the donation map, the map interaction state machine, headless dashboard
//! views and an application store persisted through a pluggable port.

pub mod core;
pub mod data;
pub mod input;
pub mod prelude;
pub mod spatial;
pub mod store;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::{MapProfile, MapViewOptions, MarketplaceConfig, StoreOptions},
    geo::GeoPoint,
    viewport::{ProjectedPosition, Viewport},
};

pub use data::{
    donation::{ClaimerInfo, Donation, DonationStatus, FoodCategory, NewDonation},
    filters::DonationFilter,
};

pub use input::{
    events::{MapEvent, MapInput},
    handler::{MapInteraction, Selection},
};

pub use spatial::clustering::{Cluster, Clustering};

pub use store::{AppState, AppStore, Command, PersistencePort};

pub use traits::Locatable;

pub use ui::{DonationListView, MapView};

use store::session::AuthError;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MarketError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Donation not found: {0}")]
    DonationNotFound(String),

    #[error("Donation is no longer available: {0}")]
    NotAvailable(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

pub type Error = MarketError;

/// Installs `env_logger`, honouring `RUST_LOG`. Later calls are no-ops.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
