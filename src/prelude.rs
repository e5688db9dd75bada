//! Prelude module for common mealbridge types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use mealbridge::prelude::*;`

pub use crate::core::{
    config::{ClusterStrategy, MapProfile, MapViewOptions, MarketplaceConfig, StoreOptions},
    geo::GeoPoint,
    viewport::{ProjectedPosition, Viewport},
};

pub use crate::data::{
    donation::{ClaimerInfo, Donation, DonationStatus, FoodCategory, NewDonation},
    filters::DonationFilter,
};

pub use crate::input::{
    events::{EventHandled, MapEvent, MapEventKind, MapInput},
    handler::{Action, EventManager, MapInteraction, Selection},
};

pub use crate::spatial::{
    clustering::{Cluster, Clustering, ClusteringConfig},
    culling::Culling,
};

pub use crate::store::{
    AppState, AppStore, AuthMethod, AuthMode, Command, FilePersistence, MemoryPersistence,
    PersistencePort, ProfileUpdate, StorageEvent, UserProfile, UserRole,
};

pub use crate::traits::Locatable;

pub use crate::ui::{DashboardTab, DonationListView, FindOutput, MapView, RenderedPin, ViewMode};

pub use crate::{Error as MarketError, Result};

pub use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
