use crate::{core::geo::GeoPoint, spatial::clustering::Cluster, traits::Locatable};
use serde::{Deserialize, Serialize};

/// User and platform input the map view reacts to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapInput {
    /// Click/tap on a rendered pin
    ClusterClick {
        cluster_id: String,
        anchor: GeoPoint,
        member_count: usize,
    },
    /// "+" control
    ZoomIn,
    /// "-" control
    ZoomOut,
    /// A new location fix from the platform
    LocationFix(GeoPoint),
    /// Claim button on the selected pin's popup
    Claim,
}

impl MapInput {
    /// Click input for a computed cluster
    pub fn click<T: Locatable>(cluster: &Cluster<'_, T>) -> Self {
        MapInput::ClusterClick {
            cluster_id: cluster.id.clone(),
            anchor: cluster.anchor,
            member_count: cluster.count(),
        }
    }

    /// Checks if this is a pointer event on a pin
    pub fn is_click(&self) -> bool {
        matches!(self, MapInput::ClusterClick { .. })
    }
}

/// Whether an event was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventHandled {
    Handled,
    NotHandled,
}

/// Map event types that can be emitted by the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapEvent {
    /// Map view has changed (center or zoom)
    ViewChanged { center: GeoPoint, zoom: u32 },
    /// A single pin was selected or the selection cleared
    SelectionChanged { selected: Option<String> },
    /// The claim action fired on the selected pin
    ClaimRequested { donation_id: String },
}

/// Discriminant used to register listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEventKind {
    ViewChanged,
    SelectionChanged,
    ClaimRequested,
}

impl MapEvent {
    pub fn kind(&self) -> MapEventKind {
        match self {
            MapEvent::ViewChanged { .. } => MapEventKind::ViewChanged,
            MapEvent::SelectionChanged { .. } => MapEventKind::SelectionChanged,
            MapEvent::ClaimRequested { .. } => MapEventKind::ClaimRequested,
        }
    }
}
