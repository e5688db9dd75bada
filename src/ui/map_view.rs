use serde::{Deserialize, Serialize};

use crate::{
    core::{
        config::MapViewOptions,
        geo::GeoPoint,
        viewport::{ProjectedPosition, Viewport},
    },
    input::{
        events::{EventHandled, MapEvent, MapEventKind, MapInput},
        handler::{Action, EventManager, MapInteraction, Selection},
    },
    spatial::{
        clustering::{Cluster, Clustering, ClusteringConfig},
        culling::Culling,
    },
    traits::Locatable,
};

/// Everything a rendering layer needs to draw one pin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPin {
    pub cluster_id: String,
    pub position: ProjectedPosition,
    pub member_ids: Vec<String>,
    /// Only single pins can be selected
    pub selected: bool,
}

impl RenderedPin {
    pub fn count(&self) -> usize {
        self.member_ids.len()
    }

    pub fn is_group(&self) -> bool {
        self.member_ids.len() > 1
    }

    /// Badge text for group pins, e.g. `+3`
    pub fn label(&self) -> Option<String> {
        self.is_group().then(|| format!("+{}", self.count()))
    }
}

/// Map display session: viewport, selection and pin layout
///
/// Does not own the records it shows. Claims leave the view as
/// `MapEvent::ClaimRequested` and are carried out by whoever listens.
pub struct MapView {
    viewport: Viewport,
    interaction: MapInteraction,
    clustering: Clustering,
    events: EventManager,
}

impl MapView {
    /// Centers on the location when known, otherwise on the fallback center
    pub fn new(options: &MapViewOptions, location: Option<GeoPoint>) -> Self {
        let center = location.unwrap_or(options.fallback_center);
        let mut viewport = Viewport::new(center, options.min_zoom)
            .with_base_range(options.base_range)
            .with_clamp(options.clamp_min, options.clamp_max);
        viewport.set_zoom_limits(options.min_zoom, options.max_zoom);

        Self {
            viewport,
            interaction: MapInteraction::new(),
            clustering: Clustering::new(ClusteringConfig::from(options)),
            events: EventManager::new(),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> &Selection {
        self.interaction.selection()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.interaction.selected_id()
    }

    pub fn set_clustering_enabled(&mut self, enabled: bool) {
        let mut config = self.clustering.config().clone();
        config.enabled = enabled;
        self.clustering.set_config(config);
    }

    /// Groups the records for the current viewport
    pub fn clusters<'a, T, I>(&self, records: I) -> Vec<Cluster<'a, T>>
    where
        T: Locatable + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        self.clustering.cluster(records, &self.viewport)
    }

    /// Visible pins for the current viewport, in cluster order
    pub fn render<'a, T, I>(&self, records: I) -> Vec<RenderedPin>
    where
        T: Locatable + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let selected = self.selected_id();
        self.clusters(records)
            .iter()
            .filter(|c| Culling::cluster_visible(&self.viewport, c))
            .map(|c| RenderedPin {
                cluster_id: c.id.clone(),
                position: self.viewport.project(&c.anchor),
                member_ids: c.member_ids().into_iter().map(String::from).collect(),
                selected: c.is_single() && selected == Some(c.id.as_str()),
            })
            .collect()
    }

    /// The record behind the selected pin, for the popup
    pub fn selected_record<'a, T, I>(&self, records: I) -> Option<&'a T>
    where
        T: Locatable + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let selected = self.selected_id()?;
        records.into_iter().find(|r| r.id() == selected)
    }

    /// Feeds an input through the interaction state machine
    pub fn handle(&mut self, input: MapInput) -> EventHandled {
        let before = self.interaction.selection().clone();
        let actions = self.interaction.handle(&input);
        let handled = !actions.is_empty() || &before != self.interaction.selection();

        for action in actions {
            self.perform(action);
        }
        if &before != self.interaction.selection() {
            self.events.emit(MapEvent::SelectionChanged {
                selected: self.interaction.selected_id().map(String::from),
            });
        }

        if handled {
            EventHandled::Handled
        } else {
            EventHandled::NotHandled
        }
    }

    fn perform(&mut self, action: Action) {
        let (old_center, old_zoom) = (self.viewport.center, self.viewport.zoom());
        match action {
            Action::ZoomInto { anchor } => self.viewport.zoom_into(anchor),
            Action::ZoomStep { zoom_in: true } => {
                self.viewport.zoom_in();
            }
            Action::ZoomStep { zoom_in: false } => {
                self.viewport.zoom_out();
            }
            Action::Recenter { center } => self.viewport.reset_center(center),
            Action::Claim { donation_id } => {
                log::debug!("claim requested for {}", donation_id);
                self.events.emit(MapEvent::ClaimRequested { donation_id });
                return;
            }
        }

        if self.viewport.center != old_center || self.viewport.zoom() != old_zoom {
            self.events.emit(MapEvent::ViewChanged {
                center: self.viewport.center,
                zoom: self.viewport.zoom(),
            });
        }
    }

    pub fn click<T: Locatable>(&mut self, cluster: &Cluster<'_, T>) -> EventHandled {
        self.handle(MapInput::click(cluster))
    }

    pub fn zoom_in(&mut self) -> u32 {
        self.handle(MapInput::ZoomIn);
        self.viewport.zoom()
    }

    pub fn zoom_out(&mut self) -> u32 {
        self.handle(MapInput::ZoomOut);
        self.viewport.zoom()
    }

    /// Recenters on a new fix and clears the selection; `None` is ignored
    pub fn on_location_fix(&mut self, location: Option<GeoPoint>) {
        if let Some(fix) = location {
            self.handle(MapInput::LocationFix(fix));
        }
    }

    /// Fires the claim action of the selected pin
    ///
    /// The claim only fires while the selection is still drawn as a visible
    /// single pin for `records`. A selection that was merged into a group or
    /// culled since it was clicked is cleared instead. Returns the donation id
    /// handed to the claim listeners.
    pub fn claim_selected<'a, T, I>(&mut self, records: I) -> Option<String>
    where
        T: Locatable + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let id = self.selected_id().map(String::from)?;
        let shown = self
            .render(records)
            .iter()
            .any(|pin| pin.selected && pin.cluster_id == id);

        if !shown {
            log::debug!("selection {} is no longer a single pin, clearing", id);
            self.interaction.reset();
            self.events
                .emit(MapEvent::SelectionChanged { selected: None });
            return None;
        }

        self.handle(MapInput::Claim);
        Some(id)
    }

    /// Register an event listener
    pub fn on<F>(&mut self, kind: MapEventKind, callback: F)
    where
        F: FnMut(&MapEvent) + 'static,
    {
        self.events.on(kind, callback);
    }

    /// Delivers queued events to listeners and returns them
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.events.process_events()
    }

    /// Status line, e.g. `Zoom: 2x`
    pub fn zoom_label(&self) -> String {
        format!("Zoom: {}x", self.viewport.zoom())
    }
}
