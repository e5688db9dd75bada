use crate::{
    core::geo::GeoPoint,
    input::events::{MapEvent, MapEventKind, MapInput},
    prelude::{HashMap, VecDeque},
};

/// Selection state of a map display session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    /// A single pin is open; holds its cluster id
    ClusterSelected(String),
}

/// Viewport change requested by an input
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Recenter on the anchor and double the zoom
    ZoomInto { anchor: GeoPoint },
    /// Step the zoom by one level
    ZoomStep { zoom_in: bool },
    /// Move the center without changing zoom
    Recenter { center: GeoPoint },
    /// Hand a donation id to the claim handler
    Claim { donation_id: String },
}

/// Interaction state machine for pin clicks and claims
///
/// Pure: it decides the next selection and which viewport actions to apply,
/// the owning view performs them.
#[derive(Debug, Clone, Default)]
pub struct MapInteraction {
    selection: Selection,
}

impl MapInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_id(&self) -> Option<&str> {
        match &self.selection {
            Selection::Idle => None,
            Selection::ClusterSelected(id) => Some(id),
        }
    }

    /// Applies an input and returns the actions to perform
    pub fn handle(&mut self, input: &MapInput) -> Vec<Action> {
        match input {
            MapInput::ClusterClick {
                anchor,
                member_count,
                ..
            } if *member_count > 1 => {
                self.selection = Selection::Idle;
                vec![Action::ZoomInto { anchor: *anchor }]
            }
            MapInput::ClusterClick { cluster_id, .. } => {
                self.selection = match &self.selection {
                    Selection::ClusterSelected(current) if current == cluster_id => Selection::Idle,
                    _ => Selection::ClusterSelected(cluster_id.clone()),
                };
                Vec::new()
            }
            MapInput::ZoomIn => vec![Action::ZoomStep { zoom_in: true }],
            MapInput::ZoomOut => vec![Action::ZoomStep { zoom_in: false }],
            MapInput::LocationFix(center) => {
                self.selection = Selection::Idle;
                vec![Action::Recenter { center: *center }]
            }
            MapInput::Claim => match &self.selection {
                Selection::ClusterSelected(id) => vec![Action::Claim {
                    donation_id: id.clone(),
                }],
                Selection::Idle => Vec::new(),
            },
        }
    }

    /// Back to `Idle`
    pub fn reset(&mut self) {
        self.selection = Selection::Idle;
    }
}

/// Event listener callback type
pub type EventCallback = Box<dyn FnMut(&MapEvent)>;

/// Event management system for the map
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event type
    listeners: HashMap<MapEventKind, Vec<EventCallback>>,
    /// Event queue for processing
    event_queue: VecDeque<MapEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn on<F>(&mut self, kind: MapEventKind, callback: F)
    where
        F: FnMut(&MapEvent) + 'static,
    {
        self.listeners.entry(kind).or_default().push(Box::new(callback));
    }

    /// Emit an event to the queue
    pub fn emit(&mut self, event: MapEvent) {
        self.event_queue.push_back(event);
    }

    /// Process all queued events
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            if let Some(callbacks) = self.listeners.get_mut(&event.kind()) {
                for callback in callbacks.iter_mut() {
                    callback(event);
                }
            }
        }

        events
    }

    /// Get number of pending events
    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("listeners", &self.listeners.len())
            .field("pending", &self.event_queue.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn single(id: &str) -> MapInput {
        MapInput::ClusterClick {
            cluster_id: id.to_string(),
            anchor: GeoPoint::new(12.97, 77.59),
            member_count: 1,
        }
    }

    fn group(id: &str) -> MapInput {
        MapInput::ClusterClick {
            cluster_id: id.to_string(),
            anchor: GeoPoint::new(12.98, 77.60),
            member_count: 3,
        }
    }

    #[test]
    fn test_single_click_toggles() {
        let mut interaction = MapInteraction::new();

        assert!(interaction.handle(&single("x")).is_empty());
        assert_eq!(interaction.selection(), &Selection::ClusterSelected("x".into()));

        interaction.handle(&single("x"));
        assert_eq!(interaction.selection(), &Selection::Idle);
    }

    #[test]
    fn test_switch_selection() {
        let mut interaction = MapInteraction::new();
        interaction.handle(&single("x"));
        interaction.handle(&single("y"));
        assert_eq!(interaction.selected_id(), Some("y"));
    }

    #[test]
    fn test_group_click_zooms_and_clears() {
        let mut interaction = MapInteraction::new();
        interaction.handle(&single("x"));

        let actions = interaction.handle(&group("g"));
        assert_eq!(
            actions,
            vec![Action::ZoomInto {
                anchor: GeoPoint::new(12.98, 77.60)
            }]
        );
        assert_eq!(interaction.selection(), &Selection::Idle);

        // From Idle the group click stays Idle
        interaction.handle(&group("g"));
        assert_eq!(interaction.selection(), &Selection::Idle);
    }

    #[test]
    fn test_location_fix_resets() {
        let mut interaction = MapInteraction::new();
        interaction.handle(&single("x"));

        let fix = GeoPoint::new(13.0, 77.5);
        let actions = interaction.handle(&MapInput::LocationFix(fix));
        assert_eq!(actions, vec![Action::Recenter { center: fix }]);
        assert_eq!(interaction.selection(), &Selection::Idle);
    }

    #[test]
    fn test_claim_requires_selection() {
        let mut interaction = MapInteraction::new();
        assert!(interaction.handle(&MapInput::Claim).is_empty());

        interaction.handle(&single("x"));
        assert_eq!(
            interaction.handle(&MapInput::Claim),
            vec![Action::Claim {
                donation_id: "x".into()
            }]
        );
        // Claiming does not change the selection
        assert_eq!(interaction.selected_id(), Some("x"));
    }

    #[test]
    fn test_zoom_keeps_selection() {
        let mut interaction = MapInteraction::new();
        interaction.handle(&single("x"));
        interaction.handle(&MapInput::ZoomIn);
        assert_eq!(interaction.selected_id(), Some("x"));
    }

    #[test]
    fn test_event_manager_dispatch() {
        let mut manager = EventManager::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        manager.on(MapEventKind::ClaimRequested, move |event| {
            if let MapEvent::ClaimRequested { donation_id } = event {
                sink.borrow_mut().push(donation_id.clone());
            }
        });

        manager.emit(MapEvent::SelectionChanged { selected: None });
        manager.emit(MapEvent::ClaimRequested {
            donation_id: "7".into(),
        });
        assert_eq!(manager.pending_events(), 2);

        let events = manager.process_events();
        assert_eq!(events.len(), 2);
        assert_eq!(*seen.borrow(), vec!["7".to_string()]);
        assert_eq!(manager.pending_events(), 0);
    }
}
