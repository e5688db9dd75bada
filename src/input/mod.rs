pub mod events;
pub mod handler;

// Re-export the essential types
pub use events::{EventHandled, MapEvent, MapEventKind, MapInput};
pub use handler::{Action, EventManager, MapInteraction, Selection};
