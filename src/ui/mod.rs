//! Headless view models for the donation map and the NGO dashboard.

pub mod list_view;
pub mod map_view;

pub use list_view::{ClaimDraft, DashboardTab, DonationListView, FindOutput, ViewMode};
pub use map_view::{MapView, RenderedPin};
