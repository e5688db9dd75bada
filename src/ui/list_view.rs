//! NGO dashboard over the donation list: browse as list or map, filter,
//! and claim through a confirmation draft.

use serde::{Deserialize, Serialize};

use crate::{
    core::config::MarketplaceConfig,
    data::{
        donation::{ClaimerInfo, Donation},
        filters::{self, DonationFilter},
    },
    store::{
        session::UserProfile,
        state::{AppState, Command},
    },
    ui::map_view::{MapView, RenderedPin},
    MarketError, Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    List,
    Map,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DashboardTab {
    #[default]
    Find,
    Claims,
}

/// Claimer details being confirmed before a claim is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimDraft {
    pub donation_id: String,
    pub name: String,
    pub contact: String,
    pub claimer_id: Option<String>,
}

/// What the Find tab shows
#[derive(Debug, Clone, PartialEq)]
pub enum FindOutput<'a> {
    List(Vec<&'a Donation>),
    Map(Vec<RenderedPin>),
}

pub struct DonationListView {
    mode: ViewMode,
    filter: DonationFilter,
    tab: DashboardTab,
    draft: Option<ClaimDraft>,
    map: MapView,
    near_radius_km: f64,
}

impl DonationListView {
    pub fn new(config: &MarketplaceConfig, state: &AppState) -> Self {
        Self {
            mode: ViewMode::default(),
            filter: DonationFilter::default(),
            tab: DashboardTab::default(),
            draft: None,
            map: MapView::new(&config.map, state.user_location),
            near_radius_km: config.store.near_radius_km,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    pub fn filter(&self) -> DonationFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: DonationFilter) {
        self.filter = filter;
    }

    pub fn tab(&self) -> DashboardTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: DashboardTab) {
        self.tab = tab;
    }

    pub fn map(&self) -> &MapView {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut MapView {
        &mut self.map
    }

    /// Available donations passing the current filter, in list order
    pub fn visible<'a>(&self, state: &'a AppState) -> Vec<&'a Donation> {
        filters::browsable(&state.donations, self.filter, self.near_radius_km)
    }

    /// Contents of the Find tab for the current mode
    ///
    /// Map mode clusters the same records the list would show.
    pub fn render<'a>(&self, state: &'a AppState) -> FindOutput<'a> {
        let visible = self.visible(state);
        match self.mode {
            ViewMode::List => FindOutput::List(visible),
            ViewMode::Map => FindOutput::Map(self.map.render(visible.iter().copied())),
        }
    }

    /// Recenters the map after the store received a new location
    pub fn sync_location(&mut self, state: &AppState) {
        self.map.on_location_fix(state.user_location);
    }

    /// Opens the confirmation draft, prefilled from the profile
    pub fn initiate_claim(
        &mut self,
        donation_id: impl Into<String>,
        profile: Option<&UserProfile>,
    ) -> &ClaimDraft {
        self.draft.insert(ClaimDraft {
            donation_id: donation_id.into(),
            name: profile.map(|p| p.name.clone()).unwrap_or_default(),
            contact: profile.map(|p| p.contact.clone()).unwrap_or_default(),
            claimer_id: profile.map(|p| p.id.clone()),
        })
    }

    /// Opens a draft for the pin selected on the map, if it is still shown
    /// as a single pin
    pub fn claim_from_map(
        &mut self,
        state: &AppState,
        profile: Option<&UserProfile>,
    ) -> Option<&ClaimDraft> {
        let visible = self.visible(state);
        let donation_id = self.map.claim_selected(visible.iter().copied())?;
        Some(self.initiate_claim(donation_id, profile))
    }

    pub fn draft(&self) -> Option<&ClaimDraft> {
        self.draft.as_ref()
    }

    pub fn set_claim_name(&mut self, name: impl Into<String>) {
        if let Some(draft) = self.draft.as_mut() {
            draft.name = name.into();
        }
    }

    pub fn set_claim_contact(&mut self, contact: impl Into<String>) {
        if let Some(draft) = self.draft.as_mut() {
            draft.contact = contact.into();
        }
    }

    pub fn cancel_claim(&mut self) {
        self.draft = None;
    }

    /// Turns the draft into a claim command and switches to the Claims tab
    ///
    /// An incomplete draft stays open.
    pub fn confirm_claim(&mut self) -> Result<Command> {
        let draft = self
            .draft
            .as_ref()
            .ok_or_else(|| MarketError::Validation("no claim in progress".into()))?;
        if draft.name.trim().is_empty() || draft.contact.trim().is_empty() {
            return Err(MarketError::Validation(
                "organization name and contact number are required".into(),
            ));
        }

        let Some(draft) = self.draft.take() else {
            return Err(MarketError::Validation("no claim in progress".into()));
        };
        let mut claimer = ClaimerInfo::new(draft.name, draft.contact);
        claimer.id = draft.claimer_id;
        self.tab = DashboardTab::Claims;

        Ok(Command::ClaimDonation {
            id: draft.donation_id,
            claimer,
        })
    }

    /// Active (reserved) and past (picked up) claims of the profile
    pub fn my_claims<'a>(
        &self,
        state: &'a AppState,
    ) -> (Vec<&'a Donation>, Vec<&'a Donation>) {
        let claims = filters::my_claims(&state.donations, state.profile.as_ref());
        filters::split_claims(&claims)
    }

    /// Listings posted by the logged-in donor
    pub fn donor_listings<'a>(&self, state: &'a AppState) -> Vec<&'a Donation> {
        match &state.profile {
            Some(profile) => filters::donor_listings(&state.donations, profile),
            None => Vec::new(),
        }
    }
}
