//! Queries over the donation list used by the dashboards.

use serde::{Deserialize, Serialize};

use crate::{
    data::donation::{Donation, DonationStatus},
    store::session::UserProfile,
};

/// Claimer name matched when no profile is logged in
const DEFAULT_CLAIMER_NAME: &str = "NGO Partner";

/// NGO browse filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DonationFilter {
    #[default]
    All,
    Vegetarian,
    /// Closer than the configured radius; unknown distances never match
    Nearby,
}

impl DonationFilter {
    pub fn matches(&self, donation: &Donation, near_radius_km: f64) -> bool {
        match self {
            DonationFilter::All => true,
            DonationFilter::Vegetarian => donation.is_vegetarian(),
            DonationFilter::Nearby => donation.is_within_km(near_radius_km),
        }
    }
}

/// Available listings that pass the filter, in list order
pub fn browsable<'a>(
    donations: &'a [Donation],
    filter: DonationFilter,
    near_radius_km: f64,
) -> Vec<&'a Donation> {
    donations
        .iter()
        .filter(|d| d.is_available() && filter.matches(d, near_radius_km))
        .collect()
}

/// Reserved or collected listings claimed by the profile
///
/// Matches on claimer id when both sides have one, otherwise on claimer name.
pub fn my_claims<'a>(donations: &'a [Donation], profile: Option<&UserProfile>) -> Vec<&'a Donation> {
    donations
        .iter()
        .filter(|d| matches!(d.status, DonationStatus::Reserved | DonationStatus::PickedUp))
        .filter(|d| {
            let Some(claimer) = &d.claimed_by else {
                return false;
            };
            match (&claimer.id, profile) {
                (Some(claimer_id), Some(profile)) => *claimer_id == profile.id,
                _ => {
                    let name = profile.map_or(DEFAULT_CLAIMER_NAME, |p| p.name.as_str());
                    claimer.name == name
                }
            }
        })
        .collect()
}

/// Splits claims into active (reserved) and past (picked up)
pub fn split_claims<'a>(claims: &[&'a Donation]) -> (Vec<&'a Donation>, Vec<&'a Donation>) {
    let active = claims
        .iter()
        .copied()
        .filter(|d| d.status == DonationStatus::Reserved)
        .collect();
    let past = claims
        .iter()
        .copied()
        .filter(|d| d.status == DonationStatus::PickedUp)
        .collect();
    (active, past)
}

/// Listings posted by the profile
pub fn donor_listings<'a>(donations: &'a [Donation], profile: &UserProfile) -> Vec<&'a Donation> {
    donations
        .iter()
        .filter(|d| d.donor_id == profile.id)
        .collect()
}
