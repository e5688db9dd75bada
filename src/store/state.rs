//! Application state and the commands that change it.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    core::{
        config::StoreOptions,
        constants::{DONATIONS_KEY, PROFILE_KEY, ROLE_KEY, USERS_KEY},
        geo::GeoPoint,
    },
    data::donation::{ClaimerInfo, Donation, DonationStatus, NewDonation},
    store::session::{
        authenticate, AuthMethod, AuthMode, ProfileUpdate, RegisteredUser, UserProfile, UserRole,
    },
    MarketError, Result,
};

/// Donor id used when a listing is posted without a profile
const ANONYMOUS_DONOR_ID: &str = "currentUser";

/// Everything the dashboards read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppState {
    pub role: Option<UserRole>,
    pub profile: Option<UserProfile>,
    pub donations: Vec<Donation>,
    pub registered_users: Vec<RegisteredUser>,
    pub user_location: Option<GeoPoint>,
}

/// Named state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `None` when the platform could not provide a fix
    SetLocation(Option<GeoPoint>),
    AddDonation(NewDonation),
    ClaimDonation { id: String, claimer: ClaimerInfo },
    UpdateStatus { id: String, status: DonationStatus },
    Authenticate {
        method: AuthMethod,
        role: UserRole,
        mode: AuthMode,
    },
    Logout,
    UpdateProfile(ProfileUpdate),
    /// Donation list written by another handle
    ReplaceDonations(Vec<Donation>),
}

/// Snapshot keys touched by a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    Donations,
    Role,
    Profile,
    Users,
}

impl StateKey {
    pub fn storage_key(&self) -> &'static str {
        match self {
            StateKey::Donations => DONATIONS_KEY,
            StateKey::Role => ROLE_KEY,
            StateKey::Profile => PROFILE_KEY,
            StateKey::Users => USERS_KEY,
        }
    }
}

impl AppState {
    pub fn donation(&self, id: &str) -> Option<&Donation> {
        self.donations.iter().find(|d| d.id == id)
    }

    fn donation_mut(&mut self, id: &str) -> Result<&mut Donation> {
        self.donations
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| MarketError::DonationNotFound(id.to_string()))
    }

    pub fn is_logged_in(&self) -> bool {
        self.profile.is_some()
    }

    /// Applies a command and reports which snapshot keys changed
    ///
    /// On error the state is left untouched.
    pub fn apply(&mut self, command: Command, options: &StoreOptions) -> Result<Vec<StateKey>> {
        match command {
            Command::SetLocation(fix) => {
                let location = fix.unwrap_or(options.fallback_location);
                if fix.is_none() {
                    log::warn!(
                        "no location fix, falling back to ({}, {})",
                        location.lat,
                        location.lng
                    );
                }
                self.user_location = Some(location);
                self.refresh_distances();
                Ok(vec![StateKey::Donations])
            }
            Command::AddDonation(draft) => {
                let donation = self.build_donation(draft, options)?;
                log::info!("donation {} posted by {}", donation.id, donation.donor_id);
                self.donations.insert(0, donation);
                Ok(vec![StateKey::Donations])
            }
            Command::ClaimDonation { id, claimer } => {
                if claimer.name.trim().is_empty() || claimer.contact.trim().is_empty() {
                    return Err(MarketError::Validation(
                        "claimer name and contact are required".into(),
                    ));
                }
                let donation = self.donation_mut(&id)?;
                if donation.status != DonationStatus::Available {
                    return Err(MarketError::NotAvailable(id));
                }
                log::info!("donation {} reserved by {}", id, claimer.name);
                donation.status = DonationStatus::Reserved;
                donation.claimed_by = Some(claimer);
                Ok(vec![StateKey::Donations])
            }
            Command::UpdateStatus { id, status } => {
                let donation = self.donation_mut(&id)?;
                log::info!("donation {} status {:?} -> {:?}", id, donation.status, status);
                donation.status = status;
                Ok(vec![StateKey::Donations])
            }
            Command::Authenticate { method, role, mode } => {
                let users_before = self.registered_users.len();
                let profile = authenticate(&mut self.registered_users, &method, mode)?;
                log::info!("{} signed in as {}", profile.id, role.as_str());
                self.profile = Some(profile);
                self.role = Some(role);

                let mut changed = vec![StateKey::Role, StateKey::Profile];
                if self.registered_users.len() != users_before {
                    changed.push(StateKey::Users);
                }
                Ok(changed)
            }
            Command::Logout => {
                self.role = None;
                self.profile = None;
                Ok(vec![StateKey::Role, StateKey::Profile])
            }
            Command::UpdateProfile(update) => match self.profile.as_mut() {
                Some(profile) => {
                    profile.apply(update);
                    Ok(vec![StateKey::Profile])
                }
                None => Ok(Vec::new()),
            },
            Command::ReplaceDonations(donations) => {
                self.donations = donations;
                if self.user_location.is_some() {
                    self.refresh_distances();
                }
                Ok(Vec::new())
            }
        }
    }

    fn build_donation(&self, draft: NewDonation, options: &StoreOptions) -> Result<Donation> {
        if !draft.location.is_finite() {
            return Err(MarketError::InvalidCoordinates(format!(
                "({}, {})",
                draft.location.lat, draft.location.lng
            )));
        }
        if draft.food_title.trim().is_empty() {
            return Err(MarketError::Validation("food title is required".into()));
        }
        if !draft.location.is_valid() {
            log::warn!(
                "pickup location ({}, {}) is outside WGS84 ranges",
                draft.location.lat,
                draft.location.lng
            );
        }

        let (donor_id, donor_name, donor_contact) = match &self.profile {
            Some(profile) => (profile.id.clone(), profile.name.clone(), profile.contact.clone()),
            None => (
                ANONYMOUS_DONOR_ID.to_string(),
                options.default_donor_name.clone(),
                String::new(),
            ),
        };
        let distance_km = Some(
            self.user_location
                .map_or(0.0, |here| here.distance_km(&draft.location)),
        );

        Ok(Donation {
            id: Uuid::new_v4().to_string(),
            donor_id,
            donor_name,
            donor_contact: Some(donor_contact),
            food_title: draft.food_title,
            category: draft.category,
            quantity: draft.quantity,
            best_before: draft.best_before,
            pickup_address: draft.pickup_address,
            latitude: draft.location.lat,
            longitude: draft.location.lng,
            image_url: draft.image_url,
            status: DonationStatus::Available,
            created_at: Utc::now(),
            distance_km,
            claimed_by: None,
        })
    }

    fn refresh_distances(&mut self) {
        if let Some(here) = self.user_location {
            for donation in &mut self.donations {
                donation.update_distance(&here);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{donation::FoodCategory, seed};

    fn state() -> AppState {
        AppState {
            donations: seed::demo_donations(),
            registered_users: seed::demo_users(),
            ..AppState::default()
        }
    }

    fn draft() -> NewDonation {
        NewDonation::new(
            "Veg Pulao",
            FoodCategory::CookedMeals,
            "20 servings",
            "1 MG Road",
            GeoPoint::new(12.9750, 77.6050),
        )
    }

    #[test]
    fn test_location_fallback_sets_distances() {
        let mut state = state();
        let options = StoreOptions::default();

        state.apply(Command::SetLocation(None), &options).unwrap();
        assert_eq!(state.user_location, Some(GeoPoint::fallback()));
        assert_eq!(state.donations[0].distance_km, Some(0.0));
        assert!(state.donations.iter().all(|d| d.distance_km.is_some()));
    }

    #[test]
    fn test_add_donation_prepends_with_profile() {
        let mut state = state();
        let options = StoreOptions::default();
        state.profile = Some(UserProfile::new("u9", "Green Cafe"));

        let changed = state.apply(Command::AddDonation(draft()), &options).unwrap();
        assert_eq!(changed, vec![StateKey::Donations]);

        let added = &state.donations[0];
        assert_eq!(state.donations.len(), 4);
        assert_eq!(added.donor_id, "u9");
        assert_eq!(added.donor_name, "Green Cafe");
        assert_eq!(added.status, DonationStatus::Available);
        assert_eq!(added.distance_km, Some(0.0));
    }

    #[test]
    fn test_add_donation_anonymous_and_invalid() {
        let mut state = state();
        let options = StoreOptions::default();

        state.apply(Command::AddDonation(draft()), &options).unwrap();
        assert_eq!(state.donations[0].donor_id, "currentUser");
        assert_eq!(state.donations[0].donor_name, "Anonymous Donor");

        let mut bad = draft();
        bad.location = GeoPoint::new(f64::NAN, 77.6);
        assert!(matches!(
            state.apply(Command::AddDonation(bad), &options),
            Err(MarketError::InvalidCoordinates(_))
        ));
        assert_eq!(state.donations.len(), 4);

        // Finite but out of range is accepted
        let mut odd = draft();
        odd.location = GeoPoint::new(95.0, 200.0);
        state.apply(Command::AddDonation(odd), &options).unwrap();
        assert_eq!(state.donations[0].latitude, 95.0);
        assert_eq!(state.donations.len(), 5);
    }

    #[test]
    fn test_claim_rules() {
        let mut state = state();
        let options = StoreOptions::default();
        let claimer = ClaimerInfo::new("Hope Foundation", "+91 90000 00000").with_id("n1");

        state
            .apply(
                Command::ClaimDonation {
                    id: "1".into(),
                    claimer: claimer.clone(),
                },
                &options,
            )
            .unwrap();
        let claimed = state.donation("1").unwrap();
        assert_eq!(claimed.status, DonationStatus::Reserved);
        assert_eq!(claimed.claimed_by.as_ref(), Some(&claimer));

        let again = state.apply(
            Command::ClaimDonation {
                id: "1".into(),
                claimer: claimer.clone(),
            },
            &options,
        );
        assert!(matches!(again, Err(MarketError::NotAvailable(_))));

        let missing = state.apply(
            Command::ClaimDonation {
                id: "nope".into(),
                claimer,
            },
            &options,
        );
        assert!(matches!(missing, Err(MarketError::DonationNotFound(_))));
    }

    #[test]
    fn test_status_update() {
        let mut state = state();
        state
            .apply(
                Command::UpdateStatus {
                    id: "3".into(),
                    status: DonationStatus::PickedUp,
                },
                &StoreOptions::default(),
            )
            .unwrap();
        assert_eq!(state.donation("3").unwrap().status, DonationStatus::PickedUp);
    }

    #[test]
    fn test_login_logout_keys() {
        let mut state = state();
        let options = StoreOptions::default();

        let changed = state
            .apply(
                Command::Authenticate {
                    method: AuthMethod::Google,
                    role: UserRole::Ngo,
                    mode: AuthMode::Login,
                },
                &options,
            )
            .unwrap();
        assert_eq!(changed, vec![StateKey::Role, StateKey::Profile]);
        assert_eq!(state.role, Some(UserRole::Ngo));

        state
            .apply(Command::UpdateProfile(ProfileUpdate::contact("123")), &options)
            .unwrap();
        assert_eq!(state.profile.as_ref().unwrap().contact, "123");

        state.apply(Command::Logout, &options).unwrap();
        assert!(!state.is_logged_in());
        assert_eq!(
            state
                .apply(Command::UpdateProfile(ProfileUpdate::contact("456")), &options)
                .unwrap(),
            Vec::<StateKey>::new()
        );
    }

    #[test]
    fn test_failed_login_leaves_state() {
        let mut state = state();
        let result = state.apply(
            Command::Authenticate {
                method: AuthMethod::Phone {
                    phone: "0000000000".into(),
                    password: "x".into(),
                },
                role: UserRole::Donor,
                mode: AuthMode::Login,
            },
            &StoreOptions::default(),
        );
        assert!(matches!(result, Err(MarketError::Auth(_))));
        assert!(state.role.is_none());
    }
}
