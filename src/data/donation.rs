use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{core::geo::GeoPoint, traits::Locatable};

/// Hours until expiry when a donor does not say otherwise
pub const DEFAULT_BEST_BEFORE_HOURS: i64 = 4;

/// Title fragments that mark a listing as non-vegetarian
const NON_VEG_TERMS: [&str; 7] = ["chicken", "mutton", "fish", "egg", "meat", "beef", "pork"];

/// Lifecycle of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    Available,
    Reserved,
    PickedUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodCategory {
    #[serde(rename = "Cooked Meals")]
    CookedMeals,
    #[serde(rename = "Raw Produce")]
    RawProduce,
    Dairy,
    Grains,
    Bakery,
    Other,
}

impl FoodCategory {
    pub fn label(&self) -> &'static str {
        match self {
            FoodCategory::CookedMeals => "Cooked Meals",
            FoodCategory::RawProduce => "Raw Produce",
            FoodCategory::Dairy => "Dairy",
            FoodCategory::Grains => "Grains",
            FoodCategory::Bakery => "Bakery",
            FoodCategory::Other => "Other",
        }
    }
}

impl fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Who reserved a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimerInfo {
    pub name: String,
    pub contact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ClaimerInfo {
    pub fn new(name: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact: contact.into(),
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A posted food-availability entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: String,
    pub donor_id: String,
    /// Denormalized for display
    pub donor_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor_contact: Option<String>,
    pub food_title: String,
    pub category: FoodCategory,
    /// Free text such as "20 servings"
    pub quantity: String,
    pub best_before: DateTime<Utc>,
    pub pickup_address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub image_url: String,
    pub status: DonationStatus,
    pub created_at: DateTime<Utc>,
    /// Distance from the current user location, recomputed on every fix
    #[serde(rename = "distance", default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(rename = "claimedBy", default, skip_serializing_if = "Option::is_none")]
    pub claimed_by: Option<ClaimerInfo>,
}

impl Donation {
    pub fn is_available(&self) -> bool {
        self.status == DonationStatus::Available
    }

    /// Title/category heuristic used by the vegetarian filter
    pub fn is_vegetarian(&self) -> bool {
        let title = self.food_title.to_lowercase();
        self.category != FoodCategory::Other
            && !NON_VEG_TERMS.iter().any(|term| title.contains(term))
    }

    pub fn is_within_km(&self, radius_km: f64) -> bool {
        self.distance_km.is_some_and(|d| d < radius_km)
    }

    /// Recomputes `distance_km` from the given location
    pub fn update_distance(&mut self, from: &GeoPoint) {
        self.distance_km = Some(from.distance_km(&self.location()));
    }
}

impl Locatable for Donation {
    fn id(&self) -> &str {
        &self.id
    }

    fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Donor-supplied fields of a new listing
///
/// Identity, status and timestamps are filled in by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDonation {
    pub food_title: String,
    pub category: FoodCategory,
    pub quantity: String,
    pub best_before: DateTime<Utc>,
    pub pickup_address: String,
    pub location: GeoPoint,
    pub image_url: String,
}

impl NewDonation {
    pub fn new(
        food_title: impl Into<String>,
        category: FoodCategory,
        quantity: impl Into<String>,
        pickup_address: impl Into<String>,
        location: GeoPoint,
    ) -> Self {
        Self {
            food_title: food_title.into(),
            category,
            quantity: quantity.into(),
            best_before: Utc::now() + Duration::hours(DEFAULT_BEST_BEFORE_HOURS),
            pickup_address: pickup_address.into(),
            location,
            image_url: String::new(),
        }
    }

    /// Expiry relative to now
    pub fn with_best_before_hours(mut self, hours: i64) -> Self {
        self.best_before = Utc::now() + Duration::hours(hours);
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::seed;

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&DonationStatus::PickedUp).unwrap();
        assert_eq!(json, "\"picked_up\"");
        let category: FoodCategory = serde_json::from_str("\"Raw Produce\"").unwrap();
        assert_eq!(category, FoodCategory::RawProduce);
    }

    #[test]
    fn test_vegetarian_heuristic() {
        let mut donation = seed::demo_donations().remove(0);
        assert!(donation.is_vegetarian());

        donation.food_title = "Egg Fried Rice".into();
        assert!(!donation.is_vegetarian());

        donation.food_title = "Rice".into();
        donation.category = FoodCategory::Other;
        assert!(!donation.is_vegetarian());
    }

    #[test]
    fn test_snapshot_field_names() {
        let donation = seed::demo_donations().remove(2);
        let value = serde_json::to_value(&donation).unwrap();

        assert_eq!(value["status"], "reserved");
        assert_eq!(value["claimedBy"]["name"], "Hope Foundation");
        assert!(value.get("distance").is_none());
    }

    #[test]
    fn test_distance_update() {
        let mut donation = seed::demo_donations().remove(0);
        assert!(!donation.is_within_km(5.0));

        donation.update_distance(&GeoPoint::new(12.9716, 77.5946));
        assert_eq!(donation.distance_km, Some(0.0));
        assert!(donation.is_within_km(5.0));
    }
}
