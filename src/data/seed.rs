//! Demo listings and accounts loaded when no snapshot exists yet.

use chrono::{Duration, Utc};

use crate::{
    data::donation::{ClaimerInfo, Donation, DonationStatus, FoodCategory},
    store::session::RegisteredUser,
};

pub fn demo_donations() -> Vec<Donation> {
    let now = Utc::now();
    vec![
        Donation {
            id: "1".into(),
            donor_id: "d1".into(),
            donor_name: "Spice Garden Bistro".into(),
            donor_contact: Some("+91 98765 43210".into()),
            food_title: "Vegetable Dum Biryani".into(),
            category: FoodCategory::CookedMeals,
            quantity: "15 Servings".into(),
            best_before: now + Duration::hours(4),
            pickup_address: "12 Main St, Downtown".into(),
            latitude: 12.9716,
            longitude: 77.5946,
            image_url: "https://images.unsplash.com/photo-1512058564366-18510be2db19?auto=format&fit=crop&w=800&q=80".into(),
            status: DonationStatus::Available,
            created_at: now,
            distance_km: None,
            claimed_by: None,
        },
        Donation {
            id: "2".into(),
            donor_id: "d2".into(),
            donor_name: "Daily Bread Bakery".into(),
            donor_contact: Some("+91 99887 76655".into()),
            food_title: "Assorted Artisan Breads".into(),
            category: FoodCategory::Bakery,
            quantity: "5kg".into(),
            best_before: now + Duration::hours(16),
            pickup_address: "45 Baker Ave".into(),
            latitude: 12.9780,
            longitude: 77.6000,
            image_url: "https://images.unsplash.com/photo-1509440159596-0249088772ff?q=80&w=800&auto=format&fit=crop".into(),
            status: DonationStatus::Available,
            created_at: now,
            distance_km: None,
            claimed_by: None,
        },
        Donation {
            id: "3".into(),
            donor_id: "d1".into(),
            donor_name: "Spice Garden Bistro".into(),
            donor_contact: Some("+91 98765 43210".into()),
            food_title: "Paneer Butter Masala".into(),
            category: FoodCategory::CookedMeals,
            quantity: "10 Servings".into(),
            best_before: now + Duration::hours(5),
            pickup_address: "12 Main St, Downtown".into(),
            latitude: 12.9750,
            longitude: 77.5900,
            image_url: "https://images.unsplash.com/photo-1565557623262-b51c2513a641?q=80&w=800&auto=format&fit=crop".into(),
            status: DonationStatus::Reserved,
            created_at: now - Duration::days(1),
            distance_km: None,
            claimed_by: Some(
                ClaimerInfo::new("Hope Foundation", "+91 98765 43210").with_id("mock-ngo-id"),
            ),
        },
    ]
}

pub fn demo_users() -> Vec<RegisteredUser> {
    vec![
        RegisteredUser {
            id: "u1".into(),
            name: "Abhishek SK".into(),
            email: Some("user@example.com".into()),
            phone: Some("9999999999".into()),
            password: "password".into(),
        },
        RegisteredUser {
            id: "u2".into(),
            name: "Mobile User".into(),
            email: None,
            phone: Some("9876543210".into()),
            password: "password".into(),
        },
    ]
}
