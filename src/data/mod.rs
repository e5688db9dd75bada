pub mod donation;
pub mod filters;
pub mod seed;

pub use donation::{ClaimerInfo, Donation, DonationStatus, FoodCategory, NewDonation};
pub use filters::DonationFilter;
