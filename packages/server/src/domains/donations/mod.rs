pub mod models;

pub use models::{Donation, DonationStats, PublicDonation, Sponsorship};
