pub mod models;

pub use models::{normalize_skills, LeaderboardEntry, Volunteer};
