pub mod adoptions;
pub mod auth;
pub mod contact;
pub mod dashboard;
pub mod donations;
pub mod health;
pub mod ngos;
pub mod reports;
pub mod triage;
pub mod volunteers;
