// Domain modules - each owns its entities and all SQL for them

pub mod adoptions;
pub mod auth;
pub mod contact;
pub mod dashboard;
pub mod donations;
pub mod ngos;
pub mod reports;
pub mod triage;
pub mod volunteers;
