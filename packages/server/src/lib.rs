// JeevRaksha - Citizen Animal-Rescue Reporting Platform API
//
// This crate provides the backend API for reporting injured street animals,
// matching reports with rescue NGOs and volunteers, and running the triage
// urgency assessment. Handlers are thin: validate, run model SQL, shape the
// JSON response.

pub mod common;
pub mod config;
pub mod domains;
pub mod server;

pub use config::*;
