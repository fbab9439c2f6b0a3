pub mod models;
pub mod scoring;

pub use scoring::{
    assess_intake, assess_quick_form, TriageAnswers, TriageAssessment, UrgencyLevel,
};
