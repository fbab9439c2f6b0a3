pub mod models;

pub use models::{Report, ReportFilter, ReportStatus, ReportUpdate};
