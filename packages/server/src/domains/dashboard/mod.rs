pub mod models;

pub use models::{
    AdminStats, MonthlyTrend, PlatformStats, RecentReport, StatusCount, TopNgo, TypeCount,
    UrgencyCount,
};
