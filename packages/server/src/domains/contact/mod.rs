pub mod models;

pub use models::ContactMessage;
