pub mod models;

pub use models::{Ngo, NgoStatus};
