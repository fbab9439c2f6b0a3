pub mod jwt;
pub mod models;
pub mod password;

pub use jwt::{Claims, JwtService};
pub use models::{Profile, PublicProfile};
pub use password::{hash_password, verify_password};
