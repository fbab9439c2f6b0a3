// Common types and utilities shared across the application

pub mod geo;
pub mod geocoding;
pub mod pagination;
pub mod role;

pub use geo::{closest, distance_km, nearby, GeoPoint, Located};
pub use geocoding::{geocode_city, GeocodedLocation};
pub use pagination::{PageInfo, PageParams, ValidatedPage};
pub use role::Role;
