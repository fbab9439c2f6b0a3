pub mod models;

pub use models::{AdoptionAnimal, AdoptionApplication, AnimalFilter};
