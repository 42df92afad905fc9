//! Domain models for the medreg system.

mod bmr;
mod doctor;
mod patient;

pub use bmr::*;
pub use doctor::*;
pub use patient::*;
