//! Repository implementations for database access

pub mod cities;

pub use cities::{CityRecord, CityRepo};
