//! Route handlers organized by resource

pub mod cities;
pub mod health;
