//! Database layer - connection pool and repositories
//!
//! # Design Principles
//!
//! - One pool per process, passed explicitly - no global pool
//! - Single statements go straight through the pool (no manual checkout)
//! - Explicit checkouts are `PoolConnection` guards, released on drop

pub mod error;
pub mod pool;
pub mod repos;

pub use error::DbError;
pub use pool::{acquire, close_pool, create_pool, ping, stats, PoolStats};
pub use repos::*;
