//! cityd-server: HTTP service over a PostgreSQL pool
//!
//! Exposes a database health check at `/` and the contents of the
//! `cities` table at `/api/cities`, with one structured access log
//! line per request.

pub mod config;
pub mod db;
pub mod http;

pub use config::{AppConfig, DbConfig};
pub use http::{run_server, ServerError};
