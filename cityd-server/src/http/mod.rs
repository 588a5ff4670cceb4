//! HTTP server layer
//!
//! Axum server with:
//! - Structured access log per request
//! - Request tracing
//! - Graceful shutdown
//! - JSON error responses

pub mod access_log;
pub mod error;
pub mod routes;
pub mod server;

pub use access_log::{access_log_layer, ACCESS_LOG_TARGET};
pub use error::ApiError;
pub use server::{build_router, run_server, serve, shutdown_signal, AppState, ServerError};
