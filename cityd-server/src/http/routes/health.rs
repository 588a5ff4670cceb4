//! Health check endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::db;
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
    pub status: &'static str,
}

/// GET / - database round-trip check
async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    let server_time = db::ping(&state.pool).await.map_err(ApiError::HealthCheck)?;
    tracing::debug!(%server_time, "database round-trip ok");

    Ok(Json(HealthResponse {
        message: "Database connection successful",
        status: "OK",
    }))
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(health))
}
