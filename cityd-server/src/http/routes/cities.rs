//! City listing endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::db::repos::{CityRecord, CityRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// GET /api/cities - every row of the cities table
async fn list_cities(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CityRecord>>, ApiError> {
    let cities = CityRepo::new(&state.pool)
        .list()
        .await
        .map_err(ApiError::FetchCities)?;

    tracing::debug!(count = cities.len(), "cities fetched");
    Ok(Json(cities))
}

/// City routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/cities", get(list_cities))
}
