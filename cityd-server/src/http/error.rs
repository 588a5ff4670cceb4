//! API error types with IntoResponse
//!
//! Database failures are caught at the handler boundary, logged with
//! context, and rendered as a JSON 500 carrying only the error message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Health check round-trip failed (500, logged)
    HealthCheck(DbError),

    /// City listing failed (500, logged)
    FetchCities(DbError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::HealthCheck(_) | Self::FetchCities(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::HealthCheck(e) => {
                tracing::error!(error = %e, "Database connection error");
                json!({
                    "message": "Database connection failed",
                    "status": "Error",
                    "error": e.to_string()
                })
            }
            Self::FetchCities(e) => {
                tracing::error!(error = %e, "Error fetching data from /api/cities");
                json!({
                    "message": "Error fetching cities data",
                    "error": e.to_string()
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn health_check_error_is_500_with_status_field() {
        let response = ApiError::HealthCheck(DbError::AcquireTimeout).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({
                "message": "Database connection failed",
                "status": "Error",
                "error": "timeout exceeded when trying to connect"
            })
        );
    }

    #[tokio::test]
    async fn fetch_cities_error_is_500_without_status_field() {
        let response = ApiError::FetchCities(DbError::PoolClosed).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Error fetching cities data");
        assert_eq!(body["error"], "connection pool is closed");
        assert!(body.get("status").is_none());
    }
}
