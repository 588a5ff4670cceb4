//! Axum server setup
//!
//! Server skeleton with:
//! - Access log middleware (outermost) and tracing spans
//! - Pool handed to handlers through state, never a global
//! - Graceful shutdown on SIGTERM/Ctrl+C, then pool close

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::{middleware, Router};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultOnFailure, TraceLayer};
use tracing::Level;

use super::access_log::access_log_layer;
use super::routes;
use crate::config::AppConfig;
use crate::db;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::cities::router())
        .fallback(|| async { StatusCode::NOT_FOUND })
        // ApiError already logs failed requests; keep the trace layer quiet.
        .layer(TraceLayer::new_for_http().on_failure(DefaultOnFailure::new().level(Level::DEBUG)))
        .layer(middleware::from_fn(access_log_layer))
        .with_state(Arc::new(state))
}

/// Run the HTTP server until a termination signal arrives.
///
/// # Example
///
/// ```ignore
/// let config = AppConfig::from_env();
/// run_server(config).await?;
/// ```
pub async fn run_server(config: AppConfig) -> Result<(), ServerError> {
    let pool = db::create_pool(&config.db);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("Server running on port {}", config.port);

    serve(listener, pool, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
///
/// Stops accepting connections, lets in-flight requests finish, then
/// closes the pool. The pool is closed even if serving failed.
pub async fn serve<F>(listener: TcpListener, pool: PgPool, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(AppState { pool: pool.clone() });

    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await;

    tracing::info!("Closing PostgreSQL pool and exiting...");
    db::close_pool(&pool).await;

    served?;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DbConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;
    use tracing_test::traced_test;

    fn unreachable_state() -> AppState {
        AppState {
            pool: db::create_pool(&DbConfig {
                host: Some("127.0.0.1".into()),
                port: Some(1),
                ..DbConfig::default()
            }),
        }
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let response = build_router(unreachable_state())
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_route_reports_failure_as_json() {
        let response = build_router(unreachable_state())
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "Error");
        assert!(!body["error"].as_str().unwrap_or_default().is_empty());
    }

    #[tokio::test]
    #[traced_test]
    async fn failed_request_logs_one_error_line() {
        let app = build_router(unreachable_state());

        for path in ["/", "/api/cities"] {
            let response = app
                .clone()
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }

        logs_assert(|lines: &[&str]| {
            let errors: Vec<_> = lines.iter().filter(|line| line.contains(" ERROR ")).collect();
            match errors.as_slice() {
                [health, cities]
                    if health.contains("Database connection error")
                        && cities.contains("Error fetching data from /api/cities") =>
                {
                    Ok(())
                }
                other => Err(format!("expected one error line per request, got {other:?}")),
            }
        });
    }
}
