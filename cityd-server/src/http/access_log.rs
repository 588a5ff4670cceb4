//! Access log middleware
//!
//! Emits one structured event per request on the `access_log` target once
//! the inner service has produced its response. The CLI routes this target
//! to a JSON formatter on stdout, giving one object per line:
//!
//! ```text
//! {"timestamp":"2024-05-01T12:00:00.123Z","method":"GET","url":"/api/cities",
//!  "clientIp":"10.0.0.7","host":"localhost:3000","status":200,
//!  "durationMs":3.417,"userAgent":"curl/8.5.0"}
//! ```

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request},
    http::{header, HeaderMap, Method, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::{SecondsFormat, Utc};

/// Tracing target carrying access log events.
pub const ACCESS_LOG_TARGET: &str = "access_log";

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Request details captured before dispatch
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub method: Method,
    pub url: String,
    pub client_ip: Option<String>,
    pub host: Option<String>,
    pub user_agent: Option<String>,
}

/// A completed access log record
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub timestamp: String,
    pub request: RequestInfo,
    pub status: StatusCode,
    pub duration_ms: f64,
}

impl RequestInfo {
    pub fn from_request(request: &Request) -> Self {
        let uri = request.uri();
        let url = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_owned())
            .unwrap_or_else(|| uri.path().to_owned());

        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Self {
            method: request.method().clone(),
            url,
            client_ip: client_ip(request.headers(), peer),
            host: header_str(request.headers(), header::HOST.as_str()),
            user_agent: header_str(request.headers(), header::USER_AGENT.as_str()),
        }
    }

    /// Finish the record with the response status and elapsed time
    pub fn complete(self, status: StatusCode, elapsed: Duration) -> AccessLogEntry {
        AccessLogEntry {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            request: self,
            status,
            duration_ms: duration_ms(elapsed),
        }
    }
}

impl AccessLogEntry {
    pub fn emit(&self) {
        tracing::info!(
            target: ACCESS_LOG_TARGET,
            timestamp = %self.timestamp,
            method = %self.request.method,
            url = %self.request.url,
            clientIp = self.request.client_ip.as_deref(),
            host = self.request.host.as_deref(),
            status = self.status.as_u16(),
            durationMs = self.duration_ms,
            userAgent = self.request.user_agent.as_deref()
        );
    }
}

/// Middleware that logs every request after its response is produced.
///
/// Install as the outermost layer so the timing covers all other layers.
pub async fn access_log_layer(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let info = RequestInfo::from_request(&request);

    let response = next.run(request).await;

    info.complete(response.status(), start.elapsed()).emit();
    response
}

/// Forwarded-for header verbatim, else the transport peer
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    header_str(headers, X_FORWARDED_FOR).or_else(|| peer.map(|addr| addr.ip().to_string()))
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Milliseconds with microsecond resolution
fn duration_ms(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 1_000_000.0).round() / 1_000.0
}
