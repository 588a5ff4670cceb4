//! Tracing setup for the cityd binary
//!
//! Two outputs share one registry:
//! - stdout: the access log, one JSON object per request
//! - stderr: everything else, compact human-readable lines
//!
//! Environment variables:
//!   RUST_LOG                          # Diagnostic filter (default: info)

use anyhow::{anyhow, Result};
use cityd_server::http::ACCESS_LOG_TARGET;
use tracing::{Level, Subscriber};
use tracing_subscriber::filter::{Directive, EnvFilter, Targets};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets RUST_LOG=debug if not already set)
    pub debug: bool,
}

/// Diagnostic filter; the access log target is always excluded here.
fn diagnostic_filter(config: &TracingConfig) -> Result<EnvFilter> {
    let default = if config.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let directive = format!("{ACCESS_LOG_TARGET}=off")
        .parse::<Directive>()
        .map_err(|err| anyhow!("invalid access log directive: {err}"))?;
    Ok(filter.add_directive(directive))
}

/// Access log layer: bare event fields as one JSON object per line
pub fn access_layer<S, W>(writer: W) -> impl Layer<S> + Send + Sync
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_span_list(false)
        .with_target(false)
        .with_level(false)
        .without_time()
        .with_writer(writer)
        .with_filter(Targets::new().with_target(ACCESS_LOG_TARGET, Level::INFO))
}

/// Initialize tracing with the access log on stdout and diagnostics on stderr
pub fn init(config: &TracingConfig) -> Result<()> {
    let diagnostic_layer = tracing_subscriber::fmt::layer()
        .with_target(config.debug) // Show targets in debug mode
        .with_writer(std::io::stderr)
        .compact()
        .with_filter(diagnostic_filter(config)?);

    tracing_subscriber::registry()
        .with(access_layer(std::io::stdout))
        .with(diagnostic_layer)
        .try_init()
        .map_err(|err| anyhow!(err))
}
