//! cityd - HTTP service exposing a PostgreSQL health check and city listing
//!
//! Configuration comes from the environment (optionally seeded from a
//! `.env` file). See `cityd_server::config` for the variables read.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cityd_server::{run_server, AppConfig};

mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "cityd",
    author,
    version,
    about = "HTTP service listing cities from PostgreSQL",
    long_about = "Serves a database health check at / and the cities table at /api/cities. \
                  Connection settings are read from PORT, DB_USER, DB_HOST, DB_NAME, \
                  DB_PASSWORD and DB_PORT."
)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(long, short = 'd')]
    debug: bool,

    /// Load environment variables from this file instead of ./.env
    #[arg(long, value_name = "PATH", env = "CITYD_ENV_FILE")]
    env_file: Option<PathBuf>,
}

/// Seed the process environment; variables already set win.
fn load_env_file(path: Option<&PathBuf>) -> Result<Option<PathBuf>> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file {}", path.display()))?;
            Ok(Some(path.clone()))
        }
        None => match dotenvy::dotenv() {
            Ok(path) => Ok(Some(path)),
            Err(err) if err.not_found() => Ok(None),
            Err(err) => Err(err).context("Failed to load .env"),
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_file = load_env_file(cli.env_file.as_ref())?;

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;
    if let Some(path) = env_file {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let config = AppConfig::from_env();
    tracing::debug!(?config, "configuration loaded");

    run_server(config).await.context("Server error")?;

    Ok(())
}
