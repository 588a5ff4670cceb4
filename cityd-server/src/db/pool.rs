//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits and short timeouts.
//! The pool is lazy: nothing connects until the first checkout, so a
//! database that is down at startup shows up in the health check rather
//! than aborting the process.

use chrono::{DateTime, Utc};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres};

use super::DbError;
use crate::config::DbConfig;

/// Point-in-time view of pool occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Open connections, idle or lent out
    pub size: u32,
    /// Open connections waiting in the pool
    pub idle: usize,
    /// Configured upper bound
    pub max: u32,
}

impl PoolStats {
    /// Connections currently lent out to callers
    pub fn in_use(&self) -> u32 {
        self.size.saturating_sub(self.idle as u32)
    }
}

/// Build connect options from the descriptor.
///
/// Unset fields keep the driver defaults (which also honour `PG*` variables).
pub fn connect_options(config: &DbConfig) -> PgConnectOptions {
    let mut options = PgConnectOptions::new();

    if let Some(host) = &config.host {
        options = options.host(host);
    }
    if let Some(port) = config.port {
        options = options.port(port);
    }
    if let Some(user) = &config.user {
        options = options.username(user);
    }
    if let Some(password) = &config.password {
        options = options.password(password);
    }
    if let Some(database) = &config.database {
        options = options.database(database);
    }

    options
}

/// Create a PostgreSQL connection pool.
///
/// # Example
///
/// ```ignore
/// let config = AppConfig::from_env();
/// let pool = create_pool(&config.db);
/// ```
pub fn create_pool(config: &DbConfig) -> PgPool {
    tracing::debug!(?config, "creating connection pool");

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .idle_timeout(config.idle_timeout)
        .acquire_timeout(config.acquire_timeout)
        .connect_lazy_with(connect_options(config))
}

/// Check out a connection.
///
/// The returned guard goes back to the pool when dropped, on every path.
/// Waits at most the configured acquisition timeout.
pub async fn acquire(pool: &PgPool) -> Result<PoolConnection<Postgres>, DbError> {
    pool.acquire().await.map_err(DbError::from)
}

/// Round-trip the database server clock.
///
/// Runs directly against the pool, so the checkout and release happen inside
/// sqlx and cannot leak.
pub async fn ping(pool: &PgPool) -> Result<DateTime<Utc>, DbError> {
    let now = sqlx::query_scalar::<_, DateTime<Utc>>("SELECT NOW()")
        .fetch_one(pool)
        .await?;
    Ok(now)
}

/// Close every connection and refuse new checkouts.
///
/// Waits for lent connections to come back. Safe to call more than once.
pub async fn close_pool(pool: &PgPool) {
    if pool.is_closed() {
        return;
    }
    let before = stats(pool);
    pool.close().await;
    tracing::debug!(size = before.size, idle = before.idle, "connection pool closed");
}

/// Current pool occupancy
pub fn stats(pool: &PgPool) -> PoolStats {
    PoolStats {
        size: pool.size(),
        idle: pool.num_idle(),
        max: pool.options().get_max_connections(),
    }
}
