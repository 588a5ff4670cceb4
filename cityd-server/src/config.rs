//! Service configuration - environment loading
//!
//! Configuration is loaded from environment variables:
//! - `HOST`, `PORT`: listen address (default: 0.0.0.0:3000)
//! - `DB_USER`, `DB_HOST`, `DB_NAME`, `DB_PASSWORD`, `DB_PORT`: connection descriptor
//! - `DB_POOL_MAX`: maximum pool size (default: 50)
//! - `DB_IDLE_TIMEOUT_MS`: idle connection eviction (default: 100)
//! - `DB_CONNECTION_TIMEOUT_MS`: connection acquisition timeout (default: 100)
//!
//! Missing variables are never fatal. Database fields left unset fall through
//! to the driver's own defaults; credentials are only checked when the pool
//! first connects.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

/// Default HTTP listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 50;

/// Idle connections are evicted aggressively.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_millis(100);

/// Callers must be prepared for acquisition failures under load.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_millis(100);

/// Top-level service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP listener binds to
    pub host: IpAddr,
    /// Port the HTTP listener binds to
    pub port: u16,
    /// Database connection descriptor
    pub db: DbConfig,
}

/// Database connection descriptor and pool sizing
#[derive(Clone)]
pub struct DbConfig {
    pub user: Option<String>,
    pub host: Option<String>,
    pub database: Option<String>,
    pub password: Option<String>,
    pub port: Option<u16>,
    pub max_connections: u32,
    pub idle_timeout: Duration,
    pub acquire_timeout: Duration,
}

impl AppConfig {
    /// Create config from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup (for testing)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Lookup(&lookup);

        Self {
            host: env.parsed("HOST").unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            port: env.parsed("PORT").unwrap_or(DEFAULT_PORT),
            db: DbConfig {
                user: env.string("DB_USER"),
                host: env.string("DB_HOST"),
                database: env.string("DB_NAME"),
                password: env.string("DB_PASSWORD"),
                port: env.parsed("DB_PORT"),
                max_connections: env
                    .parsed::<u32>("DB_POOL_MAX")
                    .filter(|max| *max > 0)
                    .unwrap_or(DEFAULT_MAX_CONNECTIONS),
                idle_timeout: env
                    .parsed("DB_IDLE_TIMEOUT_MS")
                    .map(Duration::from_millis)
                    .unwrap_or(DEFAULT_IDLE_TIMEOUT),
                acquire_timeout: env
                    .parsed("DB_CONNECTION_TIMEOUT_MS")
                    .map(Duration::from_millis)
                    .unwrap_or(DEFAULT_ACQUIRE_TIMEOUT),
            },
        }
    }

    /// Socket address for the HTTP listener
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        AppConfig::default().db
    }
}

// Password stays out of logs.
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("user", &self.user)
            .field("host", &self.host)
            .field("database", &self.database)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("port", &self.port)
            .field("max_connections", &self.max_connections)
            .field("idle_timeout", &self.idle_timeout)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

struct Lookup<'a, F>(&'a F);

impl<F> Lookup<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Non-empty value for `key`, if any
    fn string(&self, key: &str) -> Option<String> {
        match (self.0)(key) {
            Some(value) if !value.is_empty() => Some(value),
            _ => {
                tracing::debug!(key, "environment variable not set, using default");
                None
            }
        }
    }

    /// Parsed value for `key`; unparseable values are reported and ignored
    fn parsed<T>(&self, key: &str) -> Option<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let raw = self.string(key)?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, value = %raw, error = %err, "invalid value, using default");
                None
            }
        }
    }
}
