//! Runtime configuration read from environment variables.
//!
//! | Variable                 | Default          | Meaning                          |
//! |--------------------------|------------------|----------------------------------|
//! | `TASKBOARD_BIND_ADDR`    | `127.0.0.1:8000` | HTTP listen address              |
//! | `DATABASE_URL`           | unset            | `PostgreSQL` URL; memory if unset |
//! | `TASKBOARD_DB_POOL_SIZE` | `4`              | Maximum pooled connections       |

use std::net::SocketAddr;
use thiserror::Error;

/// Environment variable holding the HTTP listen address.
pub const BIND_ADDR_VAR: &str = "TASKBOARD_BIND_ADDR";
/// Environment variable holding the `PostgreSQL` connection URL.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Environment variable holding the connection pool size.
pub const POOL_SIZE_VAR: &str = "TASKBOARD_DB_POOL_SIZE";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_POOL_SIZE: u32 = 4;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The listen address is not a valid socket address.
    #[error("TASKBOARD_BIND_ADDR must be a socket address such as 127.0.0.1:8000, got '{0}'")]
    InvalidBindAddr(String),

    /// The pool size is not a positive integer.
    #[error("TASKBOARD_DB_POOL_SIZE must be a positive integer, got '{0}'")]
    InvalidPoolSize(String),
}

/// Service configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,
    /// `PostgreSQL` URL; tasks are kept in memory when `None`.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub db_pool_size: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The URL may embed credentials.
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "<redacted>"),
            )
            .field("db_pool_size", &self.db_pool_size)
            .finish()
    }
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bind_addr = match read(BIND_ADDR_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<SocketAddr>()
                .map_err(|_| ConfigError::InvalidBindAddr(raw.clone()))?,
            None => DEFAULT_BIND_ADDR
                .parse::<SocketAddr>()
                .map_err(|_| ConfigError::InvalidBindAddr(DEFAULT_BIND_ADDR.to_owned()))?,
        };

        let db_pool_size = match read(POOL_SIZE_VAR) {
            Some(raw) => parse_pool_size(&raw)?,
            None => DEFAULT_POOL_SIZE,
        };

        Ok(Self {
            bind_addr,
            database_url: read(DATABASE_URL_VAR),
            db_pool_size,
        })
    }
}

fn parse_pool_size(raw: &str) -> Result<u32, ConfigError> {
    match raw.trim().parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ConfigError::InvalidPoolSize(raw.to_owned())),
    }
}
