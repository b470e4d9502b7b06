//! Centralized configuration (environment variables + defaults).

use crate::error::{Result, StorageError};

/// Pool size used when `DATABASE_MAX_CONNECTIONS` is unset.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Database URL must be provided (no default) for safety.
pub fn database_url() -> Result<String> {
    std::env::var("DATABASE_URL").map_err(|_| StorageError::config("DATABASE_URL must be set"))
}

/// Maximum number of pooled connections.
pub fn max_connections() -> Result<u32> {
    match std::env::var("DATABASE_MAX_CONNECTIONS") {
        Ok(v) => parse_max_connections(&v),
        Err(_) => Ok(DEFAULT_MAX_CONNECTIONS),
    }
}

fn parse_max_connections(v: &str) -> Result<u32> {
    v.trim()
        .parse::<u32>()
        .map(|n| n.max(1))
        .map_err(|_| StorageError::config(format!("DATABASE_MAX_CONNECTIONS must be a valid u32, got '{}'", v)))
}
