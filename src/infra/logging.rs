//! Tracing setup for the binaries.
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! whoever owns `main`.
//!
//!   RUST_LOG=restaurant_storage=debug preflight   # fine-grained log control

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Console logging. `RUST_LOG` wins over `debug` when set.
pub fn init_tracing(debug: bool) -> Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
