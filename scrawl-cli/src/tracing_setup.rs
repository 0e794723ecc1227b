//! Tracing initialization
//!
//! RUST_LOG controls the filter when set; --debug lowers the default level
//! otherwise.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

pub fn init(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
