//! Tracing bootstrap for gateway binaries.

use anyhow::{Result, anyhow};
use once_cell::sync::OnceCell;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: OnceCell<()> = OnceCell::new();

/// Configuration for tracing initialization.
#[derive(Clone, Debug)]
pub struct ObsConfig {
    pub service_name: &'static str,
    /// Filter directives; falls back to `RUST_LOG`, then the built-in default.
    pub env_filter: Option<String>,
}

impl Default for ObsConfig {
    fn default() -> Self {
        Self {
            service_name: "gateway-server",
            env_filter: None,
        }
    }
}

/// Install the fmt subscriber with an env-driven filter. Calling twice is a
/// no-op so tests and embedding binaries can both initialize freely.
pub fn init_tracing(config: ObsConfig) -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let filter = config
        .env_filter
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info,tower_http=warn".to_string());
    let env_filter = EnvFilter::try_new(filter)?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()?;

    INIT.set(())
        .map_err(|_| anyhow!("tracing already initialized"))?;
    debug!(service = config.service_name, "tracing initialized");
    Ok(())
}
