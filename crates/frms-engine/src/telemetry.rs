//! Tracing subscriber setup for embedding applications.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// Honors `RUST_LOG`; defaults the engine's own crates to `debug`.
pub fn init() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("frms_engine=debug".parse()?)
                .add_directive("frms_core=debug".parse()?),
        )
        .init();
    Ok(())
}
