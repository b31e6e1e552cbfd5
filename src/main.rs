//! rtpm: a real-time performance monitor for the terminal.
//!
//! Run with:  `RUST_LOG=info rtpm`
//! Point it at a metrics endpoint with `RTPM_METRICS_URL=http://host/metrics`.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout belongs to the dashboard.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("rtpm v{} starting", env!("CARGO_PKG_VERSION"));

    rtpm_app::run().await.map_err(Into::into)
}
