//! Sample acquisition: one raw payload per tick, from a live endpoint or
//! from the built-in simulator.

pub mod http;
pub mod simulator;

pub use http::HttpSource;
pub use simulator::Simulator;

use futures::future::BoxFuture;
use rtpm_config::SourceConfig;
use rtpm_core::Result;
use serde_json::Value;
use std::time::Duration;

/// Something that produces one raw payload per call.
///
/// `None` means "unavailable this tick". Implementations never fail
/// outward and never retry; the next call is an independent attempt.
pub trait Acquire: Send {
    fn acquire(&mut self) -> BoxFuture<'_, Option<Value>>;

    fn kind(&self) -> SourceKind;
}

/// Which kind of source is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Live,
    Simulated,
}

/// Pick the source from the endpoint string: empty selects the simulator.
pub fn from_endpoint(endpoint: &str, timeout: Duration) -> Result<Box<dyn Acquire>> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Ok(Box::new(Simulator::new()));
    }
    Ok(Box::new(HttpSource::new(endpoint, timeout)?))
}

/// Build the source described by the `[source]` config section.
pub fn from_config(config: &SourceConfig) -> Result<Box<dyn Acquire>> {
    match config.seed {
        Some(seed) if config.is_simulated() => Ok(Box::new(Simulator::seeded(seed))),
        _ => from_endpoint(&config.endpoint, Duration::from_millis(config.timeout_ms)),
    }
}
