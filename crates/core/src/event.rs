use crate::sample::CanonicalSample;
use std::sync::Arc;

/// All messages (events) that can flow through the application event bus.
///
/// Sources:
/// - Hub subscription      → `Tick`
/// - Config watcher task   → `ConfigReloaded`
/// - Ctrl-C handler        → `Shutdown`
#[derive(Debug, Clone)]
pub enum Message {
    /// Outcome of one hub tick; `None` = no sample (source offline).
    Tick(Option<Arc<CanonicalSample>>),
    /// Config file changed on disk; triggers a live reload.
    ConfigReloaded,
    /// Graceful shutdown requested.
    Shutdown,
}
