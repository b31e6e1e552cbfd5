use chrono::{DateTime, Local};
use std::fmt;
use std::sync::Arc;

use crate::history::HistorySnapshot;
use crate::sample::CanonicalSample;

/// Central dashboard state. All widgets read from this snapshot.
#[derive(Debug, Clone, Default)]
pub struct DashState {
    /// Most recent sample; `None` while the source is unreachable.
    pub sample: Option<Arc<CanonicalSample>>,
    /// Connectivity as seen from the last tick.
    pub status: ConnectionStatus,
    /// Wall-clock time of the last tick outcome.
    pub last_update: Option<DateTime<Local>>,
    /// Copy of the rolling histories taken after the last tick.
    pub history: HistorySnapshot,
}

impl DashState {
    /// Fold one tick outcome into the state.
    pub fn apply(&mut self, sample: Option<Arc<CanonicalSample>>, history: HistorySnapshot) {
        self.status = if sample.is_some() {
            ConnectionStatus::Online
        } else {
            ConnectionStatus::Offline
        };
        self.sample = sample;
        self.history = history;
        self.last_update = Some(Local::now());
    }
}

/// Lifecycle of the publishing hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HubState {
    #[default]
    Stopped,
    Running,
}

/// What the status chip shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// Started, no tick outcome yet.
    #[default]
    Connecting,
    Online,
    Offline,
    Stopped,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connecting => "Connecting...",
            Self::Online     => "Online",
            Self::Offline    => "Offline",
            Self::Stopped    => "Stopped",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sample_means_offline() {
        let mut state = DashState::default();
        assert_eq!(state.status, ConnectionStatus::Connecting);
        state.apply(None, HistorySnapshot::default());
        assert_eq!(state.status, ConnectionStatus::Offline);
        assert!(state.last_update.is_some());
    }
}
