use chrono::{DateTime, Duration, Local};
use rtpm_config::AlertConfig;
use rtpm_core::{DashState, DashWidget};
use std::collections::VecDeque;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub message: String,
    pub level:   AlertLevel,
    pub raised:  DateTime<Local>,
}

/// Short-lived warnings, newest first.
///
/// A `High CPU` alert is raised on every sample whose load exceeds the
/// configured percentage. Alerts expire after `ttl_secs`; beyond
/// `max_entries` the oldest are dropped.
#[derive(Debug)]
pub struct AlertsWidget {
    config: AlertConfig,
    alerts: VecDeque<Alert>,
}

impl AlertsWidget {
    pub fn new(config: AlertConfig) -> Self {
        Self {
            config,
            alerts: VecDeque::new(),
        }
    }

    pub fn alerts(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }

    pub fn push(&mut self, message: impl Into<String>, level: AlertLevel, now: DateTime<Local>) {
        let message = message.into();
        debug!(%message, "alert raised");
        self.alerts.push_front(Alert { message, level, raised: now });
        self.alerts.truncate(self.config.max_entries);
    }

    /// Drop expired alerts, then raise new ones for `state`.
    pub fn fold_at(&mut self, state: &DashState, now: DateTime<Local>) {
        let ttl = Duration::seconds(self.config.ttl_secs as i64);
        self.alerts.retain(|a| now - a.raised < ttl);

        if let Some(sample) = state.sample.as_deref() {
            if sample.cpu_percent > self.config.cpu_percent {
                self.push(
                    format!("High CPU: {:.1}%", sample.cpu_percent),
                    AlertLevel::Warning,
                    now,
                );
            }
        }
    }
}

impl Default for AlertsWidget {
    fn default() -> Self {
        Self::new(AlertConfig::default())
    }
}

impl DashWidget for AlertsWidget {
    fn id(&self) -> &str {
        "alerts"
    }

    fn on_state_change(&mut self, state: &DashState) {
        self.fold_at(state, Local::now());
    }

    fn view(&self, _state: &DashState) -> Option<String> {
        if self.alerts.is_empty() {
            return None;
        }
        let lines: Vec<String> = self
            .alerts
            .iter()
            .map(|a| {
                let tag = match a.level {
                    AlertLevel::Info => "info",
                    AlertLevel::Warning => "warn",
                };
                format!("[{tag}] {} {}", a.raised.format("%H:%M:%S"), a.message)
            })
            .collect();
        Some(format!("Alerts\n{}", lines.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{offline, with_cpu};

    #[test]
    fn high_cpu_raises_a_warning() {
        let mut widget = AlertsWidget::default();
        let now = Local::now();
        widget.fold_at(&with_cpu(85.0), now);
        assert_eq!(widget.alerts().count(), 0);

        widget.fold_at(&with_cpu(91.26), now);
        let alert = widget.alerts().next().unwrap();
        assert_eq!(alert.message, "High CPU: 91.3%");
        assert_eq!(alert.level, AlertLevel::Warning);
    }

    #[test]
    fn alerts_expire() {
        let mut widget = AlertsWidget::default();
        let start = Local::now();
        widget.fold_at(&with_cpu(95.0), start);
        widget.fold_at(&offline(), start + Duration::seconds(7));
        assert_eq!(widget.alerts().count(), 1);
        widget.fold_at(&offline(), start + Duration::seconds(8));
        assert_eq!(widget.alerts().count(), 0);
        assert!(widget.view(&offline()).is_none());
    }

    #[test]
    fn newest_first_and_bounded() {
        let mut widget = AlertsWidget::new(AlertConfig { max_entries: 2, ..AlertConfig::default() });
        let now = Local::now();
        widget.push("one", AlertLevel::Info, now);
        widget.push("two", AlertLevel::Info, now);
        widget.push("three", AlertLevel::Info, now);
        let messages: Vec<&str> = widget.alerts().map(|a| a.message.as_str()).collect();
        assert_eq!(messages, vec!["three", "two"]);
    }

    #[test]
    fn view_lists_alerts() {
        let mut widget = AlertsWidget::default();
        widget.fold_at(&with_cpu(99.0), Local::now());
        let view = widget.view(&offline()).unwrap();
        assert!(view.starts_with("Alerts\n[warn] "));
        assert!(view.ends_with("High CPU: 99.0%"));
    }
}
