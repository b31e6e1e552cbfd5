use rtpm_core::{DashState, DashWidget};

/// Connection chip with the time of the last tick outcome.
#[derive(Debug, Default)]
pub struct StatusWidget;

impl StatusWidget {
    pub fn new() -> Self {
        Self
    }
}

impl DashWidget for StatusWidget {
    fn id(&self) -> &str {
        "status"
    }

    fn view(&self, state: &DashState) -> Option<String> {
        let updated = state
            .last_update
            .map_or_else(|| "--:--:--".to_string(), |t| t.format("%H:%M:%S").to_string());
        Some(format!("Status: {}  (last update {updated})", state.status))
    }
}
