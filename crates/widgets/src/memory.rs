use rtpm_core::{DashState, DashWidget};

/// System RAM as `used / total GB` plus the usage ratio.
///
/// The ratio is shown as computed; a source reporting more used than total
/// memory shows a value above 100 %.
#[derive(Debug, Default)]
pub struct MemoryWidget;

impl MemoryWidget {
    pub fn new() -> Self {
        Self
    }
}

impl DashWidget for MemoryWidget {
    fn id(&self) -> &str {
        "memory"
    }

    fn view(&self, state: &DashState) -> Option<String> {
        let label = match state.sample.as_deref().and_then(|s| s.memory) {
            Some(mem) => format!(
                "Memory   {:.2} / {:.2} GB  {:.0} %",
                mem.used_gib(),
                mem.total_gib(),
                mem.used_percent().round()
            ),
            None => "Memory   N/A".to_string(),
        };
        Some(label)
    }
}
