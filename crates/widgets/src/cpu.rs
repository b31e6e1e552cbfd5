use rtpm_core::{DashState, DashWidget, Signal};

use crate::sparkline::sparkline;

/// Overall CPU load, processor details and the load history.
#[derive(Debug)]
pub struct CpuWidget {
    width: usize,
}

impl CpuWidget {
    pub fn new(width: usize) -> Self {
        Self { width }
    }
}

impl Default for CpuWidget {
    fn default() -> Self {
        Self::new(40)
    }
}

impl DashWidget for CpuWidget {
    fn id(&self) -> &str {
        "cpu"
    }

    fn view(&self, state: &DashState) -> Option<String> {
        let Some(sample) = state.sample.as_deref() else {
            return Some("CPU      N/A".to_string());
        };

        let mut line = format!("CPU      {:>3.0}%", sample.cpu_percent);
        if let Some(info) = &sample.cpu_info {
            line.push_str(&format!(
                "  {} {}C/{}T @ {:.2} GHz",
                info.brand, info.physical_cores, info.logical_cores, info.clock_ghz
            ));
        }

        let history = state.history.get(Signal::Cpu);
        if !history.is_empty() {
            line.push_str(&format!("\n         {}", sparkline(history, 0.0, 100.0, self.width)));
        }
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{offline, online};

    #[test]
    fn shows_load_and_details() {
        let view = CpuWidget::default().view(&online()).unwrap();
        assert!(view.starts_with("CPU       42%  SimCPU 4x 4C/8T @ 3.20 GHz"), "{view}");
    }

    #[test]
    fn offline_is_not_available() {
        assert_eq!(CpuWidget::default().view(&offline()).unwrap(), "CPU      N/A");
    }
}
