use rtpm_core::{DashState, DashWidget, Signal};

use crate::sparkline::sparkline;

/// Throughput readout, its share of the chart scale and the recent history.
#[derive(Debug)]
pub struct ThroughputWidget {
    width: usize,
}

impl ThroughputWidget {
    pub fn new(width: usize) -> Self {
        Self { width }
    }
}

impl Default for ThroughputWidget {
    fn default() -> Self {
        Self::new(40)
    }
}

/// Chart ceiling: 10 % above the largest observed value, never below 120.
pub fn chart_scale(history: &[f64]) -> f64 {
    let observed = history.iter().copied().fold(120.0_f64, f64::max);
    (observed * 1.1).max(120.0)
}

/// `value` as a whole percentage of [`chart_scale`], at most 100.
pub fn badge_percent(value: f64, history: &[f64]) -> u8 {
    ((value / chart_scale(history)) * 100.0).round().clamp(0.0, 100.0) as u8
}

impl DashWidget for ThroughputWidget {
    fn id(&self) -> &str {
        "throughput"
    }

    fn view(&self, state: &DashState) -> Option<String> {
        let history = state.history.get(Signal::Throughput);
        let Some(sample) = state.sample.as_deref() else {
            return Some("TP       --".to_string());
        };

        let mut out = format!(
            "TP       {:.0}  ({}%)",
            sample.throughput,
            badge_percent(sample.throughput, history)
        );
        if !history.is_empty() {
            let scale = chart_scale(history);
            out.push_str(&format!("\n         {}", sparkline(history, 0.0, scale, self.width)));
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{offline, online};

    #[test]
    fn scale_has_a_floor_and_headroom() {
        assert_eq!(chart_scale(&[]), 132.0);
        assert_eq!(chart_scale(&[10.0, 50.0]), 132.0);
        assert_eq!(chart_scale(&[200.0]), 220.0);
    }

    #[test]
    fn badge_is_capped() {
        assert_eq!(badge_percent(66.0, &[66.0]), 50);
        assert_eq!(badge_percent(1000.0, &[]), 100);
        assert_eq!(badge_percent(0.0, &[]), 0);
    }

    #[test]
    fn renders_value_and_percentage() {
        let view = ThroughputWidget::default().view(&online()).unwrap();
        assert!(view.starts_with("TP       40  (30%)"), "{view}");
        assert_eq!(ThroughputWidget::default().view(&offline()).unwrap(), "TP       --");
    }
}
