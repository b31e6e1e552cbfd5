use rtpm_core::{DashState, DashWidget, Signal};

use crate::sparkline::sparkline;

/// Frame rate and latency.
#[derive(Debug)]
pub struct FpsWidget {
    width: usize,
}

impl FpsWidget {
    pub fn new(width: usize) -> Self {
        Self { width }
    }
}

impl Default for FpsWidget {
    fn default() -> Self {
        Self::new(40)
    }
}

impl DashWidget for FpsWidget {
    fn id(&self) -> &str {
        "fps"
    }

    fn view(&self, state: &DashState) -> Option<String> {
        let sample = state.sample.as_deref()?;
        let latency = sample
            .latency_ms
            .map_or_else(|| "N/A".to_string(), |ms| format!("{ms:.0} ms"));

        let mut out = format!("FPS      {:.0} FPS  latency {latency}", sample.fps);
        let history = state.history.get(Signal::Fps);
        if !history.is_empty() {
            let max = history.iter().copied().fold(60.0_f64, f64::max);
            out.push_str(&format!("\n         {}", sparkline(history, 0.0, max, self.width)));
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{offline, online};

    #[test]
    fn frame_rate_and_latency() {
        let view = FpsWidget::default().view(&online()).unwrap();
        assert!(view.starts_with("FPS      60 FPS  latency 12 ms"), "{view}");
    }

    #[test]
    fn hidden_without_a_sample() {
        assert!(FpsWidget::default().view(&offline()).is_none());
    }
}
