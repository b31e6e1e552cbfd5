use rtpm_config::ThresholdConfig;
use rtpm_core::{DashState, DashWidget, Signal};

use crate::level::Level;
use crate::sparkline::{heat_bounds, sparkline};

/// CPU and GPU temperatures with severity markers and the heat history.
#[derive(Debug)]
pub struct TempWidget {
    thresholds: ThresholdConfig,
    width:      usize,
}

impl TempWidget {
    pub fn new(thresholds: ThresholdConfig, width: usize) -> Self {
        Self { thresholds, width }
    }

    pub fn cpu_level(&self, celsius: f64) -> Level {
        Level::classify(celsius, self.thresholds.cpu_temp_warn, self.thresholds.cpu_temp_crit)
    }

    pub fn gpu_level(&self, celsius: f64) -> Level {
        Level::classify(celsius, self.thresholds.gpu_temp_warn, self.thresholds.gpu_temp_crit)
    }
}

impl Default for TempWidget {
    fn default() -> Self {
        Self::new(ThresholdConfig::default(), 40)
    }
}

fn reading(celsius: Option<f64>, level: impl Fn(f64) -> Level) -> String {
    celsius.map_or_else(
        || "N/A".to_string(),
        |c| format!("{c:.0} °C{}", level(c).marker()),
    )
}

impl DashWidget for TempWidget {
    fn id(&self) -> &str {
        "temperature"
    }

    fn view(&self, state: &DashState) -> Option<String> {
        let sample = state.sample.as_deref();
        let cpu = reading(sample.and_then(|s| s.cpu_temperature()), |c| self.cpu_level(c));
        let gpu = reading(sample.and_then(|s| s.gpu_temperature()), |c| self.gpu_level(c));

        let mut out = format!("Temp     CPU {cpu}  GPU {gpu}");

        let cpu_hist = state.history.get(Signal::CpuTemp);
        let gpu_hist = state.history.get(Signal::GpuTemp);
        if !cpu_hist.is_empty() {
            let (lo, hi) = heat_bounds([cpu_hist, gpu_hist]);
            out.push_str(&format!(
                "\n         cpu {}\n         gpu {}",
                sparkline(cpu_hist, lo, hi, self.width),
                sparkline(gpu_hist, lo, hi, self.width)
            ));
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{offline, online};

    #[test]
    fn readings_with_levels() {
        let widget = TempWidget::default();
        let view = widget.view(&online()).unwrap();
        assert!(view.starts_with("Temp     CPU 50 °C  GPU 70 °C"), "{view}");
        assert_eq!(widget.cpu_level(80.0), Level::High);
        assert_eq!(widget.gpu_level(95.0), Level::Critical);
    }

    #[test]
    fn hot_reading_is_marked() {
        let widget = TempWidget::default();
        assert_eq!(reading(Some(91.0), |c| widget.cpu_level(c)), "91 °C [critical]");
    }

    #[test]
    fn missing_sensors() {
        let view = TempWidget::default().view(&offline()).unwrap();
        assert_eq!(view, "Temp     CPU N/A  GPU N/A");
    }
}
