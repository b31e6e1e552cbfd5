use rtpm_config::ThresholdConfig;
use rtpm_core::{DashState, DashWidget, GpuInfo};

use crate::level::Level;

/// GPU utilization, dedicated and shared memory.
#[derive(Debug)]
pub struct GpuWidget {
    thresholds: ThresholdConfig,
}

impl GpuWidget {
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self { thresholds }
    }

    pub fn utilization_level(&self, percent: f64) -> Level {
        Level::classify(percent, self.thresholds.gpu_util_warn, self.thresholds.gpu_util_crit)
    }
}

impl Default for GpuWidget {
    fn default() -> Self {
        Self::new(ThresholdConfig::default())
    }
}

impl DashWidget for GpuWidget {
    fn id(&self) -> &str {
        "gpu"
    }

    fn view(&self, state: &DashState) -> Option<String> {
        let gpu = state.sample.as_deref().and_then(|s| s.gpu_info.as_ref());

        let usage = gpu
            .and_then(|g| g.utilization_percent)
            .map_or_else(
                || "N/A".to_string(),
                |pct| format!("{pct:.0} %{}", self.utilization_level(pct).marker()),
            );
        let name = gpu.map_or("", |g| g.name.as_str());
        let memory = gpu.map_or_else(|| "N/A".to_string(), dedicated_memory);
        let shared = gpu
            .and_then(GpuInfo::memory_shared_gib)
            .map_or_else(|| "N/A".to_string(), |gib| format!("{gib:.2} GB"));

        Some(format!(
            "GPU      {usage}  {name}\n         mem {memory}  shared {shared}"
        ))
    }
}

fn dedicated_memory(gpu: &GpuInfo) -> String {
    match (gpu.memory_used_gib(), gpu.memory_total_gib()) {
        (Some(used), Some(total)) => format!("{used:.2} / {total:.2} GB"),
        (Some(used), None) => format!("{used:.2} GB"),
        _ => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{offline, online};

    #[test]
    fn utilization_and_memory() {
        let view = GpuWidget::default().view(&online()).unwrap();
        assert_eq!(
            view,
            "GPU      30 %  SimGPU 1050\n         mem 1.00 / 4.00 GB  shared 0.50 GB"
        );
    }

    #[test]
    fn utilization_levels() {
        let gpu = GpuWidget::default();
        assert_eq!(gpu.utilization_level(84.0), Level::Normal);
        assert_eq!(gpu.utilization_level(85.0), Level::High);
        assert_eq!(gpu.utilization_level(97.0), Level::Critical);
    }

    #[test]
    fn used_without_total() {
        let gpu = GpuInfo {
            name: "G".into(),
            utilization_percent: None,
            memory_used_bytes: Some(1 << 30),
            memory_total_bytes: None,
            memory_shared_bytes: None,
            temperature_c: None,
        };
        assert_eq!(dedicated_memory(&gpu), "1.00 GB");
    }

    #[test]
    fn offline_reads_not_available() {
        let view = GpuWidget::default().view(&offline()).unwrap();
        assert!(view.starts_with("GPU      N/A"));
        assert!(view.ends_with("mem N/A  shared N/A"));
    }
}
