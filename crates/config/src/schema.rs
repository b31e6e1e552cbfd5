use rtpm_core::Signal;
use serde::{Deserialize, Serialize};

/// Root configuration structure parsed from `rtpm.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RtpmConfig {
    /// Where samples come from.
    pub source: SourceConfig,
    /// Rolling history capacities.
    pub history: HistoryConfig,
    /// Warning / critical levels for the readouts.
    pub thresholds: ThresholdConfig,
    /// Alert list behaviour.
    pub alerts: AlertConfig,
    /// Console output.
    pub display: DisplayConfig,
}

/// Metrics source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Metrics endpoint URL. Empty selects the built-in simulator.
    pub endpoint: String,
    /// Upper bound for a single fetch, in milliseconds.
    pub timeout_ms: u64,
    /// Tick period in milliseconds.
    pub interval_ms: u64,
    /// Fixed seed for the simulator and fallback randomness.
    pub seed: Option<u64>,
}

impl SourceConfig {
    /// `true` when no endpoint is configured.
    pub fn is_simulated(&self) -> bool {
        self.endpoint.trim().is_empty()
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint:    String::new(),
            timeout_ms:  3_000,
            interval_ms: 1_000,
            seed:        None,
        }
    }
}

/// Number of points kept per chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Throughput chart.
    pub throughput: usize,
    /// CPU / GPU / memory percentage chart.
    pub system: usize,
    /// CPU / GPU temperature chart.
    pub heat: usize,
    /// Frame-rate chart.
    pub fps: usize,
}

impl HistoryConfig {
    /// Capacity of the series backing `signal`.
    pub fn capacity(&self, signal: Signal) -> usize {
        match signal {
            Signal::Throughput                        => self.throughput,
            Signal::Cpu | Signal::Gpu | Signal::Memory => self.system,
            Signal::CpuTemp | Signal::GpuTemp         => self.heat,
            Signal::Fps                               => self.fps,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            throughput: 60,
            system:     120,
            heat:       120,
            fps:        120,
        }
    }
}

/// Warning and critical levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub cpu_temp_warn: f64,
    pub cpu_temp_crit: f64,
    pub gpu_temp_warn: f64,
    pub gpu_temp_crit: f64,
    pub gpu_util_warn: f64,
    pub gpu_util_crit: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            cpu_temp_warn: 75.0,
            cpu_temp_crit: 90.0,
            gpu_temp_warn: 80.0,
            gpu_temp_crit: 95.0,
            gpu_util_warn: 85.0,
            gpu_util_crit: 95.0,
        }
    }
}

/// Alert list settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Raise a warning when CPU load goes above this percentage.
    pub cpu_percent: f64,
    /// Seconds an alert stays in the list.
    pub ttl_secs: u64,
    /// Oldest alerts are dropped beyond this many.
    pub max_entries: usize,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            cpu_percent: 85.0,
            ttl_secs:    8,
            max_entries: 20,
        }
    }
}

/// Console output settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub mode: DisplayMode,
    /// Maximum process rows rendered.
    pub processes: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode:      DisplayMode::Text,
            processes: 10,
        }
    }
}

/// How each tick is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Widget frame for humans.
    #[default]
    Text,
    /// One JSON object per sample.
    Json,
}
