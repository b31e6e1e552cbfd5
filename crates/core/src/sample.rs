use serde::Serialize;
use std::fmt;

const GIB: f64 = (1u64 << 30) as f64;

/// The single normalized metrics record produced per tick.
///
/// Built once by the canonicalizer and never mutated afterwards; the hub
/// hands out shared read-only references to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalSample {
    /// Overall CPU load, clamped to `[0, 100]`.
    pub cpu_percent: f64,
    /// Requests (or any unit the source likes) per second, never negative.
    pub throughput: f64,
    /// Process table in source order.
    pub processes: Vec<ProcessInfo>,
    /// `None` when the source carried no CPU details at all.
    pub cpu_info: Option<CpuInfo>,
    /// `None` when the source carried no GPU details at all.
    pub gpu_info: Option<GpuInfo>,
    /// System memory in bytes, `None` when no usable total was found.
    pub memory: Option<MemoryInfo>,
    /// Frames per second reported by the source (or synthesized).
    pub fps: f64,
    /// Round-trip latency in milliseconds, if the source reports one.
    pub latency_ms: Option<f64>,
    /// The payload exactly as acquired. Never parsed downstream.
    #[serde(skip)]
    pub raw_source: serde_json::Value,
}

impl CanonicalSample {
    /// GPU utilization, or `None` when unavailable.
    #[must_use]
    pub fn gpu_percent(&self) -> Option<f64> {
        self.gpu_info.as_ref().and_then(|g| g.utilization_percent)
    }

    /// Memory usage ratio in percent. Not clamped: a source reporting
    /// `used > total` yields a value above 100.
    #[must_use]
    pub fn memory_percent(&self) -> Option<f64> {
        self.memory.as_ref().map(MemoryInfo::used_percent)
    }

    #[must_use]
    pub fn cpu_temperature(&self) -> Option<f64> {
        self.cpu_info.as_ref().and_then(|c| c.temperature_c)
    }

    #[must_use]
    pub fn gpu_temperature(&self) -> Option<f64> {
        self.gpu_info.as_ref().and_then(|g| g.temperature_c)
    }
}

/// One row of the process table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInfo {
    pub name: String,
    pub cpu_percent: f64,
    /// Pre-formatted by the producer, e.g. `"512 MB"`.
    pub memory_label: String,
    pub status: ProcessStatus,
}

/// Scheduler state of a process, as far as the source tells us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    Running,
    Sleep,
    Stopped,
    Idle,
    #[default]
    Unknown,
}

impl ProcessStatus {
    /// The statuses a well-formed source may report.
    pub const KNOWN: [ProcessStatus; 4] = [Self::Running, Self::Sleep, Self::Stopped, Self::Idle];

    /// Parse a status label. Unrecognised labels map to [`ProcessStatus::Unknown`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "running" => Self::Running,
            "sleep" | "sleeping" => Self::Sleep,
            "stopped" => Self::Stopped,
            "idle" => Self::Idle,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Sleep => "sleep",
            Self::Stopped => "stopped",
            Self::Idle => "idle",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuInfo {
    pub brand: String,
    pub physical_cores: u32,
    pub logical_cores: u32,
    pub clock_ghz: f64,
    /// Clamped to `[0, 100]`.
    pub load_percent: f64,
    pub temperature_c: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuInfo {
    pub name: String,
    /// Clamped to `[0, 100]` when present.
    pub utilization_percent: Option<f64>,
    pub memory_used_bytes: Option<u64>,
    pub memory_total_bytes: Option<u64>,
    pub memory_shared_bytes: Option<u64>,
    pub temperature_c: Option<f64>,
}

impl GpuInfo {
    #[must_use]
    pub fn memory_used_gib(&self) -> Option<f64> {
        self.memory_used_bytes.map(|b| b as f64 / GIB)
    }

    #[must_use]
    pub fn memory_total_gib(&self) -> Option<f64> {
        self.memory_total_bytes.map(|b| b as f64 / GIB)
    }

    #[must_use]
    pub fn memory_shared_gib(&self) -> Option<f64> {
        self.memory_shared_bytes.map(|b| b as f64 / GIB)
    }
}

/// System memory in bytes.
///
/// `used_bytes <= total_bytes` is not enforced; sources do violate it and
/// consumers are expected to cope with ratios above 100 %.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInfo {
    pub total_bytes: u64,
    pub used_bytes: u64,
}

impl MemoryInfo {
    #[must_use]
    pub fn total_gib(&self) -> f64 {
        self.total_bytes as f64 / GIB
    }

    #[must_use]
    pub fn used_gib(&self) -> f64 {
        self.used_bytes as f64 / GIB
    }

    /// Used memory as a percentage of the total, unclamped.
    #[must_use]
    pub fn used_percent(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        self.used_bytes as f64 / self.total_bytes as f64 * 100.0
    }
}
