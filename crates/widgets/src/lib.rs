//! Text-mode dashboard widgets.

pub mod alerts;
pub mod cpu;
pub mod fps;
pub mod gpu;
pub mod level;
pub mod memory;
pub mod processes;
pub mod sparkline;
pub mod status;
pub mod temperature;
pub mod throughput;

pub use alerts::{Alert, AlertLevel, AlertsWidget};
pub use cpu::CpuWidget;
pub use fps::FpsWidget;
pub use gpu::GpuWidget;
pub use level::Level;
pub use memory::MemoryWidget;
pub use processes::ProcessTable;
pub use status::StatusWidget;
pub use temperature::TempWidget;
pub use throughput::ThroughputWidget;

use rtpm_config::RtpmConfig;
use rtpm_core::{DashState, DashWidget};

/// Width of the history sparklines, in characters.
pub const CHART_WIDTH: usize = 48;

/// The full widget set, top to bottom.
pub fn dashboard(config: &RtpmConfig) -> Vec<Box<dyn DashWidget>> {
    vec![
        Box::new(StatusWidget::new()),
        Box::new(CpuWidget::new(CHART_WIDTH)),
        Box::new(MemoryWidget::new()),
        Box::new(GpuWidget::new(config.thresholds)),
        Box::new(TempWidget::new(config.thresholds, CHART_WIDTH)),
        Box::new(ThroughputWidget::new(CHART_WIDTH)),
        Box::new(FpsWidget::new(CHART_WIDTH)),
        Box::new(ProcessTable::new(config.display.processes)),
        Box::new(AlertsWidget::new(config.alerts)),
    ]
}

/// Let stateful widgets see `state`, then join every visible view.
pub fn render(widgets: &mut [Box<dyn DashWidget>], state: &DashState) -> String {
    for widget in widgets.iter_mut() {
        widget.on_state_change(state);
    }
    widgets
        .iter()
        .filter_map(|w| w.view(state))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
pub(crate) mod fixtures {
    use rtpm_core::{
        CanonicalSample, CpuInfo, DashState, GpuInfo, MemoryInfo, ProcessInfo, ProcessStatus,
        RollingBufferSet, Signal,
    };
    use std::sync::Arc;

    const MIB: u64 = 1024 * 1024;
    const GIB: u64 = 1024 * MIB;

    fn process(name: &str, cpu: f64, mem: &str, status: ProcessStatus) -> ProcessInfo {
        ProcessInfo {
            name: name.into(),
            cpu_percent: cpu,
            memory_label: mem.into(),
            status,
        }
    }

    pub fn sample(cpu: f64) -> CanonicalSample {
        CanonicalSample {
            cpu_percent: cpu,
            throughput: 40.0,
            processes: vec![
                process("procA", 1.5, "512 MB", ProcessStatus::Running),
                process("procB", 12.25, "20 MB", ProcessStatus::Sleep),
                process("procC", 0.0, "-", ProcessStatus::Unknown),
            ],
            cpu_info: Some(CpuInfo {
                brand: "SimCPU 4x".into(),
                physical_cores: 4,
                logical_cores: 8,
                clock_ghz: 3.2,
                load_percent: cpu,
                temperature_c: Some(50.0),
            }),
            gpu_info: Some(GpuInfo {
                name: "SimGPU 1050".into(),
                utilization_percent: Some(30.0),
                memory_used_bytes: Some(GIB),
                memory_total_bytes: Some(4 * GIB),
                memory_shared_bytes: Some(512 * MIB),
                temperature_c: Some(70.0),
            }),
            memory: Some(MemoryInfo {
                total_bytes: 16 * GIB,
                used_bytes: 8 * GIB,
            }),
            fps: 60.0,
            latency_ms: Some(12.0),
            raw_source: serde_json::Value::Null,
        }
    }

    pub fn with_cpu(cpu: f64) -> DashState {
        let mut history = RollingBufferSet::default();
        for (throughput, temp) in [(30.0, 48.0), (40.0, 50.0)] {
            history.push(Signal::Throughput, throughput);
            history.push(Signal::Cpu, cpu);
            history.push(Signal::CpuTemp, temp);
            history.push(Signal::GpuTemp, temp + 20.0);
            history.push(Signal::Fps, 60.0);
        }
        let mut state = DashState::default();
        state.apply(Some(Arc::new(sample(cpu))), history.snapshot_all());
        state
    }

    pub fn online() -> DashState {
        with_cpu(42.0)
    }

    pub fn offline() -> DashState {
        let mut state = DashState::default();
        state.apply(None, Default::default());
        state
    }
}
