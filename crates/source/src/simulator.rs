use futures::future::{self, BoxFuture, FutureExt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rtpm_core::ProcessStatus;
use serde_json::{json, Value};

use crate::{Acquire, SourceKind};

const MIB: u64 = 1024 * 1024;
const MEM_TOTAL_MB: f64 = 16_000.0;
const GPU_POOL_MB: f64 = 4096.0;
const GPU_SHARED_MB: u64 = 512;
const FIRST_PHASE: u64 = 60;

/// Synthetic metrics feed.
///
/// Every call advances a phase counter `t` by one and builds a payload
/// from bounded sinusoids of `t` plus uniform noise. Given the same seed
/// and starting phase the sequence of payloads is identical.
#[derive(Debug, Clone)]
pub struct Simulator<R = StdRng> {
    phase: u64,
    rng:   R,
}

impl Simulator<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Simulator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Simulator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { phase: FIRST_PHASE, rng }
    }

    /// Start the phase counter somewhere other than 60.
    pub fn starting_at(mut self, phase: u64) -> Self {
        self.phase = phase;
        self
    }

    /// Phase the next payload will be generated for.
    pub fn phase(&self) -> u64 {
        self.phase
    }

    /// Build the payload for the current phase, then advance it.
    pub fn next_payload(&mut self) -> Value {
        let t = self.phase as f64;
        let rng = &mut self.rng;

        let cpu = (40.0 + (t / 5.0).sin() * 25.0 + rng.random_range(0.0..10.0)).clamp(2.0, 98.0);
        let throughput = (50.0 + (t / 3.0).sin() * 25.0 + rng.random_range(0.0..10.0))
            .round()
            .max(0.0);
        let mem_used_mb = ((30.0 + (t / 7.0).sin().abs() * 40.0 + rng.random_range(0.0..10.0)) / 100.0
            * MEM_TOTAL_MB)
            .round();
        let gpu_util = (10.0 + (t / 4.0).sin().abs() * 60.0 + rng.random_range(0.0..10.0)).round();

        let count = rng.random_range(5..=10usize);
        let processes: Vec<Value> = (0..count)
            .map(|i| {
                let letter = char::from(b'A' + i as u8);
                let cpu = (rng.random_range(0.0..20.0f64) * 100.0).round() / 100.0;
                let mem_mb = (20.0 + rng.random_range(0.0..800.0f64)).round();
                let status = ProcessStatus::KNOWN[rng.random_range(0..ProcessStatus::KNOWN.len())];
                json!({
                    "name": format!("proc{letter}"),
                    "cpu": cpu,
                    "mem": format!("{mem_mb} MB"),
                    "status": status.as_str(),
                })
            })
            .collect();

        let cpu_temp = (40.0 + (t / 6.0).sin().abs() * 30.0).round();
        let gpu_temp = 55.0 + (rng.random::<f64>() * 20.0).round();

        self.phase += 1;

        json!({
            "cpu": cpu,
            "throughput": throughput,
            "processes": processes,
            "cpuInfo": {
                "brand": "SimCPU 4x",
                "physicalCores": 4,
                "logicalCores": 8,
                "speed": "3.2",
                "loadPercent": cpu,
                "temp": cpu_temp,
            },
            "gpuInfo": {
                "name": "SimGPU 1050",
                "utilization": gpu_util,
                "memoryUsedMB": (gpu_util / 100.0 * GPU_POOL_MB).round(),
                "memoryTotalMB": GPU_POOL_MB,
                "memorySharedMB": GPU_SHARED_MB,
                "temperature": gpu_temp,
            },
            "system": {
                "mem": {
                    "total": MEM_TOTAL_MB as u64 * MIB,
                    "used": mem_used_mb as u64 * MIB,
                }
            }
        })
    }
}

impl<R: Rng + Send> Acquire for Simulator<R> {
    fn acquire(&mut self) -> BoxFuture<'_, Option<Value>> {
        future::ready(Some(self.next_payload())).boxed()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Simulated
    }
}
