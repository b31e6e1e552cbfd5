//! Raw payload → [`CanonicalSample`].
//!
//! Each canonical field has its own fallback chain (see [`crate::fallback`]);
//! the functions below are public so every chain can be exercised on its own.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rtpm_core::{CanonicalSample, CpuInfo, GpuInfo, MemoryInfo, ProcessInfo, ProcessStatus};
use serde_json::Value;
use tracing::trace;

use crate::fallback::{
    any_present, first_array, first_number, first_object, first_text, lookup, number, number_at,
    text, FieldPath,
};
use crate::units::{self, clamp_percent, non_negative, MIB};

const CPU_PERCENT: &[FieldPath] = &[&["cpuPercent"], &["cpu"], &["currentLoad", "currentload"]];
const THROUGHPUT: &[FieldPath] = &[&["throughput"], &["requestsPerSec"]];
const PROCESSES: &[FieldPath] = &[&["processes"], &["processList"]];
const FPS: &[FieldPath] = &[&["fps"], &["framerate"]];
const LATENCY: &[FieldPath] = &[&["latency"], &["ping"]];

const CPU_OBJECT: &[FieldPath] = &[&["cpu"], &["cpuInfo"]];
const GPU_OBJECT: &[FieldPath] = &[&["gpu"], &["graphics"], &["gpuInfo"]];
const MEMORY_OBJECT: &[FieldPath] = &[
    &["system", "mem"],
    &["mem"],
    &["system", "memory"],
    &["memory"],
];
const MEMORY_USED: &[FieldPath] = &[&["used"], &["active"]];

const CPU_BRAND: &[FieldPath] = &[&["brand"], &["model"], &["manufacturer"]];
const CPU_PHYSICAL: &[FieldPath] = &[&["physicalCores"], &["physical"]];
const CPU_LOGICAL: &[FieldPath] = &[&["logicalCores"], &["cores"]];
const CPU_SPEED: &[FieldPath] = &[&["speed"], &["clockGHz"]];
const CPU_LOAD: &[FieldPath] = &[&["loadPercent"], &["load"]];

const GPU_NAME: &[FieldPath] = &[&["name"], &["model"]];
const GPU_UTILIZATION: &[FieldPath] = &[
    &["utilization"],
    &["utilizationGpu"],
    &["utilizationPercent"],
    &["utilization", "gpu"],
];
const GPU_USED_MB: &[FieldPath] = &[&["memoryUsedMB"]];
const GPU_TOTAL_MB: &[FieldPath] = &[&["memoryTotalMB"]];
const GPU_USED: &[FieldPath] = &[&["memoryUsed"]];
const GPU_TOTAL: &[FieldPath] = &[&["memoryTotal"]];
const GPU_SHARED_MB: &[FieldPath] = &[&["memorySharedMB"], &["sharedMemoryMB"], &["sharedMemory"]];
const GPU_TEMP: &[FieldPath] = &[&["temperature"]];

const PROCESS_NAME: &[FieldPath] = &[&["name"], &["command"]];
const PROCESS_CPU: &[FieldPath] = &[&["cpu"], &["cpuPercent"], &["pcpu"]];
const PROCESS_MEMORY: &[FieldPath] = &[&["mem"], &["memory"], &["memRss"]];
const PROCESS_STATUS: &[FieldPath] = &[&["status"], &["state"]];

/// Maps raw payloads onto [`CanonicalSample`].
///
/// Holds the random source used when a payload omits throughput or frame
/// rate; seed it for reproducible output.
#[derive(Debug, Clone)]
pub struct Canonicalizer<R = StdRng> {
    rng: R,
}

impl Canonicalizer<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Canonicalizer<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Canonicalizer<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// `None` in, `None` out; a JSON `null` payload also counts as no sample.
    pub fn canonicalize(&mut self, raw: Option<Value>) -> Option<CanonicalSample> {
        let raw = raw.filter(|v| !v.is_null())?;

        let cpu_percent = cpu_percent(&raw);
        let throughput = first_number(&raw, THROUGHPUT)
            .map(non_negative)
            .unwrap_or_else(|| {
                trace!("payload has no throughput; synthesizing one");
                (self.rng.random::<f64>() * 100.0).round()
            });
        let fps = fps(&raw).unwrap_or_else(|| (60.0 + (self.rng.random::<f64>() - 0.5) * 6.0).round());

        Some(CanonicalSample {
            cpu_percent,
            throughput,
            processes: processes(&raw),
            cpu_info: cpu_info(&raw, cpu_percent),
            gpu_info: gpu_info(&raw),
            memory: memory(&raw),
            fps,
            latency_ms: latency(&raw),
            raw_source: raw,
        })
    }
}

/// `raw.system.<key>`, else `<key>` at the payload root.
pub fn system_number(raw: &Value, key: &str) -> Option<f64> {
    number_at(raw, &["system", key]).or_else(|| number_at(raw, &[key]))
}

/// The object CPU details are read from; falls back to the payload root.
pub fn cpu_object(raw: &Value) -> &Value {
    first_object(raw, CPU_OBJECT).unwrap_or(raw)
}

/// The object GPU details are read from; falls back to the payload root.
pub fn gpu_object(raw: &Value) -> &Value {
    first_object(raw, GPU_OBJECT).unwrap_or(raw)
}

pub fn cpu_percent(raw: &Value) -> f64 {
    first_number(raw, CPU_PERCENT).map_or(0.0, clamp_percent)
}

pub fn fps(raw: &Value) -> Option<f64> {
    first_number(raw, FPS)
        .or_else(|| system_number(raw, "fps"))
        .map(non_negative)
}

pub fn latency(raw: &Value) -> Option<f64> {
    first_number(raw, LATENCY).or_else(|| system_number(raw, "latency"))
}

pub fn processes(raw: &Value) -> Vec<ProcessInfo> {
    first_array(raw, PROCESSES)
        .map(|list| list.iter().enumerate().map(|(i, entry)| process(entry, i)).collect())
        .unwrap_or_default()
}

fn process(entry: &Value, index: usize) -> ProcessInfo {
    let name = first_text(entry, PROCESS_NAME)
        .or_else(|| text(entry))
        .map_or_else(|| format!("proc{}", index + 1), str::to_string);

    let memory_label = PROCESS_MEMORY
        .iter()
        .find_map(|path| lookup(entry, path))
        .and_then(|mem| match mem {
            Value::String(_) => text(mem).map(str::to_string),
            _ => number(mem).map(|n| {
                // Byte-sized figures are scaled; smaller ones are MiB already.
                let mib = if n >= MIB as f64 { n / MIB as f64 } else { n };
                units::format_mib_label(mib)
            }),
        })
        .unwrap_or_else(|| "-".to_string());

    ProcessInfo {
        name,
        cpu_percent: first_number(entry, PROCESS_CPU).map_or(0.0, non_negative),
        memory_label,
        status: first_text(entry, PROCESS_STATUS).map_or(ProcessStatus::Unknown, ProcessStatus::from_label),
    }
}

/// CPU details, or `None` when the resolved object names none of them.
pub fn cpu_info(raw: &Value, cpu_percent: f64) -> Option<CpuInfo> {
    let cpu = cpu_object(raw);
    let temperature_c = first_number(cpu, &[&["temp"]])
        .or_else(|| system_number(raw, "cpuTemp"))
        .or_else(|| first_number(cpu, &[&["temperature"]]));

    let described = [CPU_BRAND, CPU_PHYSICAL, CPU_LOGICAL, CPU_SPEED, CPU_LOAD]
        .iter()
        .any(|chain| any_present(cpu, chain));
    if !described && temperature_c.is_none() {
        return None;
    }

    Some(CpuInfo {
        brand: first_text(cpu, CPU_BRAND).unwrap_or("unknown").to_string(),
        physical_cores: first_number(cpu, CPU_PHYSICAL).map_or(0, count),
        logical_cores: first_number(cpu, CPU_LOGICAL).map_or(0, count),
        clock_ghz: first_number(cpu, CPU_SPEED).map_or(0.0, clock_ghz),
        load_percent: first_number(cpu, CPU_LOAD).map_or(cpu_percent, clamp_percent),
        temperature_c,
    })
}

/// GPU details, or `None` when the resolved object names none of them.
pub fn gpu_info(raw: &Value) -> Option<GpuInfo> {
    let gpu = gpu_object(raw);

    let name = first_text(gpu, GPU_NAME);
    let utilization_percent = first_number(gpu, GPU_UTILIZATION).map(clamp_percent);

    // Explicit MB fields bypass the unit heuristic; plain fields go through it,
    // with the total (when present) deciding the unit for both.
    let raw_total = first_number(gpu, GPU_TOTAL);
    let raw_used = first_number(gpu, GPU_USED);
    let memory_total_bytes = first_number(gpu, GPU_TOTAL_MB)
        .map(units::mib_to_bytes)
        .or_else(|| raw_total.map(units::value_to_bytes));
    let memory_used_bytes = first_number(gpu, GPU_USED_MB)
        .map(units::mib_to_bytes)
        .or_else(|| {
            raw_used.map(|used| match raw_total {
                Some(total) => units::to_bytes(used, units::infer_unit(total)),
                None => units::value_to_bytes(used),
            })
        });
    let memory_shared_bytes = shared_memory(gpu);

    let temperature_c = first_number(gpu, GPU_TEMP)
        .or_else(|| first_number(raw, &[&["gpuTemp"]]))
        .or_else(|| system_number(raw, "gpuTemp"));

    let described = name.is_some()
        || utilization_percent.is_some()
        || memory_used_bytes.is_some()
        || memory_total_bytes.is_some()
        || memory_shared_bytes.is_some()
        || temperature_c.is_some();
    if !described {
        return None;
    }

    Some(GpuInfo {
        name: name.unwrap_or("unknown").to_string(),
        utilization_percent,
        memory_used_bytes,
        memory_total_bytes,
        memory_shared_bytes,
        temperature_c,
    })
}

/// Direct MB fields first; a zero there still lets the first controller
/// entry speak.
fn shared_memory(gpu: &Value) -> Option<u64> {
    let direct = first_number(gpu, GPU_SHARED_MB);
    direct
        .filter(|mb| *mb > 0.0)
        .map(units::mib_to_bytes)
        .or_else(|| {
            let controller = lookup(gpu, &["controllers"])?.as_array()?.first()?;
            first_number(controller, &[&["memoryShared"]])
                .map(|bytes| units::to_bytes(bytes, units::RawUnit::Bytes))
                .or_else(|| first_number(controller, &[&["memorySharedMB"]]).map(units::mib_to_bytes))
        })
        .or_else(|| direct.map(units::mib_to_bytes))
}

/// System memory in bytes; `None` without a usable `total`.
pub fn memory(raw: &Value) -> Option<MemoryInfo> {
    let mem = first_object(raw, MEMORY_OBJECT)
        .or_else(|| first_object(cpu_object(raw), &[&["mem"]]))?;

    let total = first_number(mem, &[&["total"]])?;
    let used = first_number(mem, MEMORY_USED).unwrap_or(0.0);
    let (total_bytes, used_bytes) = units::pair_to_bytes(total, used);

    (total_bytes > 0).then_some(MemoryInfo { total_bytes, used_bytes })
}

fn count(n: f64) -> u32 {
    non_negative(n).round().min(u32::MAX as f64) as u32
}

/// Clock speeds above 100 are taken to be MHz.
fn clock_ghz(speed: f64) -> f64 {
    let speed = non_negative(speed);
    if speed >= 100.0 {
        speed / 1000.0
    } else {
        speed
    }
}
