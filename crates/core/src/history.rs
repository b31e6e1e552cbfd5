use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::str::FromStr;

use crate::error::RtpmError;

/// Fixed-capacity FIFO time series, one per chart line.
#[derive(Debug, Clone)]
pub struct RollingSeries<T> {
    samples:  VecDeque<T>,
    capacity: usize,
}

impl<T: Clone> RollingSeries<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity.saturating_add(1)),
            capacity,
        }
    }

    /// Append to the tail; if that overflows the capacity, drop exactly one
    /// element from the head.
    pub fn push(&mut self, value: T) {
        self.samples.push_back(value);
        if self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Copy of the series, oldest first.
    pub fn snapshot(&self) -> Vec<T> {
        self.samples.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&T> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Every numeric signal the dashboard keeps a history for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Signal {
    Throughput,
    Cpu,
    Gpu,
    Memory,
    CpuTemp,
    GpuTemp,
    Fps,
}

impl Signal {
    pub const ALL: [Signal; 7] = [
        Self::Throughput,
        Self::Cpu,
        Self::Gpu,
        Self::Memory,
        Self::CpuTemp,
        Self::GpuTemp,
        Self::Fps,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Throughput => "throughput",
            Self::Cpu        => "cpu",
            Self::Gpu        => "gpu",
            Self::Memory     => "memory",
            Self::CpuTemp    => "cpuTemp",
            Self::GpuTemp    => "gpuTemp",
            Self::Fps        => "fps",
        }
    }

    /// 60 points for the throughput chart, 120 for the system, heat and
    /// frame-rate charts.
    #[must_use]
    pub fn default_capacity(self) -> usize {
        match self {
            Self::Throughput => 60,
            _ => 120,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Signal {
    type Err = RtpmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Signal::ALL
            .into_iter()
            .find(|signal| signal.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| RtpmError::Config(format!("unknown signal '{s}'")))
    }
}

/// One [`RollingSeries`] per [`Signal`], each with its own capacity.
#[derive(Debug, Clone)]
pub struct RollingBufferSet {
    series: BTreeMap<Signal, RollingSeries<f64>>,
}

impl RollingBufferSet {
    /// Build the set, asking `capacity` for the size of each series.
    pub fn new(capacity: impl Fn(Signal) -> usize) -> Self {
        Self {
            series: Signal::ALL
                .into_iter()
                .map(|signal| (signal, RollingSeries::new(capacity(signal))))
                .collect(),
        }
    }

    pub fn push(&mut self, signal: Signal, value: f64) {
        if let Some(series) = self.series.get_mut(&signal) {
            series.push(value);
        }
    }

    /// Owned copy of one series, oldest first.
    pub fn snapshot(&self, signal: Signal) -> Vec<f64> {
        self.series
            .get(&signal)
            .map(RollingSeries::snapshot)
            .unwrap_or_default()
    }

    pub fn capacity(&self, signal: Signal) -> usize {
        self.series.get(&signal).map_or(0, RollingSeries::capacity)
    }

    /// Copy of every series at once.
    pub fn snapshot_all(&self) -> HistorySnapshot {
        HistorySnapshot {
            series: self
                .series
                .iter()
                .map(|(signal, series)| (*signal, series.snapshot()))
                .collect(),
        }
    }
}

impl Default for RollingBufferSet {
    fn default() -> Self {
        Self::new(Signal::default_capacity)
    }
}

/// Owned copy of every history series, safe to hand to widgets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistorySnapshot {
    series: BTreeMap<Signal, Vec<f64>>,
}

impl HistorySnapshot {
    /// Values for `signal`, oldest first (empty if never recorded).
    #[must_use]
    pub fn get(&self, signal: Signal) -> &[f64] {
        self.series.get(&signal).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn latest(&self, signal: Signal) -> Option<f64> {
        self.get(signal).last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eviction_keeps_the_last_values_in_order() {
        let mut series = RollingSeries::new(60);
        for v in 0..65 {
            series.push(v);
        }
        let snap = series.snapshot();
        assert_eq!(snap.len(), 60);
        assert_eq!(snap, (5..65).collect::<Vec<_>>());
    }

    #[test]
    fn each_push_evicts_at_most_one() {
        let mut series = RollingSeries::new(3);
        series.push(1);
        series.push(2);
        series.push(3);
        series.push(4);
        assert_eq!(series.snapshot(), vec![2, 3, 4]);
        assert_eq!(series.latest(), Some(&4));
    }

    #[test]
    fn zero_capacity_stays_empty() {
        let mut series = RollingSeries::new(0);
        series.push(1.0);
        assert!(series.is_empty());
    }

    #[test]
    fn snapshot_is_detached_from_the_buffer() {
        let mut set = RollingBufferSet::default();
        set.push(Signal::Cpu, 10.0);
        let snap = set.snapshot(Signal::Cpu);
        set.push(Signal::Cpu, 20.0);
        assert_eq!(snap, vec![10.0]);
        assert_eq!(set.snapshot(Signal::Cpu), vec![10.0, 20.0]);
    }

    #[test]
    fn default_capacities() {
        let set = RollingBufferSet::default();
        assert_eq!(set.capacity(Signal::Throughput), 60);
        assert_eq!(set.capacity(Signal::Cpu), 120);
        assert_eq!(set.capacity(Signal::GpuTemp), 120);
        assert_eq!(set.capacity(Signal::Fps), 120);
    }

    #[test]
    fn signal_names_round_trip() {
        for signal in Signal::ALL {
            assert_eq!(signal.name().parse::<Signal>().unwrap(), signal);
        }
        assert!("nope".parse::<Signal>().is_err());
    }

    #[test]
    fn history_snapshot_lookup() {
        let mut set = RollingBufferSet::default();
        set.push(Signal::Fps, 60.0);
        set.push(Signal::Fps, 58.0);
        let snap = set.snapshot_all();
        assert_eq!(snap.get(Signal::Fps), &[60.0, 58.0]);
        assert_eq!(snap.latest(Signal::Fps), Some(58.0));
        assert!(snap.get(Signal::Gpu).is_empty());
    }
}
