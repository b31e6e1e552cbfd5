//! Publisher/subscriber hub.
//!
//! One [`Hub`] owns one timer. Each period it runs a *tick*: acquire a raw
//! payload, canonicalize it, append to the rolling histories and notify every
//! observer with the sample (or with `None` when the source was unavailable).
//!
//! Ticks are single-flight. The timer runs its ticks back to back inside one
//! task with [`MissedTickBehavior::Skip`], so a slow fetch swallows the
//! periods it overlaps instead of queueing them. An on-demand [`Hub::tick`]
//! that finds another tick in flight returns [`TickOutcome::Skipped`].
//!
//! [`Hub::stop`] aborts the timer task and bumps a generation counter. A tick
//! that was in flight when `stop` ran is discarded: it neither touches the
//! histories nor notifies anyone. Each observer call holds a delivery gate
//! that `stop` waits on, so once `stop` returns no observer is running or
//! about to run. Calling `stop` from inside an observer does not wait.

pub mod observer;

pub use observer::{Observer, Subscription};

use observer::Registry;
use rtpm_config::RtpmConfig;
use rtpm_core::{
    CanonicalSample, HistorySnapshot, HubState, Result, RollingBufferSet, RtpmError, Signal,
};
use rtpm_metrics::Canonicalizer;
use rtpm_source::Acquire;
use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

thread_local! {
    static DELIVERING: Cell<bool> = const { Cell::new(false) };
}

/// Tick period used when none is configured.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(1000);

/// What happened to one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A sample was recorded and delivered.
    Published,
    /// The source was unavailable; observers got `None`.
    NoSample,
    /// Another tick was in flight; nothing was acquired.
    Skipped,
    /// `stop()` ran while this tick was in flight; results were dropped.
    Discarded,
}

struct Control {
    state:      HubState,
    generation: u64,
    task:       Option<JoinHandle<()>>,
}

struct Shared {
    period:        Duration,
    control:       Mutex<Control>,
    observers:     Arc<Registry>,
    delivery:      RwLock<()>,
    history:       RwLock<RollingBufferSet>,
    current:       RwLock<Option<Arc<CanonicalSample>>>,
    source:        tokio::sync::Mutex<Box<dyn Acquire>>,
    canonicalizer: Mutex<Canonicalizer>,
}

/// Owns the timer, the rolling histories and the current sample.
///
/// Observers only ever see shared read-only samples and copies of the
/// histories. Dropping the hub stops it.
pub struct Hub {
    shared: Arc<Shared>,
}

/// Configures a [`Hub`] before it is built.
pub struct HubBuilder {
    source:        Box<dyn Acquire>,
    period:        Duration,
    history:       RollingBufferSet,
    canonicalizer: Canonicalizer,
}

impl HubBuilder {
    /// Tick period. Clamped to at least one millisecond.
    pub fn period(mut self, period: Duration) -> Self {
        self.period = period.max(Duration::from_millis(1));
        self
    }

    /// Per-signal history capacity.
    pub fn capacities(mut self, capacity: impl Fn(Signal) -> usize) -> Self {
        self.history = RollingBufferSet::new(capacity);
        self
    }

    /// Seed the randomness used for fields a payload leaves out.
    pub fn seed(mut self, seed: u64) -> Self {
        self.canonicalizer = Canonicalizer::seeded(seed);
        self
    }

    pub fn build(self) -> Hub {
        Hub {
            shared: Arc::new(Shared {
                period:        self.period,
                control:       Mutex::new(Control {
                    state:      HubState::Stopped,
                    generation: 0,
                    task:       None,
                }),
                observers:     Arc::new(Registry::default()),
                delivery:      RwLock::new(()),
                history:       RwLock::new(self.history),
                current:       RwLock::new(None),
                source:        tokio::sync::Mutex::new(self.source),
                canonicalizer: Mutex::new(self.canonicalizer),
            }),
        }
    }
}

impl Hub {
    /// Hub with the default period and history capacities.
    pub fn new(source: Box<dyn Acquire>) -> Self {
        Self::builder(source).build()
    }

    pub fn builder(source: Box<dyn Acquire>) -> HubBuilder {
        HubBuilder {
            source,
            period: DEFAULT_PERIOD,
            history: RollingBufferSet::default(),
            canonicalizer: Canonicalizer::new(),
        }
    }

    /// Build the source, period, capacities and seed from configuration.
    pub fn from_config(config: &RtpmConfig) -> Result<Self> {
        if config.source.interval_ms == 0 {
            return Err(RtpmError::Config("source.interval_ms must be positive".into()));
        }
        if config.source.timeout_ms == 0 && !config.source.is_simulated() {
            return Err(RtpmError::Config("source.timeout_ms must be positive".into()));
        }

        let source = rtpm_source::from_config(&config.source)?;
        let history = config.history;
        let mut builder = Self::builder(source)
            .period(Duration::from_millis(config.source.interval_ms))
            .capacities(move |signal| history.capacity(signal));
        if let Some(seed) = config.source.seed {
            builder = builder.seed(seed);
        }
        Ok(builder.build())
    }

    /// Begin ticking every period, first tick one period from now.
    /// No-op when already running. Must be called inside a Tokio runtime.
    pub fn start(&self) -> Result<()> {
        let handle = Handle::try_current()
            .map_err(|e| RtpmError::Hub(format!("cannot start without a Tokio runtime: {e}")))?;

        let mut control = lock(&self.shared.control);
        if control.state == HubState::Running {
            return Ok(());
        }

        control.state = HubState::Running;
        control.task = Some(handle.spawn(run(Arc::clone(&self.shared))));
        info!(period_ms = self.shared.period.as_millis() as u64, "hub started");
        Ok(())
    }

    /// Cancel the timer. Idempotent. A tick in flight is discarded.
    ///
    /// Blocks while an observer call that began before the cancellation
    /// finishes, unless called from an observer.
    pub fn stop(&self) {
        {
            let mut control = lock(&self.shared.control);
            control.generation = control.generation.wrapping_add(1);
            if let Some(task) = control.task.take() {
                task.abort();
            }
            if control.state == HubState::Running {
                control.state = HubState::Stopped;
                info!("hub stopped");
            }
        }
        if !DELIVERING.with(Cell::get) {
            drop(write(&self.shared.delivery));
        }
    }

    pub fn state(&self) -> HubState {
        lock(&self.shared.control).state
    }

    pub fn period(&self) -> Duration {
        self.shared.period
    }

    /// Register an observer for every tick outcome.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(Option<&Arc<CanonicalSample>>) + Send + Sync + 'static,
    {
        self.subscribe_observer(Arc::new(observer))
    }

    pub fn subscribe_observer(&self, observer: Arc<dyn Observer>) -> Subscription {
        let id = self.shared.observers.insert(observer);
        debug!(observer = id, "observer subscribed");
        Subscription::new(id, &self.shared.observers)
    }

    pub fn observer_count(&self) -> usize {
        self.shared.observers.len()
    }

    /// Copy of one history series, oldest first.
    pub fn snapshot(&self, signal: Signal) -> Vec<f64> {
        read(&self.shared.history).snapshot(signal)
    }

    /// Copy of every history series.
    pub fn history(&self) -> HistorySnapshot {
        read(&self.shared.history).snapshot_all()
    }

    /// Most recently published sample.
    pub fn current(&self) -> Option<Arc<CanonicalSample>> {
        read(&self.shared.current).clone()
    }

    /// Run one tick now, through the same single-flight path as the timer.
    pub async fn tick(&self) -> TickOutcome {
        self.shared.tick().await
    }

    /// Replace the acquirer. Waits for a tick in flight to finish; histories
    /// and observers are kept.
    pub async fn set_source(&self, source: Box<dyn Acquire>) {
        let kind = source.kind();
        *self.shared.source.lock().await = source;
        info!(?kind, "hub source replaced");
    }
}

impl Drop for Hub {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub")
            .field("state", &self.state())
            .field("period", &self.shared.period)
            .field("observers", &self.observer_count())
            .finish()
    }
}

async fn run(shared: Arc<Shared>) {
    let mut ticker = time::interval_at(Instant::now() + shared.period, shared.period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        match shared.tick().await {
            TickOutcome::Discarded => break,
            TickOutcome::Skipped => debug!("timer tick skipped: another tick in flight"),
            _ => {}
        }
    }
}

impl Shared {
    fn generation(&self) -> u64 {
        lock(&self.control).generation
    }

    async fn tick(&self) -> TickOutcome {
        // Held for the whole tick.
        let Ok(mut source) = self.source.try_lock() else {
            return TickOutcome::Skipped;
        };
        let generation = self.generation();

        let raw = source.acquire().await;
        let sample = lock(&self.canonicalizer).canonicalize(raw).map(Arc::new);

        {
            let control = lock(&self.control);
            if control.generation != generation {
                debug!("tick finished after stop; discarded");
                return TickOutcome::Discarded;
            }
            if let Some(sample) = &sample {
                record(&mut write(&self.history), sample);
                *write(&self.current) = Some(Arc::clone(sample));
            }
        }

        for (id, observer) in self.observers.snapshot() {
            let _gate = read(&self.delivery);
            if self.generation() != generation {
                return TickOutcome::Discarded;
            }
            DELIVERING.with(|d| d.set(true));
            let delivered = panic::catch_unwind(AssertUnwindSafe(|| observer.notify(sample.as_ref())));
            DELIVERING.with(|d| d.set(false));
            if let Err(payload) = delivered {
                error!(observer = id, "observer panicked: {}", panic_message(payload.as_ref()));
            }
        }

        drop(source);
        if sample.is_some() {
            TickOutcome::Published
        } else {
            TickOutcome::NoSample
        }
    }
}

/// Append one value per signal. Missing readings are recorded as 0 so all
/// series advance together.
fn record(history: &mut RollingBufferSet, sample: &CanonicalSample) {
    history.push(Signal::Throughput, sample.throughput);
    history.push(Signal::Cpu, sample.cpu_percent);
    history.push(Signal::Gpu, sample.gpu_percent().unwrap_or(0.0));
    history.push(Signal::Memory, sample.memory_percent().map_or(0.0, f64::round));
    history.push(Signal::CpuTemp, sample.cpu_temperature().unwrap_or(0.0));
    history.push(Signal::GpuTemp, sample.gpu_temperature().unwrap_or(0.0));
    history.push(Signal::Fps, sample.fps);
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
