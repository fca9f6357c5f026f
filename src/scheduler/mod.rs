//! # Polling Scheduler Module
//!
//! Drives the mapping engine at a fixed cadence on a dedicated thread.
//!
//! ## Loop
//!
//! ```text
//! while !cancelled:
//!     read(device_index)
//!         ok  -> step(previous, current, state) -> send(events) -> previous := current
//!         err -> skip (no state change, no events)
//!     sleep(poll_interval)
//! ```
//!
//! The sleep is fixed and does not account for the time the tick took. Read
//! failures are transient: the next iteration simply tries again, with no
//! backoff. Cancellation is observed only at the top of an iteration, so a tick
//! that has started always completes.
//!
//! ## Usage
//!
//! ```no_run
//! use pad_mapper::controller::EvdevGamepadReader;
//! use pad_mapper::mapping::{MappingEngine, DEFAULT_TABLE};
//! use pad_mapper::output::UinputEmitter;
//! use pad_mapper::scheduler::{CancelToken, PollingScheduler, SchedulerSettings};
//!
//! let reader = EvdevGamepadReader::scan()?;
//! let emitter = UinputEmitter::create("pad-mapper virtual input")?;
//! let scheduler = PollingScheduler::new(
//!     reader,
//!     emitter,
//!     MappingEngine::new(DEFAULT_TABLE),
//!     SchedulerSettings::default(),
//! );
//!
//! let cancel = CancelToken::new();
//! let worker = scheduler.spawn(cancel.clone())?;
//! // ... later
//! cancel.cancel();
//! let stats = worker.join().expect("polling thread panicked");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cancel;
pub mod priority;
pub mod stats;

pub use cancel::CancelToken;
pub use stats::SchedulerStats;

use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, trace, warn};

use crate::config::Config;
use crate::controller::reader::DeviceReader;
use crate::error::Result;
use crate::mapping::engine::{MappingEngine, MappingState};
use crate::output::EventEmitter;

/// Name of the polling thread.
pub const WORKER_THREAD_NAME: &str = "pad-poll";

/// Loop parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerSettings {
    pub device_index: u32,
    /// Sleep after every iteration.
    pub poll_interval: Duration,
    /// Nice value applied to the worker thread; `None` leaves it unchanged.
    pub thread_nice: Option<i32>,
    /// Emit a status line every this many iterations.
    pub status_interval_ticks: u64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl SchedulerSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let scheduler = &config.scheduler;
        Self {
            device_index: config.controller.device_index,
            poll_interval: scheduler.poll_interval(),
            thread_nice: scheduler.elevate_priority.then_some(scheduler.thread_nice),
            status_interval_ticks: scheduler.status_interval_ticks,
        }
    }
}

/// Result of one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The read failed; nothing happened.
    Skipped,
    /// The snapshot was mapped and `events` events were forwarded.
    Processed { events: usize },
}

/// Owns the mapping state and runs the sample-map-emit cycle.
pub struct PollingScheduler<R, E> {
    reader: R,
    emitter: E,
    engine: MappingEngine,
    settings: SchedulerSettings,
    state: MappingState,
    stats: SchedulerStats,
}

impl<R, E> std::fmt::Debug for PollingScheduler<R, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingScheduler")
            .field("settings", &self.settings)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<R: DeviceReader, E: EventEmitter> PollingScheduler<R, E> {
    #[must_use]
    pub fn new(reader: R, emitter: E, engine: MappingEngine, mut settings: SchedulerSettings) -> Self {
        settings.status_interval_ticks = settings.status_interval_ticks.max(1);
        Self {
            reader,
            emitter,
            engine,
            settings,
            state: MappingState::new(),
            stats: SchedulerStats::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &MappingState {
        &self.state
    }

    #[must_use]
    pub fn stats(&self) -> &SchedulerStats {
        &self.stats
    }

    /// Runs a single iteration without sleeping.
    pub fn tick(&mut self) -> TickOutcome {
        self.stats.ticks += 1;

        let current = match self.reader.read(self.settings.device_index) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.stats.failed_reads += 1;
                trace!("Skipping tick: {}", e);
                return TickOutcome::Skipped;
            }
        };
        self.stats.successful_reads += 1;

        let previous = self.state.previous();
        let events = self.engine.step(&previous, &current, &mut self.state);

        if !events.is_empty() {
            match self.emitter.send(&events) {
                Ok(()) => self.stats.events_emitted += events.len() as u64,
                Err(e) => {
                    self.stats.emit_failures += 1;
                    debug!("Failed to send events: {}", e);
                }
            }
        }

        self.state.commit(current);
        TickOutcome::Processed {
            events: events.len(),
        }
    }

    /// Loops until `cancel` is observed, then returns the statistics.
    pub fn run(mut self, cancel: &CancelToken) -> SchedulerStats {
        info!(
            "Polling controller #{} every {:?}",
            self.settings.device_index, self.settings.poll_interval
        );

        while !cancel.is_cancelled() {
            self.tick();

            if self.stats.ticks % self.settings.status_interval_ticks == 0 {
                self.log_status();
            }

            thread::sleep(self.settings.poll_interval);
        }

        info!("Polling loop stopped after {} ticks", self.stats.ticks);
        self.stats
    }

    fn log_status(&self) {
        info!(
            "Polled {} ticks ({} ok, {} skipped), {} events emitted",
            self.stats.ticks,
            self.stats.successful_reads,
            self.stats.failed_reads,
            self.stats.events_emitted
        );
        if self.stats.successful_reads == 0 {
            warn!("Controller #{} has not been readable yet", self.settings.device_index);
        }
    }
}

impl<R, E> PollingScheduler<R, E>
where
    R: DeviceReader + Send + 'static,
    E: EventEmitter + Send + 'static,
{
    /// Moves the scheduler onto its own named thread and starts the loop.
    ///
    /// The thread applies the configured nice value before the first tick; if
    /// the kernel refuses (missing `CAP_SYS_NICE`), the loop runs at normal
    /// priority.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the thread cannot be spawned.
    pub fn spawn(self, cancel: CancelToken) -> Result<JoinHandle<SchedulerStats>> {
        let thread_nice = self.settings.thread_nice;
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                if let Some(nice) = thread_nice {
                    match priority::set_current_thread_nice(nice) {
                        Ok(()) => debug!("Polling thread nice set to {}", nice),
                        Err(e) => warn!("Could not raise polling thread priority: {}", e),
                    }
                }
                self.run(&cancel)
            })?;
        Ok(handle)
    }
}
