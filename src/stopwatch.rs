//! Response-latency stopwatch
//!
//! Fixed-period ticking: every `TICK_PERIOD` of wall-clock time adds
//! `TICK_QUANTUM_MS` to the elapsed counter. Missed ticks are not caught up,
//! so the reading drifts low under load.

mod format;

pub use format::format_elapsed;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub const TICK_QUANTUM_MS: u64 = 10;
pub const TICK_PERIOD: Duration = Duration::from_millis(10);

/// Start/stop seam handed to the conversation controller
pub trait TimerControl {
    /// Begin timing. No-op if already running.
    fn start(&mut self);

    /// Stop timing. No-op if already stopped.
    fn stop(&mut self);
}

/// Snapshot of the stopwatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerState {
    pub elapsed_ms: u64,
    pub running: bool,
}

/// Stopwatch whose ticks are driven by a background tokio task.
///
/// Must be used from inside a tokio runtime. The ticker only exists while
/// running and is cancelled on stop, reset and drop.
#[derive(Debug, Default)]
pub struct StopwatchTimer {
    elapsed: Arc<AtomicU64>,
    ticker: Option<Ticker>,
}

impl StopwatchTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle between running and stopped.
    pub fn start_stop(&mut self) {
        if self.ticker.take().is_none() {
            self.ticker = Some(Ticker::spawn(Arc::clone(&self.elapsed)));
            tracing::debug!(elapsed_ms = self.elapsed_ms(), "Stopwatch started");
        } else {
            tracing::debug!(elapsed_ms = self.elapsed_ms(), "Stopwatch stopped");
        }
    }

    /// Zero the reading and stop, whatever the prior state.
    pub fn reset(&mut self) {
        self.ticker = None;
        self.elapsed.store(0, Ordering::Relaxed);
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn state(&self) -> TimerState {
        TimerState {
            elapsed_ms: self.elapsed_ms(),
            running: self.is_running(),
        }
    }

    /// Apply one tick by hand. Ignored while stopped.
    #[cfg(test)]
    fn tick(&self) {
        if self.is_running() {
            advance(&self.elapsed);
        }
    }
}

impl TimerControl for StopwatchTimer {
    fn start(&mut self) {
        if !self.is_running() {
            self.start_stop();
        }
    }

    fn stop(&mut self) {
        if self.is_running() {
            self.start_stop();
        }
    }
}

fn advance(elapsed: &AtomicU64) {
    elapsed.fetch_add(TICK_QUANTUM_MS, Ordering::Relaxed);
}

/// Owns the periodic tick task; dropping it ends the task.
#[derive(Debug)]
struct Ticker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Ticker {
    fn spawn(elapsed: Arc<AtomicU64>) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    _ = ticks.tick() => advance(&elapsed),
                }
            }
        });

        Self { cancel, handle }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}
