//! Per-player turn clock.

use std::time::{Duration, Instant};

/// Accumulates wall time across start/stop spans.
#[derive(Debug, Clone, Default)]
pub struct TurnTimer {
    accumulated: Duration,
    started: Option<Instant>,
}

impl TurnTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting. No-op while already running.
    pub fn start(&mut self) {
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
    }

    /// Stop counting and bank the running span. No-op while stopped.
    pub fn stop(&mut self) {
        if let Some(started) = self.started.take() {
            self.accumulated += started.elapsed();
        }
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Total time, including the span currently running.
    pub fn elapsed(&self) -> Duration {
        self.accumulated + self.started.map_or(Duration::ZERO, |s| s.elapsed())
    }

    /// Whole seconds of [`TurnTimer::elapsed`].
    pub fn seconds(&self) -> u64 {
        self.elapsed().as_secs()
    }
}
