//! # Timing Engine
//!
//! Drives a `progress` value from 0 to 1 over a fixed dwell duration.
//!
//! ## Frame Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     One Dwell Cycle (4000 ms)                           │
//! │                                                                         │
//! │  start(t0)   tick(t0+16)   tick(t0+33)   ...   tick(t0+4000)            │
//! │     │            │             │                    │                   │
//! │     ▼            ▼             ▼                    ▼                   │
//! │  progress=0   0.004         0.008      ...    1.0 → Completed           │
//! │                                                                         │
//! │  Each tick adds (now - last_frame) / duration. `last_frame` is          │
//! │  refreshed on every tick and on resume, so time spent paused or         │
//! │  stopped is never replayed as one big jump.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine never reads a clock; the caller hands it the frame time.

use std::time::{Duration, Instant};

/// Lifecycle of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingState {
    /// Not driving. Initial state and the state after `stop()`.
    Stopped,
    /// Advancing on every tick.
    Running,
    /// Frozen; progress is kept.
    Paused,
    /// Reached 1 in one-shot mode; waits for `start()`.
    Finished,
}

/// Event returned from [`TimingEngine::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingEvent {
    /// Progress reached 1. Emitted exactly once per cycle.
    Completed,
}

/// Per-frame progress driver.
#[derive(Debug, Clone)]
pub struct TimingEngine {
    duration: Duration,
    progress: f64,
    state: TimingState,
    last_frame: Option<Instant>,
    repeat: bool,
}

impl TimingEngine {
    /// Creates a stopped, one-shot engine.
    pub fn new(duration: Duration) -> Self {
        TimingEngine {
            duration,
            progress: 0.0,
            state: TimingState::Stopped,
            last_frame: None,
            repeat: false,
        }
    }

    /// In repeat mode the engine resets to 0 and keeps running after each
    /// completion instead of finishing.
    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    /// Starts (or restarts) a cycle from 0.
    pub fn start(&mut self, now: Instant) {
        self.progress = 0.0;
        self.state = TimingState::Running;
        self.last_frame = Some(now);
    }

    /// Freezes progress without resetting it. No-op unless running.
    pub fn pause(&mut self) {
        if self.state == TimingState::Running {
            self.state = TimingState::Paused;
            self.last_frame = None;
        }
    }

    /// Continues from the frozen value. No-op unless paused.
    pub fn resume(&mut self, now: Instant) {
        if self.state == TimingState::Paused {
            self.state = TimingState::Running;
            self.last_frame = Some(now);
        }
    }

    /// Cancels the drive. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.state = TimingState::Stopped;
        self.last_frame = None;
    }

    /// Changes the cycle length. A running or paused engine restarts cleanly
    /// from 0 rather than rescaling the current progress.
    pub fn set_duration(&mut self, duration: Duration, now: Instant) {
        self.duration = duration;
        match self.state {
            TimingState::Running => self.start(now),
            TimingState::Paused => {
                self.progress = 0.0;
            }
            TimingState::Stopped | TimingState::Finished => {}
        }
    }

    /// Advances progress to `now`.
    ///
    /// Returns `Some(Completed)` on the frame progress reaches 1.
    pub fn tick(&mut self, now: Instant) -> Option<TimingEvent> {
        if self.state != TimingState::Running {
            return None;
        }

        let last = self.last_frame.unwrap_or(now);
        let elapsed = now.saturating_duration_since(last);
        self.last_frame = Some(now);

        if self.duration.is_zero() {
            self.progress = 1.0;
        } else {
            let step = elapsed.as_secs_f64() / self.duration.as_secs_f64();
            self.progress = (self.progress + step).min(1.0);
        }

        if self.progress < 1.0 {
            return None;
        }

        if self.repeat {
            self.progress = 0.0;
        } else {
            self.state = TimingState::Finished;
        }
        Some(TimingEvent::Completed)
    }

    /// Fraction of the dwell elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Resets progress to 0 without changing state.
    pub fn reset_progress(&mut self, now: Instant) {
        self.progress = 0.0;
        if self.state == TimingState::Running {
            self.last_frame = Some(now);
        }
    }

    pub fn state(&self) -> TimingState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimingState::Running
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
