//! Countdown timer for a single meditation session.
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --start--> Running
//!                    |
//!                  tick (remaining hits 0)
//!                    v
//!                 Finished        reset: any state --> Idle
//! ```
//!
//! Calls made from a state where they do not apply are no-ops. The caller
//! drives [`TimerEngine::tick`] from a once-per-second pulse and owns the
//! engine exclusively while it runs.

use crate::core::clock::Clock;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Inclusive range a requested duration is clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationBounds {
    /// Shortest allowed duration, in seconds.
    pub min: u32,
    /// Longest allowed duration, in seconds.
    pub max: u32,
}

impl DurationBounds {
    /// Preset durations: 1 to 30 minutes.
    pub const DEFAULT: Self = Self::new(60, 1800);

    /// Custom entry: 30 seconds to an hour.
    pub const CUSTOM: Self = Self::new(30, 3600);

    /// Create bounds. `min` must not exceed `max`.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Clamp `seconds` into the range, never returning 0.
    #[must_use]
    pub fn clamp(&self, seconds: u32) -> u32 {
        seconds.max(self.min).min(self.max).max(1)
    }
}

impl Default for DurationBounds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// How remaining time is derived on each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountdownMode {
    /// Subtract one second per tick. Delayed or skipped ticks stretch the
    /// session.
    Decrement,

    /// Recompute from wall-clock time elapsed since the last start, so late
    /// ticks catch up.
    #[default]
    WallClock,
}

/// Lifecycle state of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Not started since the last reset.
    Idle,
    /// Counting down.
    Running,
    /// Stopped mid-way, remaining time frozen.
    Paused,
    /// Reached zero. Only `reset` leaves this state.
    Finished,
}

/// Result of one [`TimerEngine::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The timer was not running.
    Ignored,
    /// Still counting.
    Counting {
        /// Seconds left.
        remaining: u32,
    },
    /// This tick reached zero. Reported once per run.
    Finished,
}

/// Point-in-time view of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerSnapshot {
    /// Configured length, in seconds.
    pub total_seconds: u32,
    /// Seconds left as of the last tick or pause.
    pub remaining_seconds: u32,
    /// Whether the countdown is active.
    pub running: bool,
    /// Whether the countdown reached zero.
    pub finished: bool,
    /// Lifecycle state.
    pub phase: TimerPhase,
}

/// Countdown state machine.
#[derive(Debug)]
pub struct TimerEngine {
    clock: Arc<dyn Clock>,
    mode: CountdownMode,
    bounds: DurationBounds,
    phase: TimerPhase,
    total_seconds: u32,
    remaining_seconds: u32,
    /// Instant of the most recent start or resume.
    resumed_at: Option<DateTime<Utc>>,
    /// Running time accumulated before `resumed_at`, kept to the sub-second.
    banked: Duration,
    /// Instant of the first start since the last reset.
    started_at: Option<DateTime<Utc>>,
}

impl TimerEngine {
    /// Create an idle timer. `duration` is clamped into `bounds`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, mode: CountdownMode, bounds: DurationBounds, duration: u32) -> Self {
        let total = bounds.clamp(duration);
        Self {
            clock,
            mode,
            bounds,
            phase: TimerPhase::Idle,
            total_seconds: total,
            remaining_seconds: total,
            resumed_at: None,
            banked: Duration::zero(),
            started_at: None,
        }
    }

    /// Start or resume the countdown.
    ///
    /// No-op when already running or finished.
    pub fn start(&mut self) -> TimerPhase {
        match self.phase {
            TimerPhase::Idle | TimerPhase::Paused => {
                let now = self.clock.now();
                self.resumed_at = Some(now);
                self.started_at.get_or_insert(now);
                debug!(remaining = self.remaining_seconds, from = ?self.phase, "timer started");
                self.phase = TimerPhase::Running;
            }
            TimerPhase::Running | TimerPhase::Finished => {}
        }
        self.phase
    }

    /// Freeze the countdown.
    ///
    /// No-op unless running.
    pub fn pause(&mut self) -> TimerPhase {
        if self.phase == TimerPhase::Running {
            self.banked = self.elapsed();
            self.resumed_at = None;
            self.remaining_seconds = self.current_remaining();
            self.phase = TimerPhase::Paused;
            debug!(remaining = self.remaining_seconds, "timer paused");
        }
        self.phase
    }

    /// Return to idle with a full countdown.
    ///
    /// A new duration is clamped into the engine's bounds.
    pub fn reset(&mut self, duration: Option<u32>) -> TimerPhase {
        if let Some(secs) = duration {
            self.total_seconds = self.bounds.clamp(secs);
        }
        self.remaining_seconds = self.total_seconds;
        self.banked = Duration::zero();
        self.resumed_at = None;
        self.started_at = None;
        self.phase = TimerPhase::Idle;
        debug!(total = self.total_seconds, "timer reset");
        self.phase
    }

    /// Advance the countdown by one pulse.
    pub fn tick(&mut self) -> Tick {
        if self.phase != TimerPhase::Running {
            return Tick::Ignored;
        }

        self.remaining_seconds = match self.mode {
            CountdownMode::Decrement => self.remaining_seconds.saturating_sub(1),
            CountdownMode::WallClock => self.current_remaining(),
        };

        if self.remaining_seconds == 0 {
            self.phase = TimerPhase::Finished;
            self.resumed_at = None;
            debug!(total = self.total_seconds, "timer finished");
            Tick::Finished
        } else {
            Tick::Counting {
                remaining: self.remaining_seconds,
            }
        }
    }

    /// Total running time as of now, excluding paused spans.
    fn elapsed(&self) -> Duration {
        match self.resumed_at {
            Some(resumed) => self.banked + (self.clock.now() - resumed).max(Duration::zero()),
            None => self.banked,
        }
    }

    /// Remaining seconds as of now, without mutating state.
    fn current_remaining(&self) -> u32 {
        match self.mode {
            CountdownMode::WallClock => {
                let elapsed = u32::try_from(self.elapsed().num_seconds()).unwrap_or(u32::MAX);
                self.total_seconds.saturating_sub(elapsed)
            }
            CountdownMode::Decrement => self.remaining_seconds,
        }
    }

    /// Lifecycle state.
    #[must_use]
    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    /// Configured length, in seconds.
    #[must_use]
    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    /// Seconds left as of the last tick or pause.
    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Whether the countdown is active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    /// Whether the countdown reached zero.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == TimerPhase::Finished
    }

    /// When the current run first started, if it has.
    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Clamp range for `reset`.
    #[must_use]
    pub fn bounds(&self) -> DurationBounds {
        self.bounds
    }

    /// Countdown strategy.
    #[must_use]
    pub fn mode(&self) -> CountdownMode {
        self.mode
    }

    /// Fraction of the session elapsed, 0.0 to 1.0.
    #[must_use]
    pub fn progress(&self) -> f64 {
        let done = self.total_seconds - self.remaining_seconds.min(self.total_seconds);
        f64::from(done) / f64::from(self.total_seconds)
    }

    /// Point-in-time view.
    #[must_use]
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            total_seconds: self.total_seconds,
            remaining_seconds: self.remaining_seconds,
            running: self.is_running(),
            finished: self.is_finished(),
            phase: self.phase,
        }
    }
}
