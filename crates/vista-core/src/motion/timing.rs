//! Time calculation utilities shared by every animator
//!
//! Pure functions for progress and interpolation, plus the visibility start
//! gate that delays an animation until its host has been seen.

use std::time::Duration;

/// Longest duration accepted from configuration (one hour)
const MAX_CONFIGURED: Duration = Duration::from_secs(3600);

/// Calculate animation progress (0.0 to 1.0) from elapsed time and duration
#[inline]
pub fn progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Milliseconds from configuration, saturating at one hour
pub fn millis(value: u64) -> Duration {
    Duration::from_millis(value).min(MAX_CONFIGURED)
}

/// `step * index`, saturating instead of overflowing
pub fn times(step: Duration, index: usize) -> Duration {
    step.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
}

/// Holds an animation back until its host has been visible for `delay`.
///
/// Only the first [`StartGate::open`] counts; the gate never closes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartGate {
    delay: Duration,
    opened_at: Option<Duration>,
}

impl StartGate {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            opened_at: None,
        }
    }

    /// Record that the host became visible. Returns false if it already had.
    pub fn open(&mut self, now: Duration) -> bool {
        if self.opened_at.is_some() {
            return false;
        }
        self.opened_at = Some(now);
        true
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.opened_at.is_some()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Instant the gated animation starts, once visibility is known
    pub fn start_time(&self) -> Option<Duration> {
        self.opened_at.map(|at| at.saturating_add(self.delay))
    }

    /// Time since the gated animation started, or None if it has not
    pub fn elapsed(&self, now: Duration) -> Option<Duration> {
        let start = self.start_time()?;
        now.checked_sub(start)
    }
}
