//! Progress bars that fill once their host is visible.

use std::time::Duration;

use crate::motion::{EasingType, StartGate, Tween};

/// Clamp a fraction into [0, 1]; NaN becomes 0
#[inline]
pub fn clamp_fraction(fraction: f64) -> f64 {
    if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    }
}

/// `value / max` as a clamped fraction; a non-positive `max` yields 0
pub fn fraction_of(value: f64, max: f64) -> f64 {
    if max <= 0.0 || !max.is_finite() {
        return 0.0;
    }
    clamp_fraction(value / max)
}

#[derive(Debug, Clone)]
pub struct ProgressBarAnimator {
    tween: Tween<f64>,
    gate: StartGate,
    /// Width is sampled no later than this once disposed
    frozen_at: Option<Duration>,
    disposed: bool,
}

impl ProgressBarAnimator {
    /// Prepare a fill from 0 to `fraction` of the track
    pub fn animate_width(fraction: f64, duration: Duration, start_delay: Duration) -> Self {
        Self {
            tween: Tween::new(0.0, clamp_fraction(fraction), duration, EasingType::EaseOutQuad),
            gate: StartGate::new(start_delay),
            frozen_at: None,
            disposed: false,
        }
    }

    pub fn with_easing(mut self, easing: EasingType) -> Self {
        self.tween.easing = easing;
        self
    }

    /// The clamped target fraction
    pub fn target(&self) -> f64 {
        self.tween.to
    }

    /// The host became visible. Only the first signal counts.
    pub fn host_visible(&mut self, now: Duration) -> bool {
        if self.disposed {
            return false;
        }
        self.gate.open(now)
    }

    /// Filled fraction of the track at `now`
    pub fn width(&self, now: Duration) -> f64 {
        let now = match self.frozen_at {
            Some(frozen) => now.min(frozen),
            None => now,
        };
        match self.gate.elapsed(now) {
            Some(elapsed) => self.tween.sample(elapsed),
            None => self.tween.from,
        }
    }

    /// Filled cells of a track `track_len` cells long
    pub fn filled_cells(&self, now: Duration, track_len: u16) -> u16 {
        (self.width(now) * track_len as f64).round() as u16
    }

    pub fn is_complete(&self, now: Duration) -> bool {
        matches!(self.gate.elapsed(now), Some(elapsed) if self.tween.is_complete(elapsed))
    }

    pub fn is_animating(&self, now: Duration) -> bool {
        !self.disposed && self.gate.is_open() && !self.is_complete(now)
    }

    /// Cancel the fill and hold the bar at its width at `now`. Idempotent.
    pub fn dispose(&mut self, now: Duration) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.frozen_at = Some(now);
    }
}
