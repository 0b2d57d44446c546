//! Generic tween runner
//!
//! A [`Tween`] is a declarative `(from, to, delay, duration, easing)` tuple.
//! Sampling it at a time since its trigger yields the interpolated value.
//! [`Keyframes`] generalize it to a sequence of values, optionally looping.

use std::time::Duration;

use super::easing::EasingType;
use super::timing::{lerp, progress};

/// A value that can be interpolated between two states
pub trait Animatable: Copy {
    /// Blend `self` toward `to`; `t` is already eased and may be anywhere in [0, 1]
    fn interpolate(&self, to: &Self, t: f64) -> Self;
}

impl Animatable for f64 {
    #[inline]
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        lerp(*self, *to, t)
    }
}

/// Visual properties driven by reveal animations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    pub opacity: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

impl VisualState {
    /// Fully shown, in place
    pub const SHOWN: VisualState = VisualState {
        opacity: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
        scale: 1.0,
    };

    /// Transparent and shifted down by `offset_y`
    pub fn hidden_below(offset_y: f64) -> Self {
        Self {
            opacity: 0.0,
            offset_y,
            ..Self::SHOWN
        }
    }

    /// Transparent and shifted sideways by `offset_x`
    pub fn hidden_beside(offset_x: f64) -> Self {
        Self {
            opacity: 0.0,
            offset_x,
            ..Self::SHOWN
        }
    }

    /// Whether anything of the item would be drawn
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0 && self.scale > 0.0
    }
}

impl Default for VisualState {
    fn default() -> Self {
        Self::SHOWN
    }
}

impl Animatable for VisualState {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Self {
            opacity: lerp(self.opacity, to.opacity, t).clamp(0.0, 1.0),
            offset_x: lerp(self.offset_x, to.offset_x, t),
            offset_y: lerp(self.offset_y, to.offset_y, t),
            scale: lerp(self.scale, to.scale, t).max(0.0),
        }
    }
}

/// One declarative transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T> {
    pub from: T,
    pub to: T,
    pub delay: Duration,
    pub duration: Duration,
    pub easing: EasingType,
}

impl<T: Animatable> Tween<T> {
    pub fn new(from: T, to: T, duration: Duration, easing: EasingType) -> Self {
        Self {
            from,
            to,
            delay: Duration::ZERO,
            duration,
            easing,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Time after the trigger at which the tween reaches `to`
    #[inline]
    pub fn end(&self) -> Duration {
        self.delay.saturating_add(self.duration)
    }

    /// Eased progress at `elapsed` since the trigger
    pub fn eased_progress(&self, elapsed: Duration) -> f64 {
        match elapsed.checked_sub(self.delay) {
            None => 0.0,
            Some(running) => self.easing.apply(progress(running, self.duration)),
        }
    }

    /// Value at `elapsed` since the trigger. Exactly `to` once complete.
    pub fn sample(&self, elapsed: Duration) -> T {
        if self.is_complete(elapsed) {
            return self.to;
        }
        if elapsed < self.delay {
            return self.from;
        }
        self.from.interpolate(&self.to, self.eased_progress(elapsed))
    }

    #[inline]
    pub fn is_complete(&self, elapsed: Duration) -> bool {
        elapsed >= self.end()
    }
}

/// How often a keyframe sequence plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repeat {
    #[default]
    Once,
    /// Restart from the first frame at the end of every cycle
    Forever,
}

/// Evenly spaced keyframes played over `duration` per cycle.
///
/// The easing applies to each segment between two frames, so a
/// `[a, b, a]` sequence with an ease-in-out slows down at both turns.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframes<T> {
    pub frames: Vec<T>,
    pub delay: Duration,
    pub duration: Duration,
    pub easing: EasingType,
    pub repeat: Repeat,
}

impl<T: Animatable> Keyframes<T> {
    pub fn new(frames: Vec<T>, duration: Duration, easing: EasingType) -> Self {
        Self {
            frames,
            delay: Duration::ZERO,
            duration,
            easing,
            repeat: Repeat::Once,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn looping(mut self) -> Self {
        self.repeat = Repeat::Forever;
        self
    }

    /// Value at `elapsed` since the trigger; `None` without frames
    pub fn sample(&self, elapsed: Duration) -> Option<T> {
        let first = *self.frames.first()?;
        let last = *self.frames.last()?;
        let Some(running) = elapsed.checked_sub(self.delay) else {
            return Some(first);
        };
        if self.frames.len() == 1 {
            return Some(first);
        }

        let cycle = match self.repeat {
            Repeat::Once if self.is_complete(elapsed) => return Some(last),
            Repeat::Once => progress(running, self.duration),
            Repeat::Forever => match self.duration.as_nanos() {
                0 => return Some(first),
                period => (running.as_nanos() % period) as f64 / period as f64,
            },
        };

        let segments = self.frames.len() - 1;
        let scaled = cycle * segments as f64;
        let index = (scaled.floor() as usize).min(segments - 1);
        let local = self.easing.apply(scaled - index as f64);
        Some(self.frames[index].interpolate(&self.frames[index + 1], local))
    }

    /// A looping sequence never completes
    pub fn is_complete(&self, elapsed: Duration) -> bool {
        match self.repeat {
            Repeat::Once => elapsed >= self.delay.saturating_add(self.duration),
            Repeat::Forever => false,
        }
    }
}
