//! Scroll animation controller
//!
//! Wraps a [`Tween`] over the scroll offset. The controller is advanced with
//! the current time, so a slow frame jumps ahead instead of stretching the
//! animation.

use std::time::Duration;

use vista_core::motion::Tween;

use super::config::{ScrollConfig, ScrollConfigExt};

/// Active scroll animation state
#[derive(Debug, Clone, Copy)]
struct ActiveAnimation {
    start: Duration,
    tween: Tween<f64>,
}

/// Scroll animation controller
///
/// Call `scroll_to()` or `scroll_by()` to request movement, then `update()`
/// each frame to get the current interpolated position.
#[derive(Debug, Clone, Default)]
pub struct ScrollAnimator {
    animation: Option<ActiveAnimation>,
    config: ScrollConfig,
    current_scroll: f64,
    /// Deltas batched until the next update
    pending_delta: f64,
}

impl ScrollAnimator {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Animation running or deltas waiting; the caller should poll at frame rate
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.animation.is_some() || self.pending_delta != 0.0
    }

    /// Final position after the running animation
    pub fn target_scroll(&self) -> f64 {
        self.animation
            .as_ref()
            .map(|a| a.tween.to)
            .unwrap_or(self.current_scroll)
    }

    #[inline]
    pub fn current_scroll(&self) -> f64 {
        self.current_scroll
    }

    /// Set scroll position immediately (no animation)
    pub fn set_scroll(&mut self, scroll: f64) {
        self.animation = None;
        self.current_scroll = scroll;
        self.pending_delta = 0.0;
    }

    /// Start an animation toward `target`, or jump there when smooth scrolling is off
    pub fn scroll_to(&mut self, target: f64, max_scroll: f64, now: Duration) {
        let target = target.clamp(0.0, max_scroll.max(0.0));
        self.pending_delta = 0.0;

        if !self.config.is_smooth() || target == self.current_scroll {
            self.current_scroll = target;
            self.animation = None;
            return;
        }
        self.start(target, now);
    }

    /// Scroll by `delta` pixels (positive = down). Deltas received before the
    /// next update are batched into one animation.
    pub fn scroll_by(&mut self, delta: f64, max_scroll: f64) {
        if !self.config.is_smooth() {
            self.current_scroll = (self.current_scroll + delta).clamp(0.0, max_scroll.max(0.0));
            self.animation = None;
            return;
        }
        self.pending_delta += delta;
    }

    /// Scroll down by one step of `row_px` rows
    pub fn scroll_down(&mut self, row_px: f64, max_scroll: f64) {
        self.scroll_by(self.step(row_px), max_scroll);
    }

    pub fn scroll_up(&mut self, row_px: f64, max_scroll: f64) {
        self.scroll_by(-self.step(row_px), max_scroll);
    }

    fn step(&self, row_px: f64) -> f64 {
        // Smooth scrolling moves one row at a time for fine control
        let lines = if self.config.is_smooth() {
            1
        } else {
            self.config.scroll_lines.max(1)
        };
        row_px * lines as f64
    }

    /// Advance to `now` and return the current position
    pub fn update(&mut self, now: Duration, max_scroll: f64) -> f64 {
        let max_scroll = max_scroll.max(0.0);

        if self.pending_delta != 0.0 {
            let target = (self.target_scroll() + self.pending_delta).clamp(0.0, max_scroll);
            self.pending_delta = 0.0;
            if target != self.current_scroll {
                self.start(target, now);
            }
        }

        if let Some(anim) = self.animation {
            let elapsed = now.saturating_sub(anim.start);
            if anim.tween.is_complete(elapsed) {
                self.current_scroll = anim.tween.to.min(max_scroll);
                self.animation = None;
            } else {
                self.current_scroll = anim.tween.sample(elapsed).min(max_scroll);
            }
        }

        self.current_scroll
    }

    fn start(&mut self, target: f64, now: Duration) {
        self.animation = Some(ActiveAnimation {
            start: now,
            tween: Tween::new(
                self.current_scroll,
                target,
                self.config.animation_duration(),
                self.config.easing,
            ),
        });
    }

    /// Stop at the current position
    pub fn cancel(&mut self) {
        self.animation = None;
        self.pending_delta = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn smooth(duration_ms: u64) -> ScrollAnimator {
        ScrollAnimator::new(ScrollConfig {
            smooth_enabled: true,
            animation_duration_ms: duration_ms,
            ..Default::default()
        })
    }

    #[test]
    fn test_instant_scroll_when_disabled() {
        let mut animator = ScrollAnimator::new(ScrollConfig {
            smooth_enabled: false,
            ..Default::default()
        });

        animator.scroll_to(100.0, 200.0, ms(0));
        assert_eq!(animator.current_scroll(), 100.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_animation_reaches_target_on_time() {
        let mut animator = smooth(100);
        animator.scroll_to(100.0, 200.0, ms(0));
        assert!(animator.is_animating());
        assert_eq!(animator.target_scroll(), 100.0);

        let mid = animator.update(ms(50), 200.0);
        assert!(mid > 0.0 && mid < 100.0);
        assert_eq!(animator.update(ms(100), 200.0), 100.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_scroll_by_batching() {
        let mut animator = smooth(100);

        animator.scroll_by(10.0, 200.0);
        animator.scroll_by(10.0, 200.0);
        animator.scroll_by(10.0, 200.0);

        animator.update(ms(0), 200.0);
        assert_eq!(animator.target_scroll(), 30.0);
    }

    #[test]
    fn test_scroll_clamp_max() {
        let mut animator = smooth(100);
        animator.set_scroll(50.0);
        animator.scroll_to(300.0, 100.0, ms(0));
        assert_eq!(animator.target_scroll(), 100.0);
        animator.scroll_by(-500.0, 100.0);
        animator.update(ms(10), 100.0);
        assert_eq!(animator.target_scroll(), 0.0);
    }

    #[test]
    fn test_disabled_step_uses_scroll_lines() {
        let mut animator = ScrollAnimator::new(ScrollConfig {
            smooth_enabled: false,
            scroll_lines: 3,
            ..Default::default()
        });
        animator.scroll_down(20.0, 1000.0);
        assert_eq!(animator.current_scroll(), 60.0);
        animator.scroll_up(20.0, 1000.0);
        assert_eq!(animator.current_scroll(), 0.0);
    }
}
