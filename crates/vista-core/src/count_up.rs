//! Animated numeric counters.
//!
//! A [`CountUpAnimator`] climbs from 0 to its target along a spring curve,
//! starting `start_delay` after its host first became visible. The displayed
//! text is derived from the current value on every sample.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::motion::timing::{lerp, progress, times};
use crate::motion::{EasingType, StartGate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountUpPhase {
    WaitingToStart,
    Animating,
    Settled,
}

/// How a counter value is turned into text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountFormat {
    /// Rounded integer: 2500 -> "2500"
    #[default]
    Plain,
    /// Thousands with one decimal, trailing zero dropped: 2500 -> "2.5k", 25000 -> "25k"
    Thousands,
}

/// Format a counter value with a caller-supplied suffix
pub fn format_count(value: f64, format: CountFormat, suffix: &str) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    match format {
        CountFormat::Thousands if value.abs() >= 1000.0 => {
            let text = format!("{:.1}", value / 1000.0);
            let text = text.strip_suffix(".0").unwrap_or(&text);
            format!("{text}k{suffix}")
        }
        _ => format!("{}{suffix}", value.round() as i64),
    }
}

/// Start delay for the `index`-th counter in a staggered row: it waits for its
/// card's stagger slot plus the card's own entrance.
pub fn staggered_delay(index: usize, stagger: Duration, entrance: Duration) -> Duration {
    times(stagger, index).saturating_add(entrance)
}

#[derive(Debug, Clone)]
pub struct CountUpAnimator {
    current: f64,
    target: f64,
    duration: Duration,
    easing: EasingType,
    gate: StartGate,
    phase: CountUpPhase,
    disposed: bool,
}

impl CountUpAnimator {
    /// Prepare a count from 0 to `target`; it runs once the host is visible
    pub fn animate_to(target: f64, duration: Duration, start_delay: Duration) -> Self {
        Self {
            current: 0.0,
            target: if target.is_finite() { target } else { 0.0 },
            duration,
            easing: EasingType::Spring,
            gate: StartGate::new(start_delay),
            phase: CountUpPhase::WaitingToStart,
            disposed: false,
        }
    }

    pub fn with_easing(mut self, easing: EasingType) -> Self {
        self.easing = easing;
        self
    }

    /// The host became visible. Only the first signal counts.
    pub fn host_visible(&mut self, now: Duration) -> bool {
        if self.disposed {
            return false;
        }
        self.gate.open(now)
    }

    /// Advance to `now` and return the current value
    pub fn advance(&mut self, now: Duration) -> f64 {
        if self.disposed || self.phase == CountUpPhase::Settled {
            return self.current;
        }
        let Some(elapsed) = self.gate.elapsed(now) else {
            return self.current;
        };

        if elapsed >= self.duration {
            self.current = self.target;
            self.phase = CountUpPhase::Settled;
            debug!(value = self.target, "Counter settled");
        } else {
            let t = self.easing.apply(progress(elapsed, self.duration));
            self.current = lerp(0.0, self.target, t);
            self.phase = CountUpPhase::Animating;
        }
        self.current
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn phase(&self) -> CountUpPhase {
        self.phase
    }

    /// Current value as display text
    pub fn display(&self, format: CountFormat, suffix: &str) -> String {
        format_count(self.current, format, suffix)
    }

    pub fn is_animating(&self) -> bool {
        !self.disposed && self.gate.is_open() && self.phase != CountUpPhase::Settled
    }

    /// Cancel the pending count. Idempotent.
    pub fn dispose(&mut self) {
        self.disposed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_reference_count() {
        let mut counter = CountUpAnimator::animate_to(25.0, ms(2000), ms(500));
        assert_eq!(counter.advance(ms(3000)), 0.0);

        counter.host_visible(ms(1000));
        assert_eq!(counter.advance(ms(1499)), 0.0);
        assert_eq!(counter.phase(), CountUpPhase::WaitingToStart);

        // Counting starts on the exact start instant, like the typewriter
        assert_eq!(counter.advance(ms(1500)), 0.0);
        assert_eq!(counter.phase(), CountUpPhase::Animating);

        let mut prev = 0.0;
        for t in (1510..3500).step_by(10) {
            let value = counter.advance(ms(t));
            assert!(value > prev, "not increasing at {t}ms");
            prev = value;
        }
        assert_eq!(counter.advance(ms(3500)), 25.0);
        assert_eq!(counter.phase(), CountUpPhase::Settled);
        assert_eq!(counter.advance(ms(9000)), 25.0);
    }

    #[test]
    fn test_display_rounds_only_at_render() {
        let mut counter = CountUpAnimator::animate_to(10.0, ms(100), Duration::ZERO)
            .with_easing(EasingType::Linear);
        counter.host_visible(ms(0));
        counter.advance(ms(44));
        assert!((counter.current() - 4.4).abs() < 1e-9);
        assert_eq!(counter.display(CountFormat::Plain, "+"), "4+");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(25_000.0, CountFormat::Thousands, "+"), "25k+");
        assert_eq!(format_count(2_500.0, CountFormat::Thousands, " hrs"), "2.5k hrs");
        assert_eq!(format_count(800.0, CountFormat::Thousands, ""), "800");
        assert_eq!(format_count(14.6, CountFormat::Plain, "+"), "15+");
        assert_eq!(format_count(f64::NAN, CountFormat::Plain, ""), "0");
    }

    #[test]
    fn test_staggered_delay() {
        assert_eq!(staggered_delay(0, ms(200), ms(500)), ms(500));
        assert_eq!(staggered_delay(3, ms(200), ms(500)), ms(1100));
    }

    #[test]
    fn test_huge_delays_saturate() {
        let mut counter = CountUpAnimator::animate_to(25.0, ms(2000), Duration::MAX);
        counter.host_visible(ms(1));
        assert_eq!(counter.advance(ms(2)), 0.0);
        assert_eq!(counter.phase(), CountUpPhase::WaitingToStart);

        assert_eq!(staggered_delay(usize::MAX, Duration::MAX, ms(500)), Duration::MAX);
    }

    #[test]
    fn test_non_finite_target_normalized() {
        let mut counter = CountUpAnimator::animate_to(f64::INFINITY, ms(10), Duration::ZERO);
        counter.host_visible(ms(0));
        assert_eq!(counter.advance(ms(10)), 0.0);
    }

    #[test]
    fn test_dispose_stops_updates() {
        let mut counter = CountUpAnimator::animate_to(100.0, ms(100), Duration::ZERO);
        counter.host_visible(ms(0));
        counter.advance(ms(10));
        let frozen = counter.current();
        counter.dispose();
        counter.dispose();
        assert_eq!(counter.advance(ms(1000)), frozen);
        assert!(!counter.is_animating());
    }
}
