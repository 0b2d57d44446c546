//! Timed character reveal with a blinking cursor.
//!
//! ```text
//! WaitingToStart --(visible + start_delay)--> Typing
//! Typing --(last character)--> HoldCursor --(hold)--> Done
//! ```
//!
//! The cursor blinks while typing and holding, starting visible when typing
//! begins, and is hidden once done. The engine is driven by [`TypewriterEngine::advance`]
//! with the current time and computes every transition from the start time,
//! so a late frame catches up instead of drifting.

use std::time::Duration;

use tracing::debug;

use crate::motion::timing::times;
use crate::motion::StartGate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TypewriterPhase {
    WaitingToStart,
    Typing,
    HoldCursor,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterTiming {
    pub start_delay: Duration,
    pub character_interval: Duration,
    pub hold: Duration,
    pub blink_interval: Duration,
}

impl Default for TypewriterTiming {
    fn default() -> Self {
        Self {
            start_delay: Duration::ZERO,
            character_interval: Duration::from_millis(30),
            hold: Duration::from_millis(1000),
            blink_interval: Duration::from_millis(500),
        }
    }
}

/// Snapshot of the engine for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterState {
    pub revealed_count: usize,
    pub cursor_visible: bool,
    pub phase: TypewriterPhase,
}

#[derive(Debug, Clone)]
pub struct TypewriterEngine {
    text: String,
    char_count: usize,
    timing: TypewriterTiming,
    gate: StartGate,
    revealed: usize,
    cursor_visible: bool,
    phase: TypewriterPhase,
    disposed: bool,
}

impl TypewriterEngine {
    pub fn new(text: impl Into<String>, timing: TypewriterTiming) -> Self {
        let text = text.into();
        let char_count = text.chars().count();
        Self {
            text,
            char_count,
            gate: StartGate::new(timing.start_delay),
            timing,
            revealed: 0,
            cursor_visible: false,
            phase: TypewriterPhase::WaitingToStart,
            disposed: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of characters in the full text
    pub fn len(&self) -> usize {
        self.char_count
    }

    pub fn is_empty(&self) -> bool {
        self.char_count == 0
    }

    /// The host became visible. Only the first signal starts the clock.
    pub fn host_visible(&mut self, now: Duration) -> bool {
        if self.disposed {
            return false;
        }
        self.gate.open(now)
    }

    /// Advance to `now`. Returns true if anything visible changed.
    pub fn advance(&mut self, now: Duration) -> bool {
        if self.disposed {
            return false;
        }
        let Some(since_start) = self.gate.elapsed(now) else {
            return false;
        };

        let before = self.state();

        let typed = match self.timing.character_interval.as_nanos() {
            0 => self.char_count,
            interval => (since_start.as_nanos() / interval).min(self.char_count as u128) as usize,
        };
        self.revealed = self.revealed.max(typed);

        let typing_time = times(self.timing.character_interval, self.char_count);
        let phase = if self.revealed < self.char_count {
            TypewriterPhase::Typing
        } else if since_start >= typing_time.saturating_add(self.timing.hold) {
            TypewriterPhase::Done
        } else {
            TypewriterPhase::HoldCursor
        };
        self.phase = self.phase.max(phase);

        self.cursor_visible = match self.phase {
            TypewriterPhase::Typing | TypewriterPhase::HoldCursor => {
                blink_on(since_start, self.timing.blink_interval)
            }
            TypewriterPhase::WaitingToStart | TypewriterPhase::Done => false,
        };

        let after = self.state();
        if after.phase != before.phase {
            debug!(phase = ?after.phase, revealed = after.revealed_count, "Typewriter phase changed");
        }
        after != before
    }

    pub fn state(&self) -> TypewriterState {
        TypewriterState {
            revealed_count: self.revealed,
            cursor_visible: self.cursor_visible,
            phase: self.phase,
        }
    }

    pub fn phase(&self) -> TypewriterPhase {
        self.phase
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// The prefix typed so far, cut on a character boundary
    pub fn revealed_text(&self) -> &str {
        match self.text.char_indices().nth(self.revealed) {
            Some((byte, _)) => &self.text[..byte],
            None => &self.text,
        }
    }

    /// Whether frames are still needed
    pub fn is_animating(&self) -> bool {
        !self.disposed && self.gate.is_open() && self.phase != TypewriterPhase::Done
    }

    /// Cancel all pending transitions. Idempotent.
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

fn blink_on(since_start: Duration, interval: Duration) -> bool {
    match interval.as_nanos() {
        0 => true,
        interval => (since_start.as_nanos() / interval) % 2 == 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn hi() -> TypewriterEngine {
        TypewriterEngine::new("hi", TypewriterTiming::default())
    }

    #[test]
    fn test_reference_timeline() {
        let mut engine = hi();
        engine.host_visible(ms(0));

        engine.advance(ms(0));
        assert_eq!(engine.phase(), TypewriterPhase::Typing);
        assert_eq!(engine.revealed_text(), "");

        engine.advance(ms(30));
        assert_eq!(engine.revealed_text(), "h");

        engine.advance(ms(60));
        assert_eq!(engine.revealed_text(), "hi");
        assert_eq!(engine.phase(), TypewriterPhase::HoldCursor);

        engine.advance(ms(1059));
        assert_eq!(engine.phase(), TypewriterPhase::HoldCursor);

        engine.advance(ms(1060));
        assert_eq!(
            engine.state(),
            TypewriterState {
                revealed_count: 2,
                cursor_visible: false,
                phase: TypewriterPhase::Done,
            }
        );
    }

    #[test]
    fn test_waits_for_visibility_and_delay() {
        let mut engine = TypewriterEngine::new(
            "status",
            TypewriterTiming {
                start_delay: ms(1200),
                character_interval: ms(25),
                ..Default::default()
            },
        );
        assert!(!engine.advance(ms(5000)));
        assert_eq!(engine.phase(), TypewriterPhase::WaitingToStart);

        engine.host_visible(ms(5000));
        engine.advance(ms(6199));
        assert_eq!(engine.phase(), TypewriterPhase::WaitingToStart);
        engine.advance(ms(6200 + 50));
        assert_eq!(engine.revealed_text(), "st");
    }

    #[test]
    fn test_repeated_visibility_is_ignored() {
        let mut engine = hi();
        assert!(engine.host_visible(ms(0)));
        engine.advance(ms(30));
        assert!(!engine.host_visible(ms(20)));
        engine.advance(ms(60));
        assert_eq!(engine.revealed_count(), 2);
    }

    #[test]
    fn test_large_jump_catches_up_and_never_overshoots() {
        let mut engine = hi();
        engine.host_visible(ms(0));
        engine.advance(ms(60_000));
        assert_eq!(engine.revealed_count(), 2);
        assert_eq!(engine.phase(), TypewriterPhase::Done);
    }

    #[test]
    fn test_revealed_count_monotonic() {
        let mut engine = TypewriterEngine::new("monotonic", TypewriterTiming::default());
        engine.host_visible(ms(0));
        let mut last = 0;
        for t in (0..400).step_by(7) {
            engine.advance(ms(t));
            assert!(engine.revealed_count() >= last);
            assert!(engine.revealed_count() <= engine.len());
            last = engine.revealed_count();
        }
    }

    #[test]
    fn test_cursor_blinks_while_typing() {
        let mut engine = TypewriterEngine::new(
            "a long enough sentence to keep typing for a while",
            TypewriterTiming::default(),
        );
        engine.host_visible(ms(0));
        engine.advance(ms(10));
        assert!(engine.cursor_visible());
        engine.advance(ms(510));
        assert!(!engine.cursor_visible());
        engine.advance(ms(1010));
        assert!(engine.cursor_visible());
    }

    #[test]
    fn test_multibyte_text_cut_on_char_boundary() {
        let mut engine = TypewriterEngine::new("héllo", TypewriterTiming::default());
        engine.host_visible(ms(0));
        engine.advance(ms(60));
        assert_eq!(engine.revealed_text(), "hé");
    }

    #[test]
    fn test_empty_text_goes_straight_to_hold() {
        let mut engine = TypewriterEngine::new("", TypewriterTiming::default());
        engine.host_visible(ms(0));
        engine.advance(ms(0));
        assert_eq!(engine.phase(), TypewriterPhase::HoldCursor);
        engine.advance(ms(1000));
        assert_eq!(engine.phase(), TypewriterPhase::Done);
    }

    #[test]
    fn test_huge_intervals_do_not_overflow() {
        let mut engine = TypewriterEngine::new(
            "hi",
            TypewriterTiming {
                character_interval: Duration::MAX,
                hold: Duration::MAX,
                ..Default::default()
            },
        );
        engine.host_visible(ms(0));
        engine.advance(ms(5));
        assert_eq!(engine.phase(), TypewriterPhase::Typing);
        assert_eq!(engine.revealed_count(), 0);

        let mut late = TypewriterEngine::new(
            "hi",
            TypewriterTiming {
                start_delay: Duration::MAX,
                ..Default::default()
            },
        );
        late.host_visible(ms(1));
        assert!(!late.advance(ms(10_000)));
        assert_eq!(late.phase(), TypewriterPhase::WaitingToStart);
    }

    #[test]
    fn test_dispose_freezes_state() {
        let mut engine = hi();
        engine.host_visible(ms(0));
        engine.advance(ms(30));
        engine.dispose();
        engine.dispose();
        assert!(!engine.advance(ms(5000)));
        assert_eq!(engine.revealed_count(), 1);
        assert!(!engine.is_animating());
    }

    #[test]
    fn test_dispose_after_done_is_harmless() {
        let mut engine = hi();
        engine.host_visible(ms(0));
        engine.advance(ms(10_000));
        let done = engine.state();
        engine.dispose();
        engine.advance(ms(20_000));
        assert_eq!(engine.state(), done);
    }
}
