//! Staggered enter-animations for a content block.
//!
//! A [`RevealAnimator`] holds an ordered list of [`RevealItem`]s and plays
//! them once its region has entered the viewport. Item `i` starts after
//! `base_delay + i * stagger + item.delay` and runs its own tween.

use std::time::Duration;

use tracing::debug;

use crate::motion::timing::times;
use crate::motion::{EasingType, Tween, VisualState};

/// One element animated by a reveal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealItem {
    pub initial: VisualState,
    pub target: VisualState,
    pub duration: Duration,
    pub easing: EasingType,
    /// Extra delay on top of the stagger slot
    pub delay: Duration,
    /// Stagger slot; defaults to the item's position
    pub stagger_index: Option<usize>,
}

impl RevealItem {
    pub fn new(initial: VisualState, target: VisualState, duration: Duration) -> Self {
        Self {
            initial,
            target,
            duration,
            easing: EasingType::default(),
            delay: Duration::ZERO,
            stagger_index: None,
        }
    }

    /// Fade in while sliding up from `offset_y` below
    pub fn fade_up(offset_y: f64, duration: Duration) -> Self {
        Self::new(VisualState::hidden_below(offset_y), VisualState::SHOWN, duration)
    }

    /// Fade in while sliding in from `offset_x` to the side
    pub fn slide_in(offset_x: f64, duration: Duration) -> Self {
        Self::new(VisualState::hidden_beside(offset_x), VisualState::SHOWN, duration)
    }

    pub fn with_easing(mut self, easing: EasingType) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_stagger_index(mut self, index: usize) -> Self {
        self.stagger_index = Some(index);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    /// Waiting for the region to enter
    Idle,
    Running,
    Complete,
}

#[derive(Debug, Clone, Default)]
pub struct RevealAnimator {
    base_delay: Duration,
    stagger: Duration,
    tweens: Vec<Tween<VisualState>>,
    started_at: Option<Duration>,
    /// Sampling stops here once disposed
    frozen_at: Option<Duration>,
    disposed: bool,
}

impl RevealAnimator {
    pub fn new(base_delay: Duration) -> Self {
        Self {
            base_delay,
            ..Self::default()
        }
    }

    /// Load the items to reveal, in registration order
    pub fn play(&mut self, items: &[RevealItem], stagger: Duration) {
        self.stagger = stagger;
        self.tweens = items
            .iter()
            .enumerate()
            .map(|(position, item)| {
                let slot = item.stagger_index.unwrap_or(position);
                let delay = self
                    .base_delay
                    .saturating_add(times(stagger, slot))
                    .saturating_add(item.delay);
                Tween::new(item.initial, item.target, item.duration, item.easing).with_delay(delay)
            })
            .collect();
    }

    /// The governing region entered the viewport. Only the first call counts.
    pub fn on_enter(&mut self, now: Duration) -> bool {
        if self.disposed || self.started_at.is_some() {
            return false;
        }
        debug!(items = self.tweens.len(), "Reveal started");
        self.started_at = Some(now);
        true
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Time from the trigger until the last item settles
    pub fn total_duration(&self) -> Duration {
        self.tweens
            .iter()
            .map(Tween::end)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Absolute time at which every item has reached its target
    pub fn completion_time(&self) -> Option<Duration> {
        self.started_at.map(|start| start.saturating_add(self.total_duration()))
    }

    pub fn phase(&self, now: Duration) -> RevealPhase {
        let now = self.clamp(now);
        match self.completion_time() {
            None => RevealPhase::Idle,
            Some(done) if now >= done => RevealPhase::Complete,
            Some(_) => RevealPhase::Running,
        }
    }

    /// Visual state of one item. Items render their initial state until the trigger.
    pub fn item_state(&self, index: usize, now: Duration) -> Option<VisualState> {
        let tween = self.tweens.get(index)?;
        Some(match self.started_at {
            None => tween.from,
            Some(start) => tween.sample(self.clamp(now).saturating_sub(start)),
        })
    }

    /// Visual state of every item
    pub fn sample(&self, now: Duration) -> Vec<VisualState> {
        (0..self.tweens.len())
            .filter_map(|i| self.item_state(i, now))
            .collect()
    }

    /// Whether a frame is needed to keep the animation moving
    pub fn is_animating(&self, now: Duration) -> bool {
        !self.disposed && self.phase(now) == RevealPhase::Running
    }

    /// Stop reacting to visibility and hold every item where it is at `now`.
    /// Idempotent; the first call fixes the frozen time.
    pub fn dispose(&mut self, now: Duration) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.frozen_at = Some(now);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn clamp(&self, now: Duration) -> Duration {
        match self.frozen_at {
            Some(frozen) => now.min(frozen),
            None => now,
        }
    }
}
