//! Scroll configuration helpers

use std::time::Duration;

use vista_core::motion::timing::millis;
pub use vista_core::{EasingType, ScrollConfig};

/// Extension trait for ScrollConfig with utility methods
pub trait ScrollConfigExt {
    /// Get animation duration as Duration
    fn animation_duration(&self) -> Duration;

    /// Check if smooth scrolling is effectively enabled
    fn is_smooth(&self) -> bool;
}

impl ScrollConfigExt for ScrollConfig {
    #[inline]
    fn animation_duration(&self) -> Duration {
        millis(self.animation_duration_ms)
    }

    #[inline]
    fn is_smooth(&self) -> bool {
        self.smooth_enabled && self.animation_duration_ms > 0 && self.easing != EasingType::None
    }
}
