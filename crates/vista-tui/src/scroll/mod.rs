//! Smooth page scrolling for the terminal view
//!
//! Scroll positions are kept in page pixels, the same unit the engine uses
//! for section boundaries, and converted to rows only when drawing.
//!
//! - `config` - Scroll settings (re-exported from vista-core) and helpers
//! - `animation` - Time-driven scroll controller
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use vista_tui::scroll::{ScrollAnimator, ScrollConfig};
//!
//! let mut animator = ScrollAnimator::new(ScrollConfig::default());
//! animator.scroll_to(800.0, 2000.0, Duration::ZERO);
//!
//! // Each frame, advance to the current time
//! let y = animator.update(Duration::from_millis(500), 2000.0);
//! assert_eq!(y, 800.0);
//! ```

pub mod animation;
pub mod config;

pub use animation::ScrollAnimator;
pub use config::{ScrollConfig, ScrollConfigExt};
