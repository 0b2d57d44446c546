//! Motion primitives shared by every animator
//!
//! # Layers
//!
//! ## Atoms
//! - `easing` - Pure easing curves (cubic, quintic, exponential, bezier, spring)
//! - `timing` - Progress, interpolation and the visibility start gate
//!
//! ## Molecules
//! - `tween` - Declarative transitions and keyframe loops sampled against time
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use vista_core::motion::{EasingType, Tween, VisualState};
//!
//! let fade_up = Tween::new(
//!     VisualState::hidden_below(30.0),
//!     VisualState::SHOWN,
//!     Duration::from_millis(600),
//!     EasingType::EaseOutQuad,
//! );
//! assert_eq!(fade_up.sample(Duration::from_secs(1)), VisualState::SHOWN);
//! ```

pub mod easing;
pub mod timing;
pub mod tween;

pub use easing::EasingType;
pub use timing::StartGate;
pub use tween::{Animatable, Keyframes, Repeat, Tween, VisualState};
