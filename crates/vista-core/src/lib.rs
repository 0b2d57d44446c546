pub mod clock;
pub mod config;
pub mod count_up;
pub mod error;
pub mod motion;
pub mod page;
pub mod progress;
pub mod reveal;
pub mod scroll_spy;
pub mod typewriter;
pub mod visibility;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, EasingType, MotionConfig, ScrollConfig};
pub use error::{Error, Result};
pub use page::{Page, PageConfig, ScrollUpdate};
pub use scroll_spy::{ActiveSection, NavBackdrop, NavigationRequest, ScrollSpyNavigator, Section};
pub use visibility::{Bounds, Disposer, VisibilityObserver, VisibilityRegion, Viewport};
