//! Horizontal scrolling for the gallery wall and the thumbnail strip
//!
//! - `inertia` - wheel velocity with per-frame friction decay
//! - `animation` - eased centering tween for the active thumbnail
//! - `easing` / `timing` - curves and frame pacing used by both
//! - `config` - timing helpers over the scroll settings from core

pub mod animation;
pub mod config;
pub mod easing;
pub mod inertia;
pub mod timing;

pub use animation::{centered_offset, CenteringAnimator};
pub use config::{EasingType, ScrollConfig, ScrollSettings, ScrollSettingsExt};
pub use easing::EasingTypeExt;
pub use inertia::{step, InertialScroller, ScrollExtent, ScrollPane, Step, WheelOutcome};
pub use timing::FrameClock;
