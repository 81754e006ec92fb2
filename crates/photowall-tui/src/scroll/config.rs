//! Scroll settings helpers
//!
//! The settings types live in photowall-core so they can be loaded from the
//! config file; this module adds the timing conversions the TUI needs.

use std::time::Duration;

pub use photowall_core::config::ScrollSettings;
pub use photowall_core::{EasingType, ScrollConfig};

/// Fallback frame interval when `animation_fps` is zero
const FALLBACK_FRAME: Duration = Duration::from_millis(16);

pub trait ScrollSettingsExt {
    /// Interval between animation frames
    fn frame_interval(&self) -> Duration;

    /// Duration of the thumbnail centering tween
    fn center_duration(&self) -> Duration;

    /// Whether centering should animate at all
    fn animates_centering(&self) -> bool;
}

impl ScrollSettingsExt for ScrollSettings {
    #[inline]
    fn frame_interval(&self) -> Duration {
        if self.animation_fps == 0 {
            FALLBACK_FRAME
        } else {
            Duration::from_millis((1000 / self.animation_fps as u64).max(1))
        }
    }

    #[inline]
    fn center_duration(&self) -> Duration {
        Duration::from_millis(self.center_duration_ms)
    }

    #[inline]
    fn animates_centering(&self) -> bool {
        self.center_duration_ms > 0 && self.easing != EasingType::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_interval() {
        let settings = ScrollSettings::default();
        assert_eq!(settings.frame_interval(), Duration::from_millis(16));

        let settings = ScrollSettings {
            animation_fps: 0,
            ..Default::default()
        };
        assert_eq!(settings.frame_interval(), FALLBACK_FRAME);

        let settings = ScrollSettings {
            animation_fps: 5000,
            ..Default::default()
        };
        assert_eq!(settings.frame_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_centering_toggle() {
        let mut settings = ScrollSettings::default();
        assert!(settings.animates_centering());
        assert_eq!(settings.center_duration(), Duration::from_millis(300));

        settings.easing = EasingType::None;
        assert!(!settings.animates_centering());

        settings.easing = EasingType::Linear;
        settings.center_duration_ms = 0;
        assert!(!settings.animates_centering());
    }
}
