//! Eased tween that centers the active thumbnail in the strip

use std::time::{Duration, Instant};

use super::config::{EasingType, ScrollSettings, ScrollSettingsExt};
use super::easing::EasingTypeExt;
use super::timing::progress;

/// Offset that puts an item's center at the viewport's center, clamped to the scroll range
pub fn centered_offset(item_left: f64, item_width: f64, viewport: f64, max_offset: f64) -> f64 {
    (item_left - viewport / 2.0 + item_width / 2.0).clamp(0.0, max_offset.max(0.0))
}

#[derive(Debug, Clone, Copy)]
struct Tween {
    start: Instant,
    from: f64,
    to: f64,
}

#[derive(Debug, Clone)]
pub struct CenteringAnimator {
    easing: EasingType,
    duration: Duration,
    animated: bool,
    tween: Option<Tween>,
}

impl CenteringAnimator {
    pub fn new(settings: &ScrollSettings) -> Self {
        Self {
            easing: settings.easing,
            duration: settings.center_duration(),
            animated: settings.animates_centering(),
            tween: None,
        }
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Begin moving from `current` to `target`. Returns the offset to apply
    /// right away when centering is not animated.
    pub fn start(&mut self, current: f64, target: f64, now: Instant) -> Option<f64> {
        if !self.animated {
            self.tween = None;
            return Some(target);
        }
        if (current - target).abs() < f64::EPSILON {
            self.tween = None;
            return None;
        }

        self.tween = Some(Tween {
            start: now,
            from: current,
            to: target,
        });
        None
    }

    /// Offset for this frame, or `None` when idle
    pub fn update(&mut self, now: Instant) -> Option<f64> {
        let tween = self.tween?;
        let t = progress(tween.start, self.duration, now);
        if t >= 1.0 {
            self.tween = None;
            return Some(tween.to);
        }
        Some(self.easing.interpolate(tween.from, tween.to, t))
    }

    pub fn cancel(&mut self) {
        self.tween = None;
    }
}
