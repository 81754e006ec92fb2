//! Frame pacing for the animation loop

use std::time::{Duration, Instant};

/// Fraction of `duration` elapsed between `start` and `now`, in `[0, 1]`
#[inline]
pub fn progress(start: Instant, duration: Duration, now: Instant) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

/// Host-side frame callback source
///
/// The event loop may wake more often than the animation rate (key presses,
/// image completions); a frame is only due once per interval so physics
/// advance at a steady rate.
#[derive(Debug, Clone)]
pub struct FrameClock {
    interval: Duration,
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True, and records the frame, when a frame is due at `now`
    pub fn frame_due(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Forget the last frame so the next request fires immediately
    pub fn reset(&mut self) {
        self.last = None;
    }
}
