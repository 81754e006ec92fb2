//! Wheel-driven inertial scrolling
//!
//! Wheel deltas accumulate into a velocity that is applied once per frame and
//! decays by `friction`. The per-frame physics is the pure [`step`] function;
//! [`InertialScroller`] adds the lazily started frame loop around it.

use super::config::ScrollConfig;

/// Geometry of a horizontally scrollable container, in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollExtent {
    pub scroll_width: f64,
    pub client_width: f64,
}

impl ScrollExtent {
    pub fn new(scroll_width: f64, client_width: f64) -> Self {
        Self {
            scroll_width,
            client_width,
        }
    }

    pub fn is_scrollable(&self) -> bool {
        self.scroll_width > self.client_width
    }

    pub fn max_offset(&self) -> f64 {
        (self.scroll_width - self.client_width).max(0.0)
    }

    pub fn clamp(&self, offset: f64) -> f64 {
        offset.clamp(0.0, self.max_offset())
    }
}

/// What happened to a wheel event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelOutcome {
    /// Not handled; the host's default behaviour applies
    Ignored,
    /// Turned into scroll velocity
    Consumed,
}

/// One frame of inertial motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Move by `delta` and continue with `velocity`
    Move { delta: f64, velocity: f64 },
    /// Velocity fell below the threshold
    Stop,
}

/// Advance the motion by one frame
pub fn step(velocity: f64, config: &ScrollConfig) -> Step {
    if velocity.abs() < config.min_velocity {
        Step::Stop
    } else {
        Step::Move {
            delta: velocity,
            velocity: velocity * config.friction,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InertialScroller {
    config: ScrollConfig,
    velocity: f64,
    running: bool,
    detached: bool,
    loops_started: u64,
}

impl InertialScroller {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            velocity: 0.0,
            running: false,
            detached: false,
            loops_started: 0,
        }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Whether a frame loop is pending
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of frame loops started so far
    pub fn loops_started(&self) -> u64 {
        self.loops_started
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Feed a wheel delta. Starts the frame loop if it is not already running.
    pub fn on_wheel(&mut self, delta_y: f64, extent: ScrollExtent) -> WheelOutcome {
        if self.detached || !extent.is_scrollable() {
            return WheelOutcome::Ignored;
        }

        self.velocity += delta_y * self.config.sensitivity;
        if !self.running {
            self.running = true;
            self.loops_started += 1;
        }
        WheelOutcome::Consumed
    }

    /// Frame callback. Returns true if the offset moved this frame.
    pub fn on_frame(&mut self, offset: &mut f64, extent: ScrollExtent) -> bool {
        if self.detached || !self.running {
            return false;
        }

        match step(self.velocity, &self.config) {
            Step::Move { delta, velocity } => {
                *offset = extent.clamp(*offset + delta);
                self.velocity = velocity;
                true
            }
            Step::Stop => {
                self.halt();
                false
            }
        }
    }

    /// Drop any remaining velocity
    pub fn halt(&mut self) {
        self.velocity = 0.0;
        self.running = false;
    }

    /// Release the scroller; every later callback is a no-op
    pub fn detach(&mut self) {
        self.halt();
        self.detached = true;
    }
}

/// A scroll offset together with its inertia and extent
#[derive(Debug, Clone)]
pub struct ScrollPane {
    pub offset: f64,
    pub extent: ScrollExtent,
    pub inertia: InertialScroller,
}

impl ScrollPane {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            offset: 0.0,
            extent: ScrollExtent::default(),
            inertia: InertialScroller::new(config),
        }
    }

    pub fn wheel(&mut self, delta_y: f64) -> WheelOutcome {
        self.inertia.on_wheel(delta_y, self.extent)
    }

    pub fn frame(&mut self) -> bool {
        self.inertia.on_frame(&mut self.offset, self.extent)
    }

    /// Update the geometry after a resize or content change
    pub fn set_extent(&mut self, extent: ScrollExtent) {
        self.extent = extent;
        self.offset = extent.clamp(self.offset);
    }

    /// Swap a detached scroller for a fresh one with the same settings
    pub fn remount(&mut self) {
        if self.inertia.is_detached() {
            self.inertia = InertialScroller::new(*self.inertia.config());
        }
    }

    pub fn scroll_to(&mut self, offset: f64) {
        self.offset = self.extent.clamp(offset);
    }

    /// Offset in whole terminal columns
    pub fn offset_cols(&self, cell_width_px: f64) -> u16 {
        if cell_width_px <= 0.0 {
            return 0;
        }
        (self.offset / cell_width_px).round().clamp(0.0, u16::MAX as f64) as u16
    }
}
