use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};
use image::DynamicImage;
use photowall_core::photo::PhotoCatalog;

/// Event handler for terminal events
pub struct EventHandler {
    tick_rate: Duration,
    animation_tick: Duration,
}

/// A finished image download
#[derive(Debug)]
pub struct ImageLoadResult {
    pub url: String,
    pub result: std::result::Result<Arc<DynamicImage>, String>,
}

/// A finished catalog fetch
#[derive(Debug)]
pub struct CatalogResult {
    pub catalog: Arc<PhotoCatalog>,
    /// True when the user asked for a forced refresh
    pub forced: bool,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64, animation_tick: Duration) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
            animation_tick,
        }
    }

    /// Poll for the next event at the idle tick rate
    pub fn next(&self) -> Result<Option<AppEvent>> {
        self.poll(self.tick_rate)
    }

    /// Poll at the animation frame rate, used while anything is moving
    pub fn next_animation(&self) -> Result<Option<AppEvent>> {
        self.poll(self.animation_tick)
    }

    fn poll(&self, timeout: Duration) -> Result<Option<AppEvent>> {
        if event::poll(timeout)? {
            match event::read()? {
                // Only presses; some terminals also report releases
                Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(AppEvent::Key(key))),
                Event::Mouse(mouse) => Ok(Some(AppEvent::Mouse(mouse))),
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
}
