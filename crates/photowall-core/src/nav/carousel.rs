use std::sync::Arc;

use super::Route;
use crate::photo::{PhotoCatalog, PhotoRecord};

/// Which way the last step went, for slide-in effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// History effect of a carousel transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavCommand {
    /// Replace the current history entry; the scroll position is kept
    Replace(Route),
    /// Leave the carousel
    Back,
}

/// Identifies one image request; completions for older tickets are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    index: usize,
    generation: u64,
}

impl LoadTicket {
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Single-photo browsing state over a non-empty catalog
#[derive(Debug, Clone)]
pub struct Carousel {
    catalog: Arc<PhotoCatalog>,
    current_index: usize,
    loading: bool,
    direction: Option<Direction>,
    generation: u64,
}

impl Carousel {
    /// Open on `photo_id`, or on the first photo when the id is unknown.
    /// `None` for an empty catalog.
    pub fn open(catalog: Arc<PhotoCatalog>, photo_id: &str) -> Option<Self> {
        if catalog.is_empty() {
            return None;
        }

        let current_index = catalog.position(photo_id).unwrap_or(0);
        Some(Self {
            catalog,
            current_index,
            loading: true,
            direction: None,
            generation: 0,
        })
    }

    /// Start the load generation at `generation`. Owners that replace one
    /// carousel with another keep generations increasing so tickets from the
    /// old carousel never match the new one.
    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Generation of the current load ticket
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn catalog(&self) -> &Arc<PhotoCatalog> {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_photo(&self) -> &PhotoRecord {
        &self.catalog.as_slice()[self.current_index]
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn route(&self) -> Route {
        Route::Photo(self.current_photo().id.clone())
    }

    /// Move to `index`; `None` when it is the current index or out of range
    pub fn go_to(&mut self, index: usize) -> Option<NavCommand> {
        if index == self.current_index || index >= self.catalog.len() {
            return None;
        }

        self.direction = Some(if index > self.current_index {
            Direction::Next
        } else {
            Direction::Prev
        });
        self.loading = true;
        self.current_index = index;
        self.generation = self.generation.wrapping_add(1);

        tracing::debug!("Carousel moved to {} ({:?})", index, self.direction);
        Some(NavCommand::Replace(self.route()))
    }

    pub fn next(&mut self) -> Option<NavCommand> {
        if self.has_next() {
            self.go_to(self.current_index + 1)
        } else {
            None
        }
    }

    pub fn prev(&mut self) -> Option<NavCommand> {
        if self.has_prev() {
            self.go_to(self.current_index - 1)
        } else {
            None
        }
    }

    pub fn close(&self) -> NavCommand {
        NavCommand::Back
    }

    pub fn has_prev(&self) -> bool {
        self.current_index > 0
    }

    pub fn has_next(&self) -> bool {
        self.current_index + 1 < self.catalog.len()
    }

    /// Ticket for the image currently on display
    pub fn load_ticket(&self) -> LoadTicket {
        LoadTicket {
            index: self.current_index,
            generation: self.generation,
        }
    }

    /// Mark the current image as loaded. Returns false for a stale ticket.
    pub fn image_loaded(&mut self, ticket: LoadTicket) -> bool {
        if ticket == self.load_ticket() {
            self.loading = false;
            true
        } else {
            tracing::trace!("Ignoring stale image load for index {}", ticket.index);
            false
        }
    }
}
