use super::{NavCommand, Route};

/// Linear session history of routes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHistory {
    entries: Vec<Route>,
}

impl SessionHistory {
    pub fn new(initial: Route) -> Self {
        Self {
            entries: vec![initial],
        }
    }

    pub fn current(&self) -> &Route {
        // never empty: `back` refuses to pop the last entry
        &self.entries[self.entries.len() - 1]
    }

    pub fn push(&mut self, route: Route) {
        self.entries.push(route);
    }

    pub fn replace(&mut self, route: Route) {
        if let Some(last) = self.entries.last_mut() {
            *last = route;
        }
    }

    /// Pop the current entry; false when there is nothing to go back to
    pub fn back(&mut self) -> bool {
        if self.can_go_back() {
            self.entries.pop();
            true
        } else {
            false
        }
    }

    /// Apply a carousel command; a `Back` with nothing to pop lands on the gallery
    pub fn apply(&mut self, command: NavCommand) {
        match command {
            NavCommand::Replace(route) => self.replace(route),
            NavCommand::Back => {
                if !self.back() {
                    self.replace(Route::Gallery);
                }
            }
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.entries.len() > 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Route] {
        &self.entries
    }
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::new(Route::Gallery)
    }
}
