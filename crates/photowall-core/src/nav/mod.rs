//! Routes, session history and carousel navigation

mod carousel;
mod gesture;
mod history;
mod route;

pub use carousel::{Carousel, Direction, LoadTicket, NavCommand};
pub use gesture::{Swipe, SwipeDetector, DEFAULT_SWIPE_THRESHOLD};
pub use history::SessionHistory;
pub use route::{resolve_route, Route, RouteOutcome};
