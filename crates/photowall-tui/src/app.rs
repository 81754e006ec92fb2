use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use image::DynamicImage;
use photowall_core::nav::{
    resolve_route, Carousel, NavCommand, Route, RouteOutcome, SessionHistory, Swipe,
    SwipeDetector,
};
use photowall_core::photo::{ImageUrlBuilder, PhotoCatalog, PhotoRecord, Transform};
use photowall_core::AppConfig;
use ratatui::layout::Rect;

use crate::event::{CatalogResult, ImageLoadResult};
use crate::images::{decode_placeholders, ImageCache};
use crate::input::Action;
use crate::layout::{contains, inner, ScreenLayout, StripGeometry, WallGeometry};
use crate::scroll::{centered_offset, CenteringAnimator, ScrollExtent, ScrollPane, WheelOutcome};
use crate::theme::Theme;

/// Skeleton cards shown while the catalog loads
pub const SKELETON_CARDS: usize = 12;

const SPINNER_FRAMES: usize = 10;

/// Screen currently on display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Gallery,
    Carousel,
    /// A photo route whose id is not in the catalog
    NotFound(String),
}

/// Side effect the event loop performs on behalf of the app
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the provider for the catalog again
    ReloadCatalog { force: bool },
    /// Open a URL in the system browser
    OpenUrl(String),
}

pub struct App {
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    pub urls: ImageUrlBuilder,

    // Catalog snapshot
    pub catalog: Arc<PhotoCatalog>,
    pub catalog_loaded: bool,
    catalog_fetched_at: Option<Instant>,
    pub is_refreshing: bool,

    // Navigation
    pub history: SessionHistory,
    pub view: View,
    pub carousel: Option<Carousel>,
    /// Load generation for the next carousel; never reused within a session
    load_generation: u64,
    /// Selected photo on the wall
    pub selected: usize,
    pub swipe: SwipeDetector,

    // Scrolling
    pub wall: ScrollPane,
    pub strip: ScrollPane,
    strip_tween: CenteringAnimator,

    // Images
    pub images: ImageCache,
    pub placeholders: HashMap<String, Arc<DynamicImage>>,

    // Geometry of the last frame
    pub screen: Rect,
    pub layout: ScreenLayout,
    /// Clickable intro card links
    pub link_areas: Vec<(Rect, String)>,

    pub should_quit: bool,
    pub status_message: Option<String>,
    pub pending_key: Option<char>,
    pub spinner_frame: usize,
}

impl App {
    pub fn new(config: Arc<AppConfig>, urls: ImageUrlBuilder, initial: Route) -> Self {
        let scroll = &config.ui.scroll;
        let wall = ScrollPane::new(scroll.gallery);
        let strip = ScrollPane::new(scroll.thumbnails);
        let strip_tween = CenteringAnimator::new(scroll);
        let swipe = SwipeDetector::new(config.ui.swipe_threshold_px);
        let view = match &initial {
            Route::Gallery => View::Gallery,
            // Resolved once the catalog arrives
            Route::Photo(_) => View::Carousel,
        };

        Self {
            config,
            theme: Theme::default(),
            urls,
            catalog: Arc::new(PhotoCatalog::empty()),
            catalog_loaded: false,
            catalog_fetched_at: None,
            is_refreshing: true,
            history: SessionHistory::new(initial),
            view,
            carousel: None,
            load_generation: 0,
            selected: 0,
            swipe,
            wall,
            strip,
            strip_tween,
            images: ImageCache::default(),
            placeholders: HashMap::new(),
            screen: Rect::default(),
            layout: ScreenLayout::default(),
            link_areas: Vec::new(),
            should_quit: false,
            status_message: None,
            pending_key: None,
            spinner_frame: 0,
        }
    }

    pub fn wall_geometry(&self) -> WallGeometry {
        WallGeometry::from_ui(&self.config.ui)
    }

    pub fn strip_geometry(&self) -> StripGeometry {
        StripGeometry::from_ui(&self.config.ui)
    }

    /// Number of wall slots, intro card included
    pub fn wall_slots(&self) -> usize {
        if self.catalog_loaded {
            1 + self.catalog.len()
        } else {
            1 + SKELETON_CARDS
        }
    }

    pub fn current_route(&self) -> &Route {
        self.history.current()
    }

    pub fn has_prev(&self) -> bool {
        self.carousel.as_ref().is_some_and(Carousel::has_prev)
    }

    pub fn has_next(&self) -> bool {
        self.carousel.as_ref().is_some_and(Carousel::has_next)
    }

    /// Whether the carousel is waiting for its main image
    pub fn is_photo_loading(&self) -> bool {
        self.carousel.as_ref().is_some_and(Carousel::loading)
    }

    pub fn spinner(&self) -> &'static str {
        const FRAMES: [&str; SPINNER_FRAMES] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
        FRAMES[self.spinner_frame % SPINNER_FRAMES]
    }

    // ---------------------------------------------------------------------
    // Catalog
    // ---------------------------------------------------------------------

    /// Install a freshly fetched catalog and re-resolve the current route
    pub fn set_catalog(&mut self, result: CatalogResult, now: Instant) {
        let CatalogResult { catalog, forced } = result;
        tracing::info!("Catalog loaded with {} photos", catalog.len());

        self.placeholders = decode_placeholders(catalog.iter());
        self.catalog = catalog;
        self.catalog_loaded = true;
        self.catalog_fetched_at = Some(now);
        self.is_refreshing = false;
        if forced {
            self.images.clear_failures();
            self.status_message = Some(format!("Refreshed: {} photos", self.catalog.len()));
        }
        self.selected = self.selected.min(self.catalog.len().saturating_sub(1));

        self.update_extents();
        self.sync_route(now);
    }

    /// Whether the snapshot is old enough to ask the provider again
    pub fn catalog_is_stale(&self, now: Instant) -> bool {
        match self.catalog_fetched_at {
            Some(fetched) => now.saturating_duration_since(fetched) >= self.config.cache.policy().stale,
            None => false,
        }
    }

    /// Show whatever the current history entry points at
    fn sync_route(&mut self, now: Instant) {
        match resolve_route(self.history.current(), &self.catalog) {
            RouteOutcome::Gallery => {
                self.retire_carousel();
                self.view = View::Gallery;
            }
            RouteOutcome::Photo { index } => self.show_carousel(index, now, false),
            RouteOutcome::NotFound => {
                let id = self
                    .history
                    .current()
                    .photo_id()
                    .unwrap_or_default()
                    .to_string();
                tracing::warn!("Photo '{}' is not in the catalog", id);
                self.retire_carousel();
                self.view = View::NotFound(id);
            }
        }
    }

    // ---------------------------------------------------------------------
    // Carousel
    // ---------------------------------------------------------------------

    /// Open the carousel from the wall, pushing a history entry
    pub fn open_photo(&mut self, index: usize, now: Instant) {
        let Some(photo) = self.catalog.get(index) else {
            return;
        };
        self.history.push(Route::Photo(photo.id.clone()));
        self.show_carousel(index, now, false);
    }

    fn show_carousel(&mut self, index: usize, now: Instant, animate: bool) {
        let Some(photo) = self.catalog.get(index) else {
            return;
        };
        let Some(carousel) = Carousel::open(self.catalog.clone(), &photo.id) else {
            return;
        };

        self.retire_carousel();
        self.carousel = Some(carousel.with_generation(self.load_generation));
        self.strip.remount();
        self.view = View::Carousel;
        self.selected = index;
        self.swipe.cancel();
        self.track_current_image();
        self.center_active_thumbnail(now, animate);
    }

    /// Apply the history effect of a carousel transition
    pub fn apply_nav(&mut self, command: Option<NavCommand>, now: Instant) {
        match command {
            Some(NavCommand::Replace(route)) => {
                self.history.apply(NavCommand::Replace(route));
                if let Some(carousel) = &self.carousel {
                    self.selected = carousel.current_index();
                }
                self.track_current_image();
                self.center_active_thumbnail(now, true);
            }
            Some(NavCommand::Back) => self.close_carousel(),
            None => {}
        }
    }

    pub fn close_carousel(&mut self) {
        match self.retire_carousel() {
            Some(carousel) => {
                self.history.apply(carousel.close());
                self.selected = carousel.current_index();
            }
            None => self.history.apply(NavCommand::Back),
        }
        self.view = View::Gallery;
        self.strip_tween.cancel();
        self.swipe.cancel();
        self.reveal_selected();
    }

    /// Drop the carousel and release the thumbnail strip's scroller.
    /// Tickets it handed out stay stale for every later carousel.
    fn retire_carousel(&mut self) -> Option<Carousel> {
        let carousel = self.carousel.take()?;
        self.load_generation = carousel.generation().wrapping_add(1);
        self.strip.inertia.detach();
        Some(carousel)
    }

    /// Photo named by the current route, if it is in the catalog
    pub fn route_photo(&self) -> Option<&PhotoRecord> {
        self.history
            .current()
            .photo_id()
            .and_then(|id| self.catalog.find(id))
    }

    /// Connect the carousel's load ticket to the main image
    fn track_current_image(&mut self) {
        let Some(carousel) = self.carousel.as_mut() else {
            return;
        };
        let url = self.urls.url(carousel.current_photo(), &Transform::MAIN);
        let ticket = carousel.load_ticket();

        if self.images.state(&url).is_some() && !self.images.is_loading(&url) {
            // Loaded or failed already
            carousel.image_loaded(ticket);
        } else {
            self.images.wait_for(&url, ticket);
        }
    }

    /// Apply a finished image download
    pub fn image_loaded(&mut self, result: ImageLoadResult) {
        let tickets = self.images.complete(result);
        if let Some(carousel) = self.carousel.as_mut() {
            for ticket in tickets {
                carousel.image_loaded(ticket);
            }
        }
    }

    fn center_active_thumbnail(&mut self, now: Instant, animate: bool) {
        let Some(index) = self.carousel.as_ref().map(Carousel::current_index) else {
            return;
        };
        let geometry = self.strip_geometry();
        let cell = self.config.ui.cell_width_px;
        let target = centered_offset(
            geometry.item_left(index) as f64 * cell,
            geometry.thumb_width as f64 * cell,
            self.strip.extent.client_width,
            self.strip.extent.max_offset(),
        );

        self.strip.inertia.halt();
        if animate {
            if let Some(offset) = self.strip_tween.start(self.strip.offset, target, now) {
                self.strip.scroll_to(offset);
            }
        } else {
            self.strip_tween.cancel();
            self.strip.scroll_to(target);
        }
    }

    // ---------------------------------------------------------------------
    // Wall selection
    // ---------------------------------------------------------------------

    fn select(&mut self, index: usize) {
        if self.catalog.is_empty() {
            return;
        }
        self.selected = index.min(self.catalog.len() - 1);
        self.reveal_selected();
    }

    /// Scroll the wall so the selected card is fully visible
    fn reveal_selected(&mut self) {
        if self.catalog.is_empty() || self.screen.width == 0 {
            return;
        }
        let geometry = self.wall_geometry();
        let cell = self.config.ui.cell_width_px;
        let area = self.layout.body;
        let offset_cols = self.wall.offset_cols(cell);
        let card = geometry.slot_rect(self.selected + 1, area, offset_cols);

        let left = card.x - area.x as i32;
        let right = left + card.width as i32;
        let shift = if left < 0 {
            left - geometry.padding_x as i32
        } else if right > area.width as i32 {
            right - area.width as i32 + geometry.padding_x as i32
        } else {
            return;
        };

        self.wall.inertia.halt();
        self.wall.scroll_to(self.wall.offset + shift as f64 * cell);
    }

    fn move_selection(&mut self, delta: isize) {
        if self.catalog.is_empty() {
            return;
        }
        let target = self.selected as isize + delta;
        if target >= 0 && (target as usize) < self.catalog.len() {
            self.select(target as usize);
        }
    }

    // ---------------------------------------------------------------------
    // Frame and geometry
    // ---------------------------------------------------------------------

    /// Record the terminal size and recompute scroll extents
    pub fn set_screen(&mut self, area: Rect) {
        if area != self.screen {
            self.screen = area;
            self.layout = ScreenLayout::compute(area);
            self.update_extents();
            if self.view == View::Carousel {
                self.center_active_thumbnail(Instant::now(), false);
            }
        }
    }

    fn update_extents(&mut self) {
        let cell = self.config.ui.cell_width_px;

        let wall_cols = self.wall_geometry().content_width(self.wall_slots());
        self.wall.set_extent(ScrollExtent::new(
            wall_cols as f64 * cell,
            self.layout.body.width as f64 * cell,
        ));

        let strip_cols = self.strip_geometry().content_width(self.catalog.len());
        self.strip.set_extent(ScrollExtent::new(
            strip_cols as f64 * cell,
            inner(self.layout.strip).width as f64 * cell,
        ));
    }

    /// Advance scroll animations by one frame. Returns true if anything moved.
    pub fn on_frame(&mut self, now: Instant) -> bool {
        let mut moved = self.wall.frame();
        moved |= self.strip.frame();
        if let Some(offset) = self.strip_tween.update(now) {
            self.strip.scroll_to(offset);
            moved = true;
        }
        moved
    }

    /// Whether the loop should run at the animation frame rate
    pub fn needs_animation(&self) -> bool {
        self.wall.inertia.is_running()
            || self.strip.inertia.is_running()
            || self.strip_tween.is_animating()
    }

    pub fn wall_slot_at(&self, column: u16, row: u16) -> Option<usize> {
        let offset = self.wall.offset_cols(self.config.ui.cell_width_px);
        self.wall_geometry()
            .slot_at(self.wall_slots(), self.layout.body, offset, column, row)
    }

    pub fn strip_index_at(&self, column: u16, row: u16) -> Option<usize> {
        let offset = self.strip.offset_cols(self.config.ui.cell_width_px);
        self.strip_geometry()
            .index_at(self.catalog.len(), inner(self.layout.strip), offset, column, row)
    }

    pub fn link_at(&self, column: u16, row: u16) -> Option<&str> {
        self.link_areas
            .iter()
            .find(|(rect, _)| contains(*rect, column, row))
            .map(|(_, url)| url.as_str())
    }

    /// Photo shown in wall slot `slot`
    pub fn slot_photo(&self, slot: usize) -> Option<&PhotoRecord> {
        slot.checked_sub(1).and_then(|index| self.catalog.get(index))
    }

    /// Queue downloads for everything currently on screen
    pub fn queue_visible_images(&mut self) {
        let cell = self.config.ui.cell_width_px;
        match self.view {
            View::Gallery => {
                if !self.config.ui.image_preview || !self.catalog_loaded {
                    return;
                }
                let offset = self.wall.offset_cols(cell);
                let slots = self
                    .wall_geometry()
                    .visible_slots(self.wall_slots(), self.layout.body, offset);
                for slot in slots {
                    if let Some(photo) = self.slot_photo(slot) {
                        let url = self.urls.url(photo, &Transform::CARD);
                        self.images.request(&url);
                    }
                }
            }
            View::Carousel => {
                let Some(carousel) = self.carousel.as_ref() else {
                    return;
                };
                let index = carousel.current_index();
                // The current image may have been evicted; neighbours are
                // fetched ahead so stepping is instant
                let around = [Some(index), index.checked_sub(1), Some(index + 1)];
                let mut urls: Vec<String> = around
                    .into_iter()
                    .flatten()
                    .filter_map(|i| self.catalog.get(i))
                    .map(|photo| self.urls.url(photo, &Transform::MAIN))
                    .collect();

                let strip_area = inner(self.layout.strip);
                let offset = self.strip.offset_cols(cell);
                let geometry = self.strip_geometry();
                for (i, photo) in self.catalog.iter().enumerate() {
                    if geometry.item_rect(i, strip_area, offset).clip(strip_area).is_some() {
                        urls.push(self.urls.url(photo, &Transform::THUMBNAIL));
                    }
                }
                for url in urls {
                    self.images.request(&url);
                }
            }
            View::NotFound(_) => {}
        }
    }

    // ---------------------------------------------------------------------
    // Actions
    // ---------------------------------------------------------------------

    pub fn tick_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES;
    }

    /// Periodic housekeeping. Asks for a soft reload once the snapshot is stale.
    pub fn handle_tick(&mut self, now: Instant) -> Option<Effect> {
        self.tick_spinner();
        if !self.is_refreshing && self.catalog_is_stale(now) {
            tracing::debug!("Catalog snapshot is stale, reloading");
            self.is_refreshing = true;
            return Some(Effect::ReloadCatalog { force: false });
        }
        None
    }

    /// Apply an input action. Returns a side effect for the event loop to run.
    pub fn handle_action(&mut self, action: Action, now: Instant) -> Option<Effect> {
        if action != Action::PendingG {
            self.pending_key = None;
        }
        if !matches!(action, Action::None) {
            self.status_message = None;
        }

        match action {
            Action::Quit => self.should_quit = true,
            Action::PendingG => self.pending_key = Some('g'),

            Action::MoveLeft => self.move_selection(-(self.wall_geometry().rows as isize)),
            Action::MoveRight => self.move_selection(self.wall_geometry().rows as isize),
            Action::MoveUp => self.move_selection(-1),
            Action::MoveDown => self.move_selection(1),
            Action::JumpToStart => {
                self.select(0);
                self.wall.inertia.halt();
                self.wall.scroll_to(0.0);
            }
            Action::JumpToEnd => {
                self.select(usize::MAX);
                self.wall.inertia.halt();
                self.wall.scroll_to(self.wall.extent.max_offset());
            }
            Action::OpenPhoto => {
                if !self.catalog.is_empty() {
                    self.open_photo(self.selected, now);
                }
            }
            Action::OpenAt(index) => self.open_photo(index, now),
            Action::Refresh => {
                if self.is_refreshing {
                    self.status_message = Some("Refresh already in progress".to_string());
                } else {
                    self.is_refreshing = true;
                    self.status_message = Some("Refreshing catalog...".to_string());
                    return Some(Effect::ReloadCatalog { force: true });
                }
            }
            Action::OpenLink(url) => return Some(Effect::OpenUrl(url)),

            Action::NextPhoto => {
                let command = self.carousel.as_mut().and_then(Carousel::next);
                self.apply_nav(command, now);
            }
            Action::PrevPhoto => {
                let command = self.carousel.as_mut().and_then(Carousel::prev);
                self.apply_nav(command, now);
            }
            Action::GoTo(index) => {
                let command = self.carousel.as_mut().and_then(|c| c.go_to(index));
                self.apply_nav(command, now);
            }
            Action::Close => match self.view {
                View::Carousel => self.close_carousel(),
                View::NotFound(_) => {
                    self.history.replace(Route::Gallery);
                    self.view = View::Gallery;
                }
                View::Gallery => {}
            },
            Action::OpenFullSize => {
                if let Some(carousel) = &self.carousel {
                    let url = self.urls.url(carousel.current_photo(), &Transform::FULL);
                    return Some(Effect::OpenUrl(url));
                }
            }

            Action::WheelWall(delta) => {
                self.wall.wheel(delta);
            }
            Action::WheelStrip(delta) => {
                if self.strip.wheel(delta) == WheelOutcome::Consumed {
                    self.strip_tween.cancel();
                }
            }
            Action::SwipeStart(x) => self.swipe.start(x),
            Action::SwipeMove(x) => self.swipe.moved(x),
            Action::SwipeEnd => {
                let command = match (self.swipe.end(), self.carousel.as_mut()) {
                    (Some(Swipe::Next), Some(carousel)) => carousel.next(),
                    (Some(Swipe::Prev), Some(carousel)) => carousel.prev(),
                    _ => None,
                };
                self.apply_nav(command, now);
            }
            Action::None => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn record(id: &str) -> PhotoRecord {
        PhotoRecord {
            id: id.to_string(),
            width: 300,
            height: 200,
            storage_ref: id.to_string(),
            format: "jpg".to_string(),
            placeholder: None,
        }
    }

    fn catalog(n: usize) -> CatalogResult {
        CatalogResult {
            catalog: Arc::new(PhotoCatalog::new(
                (0..n).map(|i| record(&format!("gallery/{}", i))).collect(),
            )),
            forced: false,
        }
    }

    fn app_at(route: Route) -> App {
        let urls = ImageUrlBuilder::new("https://res.cloudinary.com", "demo").unwrap();
        let mut app = App::new(Arc::new(AppConfig::default()), urls, route);
        app.set_screen(Rect::new(0, 0, 120, 40));
        app
    }

    fn loaded_app(n: usize) -> (App, Instant) {
        let now = Instant::now();
        let mut app = app_at(Route::Gallery);
        app.set_catalog(catalog(n), now);
        (app, now)
    }

    fn main_url(app: &App, index: usize) -> String {
        app.urls.url(app.catalog.get(index).unwrap(), &Transform::MAIN)
    }

    fn finish(app: &mut App, url: String) {
        app.image_loaded(ImageLoadResult {
            url,
            result: Ok(Arc::new(DynamicImage::new_rgb8(2, 2))),
        });
    }

    #[test]
    fn test_skeleton_until_catalog_arrives() {
        let app = app_at(Route::Gallery);
        assert!(!app.catalog_loaded);
        assert_eq!(app.wall_slots(), 1 + SKELETON_CARDS);
        assert_eq!(app.view, View::Gallery);
    }

    #[test]
    fn test_open_and_close_round_trip() {
        let (mut app, now) = loaded_app(5);

        app.handle_action(Action::OpenAt(2), now);
        assert_eq!(app.view, View::Carousel);
        assert_eq!(app.current_route(), &Route::Photo("gallery/2".to_string()));
        assert_eq!(app.history.len(), 2);
        assert!(app.is_photo_loading());

        app.handle_action(Action::NextPhoto, now);
        app.handle_action(Action::NextPhoto, now);
        assert_eq!(app.current_route(), &Route::Photo("gallery/4".to_string()));
        assert_eq!(app.history.len(), 2, "steps replace the entry");

        app.handle_action(Action::Close, now);
        assert_eq!(app.view, View::Gallery);
        assert_eq!(app.history.entries(), &[Route::Gallery]);
        assert_eq!(app.selected, 4);
    }

    #[test]
    fn test_deep_link_resolves_after_load() {
        let now = Instant::now();
        let mut app = app_at(Route::Photo("gallery/3".to_string()));
        app.set_catalog(catalog(5), now);

        assert_eq!(app.view, View::Carousel);
        assert_eq!(app.carousel.as_ref().unwrap().current_index(), 3);

        app.handle_action(Action::Close, now);
        assert_eq!(app.view, View::Gallery);
        assert_eq!(app.history.entries(), &[Route::Gallery]);
    }

    #[test]
    fn test_unknown_deep_link_is_not_found() {
        let now = Instant::now();
        let mut app = app_at(Route::Photo("gallery/missing".to_string()));
        app.set_catalog(catalog(2), now);
        assert_eq!(app.view, View::NotFound("gallery/missing".to_string()));

        app.handle_action(Action::Close, now);
        assert_eq!(app.view, View::Gallery);
        assert_eq!(app.current_route(), &Route::Gallery);
    }

    #[test]
    fn test_loading_clears_only_for_current_photo() {
        let (mut app, now) = loaded_app(3);
        app.handle_action(Action::OpenAt(0), now);
        let first = main_url(&app, 0);

        app.handle_action(Action::NextPhoto, now);
        finish(&mut app, first);
        assert!(app.is_photo_loading(), "stale load must not clear loading");

        let second = main_url(&app, 1);
        finish(&mut app, second);
        assert!(!app.is_photo_loading());
    }

    #[test]
    fn test_cached_image_needs_no_wait() {
        let (mut app, now) = loaded_app(3);
        let url = main_url(&app, 1);
        app.images.request(&url);
        finish(&mut app, url);

        app.handle_action(Action::OpenAt(1), now);
        assert!(!app.is_photo_loading());
    }

    #[test]
    fn test_failed_image_clears_loading() {
        let (mut app, now) = loaded_app(2);
        app.handle_action(Action::OpenAt(0), now);
        app.image_loaded(ImageLoadResult {
            url: main_url(&app, 0),
            result: Err("HTTP 500".to_string()),
        });
        assert!(!app.is_photo_loading());
        assert!(app.images.is_failed(&main_url(&app, 0)));
    }

    #[test]
    fn test_boundary_steps_do_nothing() {
        let (mut app, now) = loaded_app(2);
        app.handle_action(Action::OpenAt(0), now);
        assert!(!app.has_prev());
        app.handle_action(Action::PrevPhoto, now);
        assert_eq!(app.current_route(), &Route::Photo("gallery/0".to_string()));

        app.handle_action(Action::GoTo(1), now);
        assert!(!app.has_next());
        app.handle_action(Action::NextPhoto, now);
        assert_eq!(app.current_route(), &Route::Photo("gallery/1".to_string()));
    }

    #[test]
    fn test_swipe_navigates() {
        let (mut app, now) = loaded_app(3);
        app.handle_action(Action::OpenAt(1), now);

        app.handle_action(Action::SwipeStart(400.0), now);
        app.handle_action(Action::SwipeMove(300.0), now);
        app.handle_action(Action::SwipeEnd, now);
        assert_eq!(app.carousel.as_ref().unwrap().current_index(), 2);

        app.handle_action(Action::SwipeStart(100.0), now);
        app.handle_action(Action::SwipeMove(151.0), now);
        app.handle_action(Action::SwipeMove(300.0), now);
        app.handle_action(Action::SwipeEnd, now);
        assert_eq!(app.carousel.as_ref().unwrap().current_index(), 1);

        // Short drag and plain tap are ignored
        app.handle_action(Action::SwipeStart(100.0), now);
        app.handle_action(Action::SwipeMove(140.0), now);
        app.handle_action(Action::SwipeEnd, now);
        app.handle_action(Action::SwipeStart(100.0), now);
        app.handle_action(Action::SwipeEnd, now);
        assert_eq!(app.carousel.as_ref().unwrap().current_index(), 1);
    }

    #[test]
    fn test_wall_wheel_scrolls_and_settles() {
        let (mut app, now) = loaded_app(40);
        assert!(app.wall.extent.is_scrollable());

        app.handle_action(Action::WheelWall(100.0), now);
        assert!(app.needs_animation());
        let mut frames = 0;
        while app.on_frame(now) {
            frames += 1;
        }
        assert!(frames > 0);
        assert!(app.wall.offset > 0.0);
        assert!(!app.needs_animation());
    }

    #[test]
    fn test_wall_wheel_ignored_when_content_fits() {
        let (mut app, now) = loaded_app(1);
        assert!(!app.wall.extent.is_scrollable());
        app.handle_action(Action::WheelWall(100.0), now);
        assert!(!app.needs_animation());
        assert_eq!(app.wall.offset, 0.0);
    }

    #[test]
    fn test_strip_centering_tweens_and_wheel_cancels() {
        let (mut app, now) = loaded_app(60);
        app.handle_action(Action::OpenAt(0), now);
        assert_eq!(app.strip.offset, 0.0);

        app.handle_action(Action::GoTo(30), now);
        assert!(app.needs_animation());
        app.on_frame(now + Duration::from_secs(1));
        assert!(app.strip.offset > 0.0);
        assert!(!app.needs_animation());

        app.handle_action(Action::GoTo(40), now);
        app.handle_action(Action::WheelStrip(-100.0), now);
        assert!(!app.strip_tween.is_animating());
    }

    #[test]
    fn test_keyboard_selection_follows_columns() {
        let (mut app, now) = loaded_app(20);
        app.handle_action(Action::MoveDown, now);
        assert_eq!(app.selected, 1);
        app.handle_action(Action::MoveRight, now);
        assert_eq!(app.selected, 5);
        app.handle_action(Action::MoveLeft, now);
        app.handle_action(Action::MoveLeft, now);
        assert_eq!(app.selected, 1);
        app.handle_action(Action::JumpToEnd, now);
        assert_eq!(app.selected, 19);
        assert_eq!(app.wall.offset, app.wall.extent.max_offset());
        app.handle_action(Action::JumpToStart, now);
        assert_eq!(app.selected, 0);
        assert_eq!(app.wall.offset, 0.0);
    }

    #[test]
    fn test_open_full_size_and_links_are_effects() {
        let (mut app, now) = loaded_app(2);
        assert_eq!(app.handle_action(Action::OpenFullSize, now), None);
        app.handle_action(Action::OpenAt(1), now);
        assert_eq!(
            app.handle_action(Action::OpenFullSize, now),
            Some(Effect::OpenUrl(
                "https://res.cloudinary.com/demo/image/upload/c_scale,w_1920,q_auto,f_auto/gallery/1.jpg"
                    .to_string()
            ))
        );
        assert_eq!(
            app.handle_action(Action::OpenLink("https://github.com".to_string()), now),
            Some(Effect::OpenUrl("https://github.com".to_string()))
        );
    }

    #[test]
    fn test_refresh_and_stale_reload() {
        let (mut app, now) = loaded_app(2);
        assert_eq!(
            app.handle_action(Action::Refresh, now),
            Some(Effect::ReloadCatalog { force: true })
        );
        assert_eq!(app.handle_action(Action::Refresh, now), None);

        app.set_catalog(catalog(3), now);
        assert_eq!(app.handle_tick(now + Duration::from_secs(10)), None);
        assert_eq!(
            app.handle_tick(now + Duration::from_secs(3600)),
            Some(Effect::ReloadCatalog { force: false })
        );
        assert!(app.is_refreshing);
    }

    #[test]
    fn test_reload_keeps_open_photo() {
        let (mut app, now) = loaded_app(3);
        app.handle_action(Action::OpenAt(2), now);

        let reordered = CatalogResult {
            catalog: Arc::new(PhotoCatalog::new(vec![
                record("gallery/2"),
                record("gallery/0"),
                record("gallery/1"),
            ])),
            forced: true,
        };
        app.set_catalog(reordered, now);
        assert_eq!(app.view, View::Carousel);
        assert_eq!(app.carousel.as_ref().unwrap().current_index(), 0);
        assert_eq!(app.current_route(), &Route::Photo("gallery/2".to_string()));
    }

    #[test]
    fn test_visible_images_are_queued() {
        let (mut app, now) = loaded_app(3);
        app.queue_visible_images();
        let queued = app.images.take_queued();
        assert_eq!(queued.len(), 3);
        assert!(queued.iter().all(|url| url.contains("w_400")));

        app.handle_action(Action::OpenAt(1), now);
        app.queue_visible_images();
        let queued = app.images.take_queued();
        assert!(queued.contains(&main_url(&app, 1)));
        assert!(queued.contains(&main_url(&app, 0)));
        assert!(queued.contains(&main_url(&app, 2)));
        assert_eq!(queued.iter().filter(|url| url.contains("w_200")).count(), 3);
    }

    #[test]
    fn test_reload_does_not_revive_old_tickets() {
        let now = Instant::now();
        let mut app = app_at(Route::Gallery);
        let ids = |ids: &[&str]| CatalogResult {
            catalog: Arc::new(PhotoCatalog::new(ids.iter().map(|id| record(id)).collect())),
            forced: false,
        };
        app.set_catalog(ids(&["c", "b", "a"]), now);

        app.handle_action(Action::OpenAt(1), now);
        let url_b = main_url(&app, 1);
        app.handle_action(Action::PrevPhoto, now);
        let url_c = main_url(&app, 0);

        // "d" sorts first, so "c" now sits where "b" used to
        app.set_catalog(ids(&["d", "c", "b", "a"]), now);
        assert_eq!(app.carousel.as_ref().unwrap().current_index(), 1);
        assert!(app.is_photo_loading());

        finish(&mut app, url_b);
        assert!(app.is_photo_loading(), "b finishing must not settle c");

        finish(&mut app, url_c);
        assert!(!app.is_photo_loading());
    }

    #[test]
    fn test_evicted_current_image_is_requested_again() {
        let (mut app, now) = loaded_app(3);
        app.handle_action(Action::OpenAt(1), now);
        let current = main_url(&app, 1);
        finish(&mut app, current.clone());
        assert!(!app.is_photo_loading());

        for i in 0..200 {
            let url = format!("https://res.cloudinary.com/demo/other/{}.jpg", i);
            app.images.request(&url);
            finish(&mut app, url);
        }
        assert!(app.images.state(&current).is_none());

        app.images.take_queued();
        app.queue_visible_images();
        assert!(app.images.take_queued().contains(&current));
        assert!(app.images.is_loading(&current));
    }

    #[test]
    fn test_strip_scroller_released_on_close() {
        let (mut app, now) = loaded_app(60);
        app.handle_action(Action::OpenAt(0), now);
        assert!(!app.strip.inertia.is_detached());

        app.handle_action(Action::Close, now);
        assert!(app.strip.inertia.is_detached());
        assert!(!app.needs_animation());

        app.handle_action(Action::OpenAt(0), now);
        assert!(!app.strip.inertia.is_detached());
        app.handle_action(Action::WheelStrip(100.0), now);
        assert!(app.strip.inertia.is_running());
    }

    #[test]
    fn test_route_photo() {
        let (mut app, now) = loaded_app(3);
        assert!(app.route_photo().is_none());
        app.handle_action(Action::OpenAt(2), now);
        assert_eq!(app.route_photo().map(|p| p.id.as_str()), Some("gallery/2"));
    }

    #[test]
    fn test_pending_g() {
        let (mut app, now) = loaded_app(2);
        app.handle_action(Action::PendingG, now);
        assert_eq!(app.pending_key, Some('g'));
        app.handle_action(Action::MoveDown, now);
        assert_eq!(app.pending_key, None);
    }
}
