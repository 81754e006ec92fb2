use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use photowall_core::{nav::Route, photo::CatalogProvider, AppConfig};
use photowall_tui::{
    app::{App, Effect, View},
    event::{AppEvent, CatalogResult, EventHandler, ImageLoadResult},
    images::spawn_image_load,
    input::{handle_key_event, handle_mouse_event},
    keymap::Keymap,
    scroll::{FrameClock, ScrollSettingsExt},
    widgets::{
        CarouselWidget, GalleryWallWidget, NotFoundWidget, StatusBarWidget, ThumbnailStripWidget,
    },
};

type Backend = CrosstermBackend<io::Stdout>;

pub async fn run(config: Arc<AppConfig>, path: Option<String>) -> Result<()> {
    let initial = match path.as_deref() {
        None => Route::Gallery,
        Some(path) => Route::parse(path)
            .ok_or_else(|| anyhow!("Invalid route '{}': expected / or /p/<id>", path))?,
    };

    let provider = CatalogProvider::from_config(&config)?;
    let keymap = Keymap::from_config(&config.keymap);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle(config.site.title.as_str()))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, config, provider, keymap, initial).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<Backend>,
    config: Arc<AppConfig>,
    provider: CatalogProvider,
    keymap: Keymap,
    initial: Route,
) -> Result<()> {
    let frame_interval = config.ui.scroll.frame_interval();
    let event_handler = EventHandler::new(config.ui.tick_rate_ms, frame_interval);
    let mut frame_clock = FrameClock::new(frame_interval);

    let mut app = App::new(config.clone(), provider.urls().clone(), initial);

    // Create channel for async image loading results
    let (img_tx, mut img_rx) = mpsc::unbounded_channel::<ImageLoadResult>();

    // Create channel for catalog loads
    let (catalog_tx, mut catalog_rx) = mpsc::unbounded_channel::<CatalogResult>();
    spawn_catalog_load(provider.clone(), false, catalog_tx.clone());

    // Checked at the end of each iteration to pick the next poll timeout
    let mut needs_fast_update = false;

    loop {
        // Process finished catalog loads (non-blocking)
        while let Ok(result) = catalog_rx.try_recv() {
            app.set_catalog(result, Instant::now());
        }

        // Process finished image loads (non-blocking)
        while let Ok(result) = img_rx.try_recv() {
            app.image_loaded(result);
        }

        // Advance scroll physics at the frame rate
        let now = Instant::now();
        if frame_clock.frame_due(now) {
            app.on_frame(now);
        }

        terminal.draw(|frame| {
            app.set_screen(frame.area());
            let layout = app.layout;

            match app.view.clone() {
                View::Gallery => GalleryWallWidget::render(frame, layout.body, &mut app),
                View::Carousel => {
                    CarouselWidget::render(frame, &layout, &app);
                    ThumbnailStripWidget::render(frame, layout.strip, &app);
                }
                View::NotFound(id) => NotFoundWidget::render(frame, layout.body, &id, &app.theme),
            }
            StatusBarWidget::render(frame, layout.status, &app);
        })?;

        // Start downloads for whatever is on screen now
        app.queue_visible_images();
        for url in app.images.take_queued() {
            spawn_image_load(provider.api(), url, img_tx.clone());
        }

        let event = if needs_fast_update {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };

        if let Some(event) = event {
            let effect = match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, &app, &keymap);
                    app.handle_action(action, Instant::now())
                }
                AppEvent::Mouse(mouse) => {
                    let action = handle_mouse_event(mouse, &app);
                    app.handle_action(action, Instant::now())
                }
                // Geometry is refreshed on the next draw
                AppEvent::Resize(_, _) => None,
                AppEvent::Tick => app.handle_tick(Instant::now()),
            };

            if let Some(effect) = effect {
                run_effect(&mut app, effect, &provider, &catalog_tx);
            }
        }

        needs_fast_update = app.needs_animation();
        if !needs_fast_update {
            frame_clock.reset();
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn run_effect(
    app: &mut App,
    effect: Effect,
    provider: &CatalogProvider,
    catalog_tx: &mpsc::UnboundedSender<CatalogResult>,
) {
    match effect {
        Effect::ReloadCatalog { force } => {
            spawn_catalog_load(provider.clone(), force, catalog_tx.clone());
        }
        Effect::OpenUrl(url) => {
            tracing::info!("Opening {}", url);
            if let Err(e) = open::that(&url) {
                tracing::warn!("Failed to open {}: {}", url, e);
                app.status_message = Some(format!("Failed to open browser: {}", e));
            }
        }
    }
}

/// Fetch the catalog in the background; a forced load drops every cache first
fn spawn_catalog_load(
    provider: CatalogProvider,
    force: bool,
    tx: mpsc::UnboundedSender<CatalogResult>,
) {
    tokio::spawn(async move {
        let catalog = if force {
            provider.refresh().await
        } else {
            provider.list_photos().await
        };
        let _ = tx.send(CatalogResult {
            catalog,
            forced: force,
        });
    });
}
