use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use wikiscroll_core::feed::{ArticleSource, FetchTicket};
use wikiscroll_core::{AppConfig, ArticleFeedLoader};
use wikiscroll_tui::{
    app::App,
    event::{AppEvent, BatchResult, EventHandler, ImageLoadResult},
    fetch::spawn_batch_fetch,
    images::{build_image_client, spawn_image_load},
    input::{handle_key_event, handle_mouse_event, Action},
    keymap::Keymap,
    ui,
};

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    let keymap = Keymap::from_config(&config.keymap);
    let source: Arc<dyn ArticleSource> = Arc::new(ArticleFeedLoader::new(&config)?);
    let image_client = build_image_client(&config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("WikiScroll"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, config, &keymap, source, image_client).await;

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
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: Arc<AppConfig>,
    keymap: &Keymap,
    source: Arc<dyn ArticleSource>,
    image_client: reqwest::Client,
) -> Result<()> {
    let mut app = App::new(config.clone());
    let size = terminal.size()?;
    app.resize(size.width, size.height);

    let event_handler = EventHandler::new(config.ui.tick_rate_ms, config.ui.scroll.animation_fps);

    let (batch_tx, mut batch_rx) = mpsc::unbounded_channel::<BatchResult>();
    let (img_tx, mut img_rx) = mpsc::unbounded_channel::<ImageLoadResult>();

    if let Some(ticket) = app.feed.begin_initial_load() {
        spawn_batch_fetch(source.clone(), ticket, batch_tx.clone());
    }

    loop {
        // Process completed fetches (non-blocking)
        while let Ok(result) = batch_rx.try_recv() {
            let added = app.apply_batch(result);
            tracing::info!("Feed now holds {} articles (+{})", app.feed.len(), added);
        }

        while let Ok(result) = img_rx.try_recv() {
            app.images.apply(result);
        }

        if app.config.ui.image_preview && !app.feed.is_initial_loading() {
            for url in app.take_image_requests() {
                spawn_image_load(image_client.clone(), url, img_tx.clone());
            }
            app.prune_images();
        }

        app.update_scroll();
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        // Poll at animation rate while a panel transition is running
        let event = if app.scroll.is_animating() {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };

        if let Some(event) = event {
            let ticket = match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, &app, keymap);
                    handle_action(&mut app, action)
                }
                AppEvent::Mouse(mouse) => handle_action(&mut app, handle_mouse_event(mouse)),
                AppEvent::Resize(width, height) => app.on_resize(width, height),
                AppEvent::Tick => {
                    app.tick();
                    None
                }
            };
            if let Some(ticket) = ticket {
                spawn_batch_fetch(source.clone(), ticket, batch_tx.clone());
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_action(app: &mut App, action: Action) -> Option<FetchTicket> {
    if action != Action::OpenInBrowser {
        return app.handle_action(action);
    }

    app.pending_key = None;
    let url = app.current_article()?.full_url().to_string();
    match open::that(&url) {
        Ok(()) => app.set_status(format!("Opened {}", url)),
        Err(e) => {
            tracing::warn!("Failed to open {}: {}", url, e);
            app.set_status(format!("Failed to open browser: {}", e));
        }
    }
    None
}
