use std::collections::HashSet;
use std::sync::Arc;

use wikiscroll_core::feed::{ArticleFeed, FetchTicket, ScrollMetrics, ScrollPaginator};
use wikiscroll_core::{AppConfig, ArticleSummary};

use crate::event::BatchResult;
use crate::images::{ImageCache, Raster};
use crate::input::Action;
use crate::scroll::ScrollAnimator;
use crate::theme::Theme;

/// Rows reserved below the feed for the status bar
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Images are requested for panels this far behind / ahead of the current one
const IMAGE_PRELOAD_BEHIND: usize = 1;
const IMAGE_PRELOAD_AHEAD: usize = 2;
/// Decoded images further than this many panels away are released
const IMAGE_KEEP_RADIUS: usize = 4;

/// One full-viewport section of the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Welcome,
    Article(usize),
    /// Trails the feed while a follow-up batch is in flight
    LoadingMore,
}

/// Application state, owned by the UI loop
pub struct App {
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    pub feed: ArticleFeed,
    pub scroll: ScrollAnimator,
    pub images: ImageCache,
    pub viewport_width: u16,
    /// Rows available to the feed; every panel is exactly this tall
    pub viewport_height: u16,
    pub should_quit: bool,
    pub status_message: Option<String>,
    /// Pending key for multi-key sequences (e.g. 'g' for gg)
    pub pending_key: Option<char>,
    pub tick_count: u64,
}

impl App {
    pub fn new(config: impl Into<Arc<AppConfig>>) -> Self {
        let config = config.into();
        let paginator = ScrollPaginator::new(config.ui.load_ahead_viewports);

        Self {
            theme: Theme::from_overrides(&config.ui.theme),
            feed: ArticleFeed::new(paginator),
            scroll: ScrollAnimator::new(config.ui.scroll.clone()),
            images: ImageCache::new(),
            viewport_width: 80,
            viewport_height: 24 - STATUS_BAR_HEIGHT,
            should_quit: false,
            status_message: None,
            pending_key: None,
            tick_count: 0,
            config,
        }
    }

    /// Adopt a new terminal size, keeping the same panel in view
    pub fn resize(&mut self, width: u16, height: u16) {
        let old_height = self.panel_height();
        let target = self.scroll.target();
        let panel = target / old_height;
        let within = target % old_height;

        self.viewport_width = width;
        self.viewport_height = height.saturating_sub(STATUS_BAR_HEIGHT).max(1);

        let new_height = self.panel_height();
        let anchor = panel
            .saturating_mul(new_height)
            .saturating_add(within.min(new_height - 1));
        self.scroll.jump_to(anchor, self.max_scroll());
    }

    /// Resize and report the new geometry to the paginator
    pub fn on_resize(&mut self, width: u16, height: u16) -> Option<FetchTicket> {
        self.resize(width, height);
        self.feed.on_scroll(self.scroll_metrics())
    }

    pub fn panel_height(&self) -> u32 {
        u32::from(self.viewport_height.max(1))
    }

    /// Welcome panel, one per article, plus the trailing loading panel
    pub fn panel_count(&self) -> usize {
        1 + self.feed.len() + usize::from(self.feed.is_loading_more())
    }

    pub fn panel_at(&self, index: usize) -> Option<Panel> {
        let articles = self.feed.len();
        match index {
            0 => Some(Panel::Welcome),
            i if i <= articles => Some(Panel::Article(i - 1)),
            i if i == articles + 1 && self.feed.is_loading_more() => Some(Panel::LoadingMore),
            _ => None,
        }
    }

    pub fn content_height(&self) -> u32 {
        u32::try_from(self.panel_count())
            .unwrap_or(u32::MAX)
            .saturating_mul(self.panel_height())
    }

    pub fn max_scroll(&self) -> u32 {
        self.content_height().saturating_sub(self.panel_height())
    }

    /// Geometry handed to the paginator, measured at the scroll target
    pub fn scroll_metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            offset: self.scroll.target(),
            viewport_height: self.panel_height(),
            content_height: self.content_height(),
        }
    }

    /// Panel under the centre row of the viewport as drawn
    pub fn current_panel_index(&self) -> usize {
        let height = self.panel_height();
        let centre = self.scroll.current().saturating_add(height / 2);
        ((centre / height) as usize).min(self.panel_count() - 1)
    }

    pub fn current_panel(&self) -> Option<Panel> {
        self.panel_at(self.current_panel_index())
    }

    pub fn current_article(&self) -> Option<&ArticleSummary> {
        match self.current_panel()? {
            Panel::Article(i) => self.feed.articles().get(i),
            _ => None,
        }
    }

    /// Apply an input action; a scroll may hand back a fetch to start
    pub fn handle_action(&mut self, action: Action) -> Option<FetchTicket> {
        if action != Action::PendingG {
            self.pending_key = None;
        }

        match action {
            Action::Quit => self.should_quit = true,
            Action::PendingG => self.pending_key = Some('g'),
            action if action.is_scroll() => {
                self.clear_status();
                self.apply_scroll(action);
                return self.feed.on_scroll(self.scroll_metrics());
            }
            // Opening the browser needs the platform opener, handled by the caller
            _ => {}
        }
        None
    }

    fn apply_scroll(&mut self, action: Action) {
        let height = self.panel_height();
        let max = self.max_scroll();
        let target = self.scroll.target();
        let lines = i64::from(self.scroll.scroll_lines());
        let half = i64::from((height / 2).max(1));

        match action {
            Action::ScrollDown => self.scroll.scroll_by(lines, max),
            Action::ScrollUp => self.scroll.scroll_by(-lines, max),
            Action::ScrollHalfPageDown => self.scroll.scroll_by(half, max),
            Action::ScrollHalfPageUp => self.scroll.scroll_by(-half, max),
            Action::NextPanel => {
                let next = (target / height).saturating_add(1).saturating_mul(height);
                self.scroll.animate_to(next, max);
            }
            Action::PrevPanel => {
                let panel = target / height;
                let prev = if target % height == 0 {
                    panel.saturating_sub(1)
                } else {
                    panel
                };
                self.scroll.animate_to(prev * height, max);
            }
            Action::JumpToTop => self.scroll.animate_to(0, max),
            Action::JumpToBottom => self.scroll.animate_to(max, max),
            _ => {}
        }
    }

    /// Append a resolved batch; returns the number of new articles
    pub fn apply_batch(&mut self, result: BatchResult) -> usize {
        let first = self.feed.is_initial_loading();
        let added = self.feed.apply_batch(result.ticket, result.articles);
        tracing::debug!(
            "Batch applied: +{} (total {}, first: {})",
            added,
            self.feed.len(),
            first
        );

        // The loading panel is gone; keep the position inside the content
        let max = self.max_scroll();
        if self.scroll.target() > max {
            self.scroll.jump_to(max, max);
        }
        added
    }

    /// Advance per-frame state; returns the row offset to draw
    pub fn update_scroll(&mut self) -> u32 {
        let max = self.max_scroll();
        self.scroll.update(max)
    }

    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
    }

    /// Chevron phase, flipping every half second at the default tick rate
    pub fn bounce(&self) -> bool {
        (self.tick_count / 5) % 2 == 1
    }

    /// Key label shown on the "Read full article" button
    pub fn open_hint(&self) -> &str {
        match self.config.keymap.open_browser.as_str() {
            "<CR>" | "<Enter>" => "⏎",
            other => other,
        }
    }

    /// Image to draw behind a panel: the article's own image unless it is
    /// missing or failed, then the fallback image
    pub fn backdrop_url(&self, panel: Panel) -> Option<String> {
        if !self.config.ui.image_preview {
            return None;
        }
        let fallback = &self.config.ui.fallback_image_url;
        match panel {
            Panel::Welcome => Some(fallback.clone()),
            Panel::Article(index) => {
                let article = self.feed.articles().get(index)?;
                match article.thumbnail() {
                    Some(url) if !self.images.is_failed(url.as_str()) => Some(url.to_string()),
                    _ => Some(fallback.clone()),
                }
            }
            Panel::LoadingMore => None,
        }
    }

    /// Raster for a panel background if its image is ready
    pub fn backdrop_raster(&mut self, panel: Panel, width: u16, height: u16) -> Option<Arc<Raster>> {
        let url = self.backdrop_url(panel)?;
        self.images.raster(&url, width, height)
    }

    fn image_urls_around(&self, behind: usize, ahead: usize) -> Vec<String> {
        let current = self.current_panel_index();
        let start = current.saturating_sub(behind);
        let end = current.saturating_add(ahead).min(self.panel_count() - 1);

        let mut urls = Vec::new();
        for index in start..=end {
            if let Some(url) = self.panel_at(index).and_then(|p| self.backdrop_url(p)) {
                if !urls.contains(&url) {
                    urls.push(url);
                }
            }
        }
        urls
    }

    /// Images near the viewport that have not been requested yet; marks them
    /// as loading so each is requested once
    pub fn take_image_requests(&mut self) -> Vec<String> {
        let wanted: Vec<String> = self
            .image_urls_around(IMAGE_PRELOAD_BEHIND, IMAGE_PRELOAD_AHEAD)
            .into_iter()
            .filter(|url| self.images.needs_load(url))
            .collect();
        for url in &wanted {
            self.images.start_loading(url);
        }
        wanted
    }

    /// Release decoded images of panels far from the viewport
    pub fn prune_images(&mut self) {
        let mut keep: HashSet<String> = self
            .image_urls_around(IMAGE_KEEP_RADIUS, IMAGE_KEEP_RADIUS)
            .into_iter()
            .collect();
        keep.insert(self.config.ui.fallback_image_url.clone());
        self.images.retain_ready(&keep);
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}
