//! Scroll-driven pagination for the article feed
//!
//! `ScrollPaginator` decides when another batch is needed; `ArticleFeed` owns
//! the append-only article sequence and feeds resolved batches back into the
//! paginator. Both are plain state mutated from the UI loop, so the only
//! concurrency is the fetch task itself.

use chrono::{DateTime, Utc};

use super::models::ArticleSummary;

/// Scroll position snapshot, in rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMetrics {
    /// Rows scrolled past the top of the content
    pub offset: u32,
    /// Visible rows
    pub viewport_height: u32,
    /// Total rows of loaded content
    pub content_height: u32,
}

impl ScrollMetrics {
    /// True once the bottom of the content is within `lookahead` viewports
    pub fn near_bottom(&self, lookahead: u32) -> bool {
        let reach = u64::from(self.offset)
            + u64::from(lookahead) * u64::from(self.viewport_height);
        reach >= u64::from(self.content_height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginatorState {
    Idle,
    Fetching,
}

/// Permission to run exactly one batch fetch
///
/// Only the paginator creates tickets, and never while one is outstanding.
#[derive(Debug, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
}

impl FetchTicket {
    /// Request number, starting at 1
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Two-state guard that turns scroll events into at most one in-flight fetch
#[derive(Debug, Clone)]
pub struct ScrollPaginator {
    state: PaginatorState,
    lookahead_viewports: u32,
    issued: u64,
}

impl Default for ScrollPaginator {
    fn default() -> Self {
        Self::new(2)
    }
}

impl ScrollPaginator {
    pub fn new(lookahead_viewports: u32) -> Self {
        Self {
            state: PaginatorState::Idle,
            lookahead_viewports,
            issued: 0,
        }
    }

    pub fn state(&self) -> PaginatorState {
        self.state
    }

    pub fn is_fetching(&self) -> bool {
        self.state == PaginatorState::Fetching
    }

    /// Total number of fetches issued so far
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// Evaluate one scroll event; returns a ticket on `Idle -> Fetching`
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> Option<FetchTicket> {
        if self.is_fetching() || !metrics.near_bottom(self.lookahead_viewports) {
            return None;
        }
        self.request()
    }

    /// Start a fetch regardless of scroll position, if none is in flight
    pub fn request(&mut self) -> Option<FetchTicket> {
        if self.is_fetching() {
            return None;
        }
        self.state = PaginatorState::Fetching;
        self.issued += 1;
        tracing::debug!("Issuing fetch #{}", self.issued);
        Some(FetchTicket { seq: self.issued })
    }

    /// The fetch for `ticket` resolved; back to `Idle`
    pub fn complete(&mut self, ticket: FetchTicket) {
        if ticket.seq != self.issued {
            tracing::warn!(
                "Completed fetch #{} while #{} was outstanding",
                ticket.seq,
                self.issued
            );
        }
        self.state = PaginatorState::Idle;
    }
}

/// Owned feed state: the article sequence plus its paginator
#[derive(Debug, Clone)]
pub struct ArticleFeed {
    articles: Vec<ArticleSummary>,
    paginator: ScrollPaginator,
    initial_loaded: bool,
    batches_resolved: u64,
    last_batch_at: Option<DateTime<Utc>>,
}

impl Default for ArticleFeed {
    fn default() -> Self {
        Self::new(ScrollPaginator::default())
    }
}

impl ArticleFeed {
    pub fn new(paginator: ScrollPaginator) -> Self {
        Self {
            articles: Vec::new(),
            paginator,
            initial_loaded: false,
            batches_resolved: 0,
            last_batch_at: None,
        }
    }

    /// Articles in load order
    pub fn articles(&self) -> &[ArticleSummary] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn paginator(&self) -> &ScrollPaginator {
        &self.paginator
    }

    /// The first batch has not resolved yet
    pub fn is_initial_loading(&self) -> bool {
        !self.initial_loaded
    }

    /// A follow-up batch is in flight
    pub fn is_loading_more(&self) -> bool {
        self.initial_loaded && self.paginator.is_fetching()
    }

    pub fn batches_resolved(&self) -> u64 {
        self.batches_resolved
    }

    pub fn last_batch_at(&self) -> Option<DateTime<Utc>> {
        self.last_batch_at
    }

    /// Request the first batch; no-op once it has been requested
    pub fn begin_initial_load(&mut self) -> Option<FetchTicket> {
        if self.initial_loaded || self.paginator.issued() > 0 {
            return None;
        }
        self.paginator.request()
    }

    /// Feed a scroll event to the paginator
    ///
    /// Ignored until the first batch resolves, so the loading screen cannot
    /// trigger a second request.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> Option<FetchTicket> {
        if !self.initial_loaded {
            return None;
        }
        self.paginator.on_scroll(metrics)
    }

    /// Append a resolved batch (possibly empty) and release the guard
    ///
    /// Returns the number of appended articles.
    pub fn apply_batch(&mut self, ticket: FetchTicket, batch: Vec<ArticleSummary>) -> usize {
        let appended = batch.len();
        self.articles.extend(batch);
        self.paginator.complete(ticket);
        self.initial_loaded = true;
        self.batches_resolved += 1;
        self.last_batch_at = Some(Utc::now());

        if appended == 0 {
            tracing::debug!("Batch resolved empty; feed stays at {} articles", self.articles.len());
        }
        appended
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn article(n: usize) -> ArticleSummary {
        ArticleSummary::new(
            format!("Article {}", n),
            "extract",
            None,
            Url::parse(&format!("https://en.wikipedia.org/wiki/Article_{}", n)).unwrap(),
        )
        .unwrap()
    }

    fn batch(range: std::ops::Range<usize>) -> Vec<ArticleSummary> {
        range.map(article).collect()
    }

    fn metrics(offset: u32, viewport_height: u32, content_height: u32) -> ScrollMetrics {
        ScrollMetrics {
            offset,
            viewport_height,
            content_height,
        }
    }

    fn loaded_feed(count: usize) -> ArticleFeed {
        let mut feed = ArticleFeed::default();
        let ticket = feed.begin_initial_load().unwrap();
        feed.apply_batch(ticket, batch(0..count));
        feed
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // offset + 2 * 10 >= 100
        assert!(!metrics(79, 10, 100).near_bottom(2));
        assert!(metrics(80, 10, 100).near_bottom(2));
        assert!(metrics(95, 10, 100).near_bottom(2));
    }

    #[test]
    fn test_threshold_does_not_overflow() {
        assert!(metrics(u32::MAX, u32::MAX, u32::MAX).near_bottom(2));
    }

    #[test]
    fn test_far_from_bottom_issues_nothing() {
        let mut paginator = ScrollPaginator::new(2);
        assert!(paginator.on_scroll(metrics(0, 10, 1000)).is_none());
        assert_eq!(paginator.state(), PaginatorState::Idle);
        assert_eq!(paginator.issued(), 0);
    }

    #[test]
    fn test_rapid_scroll_events_issue_one_fetch() {
        let mut paginator = ScrollPaginator::new(2);

        let tickets: Vec<FetchTicket> = (0..50)
            .filter_map(|i| paginator.on_scroll(metrics(80 + i, 10, 100)))
            .collect();

        assert_eq!(tickets.len(), 1);
        assert_eq!(paginator.issued(), 1);
        assert!(paginator.is_fetching());
    }

    #[test]
    fn test_complete_returns_to_idle_and_allows_next_fetch() {
        let mut paginator = ScrollPaginator::new(2);
        let ticket = paginator.on_scroll(metrics(90, 10, 100)).unwrap();
        assert_eq!(ticket.seq(), 1);

        paginator.complete(ticket);
        assert_eq!(paginator.state(), PaginatorState::Idle);

        let next = paginator.on_scroll(metrics(90, 10, 100)).unwrap();
        assert_eq!(next.seq(), 2);
    }

    #[test]
    fn test_initial_load_shows_batch_and_clears_loading() {
        let mut feed = ArticleFeed::default();
        assert!(feed.is_initial_loading());

        let ticket = feed.begin_initial_load().unwrap();
        assert!(feed.begin_initial_load().is_none());
        assert!(feed.is_initial_loading());

        assert_eq!(feed.apply_batch(ticket, batch(0..20)), 20);
        assert!(!feed.is_initial_loading());
        assert!(!feed.is_loading_more());
        assert_eq!(feed.len(), 20);
        assert!(feed.last_batch_at().is_some());
    }

    #[test]
    fn test_failed_initial_load_leaves_empty_feed() {
        let mut feed = ArticleFeed::default();
        let ticket = feed.begin_initial_load().unwrap();

        assert_eq!(feed.apply_batch(ticket, Vec::new()), 0);
        assert!(feed.is_empty());
        assert!(!feed.is_initial_loading());
        assert_eq!(feed.paginator().state(), PaginatorState::Idle);
    }

    #[test]
    fn test_scroll_ignored_before_initial_load_resolves() {
        let mut feed = ArticleFeed::default();
        let _ticket = feed.begin_initial_load().unwrap();
        assert!(feed.on_scroll(metrics(0, 10, 10)).is_none());
        assert_eq!(feed.paginator().issued(), 1);
    }

    #[test]
    fn test_scroll_near_bottom_issues_exactly_one_fetch() {
        let mut feed = loaded_feed(20);
        // welcome + 20 panels, 10 rows each
        let content = 21 * 10;

        assert!(feed.on_scroll(metrics(100, 10, content)).is_none());

        let ticket = feed.on_scroll(metrics(190, 10, content));
        assert!(ticket.is_some());
        assert!(feed.is_loading_more());

        for offset in 191..210 {
            assert!(feed.on_scroll(metrics(offset, 10, content + 10)).is_none());
        }
        assert_eq!(feed.paginator().issued(), 2);

        feed.apply_batch(ticket.unwrap(), batch(20..40));
        assert_eq!(feed.len(), 40);
        assert!(!feed.is_loading_more());
    }

    #[test]
    fn test_appending_is_monotonic_and_ordered() {
        let mut feed = loaded_feed(3);
        let before: Vec<ArticleSummary> = feed.articles().to_vec();

        let ticket = feed.on_scroll(metrics(0, 10, 10)).unwrap();
        feed.apply_batch(ticket, Vec::new());
        assert_eq!(feed.articles(), before.as_slice());

        // Repeats are kept
        let ticket = feed.on_scroll(metrics(0, 10, 10)).unwrap();
        feed.apply_batch(ticket, batch(0..2));
        assert_eq!(feed.len(), 5);
        assert_eq!(&feed.articles()[..3], before.as_slice());
        assert_eq!(feed.articles()[3], feed.articles()[0]);
        assert_eq!(feed.batches_resolved(), 3);
    }

    #[test]
    fn test_empty_batch_does_not_halt_loading() {
        let mut feed = loaded_feed(0);
        for _ in 0..3 {
            let ticket = feed.on_scroll(metrics(0, 10, 10)).expect("guard released");
            feed.apply_batch(ticket, Vec::new());
        }
        assert_eq!(feed.paginator().issued(), 4);
    }
}
