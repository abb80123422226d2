use std::sync::Arc;

use tokio::sync::mpsc;
use wikiscroll_core::feed::{ArticleSource, FetchTicket};

use crate::event::BatchResult;

/// Run one batch fetch in the background and send the result back to the
/// UI loop; the ticket travels with the batch so the paginator is released
/// exactly once
pub fn spawn_batch_fetch(
    source: Arc<dyn ArticleSource>,
    ticket: FetchTicket,
    tx: mpsc::UnboundedSender<BatchResult>,
) {
    tracing::debug!("Fetching batch #{}", ticket.seq());
    tokio::spawn(async move {
        let articles = source.fetch_batch().await;
        if tx.send(BatchResult { ticket, articles }).is_err() {
            tracing::debug!("UI loop gone; dropping fetched batch");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use url::Url;
    use wikiscroll_core::feed::ArticleSummary;
    use wikiscroll_core::AppConfig;

    use crate::app::App;
    use crate::input::Action;

    /// Returns `size` numbered articles per call, or nothing when `size` is 0
    struct StubSource {
        size: usize,
        calls: AtomicUsize,
    }

    impl StubSource {
        fn new(size: usize) -> Arc<Self> {
            Arc::new(Self {
                size,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ArticleSource for StubSource {
        async fn fetch_batch(&self) -> Vec<ArticleSummary> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            (0..self.size)
                .filter_map(|n| {
                    let id = call * 100 + n;
                    ArticleSummary::new(
                        format!("Page {}", id),
                        "",
                        None,
                        Url::parse(&format!("https://en.wikipedia.org/wiki/Page_{}", id)).ok()?,
                    )
                })
                .collect()
        }
    }

    #[tokio::test]
    async fn test_initial_fetch_round_trip() {
        let source = StubSource::new(20);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new(AppConfig::default());

        let ticket = app.feed.begin_initial_load().unwrap();
        spawn_batch_fetch(source.clone(), ticket, tx);

        let result = rx.recv().await.unwrap();
        assert_eq!(result.ticket.seq(), 1);
        app.apply_batch(result);

        assert_eq!(app.feed.len(), 20);
        assert!(!app.feed.is_initial_loading());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_source_still_releases_paginator() {
        let source = StubSource::new(0);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new(AppConfig::default());

        let ticket = app.feed.begin_initial_load().unwrap();
        spawn_batch_fetch(source, ticket, tx);
        app.apply_batch(rx.recv().await.unwrap());

        assert!(app.feed.is_empty());
        assert!(!app.feed.is_initial_loading());
        assert!(!app.feed.paginator().is_fetching());
    }

    #[tokio::test]
    async fn test_follow_up_batches_append_in_order() {
        let source = StubSource::new(3);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new(AppConfig::default());
        app.resize(80, 11);

        let ticket = app.feed.begin_initial_load().unwrap();
        spawn_batch_fetch(source.clone(), ticket, tx.clone());
        app.apply_batch(rx.recv().await.unwrap());

        // 4 panels of 10 rows; the last panel is within two viewports of the end
        let ticket = app.handle_action(Action::JumpToBottom).unwrap();
        assert!(app.handle_action(Action::ScrollDown).is_none());
        spawn_batch_fetch(source.clone(), ticket, tx);
        app.apply_batch(rx.recv().await.unwrap());

        let titles: Vec<&str> = app.feed.articles().iter().map(|a| a.title()).collect();
        assert_eq!(
            titles,
            vec!["Page 0", "Page 1", "Page 2", "Page 100", "Page 101", "Page 102"]
        );
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
