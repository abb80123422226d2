mod loader;
mod models;
mod paginator;
mod schema;

pub use loader::{ArticleFeedLoader, ArticleSource, FetchFailure};
pub use models::ArticleSummary;
pub use paginator::{ArticleFeed, FetchTicket, PaginatorState, ScrollMetrics, ScrollPaginator};
