pub mod config;
pub mod error;
pub mod feed;

pub use config::{AppConfig, EasingType, ScrollConfig};
pub use error::{Error, Result};
pub use feed::{ArticleFeed, ArticleFeedLoader, ArticleSource, ArticleSummary, ScrollPaginator};
