use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Proxy, StatusCode};
use thiserror::Error;
use url::Url;

use super::models::ArticleSummary;
use super::schema::QueryResponse;
use crate::config::AppConfig;
use crate::{Error, Result};

/// Upper bound MediaWiki accepts for `grnlimit` from anonymous clients
const MAX_BATCH_SIZE: u32 = 500;
const MAX_RESPONSE_BYTES: usize = 5 * 1024 * 1024;

/// Why a batch could not be loaded
#[derive(Error, Debug)]
pub enum FetchFailure {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error("response too large ({0} bytes)")]
    TooLarge(usize),

    #[error("malformed response: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("API error {code}: {info}")]
    Api { code: String, info: String },

    #[error("unexpected response shape: {0}")]
    Schema(String),
}

/// Anything that can produce a batch of random articles
///
/// `fetch_batch` never fails: a source that cannot produce articles returns
/// an empty batch.
#[async_trait::async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch_batch(&self) -> Vec<ArticleSummary>;
}

/// Loads batches of random article summaries from a MediaWiki endpoint
pub struct ArticleFeedLoader {
    client: Client,
    endpoint: Url,
    batch_size: u32,
    namespace: u32,
}

impl ArticleFeedLoader {
    /// Create a new loader with configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.api.endpoint)?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "API endpoint must be http(s): {}",
                config.api.endpoint
            )));
        }

        let client = Self::build_client(
            config.api.request_timeout_secs,
            &config.api.user_agent,
            &config.api.proxy_url,
        )?;

        Ok(Self {
            client,
            endpoint,
            batch_size: config.api.batch_size.clamp(1, MAX_BATCH_SIZE),
            namespace: config.api.namespace,
        })
    }

    /// Build HTTP client with optional proxy
    fn build_client(timeout_secs: u64, user_agent: &str, proxy_url: &Option<String>) -> Result<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Ok(ua) = HeaderValue::from_str(user_agent) {
            headers.insert(USER_AGENT, ua);
        }

        let mut builder = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(10));

        if let Some(ref proxy) = proxy_url {
            let proxy = Proxy::all(proxy)
                .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
            tracing::info!("Using HTTP proxy for article fetching");
        }

        builder.build().map_err(Error::Http)
    }

    /// Number of articles requested per batch
    pub fn batch_size(&self) -> u32 {
        self.batch_size
    }

    /// Full request URL: random pages in one namespace, with plain-text
    /// intro, original lead image, and canonical URL
    pub fn query_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("origin", "*")
            .append_pair("action", "query")
            .append_pair("format", "json")
            .append_pair("generator", "random")
            .append_pair("grnnamespace", &self.namespace.to_string())
            .append_pair("grnlimit", &self.batch_size.to_string())
            .append_pair("prop", "extracts|pageimages|info")
            .append_pair("exintro", "1")
            .append_pair("explaintext", "1")
            .append_pair("inprop", "url")
            .append_pair("piprop", "original");
        url
    }

    /// Fetch one batch, surfacing the failure cause
    pub async fn try_fetch_batch(&self) -> std::result::Result<Vec<ArticleSummary>, FetchFailure> {
        let url = self.query_url();
        tracing::debug!("Requesting {} random articles from {}", self.batch_size, self.endpoint);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status(status));
        }

        let body: Bytes = response.bytes().await?;
        if body.len() > MAX_RESPONSE_BYTES {
            return Err(FetchFailure::TooLarge(body.len()));
        }

        QueryResponse::from_slice(&body)?.into_articles(self.batch_size as usize)
    }
}

#[async_trait::async_trait]
impl ArticleSource for ArticleFeedLoader {
    async fn fetch_batch(&self) -> Vec<ArticleSummary> {
        match self.try_fetch_batch().await {
            Ok(articles) => {
                tracing::info!("Fetched {} articles", articles.len());
                articles
            }
            Err(e) => {
                tracing::warn!("Error fetching articles from {}: {}", self.endpoint, e);
                Vec::new()
            }
        }
    }
}
