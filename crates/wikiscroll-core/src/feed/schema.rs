//! Typed shape of a MediaWiki `action=query` response
//!
//! Only the fields the feed renders are modelled. Anything missing that a
//! record needs fails the whole batch.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use url::Url;

use super::loader::FetchFailure;
use super::models::ArticleSummary;

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub query: Option<QueryBody>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct QueryBody {
    pub pages: OrderedPages,
}

/// API-level failure reported with a 200 status
#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub code: String,
    #[serde(default)]
    pub info: String,
}

#[derive(Debug, Deserialize)]
pub struct PageObject {
    pub title: String,
    #[serde(default)]
    pub extract: Option<String>,
    pub fullurl: String,
    #[serde(default)]
    pub original: Option<PageImage>,
}

#[derive(Debug, Deserialize)]
pub struct PageImage {
    pub source: String,
}

/// `pages` object kept in the order its keys appear in the response body
#[derive(Debug, Default)]
pub struct OrderedPages(pub Vec<(String, PageObject)>);

impl<'de> Deserialize<'de> for OrderedPages {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PagesVisitor;

        impl<'de> Visitor<'de> for PagesVisitor {
            type Value = OrderedPages;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of page ids to page objects")
            }

            fn visit_map<M>(self, mut map: M) -> Result<OrderedPages, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut pages = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((id, page)) = map.next_entry::<String, PageObject>()? {
                    pages.push((id, page));
                }
                Ok(OrderedPages(pages))
            }
        }

        deserializer.deserialize_map(PagesVisitor)
    }
}

impl QueryResponse {
    /// Parse a raw response body
    pub fn from_slice(body: &[u8]) -> Result<Self, FetchFailure> {
        serde_json::from_slice(body).map_err(FetchFailure::Malformed)
    }

    /// Convert into feed records, keeping at most `limit` of them
    pub fn into_articles(self, limit: usize) -> Result<Vec<ArticleSummary>, FetchFailure> {
        if let Some(error) = self.error {
            return Err(FetchFailure::Api {
                code: error.code,
                info: error.info,
            });
        }

        let query = self
            .query
            .ok_or_else(|| FetchFailure::Schema("response has no query.pages".to_string()))?;

        query
            .pages
            .0
            .into_iter()
            .take(limit)
            .map(|(id, page)| page.into_article(&id))
            .collect()
    }
}

impl PageObject {
    fn into_article(self, id: &str) -> Result<ArticleSummary, FetchFailure> {
        let full_url = Url::parse(&self.fullurl).map_err(|e| {
            FetchFailure::Schema(format!("page {} has invalid fullurl {:?}: {}", id, self.fullurl, e))
        })?;

        // A broken image link only costs the image, not the article
        let thumbnail = self.original.and_then(|image| match Url::parse(&image.source) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::debug!("Ignoring invalid image URL for page {}: {}", id, e);
                None
            }
        });

        ArticleSummary::new(self.title, self.extract.unwrap_or_default(), thumbnail, full_url)
            .ok_or_else(|| FetchFailure::Schema(format!("page {} has an empty title", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "batchcomplete": "",
        "continue": {"grncontinue": "0.5|0.5|0|0", "continue": "grncontinue||"},
        "query": {
            "pages": {
                "9001": {
                    "pageid": 9001,
                    "ns": 0,
                    "title": "Zebra mussel",
                    "extract": "The zebra mussel is a small freshwater mussel.",
                    "original": {"source": "https://upload.wikimedia.org/z.jpg", "width": 800, "height": 600},
                    "fullurl": "https://en.wikipedia.org/wiki/Zebra_mussel"
                },
                "12": {
                    "pageid": 12,
                    "ns": 0,
                    "title": "Anarchism",
                    "fullurl": "https://en.wikipedia.org/wiki/Anarchism"
                },
                "450": {
                    "pageid": 450,
                    "ns": 0,
                    "title": "Mount Kosciuszko",
                    "extract": "",
                    "original": {"source": "not a url"},
                    "fullurl": "https://en.wikipedia.org/wiki/Mount_Kosciuszko"
                }
            }
        }
    }"#;

    #[test]
    fn test_pages_keep_wire_order() {
        let articles = QueryResponse::from_slice(SAMPLE.as_bytes())
            .unwrap()
            .into_articles(20)
            .unwrap();

        let titles: Vec<&str> = articles.iter().map(|a| a.title()).collect();
        assert_eq!(titles, vec!["Zebra mussel", "Anarchism", "Mount Kosciuszko"]);
    }

    #[test]
    fn test_optional_fields() {
        let articles = QueryResponse::from_slice(SAMPLE.as_bytes())
            .unwrap()
            .into_articles(20)
            .unwrap();

        assert_eq!(
            articles[0].thumbnail().map(|u| u.as_str()),
            Some("https://upload.wikimedia.org/z.jpg")
        );
        assert_eq!(articles[1].extract(), "");
        assert!(articles[1].thumbnail().is_none());
        // Unparseable image URL degrades to the fallback image
        assert!(articles[2].thumbnail().is_none());
    }

    #[test]
    fn test_limit_truncates() {
        let articles = QueryResponse::from_slice(SAMPLE.as_bytes())
            .unwrap()
            .into_articles(2)
            .unwrap();
        assert_eq!(articles.len(), 2);
    }

    #[test]
    fn test_missing_query_is_schema_failure() {
        let result = QueryResponse::from_slice(br#"{"batchcomplete": ""}"#)
            .unwrap()
            .into_articles(20);
        assert!(matches!(result, Err(FetchFailure::Schema(_))));
    }

    #[test]
    fn test_api_error_object() {
        let body = br#"{"error": {"code": "badvalue", "info": "Unrecognized value for parameter \"prop\"."}}"#;
        let result = QueryResponse::from_slice(body).unwrap().into_articles(20);
        match result {
            Err(FetchFailure::Api { code, .. }) => assert_eq!(code, "badvalue"),
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[test]
    fn test_page_without_fullurl_is_malformed() {
        let body = br#"{"query": {"pages": {"1": {"title": "No link"}}}}"#;
        assert!(matches!(
            QueryResponse::from_slice(body),
            Err(FetchFailure::Malformed(_))
        ));
    }

    #[test]
    fn test_blank_title_rejected() {
        let body = br#"{"query": {"pages": {"1": {"title": "", "fullurl": "https://en.wikipedia.org/wiki/X"}}}}"#;
        let result = QueryResponse::from_slice(body).unwrap().into_articles(20);
        assert!(matches!(result, Err(FetchFailure::Schema(_))));
    }

    #[test]
    fn test_pages_must_be_a_map() {
        let body = br#"{"query": {"pages": [1, 2, 3]}}"#;
        assert!(matches!(
            QueryResponse::from_slice(body),
            Err(FetchFailure::Malformed(_))
        ));
    }
}
