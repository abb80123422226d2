use serde::Serialize;
use url::Url;

/// One article's display data, normalized from a content API page object
///
/// Fields are private so a record cannot change after it enters the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleSummary {
    title: String,
    extract: String,
    thumbnail: Option<Url>,
    full_url: Url,
}

impl ArticleSummary {
    /// Build a record, rejecting a blank title
    pub fn new(
        title: impl Into<String>,
        extract: impl Into<String>,
        thumbnail: Option<Url>,
        full_url: Url,
    ) -> Option<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return None;
        }
        Some(Self {
            title,
            extract: extract.into(),
            thumbnail,
            full_url,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Plain-text intro, possibly empty
    pub fn extract(&self) -> &str {
        &self.extract
    }

    /// Lead image, if the article has one
    pub fn thumbnail(&self) -> Option<&Url> {
        self.thumbnail.as_ref()
    }

    pub fn full_url(&self) -> &Url {
        &self.full_url
    }

    /// Get a preview of the extract (first N bytes, cut on a char boundary)
    pub fn extract_preview(&self, max_len: usize) -> String {
        if max_len == 0 {
            return String::new();
        }

        let text = self.extract.as_str();
        if text.len() <= max_len {
            text.to_string()
        } else {
            let mut end = 0;
            for (idx, ch) in text.char_indices() {
                let next = idx + ch.len_utf8();
                if next > max_len {
                    break;
                }
                end = next;
            }
            format!("{}...", &text[..end])
        }
    }
}
