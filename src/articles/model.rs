use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A news item as presented to the reader.
///
/// `body` is the raw text the feed supplied, or empty when the feed had none.
/// `summary` is computed once at ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub body: String,
    pub summary: String,
    pub url: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
}

impl Article {
    /// Whitespace-only bodies count as missing.
    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(body: &str) -> Article {
        Article {
            id: "abc".to_string(),
            title: "Title".to_string(),
            body: body.to_string(),
            summary: String::new(),
            url: "https://example.com".to_string(),
            source: "r/worldnews".to_string(),
            published_at: Utc::now(),
        }
    }

    #[test]
    fn test_has_body() {
        assert!(article("Some text").has_body());
        assert!(!article("").has_body());
        assert!(!article(" \n\t ").has_body());
    }
}
