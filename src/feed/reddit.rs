use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::articles::Article;
use crate::feed::{RawId, is_http_url};
use crate::summarizer::{DEFAULT_SUMMARY_LENGTH, summarize};

const PERMALINK_BASE: &str = "https://www.reddit.com";

/// `{"data": {"children": [{"data": {...}}]}}`
#[derive(Debug, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub struct ListingData {
    pub children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
pub struct Thing {
    pub data: Submission,
}

#[derive(Debug, Deserialize)]
pub struct Submission {
    pub id: RawId,
    pub title: String,
    #[serde(default)]
    pub selftext: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub subreddit_name_prefixed: Option<String>,
    #[serde(default)]
    pub created_utc: Option<f64>,
}

impl Submission {
    /// `None` for submissions without a title or a usable link.
    pub fn into_article(self, now: DateTime<Utc>) -> Option<Article> {
        let id = String::from(self.id);
        if self.title.trim().is_empty() {
            debug!(%id, "skipping untitled submission");
            return None;
        }

        let permalink = self
            .permalink
            .map(|path| format!("{PERMALINK_BASE}{path}"));
        let Some(url) = self
            .url
            .filter(|url| is_http_url(url))
            .or(permalink.filter(|url| is_http_url(url)))
        else {
            debug!(%id, "skipping submission without an http(s) link");
            return None;
        };

        let body = self.selftext.unwrap_or_default().trim().to_string();
        let published_at = self
            .created_utc
            .and_then(|secs| DateTime::from_timestamp(secs as i64, 0))
            .unwrap_or(now);

        Some(Article {
            summary: summarize(&self.title, &body, DEFAULT_SUMMARY_LENGTH),
            id,
            title: self.title,
            body,
            url,
            source: self.subreddit_name_prefixed.unwrap_or_else(|| "reddit".to_string()),
            published_at,
        })
    }
}

pub fn articles_from_listing(listing: Listing, now: DateTime<Utc>) -> Vec<Article> {
    listing
        .data
        .children
        .into_iter()
        .filter_map(|thing| thing.data.into_article(now))
        .collect()
}
