use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::articles::Article;
use crate::config::Config;
use crate::feed::{
    placeholder::{PlaceholderPost, articles_from_posts, post_url_base},
    reddit::{Listing, articles_from_listing},
};
use crate::fetcher::{FetchError, fetch_json, get_client};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedOrigin {
    Live,
    Placeholder,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedSnapshot {
    pub articles: Vec<Article>,
    pub origin: FeedOrigin,
    pub fetched_at: DateTime<Utc>,
}

/// Loads the article list: the live listing first, the placeholder posts API
/// when that fails.
#[derive(Clone)]
pub struct FeedClient {
    client: Client,
    feed_url: String,
    fallback_feed_url: String,
}

impl FeedClient {
    pub fn new(
        client: Client,
        feed_url: impl Into<String>,
        fallback_feed_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            feed_url: feed_url.into(),
            fallback_feed_url: fallback_feed_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            get_client().clone(),
            config.feed_url(),
            config.fallback_feed_url(),
        )
    }

    /// Cancellation is returned as-is; any other live-feed failure switches
    /// to the placeholder source, whose error is returned if it fails too.
    #[instrument(skip_all)]
    pub async fn load(&self, cancel: &CancellationToken) -> Result<FeedSnapshot, FetchError> {
        let (articles, origin) = match self.load_live(cancel).await {
            Ok(articles) => (articles, FeedOrigin::Live),
            Err(e) if e.is_cancelled() => return Err(e),
            Err(e) => {
                warn!(error = %e, "live feed unavailable, using placeholder posts");
                (self.load_placeholder(cancel).await?, FeedOrigin::Placeholder)
            }
        };

        info!(count = articles.len(), ?origin, "feed loaded");
        Ok(FeedSnapshot {
            articles,
            origin,
            fetched_at: Utc::now(),
        })
    }

    async fn load_live(&self, cancel: &CancellationToken) -> Result<Vec<Article>, FetchError> {
        let listing: Listing = fetch_json(&self.client, &self.feed_url, cancel).await?;
        Ok(articles_from_listing(listing, Utc::now()))
    }

    async fn load_placeholder(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<Article>, FetchError> {
        let posts: Vec<PlaceholderPost> =
            fetch_json(&self.client, &self.fallback_feed_url, cancel).await?;
        Ok(articles_from_posts(
            posts,
            &post_url_base(&self.fallback_feed_url),
            Utc::now(),
        ))
    }
}
