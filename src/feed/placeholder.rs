use chrono::{DateTime, Utc};
use serde::Deserialize;
use url::Url;

use crate::articles::Article;
use crate::feed::RawId;
use crate::summarizer::{DEFAULT_SUMMARY_LENGTH, summarize};

const SOURCE_NAME: &str = "JSONPlaceholder";

/// One entry of the placeholder posts API.
#[derive(Debug, Deserialize)]
pub struct PlaceholderPost {
    pub id: RawId,
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// Base for per-post links: the posts endpoint without query or fragment,
/// e.g. `https://jsonplaceholder.typicode.com/posts?_limit=25` gives
/// `https://jsonplaceholder.typicode.com/posts`.
pub fn post_url_base(feed_url: &str) -> String {
    match Url::parse(feed_url) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            url.as_str().trim_end_matches('/').to_string()
        }
        Err(_) => feed_url
            .split(['?', '#'])
            .next()
            .unwrap_or(feed_url)
            .trim_end_matches('/')
            .to_string(),
    }
}

/// Placeholder posts carry no timestamp, so they are stamped with `now`.
pub fn articles_from_posts(
    posts: Vec<PlaceholderPost>,
    post_url_base: &str,
    now: DateTime<Utc>,
) -> Vec<Article> {
    posts
        .into_iter()
        .filter(|post| !post.title.trim().is_empty())
        .map(|post| {
            let id = String::from(post.id);
            let body = post.body.trim().to_string();
            Article {
                summary: summarize(&post.title, &body, DEFAULT_SUMMARY_LENGTH),
                url: format!("{post_url_base}/{id}"),
                id,
                title: post.title,
                body,
                source: SOURCE_NAME.to_string(),
                published_at: now,
            }
        })
        .collect()
}
