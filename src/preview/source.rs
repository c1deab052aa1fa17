use async_trait::async_trait;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::Client;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::fetcher::{FetchError, fetch_json, fetch_text, get_client};

/// Comments requested from the discussion API per thread.
pub const DISCUSSION_LIMIT: usize = 5;

const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'?')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// The two network layers behind a preview. Implementations must return
/// `FetchError::Cancelled` promptly once `cancel` fires.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PreviewSource: Send + Sync {
    /// Article text via the text-extraction proxy.
    async fn fetch_primary(
        &self,
        article_url: &str,
        cancel: &CancellationToken,
    ) -> Result<String, FetchError>;

    /// Top-ranked comments of the article's discussion thread, as raw JSON.
    async fn fetch_discussion(
        &self,
        article_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Value, FetchError>;
}

#[derive(Clone)]
pub struct HttpPreviewSource {
    client: Client,
    proxy_url: String,
    discussion_url: String,
}

impl HttpPreviewSource {
    pub fn new(
        client: Client,
        proxy_url: impl Into<String>,
        discussion_url: impl Into<String>,
    ) -> Self {
        let proxy_url: String = proxy_url.into();
        let discussion_url: String = discussion_url.into();
        Self {
            client,
            proxy_url: proxy_url.trim_end_matches('/').to_string(),
            discussion_url: discussion_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            get_client().clone(),
            config.proxy_url(),
            config.discussion_url(),
        )
    }

    /// `{proxy}/http://{article url without its scheme}`
    pub fn primary_url(&self, article_url: &str) -> String {
        format!("{}/http://{}", self.proxy_url, strip_scheme(article_url))
    }

    pub fn discussion_thread_url(&self, article_id: &str) -> String {
        format!(
            "{}/comments/{}.json?limit={}&sort=top",
            self.discussion_url,
            utf8_percent_encode(article_id, PATH_SEGMENT),
            DISCUSSION_LIMIT
        )
    }
}

/// Schemes are case-insensitive, so `HTTPS://` is stripped like `https://`.
fn strip_scheme(url: &str) -> &str {
    ["https://", "http://"]
        .iter()
        .find_map(|scheme| {
            url.get(..scheme.len())
                .filter(|prefix| prefix.eq_ignore_ascii_case(scheme))
                .map(|_| &url[scheme.len()..])
        })
        .unwrap_or(url)
}

#[async_trait]
impl PreviewSource for HttpPreviewSource {
    async fn fetch_primary(
        &self,
        article_url: &str,
        cancel: &CancellationToken,
    ) -> Result<String, FetchError> {
        let response = fetch_text(&self.client, &self.primary_url(article_url), cancel).await?;
        Ok(response.body_utf8)
    }

    async fn fetch_discussion(
        &self,
        article_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Value, FetchError> {
        fetch_json(&self.client, &self.discussion_thread_url(article_id), cancel).await
    }
}
