pub mod client;
pub mod placeholder;
pub mod poller;
pub mod reddit;

use serde::Deserialize;
use url::Url;

pub use client::{FeedClient, FeedOrigin, FeedSnapshot};
pub use poller::FeedPoller;

/// Identifier as sent by a feed: some sources use strings, others numbers.
/// Articles always carry the string form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(u64),
}

impl From<RawId> for String {
    fn from(id: RawId) -> Self {
        match id {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

pub(crate) fn is_http_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}
