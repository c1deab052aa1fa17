use crate::fetcher::{errors::FetchError, pipeline::decode_response, types::TextResponse};
use bytes::Bytes;
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder, StatusCode, header};
use serde::de::DeserializeOwned;
use std::{future::Future, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};
use url::Url;

const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB
const USER_AGENT: &str = "newsdesk/0.1 (+https://github.com/newsdesk/newsdesk)";

const BINARY_CONTENT_TYPES: [&str; 4] = ["image/", "audio/", "video/", "application/octet-stream"];

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .default_headers({
            let mut headers = header::HeaderMap::new();
            headers.insert(
                header::ACCEPT,
                header::HeaderValue::from_static(
                    "application/json,text/plain;q=0.9,text/markdown;q=0.9,*/*;q=0.8",
                ),
            );
            headers
        })
        .build()
        .expect("Failed to build HTTP client")
});

pub fn get_client() -> &'static Client {
    &HTTP_CLIENT
}

/// Races `fut` against the token. A token that is already cancelled wins
/// without polling `fut` at all.
async fn until_cancelled<T, F>(cancel: &CancellationToken, fut: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(FetchError::Cancelled),
        result = fut => result,
    }
}

struct RawResponse {
    url_final: Url,
    status: StatusCode,
    content_type: String,
    body: Bytes,
}

async fn fetch_raw(
    client: &Client,
    url: &str,
    cancel: &CancellationToken,
) -> Result<RawResponse, FetchError> {
    let parsed_url = Url::parse(url)?;

    if cancel.is_cancelled() {
        return Err(FetchError::Cancelled);
    }

    let response = until_cancelled(cancel, async {
        client
            .get(parsed_url)
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)
    })
    .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Http { status });
    }

    if let Some(content_length) = response.content_length()
        && content_length > MAX_BODY_SIZE
    {
        return Err(FetchError::BodyTooLarge(content_length));
    }

    let url_final = response.url().clone();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or("text/plain")
        .to_string();

    let body = until_cancelled(cancel, async {
        response
            .bytes()
            .await
            .map_err(|e| FetchError::Io(e.to_string()))
    })
    .await?;

    // Content-Length may be missing or wrong
    if body.len() as u64 > MAX_BODY_SIZE {
        return Err(FetchError::BodyTooLarge(body.len() as u64));
    }

    debug!(status = %status, bytes = body.len(), "response received");

    Ok(RawResponse {
        url_final,
        status,
        content_type,
        body,
    })
}

/// GET `url` and decode the body as text. Binary payloads are refused.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch_text(
    client: &Client,
    url: &str,
    cancel: &CancellationToken,
) -> Result<TextResponse, FetchError> {
    let raw = fetch_raw(client, url, cancel).await?;

    let lowered = raw.content_type.to_ascii_lowercase();
    if BINARY_CONTENT_TYPES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
    {
        return Err(FetchError::UnsupportedContentType(raw.content_type));
    }

    decode_response(raw.url_final, raw.status, raw.content_type, raw.body)
}

/// GET `url` and deserialize the body as JSON.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    cancel: &CancellationToken,
) -> Result<T, FetchError> {
    let raw = fetch_raw(client, url, cancel).await?;
    Ok(serde_json::from_slice(&raw.body)?)
}
