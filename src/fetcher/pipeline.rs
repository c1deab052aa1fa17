use crate::fetcher::{
    errors::FetchError,
    types::{Charset, TextResponse},
};
use bytes::Bytes;
use chrono::Utc;
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::StatusCode;
use std::sync::LazyLock;
use url::Url;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

const SNIFF_WINDOW: usize = 4096;

pub fn decode_response(
    url_final: Url,
    status: StatusCode,
    content_type: String,
    body_bytes: Bytes,
) -> Result<TextResponse, FetchError> {
    let encoding = detect_encoding(&content_type, &body_bytes);
    let body_utf8 = decode_to_utf8(&body_bytes, encoding)?;

    Ok(TextResponse {
        url_final,
        status,
        content_type,
        charset: Charset::from_encoding(encoding),
        body_raw: body_bytes,
        body_utf8,
        fetched_at: Utc::now(),
    })
}

fn label_encoding(haystack: &str, regex: &Regex) -> Option<&'static Encoding> {
    let label = regex.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes())
}

fn detect_encoding(content_type: &str, body_bytes: &[u8]) -> &'static Encoding {
    if let Some(encoding) = label_encoding(content_type, &CHARSET_REGEX) {
        return encoding;
    }

    // Proxies sometimes pass the page's own markup through untouched.
    let sniff = &body_bytes[..body_bytes.len().min(SNIFF_WINDOW)];
    if let Some(encoding) = label_encoding(&String::from_utf8_lossy(sniff), &META_CHARSET_REGEX) {
        return encoding;
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(sniff, sniff.len() == body_bytes.len());
    detector.guess(None, true)
}

fn decode_to_utf8(body_bytes: &[u8], encoding: &'static Encoding) -> Result<String, FetchError> {
    let (decoded, _encoding, had_errors) = encoding.decode(body_bytes);

    if had_errors {
        return Err(FetchError::Charset(format!(
            "failed to decode content with encoding: {}",
            encoding.name()
        )));
    }

    Ok(decoded.into_owned())
}
