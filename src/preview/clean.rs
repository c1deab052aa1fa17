use regex::Regex;
use std::sync::LazyLock;

use crate::summarizer::normalize_whitespace;

/// Proxy header lines; the label and its value are both boilerplate.
static HEADER_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:Title|URL Source|Published Time):.*$").unwrap()
});

static CONTENT_LABEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*Markdown Content:[ \t]*").unwrap());

static BLANK_LINES_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

/// Phrases that only show up on challenge, block or proxy error pages.
const BLOCKED_PHRASES: [&str; 14] = [
    "just a moment",
    "checking your browser",
    "verify you are human",
    "are you a robot",
    "enable javascript and cookies",
    "attention required",
    "captcha",
    "403 forbidden",
    "error 403",
    "access denied",
    "you have been blocked",
    "proxy error",
    "target url returned error",
    "failed to fetch the page",
];

/// Flatten text-extraction proxy output into a single line of prose.
pub fn clean_extracted_text(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    let text = HEADER_LINE_REGEX.replace_all(&text, "");
    let text = CONTENT_LABEL_REGEX.replace_all(&text, "");
    let text = BLANK_LINES_REGEX.replace_all(&text, "\n");
    normalize_whitespace(&text)
}

pub fn is_blocked_content(text: &str) -> bool {
    let text_lower = text.to_lowercase();
    BLOCKED_PHRASES
        .iter()
        .any(|phrase| text_lower.contains(phrase))
}
