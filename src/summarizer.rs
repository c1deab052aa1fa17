//! Extractive summaries: the first two sentences of a text, bounded in length.
//!
//! Everything here is pure. Lengths are counted in `char`s, and the ellipsis
//! appended on truncation counts as one.

/// Summary length used when ingesting a feed.
pub const DEFAULT_SUMMARY_LENGTH: usize = 180;
/// Summary length used for resolved previews.
pub const PREVIEW_SUMMARY_LENGTH: usize = 320;

const ELLIPSIS: char = '…';
const NO_BODY_SUFFIX: &str = "Read full details in the source link.";

/// Collapse every whitespace run to a single space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split on sentence-terminal punctuation followed by whitespace. The
/// punctuation stays with the sentence it ends; blank pieces are dropped.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((_, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        if let Some(&(next_idx, next)) = chars.peek()
            && next.is_whitespace()
        {
            sentences.push(&text[start..next_idx]);
            start = next_idx;
        }
    }
    sentences.push(&text[start..]);

    sentences
        .into_iter()
        .map(normalize_whitespace)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Reduce `body` to at most `max_length` characters. With no usable body the
/// result is a pointer to the source built from `title`.
pub fn summarize(title: &str, body: &str, max_length: usize) -> String {
    let title = normalize_whitespace(title);
    let body = normalize_whitespace(body);

    if body.is_empty() {
        return format!("{title}. {NO_BODY_SUFFIX}");
    }

    let sentences = split_sentences(&body);
    let first = sentences.first().map(String::as_str).unwrap_or(body.as_str());
    let second = sentences.get(1).map(String::as_str).unwrap_or("");

    let combined = normalize_whitespace(&format!("{first} {second}"));
    let summary = if combined.is_empty() { body } else { combined };

    if summary.chars().count() <= max_length {
        return summary;
    }
    if max_length == 0 {
        return String::new();
    }

    let mut truncated: String = summary.chars().take(max_length - 1).collect();
    truncated.truncate(truncated.trim_end().len());
    truncated.push(ELLIPSIS);
    truncated
}
