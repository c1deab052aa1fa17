#![no_main]

use libfuzzer_sys::fuzz_target;

use newsdesk::preview::clean::{clean_extracted_text, is_blocked_content};
use newsdesk::summarizer::summarize;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let max_length = data.first().copied().unwrap_or(0) as usize;

    // Never panics on arbitrary input, and never splits a char
    let cleaned = clean_extracted_text(&text);
    let _ = is_blocked_content(&cleaned);

    let summary = summarize("Fuzzed headline", &cleaned, max_length);
    if !cleaned.trim().is_empty() {
        assert!(summary.chars().count() <= max_length);
    }
});
