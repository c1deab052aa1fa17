//! The preview pipeline as an explicit state machine.
//!
//! Each network layer produces an outcome; `after_primary` and
//! `after_discussion` map that outcome to the next state without touching the
//! network, so every transition can be exercised directly.

use serde_json::Value;

use crate::fetcher::FetchError;
use crate::preview::{
    clean::{clean_extracted_text, is_blocked_content},
    discussion::extract_comment_bodies,
    model::{PreviewFailure, PreviewOrigin},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewState {
    PrimaryFetch,
    /// `recovery` is set when the primary layer errored rather than merely
    /// coming back empty, rejected or non-2xx.
    DiscussionFallback { recovery: bool },
    Resolved {
        origin: PreviewOrigin,
        raw_text: String,
    },
    Failed(PreviewFailure),
}

impl PreviewState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved { .. } | Self::Failed(_))
    }
}

pub fn after_primary(outcome: Result<String, FetchError>) -> PreviewState {
    match outcome {
        Ok(body) => {
            let cleaned = clean_extracted_text(&body);
            if cleaned.is_empty() || is_blocked_content(&cleaned) {
                PreviewState::DiscussionFallback { recovery: false }
            } else {
                PreviewState::Resolved {
                    origin: PreviewOrigin::PrimarySource,
                    raw_text: cleaned,
                }
            }
        }
        Err(err) if err.is_cancelled() => PreviewState::Failed(PreviewFailure::Cancelled),
        Err(err) if err.is_http_status() => PreviewState::DiscussionFallback { recovery: false },
        Err(_) => PreviewState::DiscussionFallback { recovery: true },
    }
}

pub fn after_discussion(outcome: Result<Value, FetchError>) -> PreviewState {
    match outcome {
        Ok(thread) => match extract_comment_bodies(&thread) {
            Some(bodies) if !bodies.is_empty() => PreviewState::Resolved {
                origin: PreviewOrigin::DiscussionFallback,
                raw_text: bodies.join(" "),
            },
            _ => PreviewState::Failed(PreviewFailure::ContentUnavailable),
        },
        Err(err) if err.is_cancelled() => PreviewState::Failed(PreviewFailure::Cancelled),
        Err(err) if err.is_http_status() => PreviewState::Failed(PreviewFailure::ContentUnavailable),
        Err(_) => PreviewState::Failed(PreviewFailure::Transient),
    }
}
