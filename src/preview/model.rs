use serde::Serialize;
use thiserror::Error;

/// Which layer produced a preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreviewOrigin {
    PrimarySource,
    DiscussionFallback,
    None,
}

/// Why a preview could not be produced. `Display` is the user-facing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PreviewFailure {
    /// Both layers answered but neither had usable text.
    #[error("Preview unavailable right now. Open source link for full details.")]
    ContentUnavailable,

    /// Something broke in a way that a manual retry may fix.
    #[error("Could not load preview right now. Please try Refresh preview.")]
    Transient,

    /// Deadline hit or the caller aborted. Shown to readers like `Transient`.
    #[error("Could not load preview right now. Please try Refresh preview.")]
    Cancelled,
}

/// Outcome of one resolution attempt. Built fresh every time, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewResult {
    pub text: Option<String>,
    pub origin: PreviewOrigin,
    pub error: Option<String>,
    #[serde(skip)]
    pub failure: Option<PreviewFailure>,
}

impl PreviewResult {
    pub fn resolved(text: String, origin: PreviewOrigin) -> Self {
        Self {
            text: Some(text),
            origin,
            error: None,
            failure: None,
        }
    }

    pub fn failed(failure: PreviewFailure) -> Self {
        Self {
            text: None,
            origin: PreviewOrigin::None,
            error: Some(failure.to_string()),
            failure: Some(failure),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.text.is_some()
    }
}
