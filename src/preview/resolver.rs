use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::articles::Article;
use crate::preview::{
    deadline::DeadlineTimer,
    model::{PreviewFailure, PreviewResult},
    source::PreviewSource,
    state::{PreviewState, after_discussion, after_primary},
};
use crate::summarizer::{PREVIEW_SUMMARY_LENGTH, summarize};

pub const DEFAULT_PREVIEW_DEADLINE: Duration = Duration::from_millis(6000);

/// Drives the preview state machine for one article at a time.
///
/// Every call starts over from the primary layer under its own cancellation
/// scope; nothing is remembered between calls.
pub struct PreviewResolver<S> {
    source: S,
    deadline: Duration,
}

impl<S: PreviewSource> PreviewResolver<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            deadline: DEFAULT_PREVIEW_DEADLINE,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn resolve(&self, article: &Article, cancel: &CancellationToken) -> PreviewResult {
        self.resolve_with_deadline(article, self.deadline, cancel).await
    }

    /// Never fails: every error ends up as a `PreviewResult` carrying a message.
    #[instrument(skip_all, fields(article_id = %article.id, deadline_ms = deadline.as_millis() as u64))]
    pub async fn resolve_with_deadline(
        &self,
        article: &Article,
        deadline: Duration,
        cancel: &CancellationToken,
    ) -> PreviewResult {
        let scope = cancel.child_token();
        let _timer = DeadlineTimer::arm(scope.clone(), deadline);

        let mut state = PreviewState::PrimaryFetch;
        loop {
            debug!(?state, "preview state");
            state = match state {
                PreviewState::PrimaryFetch => {
                    if scope.is_cancelled() {
                        PreviewState::Failed(PreviewFailure::Cancelled)
                    } else {
                        let outcome = self.source.fetch_primary(&article.url, &scope).await;
                        if let Err(e) = &outcome {
                            warn!(error = %e, "primary preview source failed");
                        }
                        after_primary(outcome)
                    }
                }
                PreviewState::DiscussionFallback { recovery } => {
                    if scope.is_cancelled() {
                        PreviewState::Failed(PreviewFailure::Cancelled)
                    } else {
                        if recovery {
                            info!("recovering preview through discussion thread");
                        }
                        let outcome = self.source.fetch_discussion(&article.id, &scope).await;
                        if let Err(e) = &outcome {
                            warn!(error = %e, "discussion preview source failed");
                        }
                        after_discussion(outcome)
                    }
                }
                PreviewState::Resolved { origin, raw_text } => {
                    debug!(?origin, chars = raw_text.chars().count(), "preview resolved");
                    let text = summarize(&article.title, &raw_text, PREVIEW_SUMMARY_LENGTH);
                    return PreviewResult::resolved(text, origin);
                }
                PreviewState::Failed(failure) => {
                    info!(?failure, "preview unavailable");
                    return PreviewResult::failed(failure);
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchError;
    use crate::preview::model::PreviewOrigin;
    use crate::preview::source::MockPreviewSource;
    use chrono::Utc;
    use reqwest::StatusCode;
    use serde_json::json;

    fn bodiless(id: &str) -> Article {
        Article {
            id: id.to_string(),
            title: "Storm hits coast".to_string(),
            body: String::new(),
            summary: String::new(),
            url: "https://example.com/storm".to_string(),
            source: "r/worldnews".to_string(),
            published_at: Utc::now(),
        }
    }

    fn not_found() -> FetchError {
        FetchError::Http {
            status: StatusCode::NOT_FOUND,
        }
    }

    #[tokio::test]
    async fn test_primary_success_skips_discussion() {
        let mut source = MockPreviewSource::new();
        source
            .expect_fetch_primary()
            .withf(|url, _| url.ends_with("example.com/storm"))
            .times(1)
            .returning(|_, _| {
                Ok("Title: Storm\nMarkdown Content:\nWinds reached 120 mph. Several towns lost power. Crews respond.".to_string())
            });
        source.expect_fetch_discussion().times(0);

        let resolver = PreviewResolver::new(source);
        let result = resolver
            .resolve(&bodiless("abc"), &CancellationToken::new())
            .await;

        assert_eq!(result.origin, PreviewOrigin::PrimarySource);
        assert_eq!(
            result.text.as_deref(),
            Some("Winds reached 120 mph. Several towns lost power.")
        );
        assert_eq!(result.error, None);
    }

    #[tokio::test]
    async fn test_404_falls_back_exactly_once() {
        let mut source = MockPreviewSource::new();
        source
            .expect_fetch_primary()
            .times(1)
            .returning(|_, _| Err(not_found()));
        source
            .expect_fetch_discussion()
            .withf(|id, _| id.starts_with("abc"))
            .times(1)
            .returning(|_, _| {
                Ok(json!([null, {"data": {"children": [
                    {"data": {"body": "  "}},
                    {"data": {"body": "Great report, thanks"}}
                ]}}]))
            });

        let result = PreviewResolver::new(source)
            .resolve(&bodiless("abc"), &CancellationToken::new())
            .await;

        assert_eq!(result.origin, PreviewOrigin::DiscussionFallback);
        assert_eq!(result.text.as_deref(), Some("Great report, thanks"));
    }

    #[tokio::test]
    async fn test_challenge_page_is_not_a_preview() {
        let mut source = MockPreviewSource::new();
        source
            .expect_fetch_primary()
            .times(1)
            .returning(|_, _| Ok("Just a moment... checking your browser".to_string()));
        source
            .expect_fetch_discussion()
            .times(1)
            .returning(|_, _| Err(not_found()));

        let result = PreviewResolver::new(source)
            .resolve(&bodiless("abc"), &CancellationToken::new())
            .await;

        assert_eq!(result.failure, Some(PreviewFailure::ContentUnavailable));
        assert_eq!(result.origin, PreviewOrigin::None);
        assert_eq!(result.text, None);
    }

    #[tokio::test]
    async fn test_errors_in_both_layers_are_transient() {
        let mut source = MockPreviewSource::new();
        source
            .expect_fetch_primary()
            .times(1)
            .returning(|_, _| Err(FetchError::Dns("lookup failed".to_string())));
        source
            .expect_fetch_discussion()
            .times(1)
            .returning(|_, _| Err(FetchError::Io("connection reset".to_string())));

        let result = PreviewResolver::new(source)
            .resolve(&bodiless("abc"), &CancellationToken::new())
            .await;

        assert_eq!(result.failure, Some(PreviewFailure::Transient));
        assert_eq!(
            result.error.as_deref(),
            Some("Could not load preview right now. Please try Refresh preview.")
        );
    }

    #[tokio::test]
    async fn test_primary_error_recovered_by_discussion() {
        let mut source = MockPreviewSource::new();
        source
            .expect_fetch_primary()
            .times(1)
            .returning(|_, _| Err(FetchError::RequestTimeout));
        source.expect_fetch_discussion().times(1).returning(|_, _| {
            Ok(json!([{}, {"data": {"children": [{"data": {"body": "Power is back."}}]}}]))
        });

        let result = PreviewResolver::new(source)
            .resolve(&bodiless("abc"), &CancellationToken::new())
            .await;

        assert_eq!(result.origin, PreviewOrigin::DiscussionFallback);
        assert_eq!(result.text.as_deref(), Some("Power is back."));
    }

    #[tokio::test]
    async fn test_cancel_during_primary_stops_pipeline() {
        let mut source = MockPreviewSource::new();
        source
            .expect_fetch_primary()
            .times(1)
            .returning(|_, _| Err(FetchError::Cancelled));
        source.expect_fetch_discussion().times(0);

        let result = PreviewResolver::new(source)
            .resolve(&bodiless("abc"), &CancellationToken::new())
            .await;

        assert_eq!(result.failure, Some(PreviewFailure::Cancelled));
        assert_eq!(
            result.error.as_deref(),
            Some("Could not load preview right now. Please try Refresh preview.")
        );
    }

    #[tokio::test]
    async fn test_already_cancelled_makes_no_calls() {
        let mut source = MockPreviewSource::new();
        source.expect_fetch_primary().times(0);
        source.expect_fetch_discussion().times(0);

        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = PreviewResolver::new(source)
            .resolve(&bodiless("abc"), &cancel)
            .await;

        assert_eq!(result.failure, Some(PreviewFailure::Cancelled));
    }

    #[tokio::test]
    async fn test_refresh_starts_over() {
        let mut source = MockPreviewSource::new();
        source
            .expect_fetch_primary()
            .times(2)
            .returning(|_, _| Err(not_found()));
        source
            .expect_fetch_discussion()
            .times(2)
            .returning(|_, _| Ok(json!([null, {"data": {"children": []}}])));

        let resolver = PreviewResolver::new(source);
        let article = bodiless("abc");
        let first = resolver.resolve(&article, &CancellationToken::new()).await;
        let second = resolver.resolve(&article, &CancellationToken::new()).await;

        assert_eq!(first, second);
        assert_eq!(first.failure, Some(PreviewFailure::ContentUnavailable));
    }

    #[tokio::test]
    async fn test_summary_is_bounded_for_long_text() {
        let long = "word ".repeat(400);
        let mut source = MockPreviewSource::new();
        source
            .expect_fetch_primary()
            .returning(move |_, _| Ok(long.clone()));

        let result = PreviewResolver::new(source)
            .resolve(&bodiless("abc"), &CancellationToken::new())
            .await;

        let text = result.text.unwrap();
        assert_eq!(text.chars().count(), PREVIEW_SUMMARY_LENGTH);
        assert!(text.ends_with('…'));
    }
}
