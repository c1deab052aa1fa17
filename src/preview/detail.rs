use tokio_util::sync::CancellationToken;

use crate::articles::Article;
use crate::preview::{model::PreviewResult, resolver::PreviewResolver, source::PreviewSource};

/// What the detail view shows for an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleDetail {
    /// The feed supplied text; no network involved.
    Body(String),
    Preview(PreviewResult),
}

/// Resolve a preview only for articles that arrived without a body.
pub async fn load_detail<S: PreviewSource>(
    resolver: &PreviewResolver<S>,
    article: &Article,
    cancel: &CancellationToken,
) -> ArticleDetail {
    if article.has_body() {
        return ArticleDetail::Body(article.body.clone());
    }
    ArticleDetail::Preview(resolver.resolve(article, cancel).await)
}
