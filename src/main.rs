use anyhow::Result;
use chrono::Utc;
use newsdesk::{
    articles::relative_time,
    config::Config,
    favorites::FavoritesStore,
    feed::FeedClient,
    preview::{ArticleDetail, HttpPreviewSource, PreviewResolver, load_detail},
    telemetry,
};
use std::sync::Arc;
use tokio::{signal, task::JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Articles whose detail text is loaded after the list is printed.
const DETAIL_COUNT: usize = 3;

/// Print one feed snapshot, then the detail text of the first few articles.
/// Ids given on the command line are marked as favorites for this run.
#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    telemetry::init(config.log_format());

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                return;
            }
            info!("Received shutdown signal, cancelling in-flight requests");
            shutdown.cancel();
        });
    }

    let favorites = FavoritesStore::new();
    for id in std::env::args().skip(1) {
        favorites.toggle(&id);
    }

    let snapshot = FeedClient::from_config(&config).load(&shutdown).await?;
    let now = Utc::now();

    println!(
        "{} articles ({:?} feed), {} favorites\n",
        snapshot.articles.len(),
        snapshot.origin,
        favorites.len()
    );
    for article in &snapshot.articles {
        let mark = if favorites.is_favorite(&article.id) {
            "★"
        } else {
            "☆"
        };
        println!("{mark} [{}] {}", article.id, article.title);
        println!(
            "    {} • {}",
            article.source,
            relative_time(article.published_at, now)
        );
        println!("    {}\n", article.summary);
    }

    let resolver = Arc::new(
        PreviewResolver::new(HttpPreviewSource::from_config(&config))
            .with_deadline(config.preview_deadline()),
    );

    let mut details = JoinSet::new();
    for article in snapshot.articles.into_iter().take(DETAIL_COUNT) {
        let resolver = resolver.clone();
        let cancel = shutdown.clone();
        details.spawn(async move {
            let detail = load_detail(&resolver, &article, &cancel).await;
            (article, detail)
        });
    }

    while let Some(joined) = details.join_next().await {
        let (article, detail) = joined?;
        println!("== {} ==", article.title);
        match detail {
            ArticleDetail::Body(text) => println!("{text}"),
            ArticleDetail::Preview(preview) => match (preview.text, preview.error) {
                (Some(text), _) => println!("{text}\n(preview via {:?})", preview.origin),
                (None, Some(message)) => println!("{message}\n{}", article.url),
                (None, None) => println!("{}", article.url),
            },
        }
        println!();
    }

    Ok(())
}
