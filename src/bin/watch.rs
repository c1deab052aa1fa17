use anyhow::Result;
use newsdesk::{
    config::Config,
    feed::{FeedClient, FeedPoller},
    telemetry,
};
use tokio::{signal, sync::mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Keep the feed fresh until Ctrl-C, printing one line per snapshot.
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
            info!("Received shutdown signal, initiating graceful shutdown...");
            shutdown.cancel();
        });
    }

    info!("Polling feed every {}s", config.poll_interval().as_secs());

    let (sender, mut receiver) = mpsc::channel(4);
    let poller = FeedPoller::new(FeedClient::from_config(&config), config.poll_interval());
    let poller_handle = tokio::spawn(poller.run(sender, shutdown.clone()));

    while let Some(snapshot) = receiver.recv().await {
        let bodiless = snapshot
            .articles
            .iter()
            .filter(|article| !article.has_body())
            .count();
        let newest = snapshot
            .articles
            .first()
            .map(|article| article.title.as_str())
            .unwrap_or("-");
        println!(
            "{} {:?}: {} articles ({} without body), newest: {}",
            snapshot.fetched_at.format("%H:%M:%S"),
            snapshot.origin,
            snapshot.articles.len(),
            bodiless,
            newest
        );
    }

    poller_handle.await?;
    Ok(())
}
