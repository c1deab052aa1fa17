use std::time::Duration;
use tokio::{
    sync::mpsc,
    time::{MissedTickBehavior, interval},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::feed::{FeedClient, FeedSnapshot};

/// `tokio::time::interval` panics on a zero period.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Reloads the feed on a fixed interval and hands each snapshot to a channel.
pub struct FeedPoller {
    feed: FeedClient,
    poll_interval: Duration,
}

impl FeedPoller {
    pub fn new(feed: FeedClient, poll_interval: Duration) -> Self {
        Self {
            feed,
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Loads once immediately, then every `poll_interval`, until `shutdown`
    /// fires or the receiver goes away. Failed loads are logged and skipped.
    pub async fn run(self, sender: mpsc::Sender<FeedSnapshot>, shutdown: CancellationToken) {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Feed poller shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    match self.feed.load(&shutdown).await {
                        Ok(snapshot) => {
                            debug!("Fetched {} articles", snapshot.articles.len());
                            if sender.send(snapshot).await.is_err() {
                                warn!("Snapshot receiver dropped, stopping poller");
                                return;
                            }
                        }
                        Err(e) if e.is_cancelled() => {
                            info!("Feed refresh cancelled");
                            break;
                        }
                        Err(e) => {
                            error!("Failed to refresh feed: {}", e);
                        }
                    }
                }
            }
        }
    }
}
