use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Cancels `scope` once `deadline` elapses. Dropping the timer disarms it, so
/// a finished resolution never leaves a sleeping task behind.
pub struct DeadlineTimer {
    handle: JoinHandle<()>,
}

impl DeadlineTimer {
    pub fn arm(scope: CancellationToken, deadline: Duration) -> Self {
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = scope.cancelled() => {}
                _ = tokio::time::sleep(deadline) => {
                    debug!(deadline_ms = deadline.as_millis() as u64, "preview deadline reached");
                    scope.cancel();
                }
            }
        });
        Self { handle }
    }
}

impl Drop for DeadlineTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
