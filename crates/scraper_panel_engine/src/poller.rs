use std::sync::Arc;
use std::time::Duration;

use panel_logging::{panel_debug, panel_trace, panel_warn};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{ApiError, JobApi, JobSnapshot};

/// Result of one status fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    Snapshot(JobSnapshot),
    /// The fetch failed; subscribers keep whatever they last saw.
    Unavailable(ApiError),
}

/// Receives every status fetch result, in the order fetches resolve.
pub trait StatusSink: Send + Sync {
    fn publish(&self, update: StatusUpdate);
}

/// Periodic refresher of the job status.
///
/// Every tick spawns its own fetch, so a slow response never delays the next
/// tick. Fetches may overlap and whichever resolves last is published last.
#[derive(Clone)]
pub struct StatusPoller {
    api: Arc<dyn JobApi>,
    sink: Arc<dyn StatusSink>,
}

impl StatusPoller {
    pub fn new(api: Arc<dyn JobApi>, sink: Arc<dyn StatusSink>) -> Self {
        Self { api, sink }
    }

    /// Fetches once and publishes the outcome. No retry: the next tick is the retry.
    pub async fn fetch_once(&self) {
        match self.api.status().await {
            Ok(snapshot) => {
                panel_trace!("Status snapshot {:?}", snapshot);
                self.sink.publish(StatusUpdate::Snapshot(snapshot));
            }
            Err(err) => {
                panel_warn!("Status fetch failed: {}", err);
                self.sink.publish(StatusUpdate::Unavailable(err));
            }
        }
    }

    /// Fetches immediately, then every `interval` until the handle is cancelled or dropped.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, interval: Duration) -> PollerHandle {
        let interval = interval.max(Duration::from_millis(1));
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let poller = self.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let poller = poller.clone();
                        // In-flight fetches are not tied to the token; a late
                        // result simply goes to whoever still listens.
                        tokio::spawn(async move { poller.fetch_once().await });
                    }
                }
            }
            panel_debug!("Status poller stopped");
        });

        panel_debug!("Status poller started, interval {:?}", interval);
        PollerHandle { cancel, task }
    }
}

/// Owns the polling timer. Dropping it stops the schedule.
pub struct PollerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancels the timer and waits for its task to wind down.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        let _ = (&mut self.task).await;
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
