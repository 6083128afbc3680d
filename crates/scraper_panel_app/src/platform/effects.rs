use std::path::PathBuf;
use std::sync::Arc;

use panel_logging::{panel_debug, panel_info, panel_warn};
use scraper_panel_core::{CommandOutcome, Effect, JobStatus, Msg};
use scraper_panel_engine::{
    ApiError, CommandReply, JobApi, JobSnapshot, StatusPoller, StatusSink, StatusUpdate,
};
use tokio::sync::mpsc::UnboundedSender;

/// Runs effects as background tasks and reports their results as messages.
pub struct EffectRunner {
    api: Arc<dyn JobApi>,
    poller: StatusPoller,
    msg_tx: UnboundedSender<Msg>,
    output_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(
        api: Arc<dyn JobApi>,
        poller: StatusPoller,
        msg_tx: UnboundedSender<Msg>,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            api,
            poller,
            msg_tx,
            output_dir,
        }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            panel_debug!("Effect {:?}", effect);
            match effect {
                Effect::RefreshStatus => {
                    let poller = self.poller.clone();
                    tokio::spawn(async move { poller.fetch_once().await });
                }
                Effect::StartJob { visual_mode } => {
                    let api = self.api.clone();
                    self.spawn_command(async move {
                        let result = api.start(visual_mode).await;
                        Msg::StartFinished(command_outcome("start", result))
                    });
                }
                Effect::StopJob => {
                    let api = self.api.clone();
                    self.spawn_command(async move {
                        let result = api.stop().await;
                        Msg::StopFinished(command_outcome("stop", result))
                    });
                }
                Effect::SetJobMode { visual_mode } => {
                    let api = self.api.clone();
                    self.spawn_command(async move {
                        let result = api.set_mode(visual_mode).await;
                        Msg::ModeChangeFinished(command_outcome("mode change", result))
                    });
                }
                Effect::Download => {
                    let api = self.api.clone();
                    let output_dir = self.output_dir.clone();
                    // The panel state does not track downloads; the log is the report.
                    tokio::spawn(async move {
                        match api.download(&output_dir).await {
                            Ok(output) => panel_info!(
                                "Export saved to {:?} ({} bytes)",
                                output.path,
                                output.byte_len
                            ),
                            Err(err) => panel_warn!("Download failed: {}", err),
                        }
                    });
                }
            }
        }
    }

    fn spawn_command<F>(&self, command: F)
    where
        F: std::future::Future<Output = Msg> + Send + 'static,
    {
        let msg_tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let msg = command.await;
            // The loop is gone on shutdown; nothing left to tell.
            let _ = msg_tx.send(msg);
        });
    }
}

fn command_outcome(name: &str, result: Result<CommandReply, ApiError>) -> CommandOutcome {
    match result {
        Ok(_) => CommandOutcome::Succeeded,
        Err(err) => {
            panel_warn!("{} failed: {}", name, err);
            CommandOutcome::Failed(format!("{name} failed: {err}"))
        }
    }
}

/// Forwards poll results into the panel's message queue.
pub struct MsgSink {
    msg_tx: UnboundedSender<Msg>,
}

impl MsgSink {
    pub fn new(msg_tx: UnboundedSender<Msg>) -> Self {
        Self { msg_tx }
    }
}

impl StatusSink for MsgSink {
    fn publish(&self, update: StatusUpdate) {
        let msg = match update {
            StatusUpdate::Snapshot(snapshot) => Msg::StatusReceived(map_snapshot(snapshot)),
            StatusUpdate::Unavailable(err) => Msg::StatusUnavailable {
                reason: err.to_string(),
            },
        };
        let _ = self.msg_tx.send(msg);
    }
}

fn map_snapshot(snapshot: JobSnapshot) -> JobStatus {
    JobStatus {
        is_running: snapshot.is_running,
        current_id: snapshot.current_id,
        total_records: snapshot.total_records,
        blank_count: snapshot.blank_count,
        visual_mode: snapshot.visual_mode,
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::platform::test_support::{snapshot, ApiCall, FakeJobApi};

    fn runner_with(api: Arc<FakeJobApi>) -> (EffectRunner, mpsc::UnboundedReceiver<Msg>) {
        runner_into(api, PathBuf::from("downloads"))
    }

    fn runner_into(
        api: Arc<FakeJobApi>,
        output_dir: PathBuf,
    ) -> (EffectRunner, mpsc::UnboundedReceiver<Msg>) {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let poller = StatusPoller::new(api.clone(), Arc::new(MsgSink::new(msg_tx.clone())));
        let runner = EffectRunner::new(api, poller, msg_tx, output_dir);
        (runner, msg_rx)
    }

    #[tokio::test]
    async fn start_reports_success() {
        panel_logging::initialize_for_tests();
        let api = Arc::new(FakeJobApi::new(snapshot(false, false, 0)));
        let (runner, mut msg_rx) = runner_with(api.clone());

        runner.enqueue(vec![Effect::StartJob { visual_mode: true }]);

        assert_eq!(
            msg_rx.recv().await,
            Some(Msg::StartFinished(CommandOutcome::Succeeded))
        );
        assert_eq!(api.calls(), vec![ApiCall::Start(true)]);
    }

    #[tokio::test]
    async fn failed_mode_change_reports_failure() {
        let api = Arc::new(FakeJobApi::failing_commands(snapshot(true, false, 3)));
        let (runner, mut msg_rx) = runner_with(api.clone());

        runner.enqueue(vec![Effect::SetJobMode { visual_mode: true }]);

        match msg_rx.recv().await {
            Some(Msg::ModeChangeFinished(CommandOutcome::Failed(reason))) => {
                assert!(reason.starts_with("mode change failed"), "{reason}");
            }
            other => panic!("unexpected message {other:?}"),
        }
        assert_eq!(api.calls(), vec![ApiCall::SetMode(true)]);
    }

    #[tokio::test]
    async fn refresh_publishes_mapped_status() {
        let api = Arc::new(FakeJobApi::new(snapshot(true, true, 8)));
        let (runner, mut msg_rx) = runner_with(api.clone());

        runner.enqueue(vec![Effect::RefreshStatus]);

        assert_eq!(
            msg_rx.recv().await,
            Some(Msg::StatusReceived(JobStatus {
                is_running: true,
                current_id: 1200,
                total_records: 8,
                blank_count: 0,
                visual_mode: true,
            }))
        );
        assert_eq!(api.calls(), vec![ApiCall::Status]);
    }

    #[tokio::test]
    async fn stop_reports_finish_even_when_idle() {
        let api = Arc::new(FakeJobApi::new(snapshot(false, false, 0)));
        let (runner, mut msg_rx) = runner_with(api.clone());

        runner.enqueue(vec![Effect::StopJob]);

        assert_eq!(
            msg_rx.recv().await,
            Some(Msg::StopFinished(CommandOutcome::Succeeded))
        );
    }

    #[tokio::test]
    async fn download_goes_to_output_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let api = Arc::new(FakeJobApi::new(snapshot(false, false, 5)));
        let (runner, mut msg_rx) = runner_into(api.clone(), temp.path().to_path_buf());

        runner.enqueue(vec![Effect::Download]);
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        assert_eq!(api.calls(), vec![ApiCall::Download(temp.path().to_path_buf())]);
        // The result is logged, not fed back into the panel state.
        assert!(msg_rx.try_recv().is_err());
    }
}
