use std::path::{Path, PathBuf};
use std::sync::Mutex;

use scraper_panel_engine::{
    ApiError, CommandReply, DownloadOutput, FailureKind, JobApi, JobSnapshot,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Status,
    Start(bool),
    Stop,
    SetMode(bool),
    Download(PathBuf),
}

/// In-memory job server double that records every call.
#[derive(Default)]
pub struct FakeJobApi {
    calls: Mutex<Vec<ApiCall>>,
    snapshot: Mutex<Option<JobSnapshot>>,
    fail_commands: bool,
}

impl FakeJobApi {
    pub fn new(snapshot: JobSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
            ..Self::default()
        }
    }

    pub fn failing_commands(snapshot: JobSnapshot) -> Self {
        Self {
            fail_commands: true,
            ..Self::new(snapshot)
        }
    }

    pub fn set_snapshot(&self, snapshot: JobSnapshot) {
        *self.snapshot.lock().unwrap() = Some(snapshot);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn command_result(&self) -> Result<CommandReply, ApiError> {
        if self.fail_commands {
            Err(network_error())
        } else {
            Ok(CommandReply::default())
        }
    }
}

pub fn network_error() -> ApiError {
    ApiError {
        kind: FailureKind::Network,
        message: "connection refused".to_string(),
    }
}

pub fn snapshot(is_running: bool, visual_mode: bool, total_records: u64) -> JobSnapshot {
    JobSnapshot {
        is_running,
        current_id: 1200,
        total_records,
        blank_count: 0,
        visual_mode,
    }
}

#[async_trait::async_trait]
impl JobApi for FakeJobApi {
    async fn status(&self) -> Result<JobSnapshot, ApiError> {
        self.record(ApiCall::Status);
        let snapshot = *self.snapshot.lock().unwrap();
        snapshot.ok_or_else(network_error)
    }

    async fn start(&self, visual_mode: bool) -> Result<CommandReply, ApiError> {
        self.record(ApiCall::Start(visual_mode));
        self.command_result()
    }

    async fn stop(&self) -> Result<CommandReply, ApiError> {
        self.record(ApiCall::Stop);
        self.command_result()
    }

    async fn set_mode(&self, visual_mode: bool) -> Result<CommandReply, ApiError> {
        self.record(ApiCall::SetMode(visual_mode));
        self.command_result()
    }

    async fn download(&self, dir: &Path) -> Result<DownloadOutput, ApiError> {
        self.record(ApiCall::Download(dir.to_path_buf()));
        Ok(DownloadOutput {
            path: dir.join("invoices.xlsx"),
            byte_len: 4,
        })
    }
}
