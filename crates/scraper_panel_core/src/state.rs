use crate::view_model::{JobLabel, ModeLabel, PanelViewModel};
use crate::CommandOutcome;

/// Authoritative job state as reported by one status poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JobStatus {
    pub is_running: bool,
    /// Last or active invoice identifier processed.
    pub current_id: u64,
    /// Records persisted so far.
    pub total_records: u64,
    /// Consecutive empty results observed.
    pub blank_count: u64,
    /// Mode the job is actually executing under.
    pub visual_mode: bool,
}

/// What the client knows about the job. `Unknown` until the first successful poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemoteStatus {
    #[default]
    Unknown,
    Known(JobStatus),
}

impl RemoteStatus {
    pub fn known(&self) -> Option<&JobStatus> {
        match self {
            RemoteStatus::Known(status) => Some(status),
            RemoteStatus::Unknown => None,
        }
    }

    /// Unknown counts as not running.
    pub fn is_running(&self) -> bool {
        self.known().is_some_and(|status| status.is_running)
    }
}

/// Operator intent; ephemeral, owned by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientIntent {
    /// Checkbox state selected by the operator.
    pub desired_visual_mode: bool,
    /// A start/stop/mode command is in flight.
    pub busy: bool,
}

/// Lifecycle of an optimistic mode change sent to a running job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeChange {
    #[default]
    Settled,
    Tentative { previous: bool, requested: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    remote: RemoteStatus,
    intent: ClientIntent,
    mode_change: ModeChange,
    stale: bool,
    last_error: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remote(&self) -> RemoteStatus {
        self.remote
    }

    pub fn intent(&self) -> ClientIntent {
        self.intent
    }

    pub fn mode_change(&self) -> ModeChange {
        self.mode_change
    }

    pub fn view(&self) -> PanelViewModel {
        let known = self.remote.known();
        let running = self.remote.is_running();
        let ready = !self.intent.busy;

        let job = match known {
            None => JobLabel::Connecting,
            Some(status) if status.is_running => JobLabel::Running,
            Some(_) => JobLabel::Stopped,
        };
        let mode = match known {
            Some(status) if status.is_running && status.visual_mode => ModeLabel::Visual,
            Some(status) if status.is_running => ModeLabel::Fast,
            _ => ModeLabel::Idle,
        };

        PanelViewModel {
            job,
            mode,
            current_id: known.map(|status| status.current_id),
            total_records: known.map(|status| status.total_records),
            blank_count: known.map(|status| status.blank_count),
            visual_mode_checked: self.intent.desired_visual_mode,
            checkbox_enabled: ready,
            start_enabled: ready && known.is_some() && !running,
            stop_enabled: ready && running,
            download_enabled: self.download_available(),
            busy: self.intent.busy,
            stale: self.stale,
            last_error: self.last_error.clone(),
        }
    }

    /// Returns whether a re-render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Nothing to export until the job has persisted at least one record.
    pub fn download_available(&self) -> bool {
        self.remote
            .known()
            .is_some_and(|status| status.total_records > 0)
    }

    /// Replaces the snapshot wholesale and applies the idle-mirror rule.
    pub(crate) fn apply_status(&mut self, status: JobStatus) {
        let before = (self.remote, self.intent, self.stale);
        self.remote = RemoteStatus::Known(status);
        self.stale = false;
        if !status.is_running {
            self.intent.desired_visual_mode = status.visual_mode;
        }
        if before != (self.remote, self.intent, self.stale) {
            self.mark_dirty();
        }
    }

    pub(crate) fn mark_stale(&mut self) {
        if !self.stale {
            self.stale = true;
            self.mark_dirty();
        }
    }

    pub(crate) fn begin_command(&mut self) {
        self.intent.busy = true;
        self.mark_dirty();
    }

    pub(crate) fn finish_command(&mut self, outcome: CommandOutcome) {
        self.intent.busy = false;
        self.last_error = match outcome {
            CommandOutcome::Succeeded => None,
            CommandOutcome::Failed(reason) => Some(reason),
        };
        self.mark_dirty();
    }

    /// Adopts the new mode locally without any confirmation.
    pub(crate) fn set_desired_visual_mode(&mut self, visual_mode: bool) {
        if self.intent.desired_visual_mode != visual_mode {
            self.intent.desired_visual_mode = visual_mode;
            self.mark_dirty();
        }
    }

    pub(crate) fn propose_mode_change(&mut self, requested: bool) {
        let previous = self.intent.desired_visual_mode;
        self.mode_change = ModeChange::Tentative {
            previous,
            requested,
        };
        self.set_desired_visual_mode(requested);
    }

    pub(crate) fn commit_mode_change(&mut self) {
        self.mode_change = ModeChange::Settled;
    }

    /// Restores the pre-change value. If a poll has meanwhile reported the job
    /// idle, the intent already mirrors the server and is left alone.
    pub(crate) fn revert_mode_change(&mut self) {
        if let ModeChange::Tentative { previous, .. } = self.mode_change {
            match self.remote.known() {
                Some(status) if !status.is_running => {}
                _ => self.set_desired_visual_mode(previous),
            }
        }
        self.mode_change = ModeChange::Settled;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
