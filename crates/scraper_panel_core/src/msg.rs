use crate::JobStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A status snapshot arrived from the job server.
    StatusReceived(JobStatus),
    /// A status fetch failed; the last snapshot stays in place.
    StatusUnavailable { reason: String },
    /// User clicked Start.
    StartClicked,
    /// User clicked Stop.
    StopClicked,
    /// User flipped the visual-mode checkbox to the given value.
    VisualModeToggled(bool),
    /// User asked for the export file.
    DownloadClicked,
    /// The start command resolved.
    StartFinished(CommandOutcome),
    /// The stop command resolved.
    StopFinished(CommandOutcome),
    /// The mode-change command resolved.
    ModeChangeFinished(CommandOutcome),
}

/// How an outbound command resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Succeeded,
    Failed(String),
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Succeeded)
    }
}
