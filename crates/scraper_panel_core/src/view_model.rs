#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobLabel {
    /// No status snapshot received yet.
    #[default]
    Connecting,
    Running,
    Stopped,
}

impl JobLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            JobLabel::Connecting => "Connecting...",
            JobLabel::Running => "Running",
            JobLabel::Stopped => "Stopped",
        }
    }
}

/// Mode the job reports while running; `Idle` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeLabel {
    #[default]
    Idle,
    Visual,
    Fast,
}

impl ModeLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            ModeLabel::Idle => "Idle",
            ModeLabel::Visual => "Visual",
            ModeLabel::Fast => "Fast",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelViewModel {
    pub job: JobLabel,
    pub mode: ModeLabel,
    pub current_id: Option<u64>,
    pub total_records: Option<u64>,
    pub blank_count: Option<u64>,
    pub visual_mode_checked: bool,
    pub checkbox_enabled: bool,
    pub start_enabled: bool,
    pub stop_enabled: bool,
    pub download_enabled: bool,
    pub busy: bool,
    /// The last status fetch failed; counters may be out of date.
    pub stale: bool,
    pub last_error: Option<String>,
}
