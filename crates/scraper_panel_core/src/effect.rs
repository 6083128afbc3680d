/// Side effects requested by [`crate::update`]; executed by the platform layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the job status right away instead of waiting for the next poll tick.
    RefreshStatus,
    StartJob { visual_mode: bool },
    StopJob,
    SetJobMode { visual_mode: bool },
    Download,
}
