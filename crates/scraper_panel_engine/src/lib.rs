//! Scraper panel engine: REST client, status polling and downloads.
mod api;
mod filename;
mod persist;
mod poller;
mod settings;
mod types;

pub use api::{JobApi, ReqwestJobApi};
pub use filename::download_filename;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use poller::{PollerHandle, StatusPoller, StatusSink, StatusUpdate};
pub use settings::ApiSettings;
pub use types::{ApiError, CommandReply, DownloadOutput, FailureKind, JobSnapshot};
