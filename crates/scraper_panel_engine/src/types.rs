use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Body of `GET /api/status`. Every field is required; a partial body is a decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub is_running: bool,
    pub current_id: u64,
    pub total_records: u64,
    pub blank_count: u64,
    pub visual_mode: bool,
}

/// Body of `POST /api/start` and `POST /api/mode`.
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct ModeRequest {
    pub visual_mode: bool,
}

/// Reply to a control command. The server's reply shape is loose, so only an
/// optional human-readable message is picked out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CommandReply {
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body the download endpoint sends instead of a file.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorReply {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutput {
    pub path: PathBuf,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The request never got an answer (connection error or timeout).
    pub fn is_network_failure(&self) -> bool {
        matches!(self.kind, FailureKind::Network | FailureKind::Timeout)
    }

    /// The server answered but the body was not what we expected.
    pub fn is_decode_failure(&self) -> bool {
        matches!(self.kind, FailureKind::Decode)
    }

    /// The server answered and refused.
    pub fn is_command_failure(&self) -> bool {
        matches!(
            self.kind,
            FailureKind::HttpStatus(_) | FailureKind::Rejected
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Network,
    Timeout,
    HttpStatus(u16),
    Decode,
    Rejected,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Decode => write!(f, "decode error"),
            FailureKind::Rejected => write!(f, "rejected by server"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Io => write!(f, "io error"),
        }
    }
}
