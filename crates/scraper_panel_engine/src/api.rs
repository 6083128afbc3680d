use std::path::Path;

use futures_util::StreamExt;
use panel_logging::{panel_debug, panel_info};
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::Response;

use crate::persist::AtomicFileWriter;
use crate::types::{ErrorReply, ModeRequest};
use crate::{
    download_filename, ApiError, ApiSettings, CommandReply, DownloadOutput, FailureKind,
    JobSnapshot,
};

// Relative, so they resolve under any path prefix of the base url.
const STATUS_PATH: &str = "api/status";
const START_PATH: &str = "api/start";
const STOP_PATH: &str = "api/stop";
const MODE_PATH: &str = "api/mode";
const DOWNLOAD_PATH: &str = "api/download";

/// The job server's REST surface.
#[async_trait::async_trait]
pub trait JobApi: Send + Sync {
    async fn status(&self) -> Result<JobSnapshot, ApiError>;

    async fn start(&self, visual_mode: bool) -> Result<CommandReply, ApiError>;

    async fn stop(&self) -> Result<CommandReply, ApiError>;

    async fn set_mode(&self, visual_mode: bool) -> Result<CommandReply, ApiError>;

    /// Saves the export into `dir` and returns where it landed.
    async fn download(&self, dir: &Path) -> Result<DownloadOutput, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobApi {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestJobApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    async fn post_command(
        &self,
        path: &str,
        body: Option<ModeRequest>,
    ) -> Result<CommandReply, ApiError> {
        let url = self.settings.endpoint(path)?;
        let mut request = self.client.post(url);
        if let Some(body) = body {
            let json = serde_json::to_vec(&body)
                .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
            request = request.header(CONTENT_TYPE, "application/json").body(json);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let response = ensure_success(response)?;
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;

        let reply = serde_json::from_slice::<CommandReply>(&bytes).unwrap_or_default();
        match reply.message.as_deref() {
            Some(message) => panel_info!("{} -> {}", path, message),
            None => panel_debug!("{} -> ok ({} bytes)", path, bytes.len()),
        }
        Ok(reply)
    }
}

#[async_trait::async_trait]
impl JobApi for ReqwestJobApi {
    async fn status(&self) -> Result<JobSnapshot, ApiError> {
        let url = self.settings.endpoint(STATUS_PATH)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response)?;
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;

        serde_json::from_slice(&bytes)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }

    async fn start(&self, visual_mode: bool) -> Result<CommandReply, ApiError> {
        self.post_command(START_PATH, Some(ModeRequest { visual_mode })).await
    }

    async fn stop(&self) -> Result<CommandReply, ApiError> {
        self.post_command(STOP_PATH, None).await
    }

    async fn set_mode(&self, visual_mode: bool) -> Result<CommandReply, ApiError> {
        self.post_command(MODE_PATH, Some(ModeRequest { visual_mode })).await
    }

    async fn download(&self, dir: &Path) -> Result<DownloadOutput, ApiError> {
        let url = self.settings.endpoint(DOWNLOAD_PATH)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response)?;

        let content_type = header_value(&response, CONTENT_TYPE);
        // The server answers 200 with a JSON error body when there is nothing to export.
        if content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/json"))
        {
            let bytes = response.bytes().await.map_err(map_reqwest_error)?;
            let message = serde_json::from_slice::<ErrorReply>(&bytes)
                .map(|reply| reply.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            return Err(ApiError::new(FailureKind::Rejected, message));
        }

        let max_bytes = self.settings.max_download_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "download too large",
                ));
            }
        }

        let filename = download_filename(header_value(&response, CONTENT_DISPOSITION).as_deref());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ApiError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "download too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let writer = AtomicFileWriter::new(dir.to_path_buf());
        let path = writer
            .write(&filename, &bytes)
            .map_err(|err| ApiError::new(FailureKind::Io, err.to_string()))?;
        panel_info!("Saved {} bytes to {:?}", bytes.len(), path);

        Ok(DownloadOutput {
            path,
            byte_len: bytes.len() as u64,
        })
    }
}

fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ))
    }
}

fn header_value(response: &Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
