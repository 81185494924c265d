//! HTTP implementation of the transport seam, over reqwest.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use modelship_protocol::constants::{CHUNK_DATA_FIELD, CHUNK_INDEX_FIELD};
use modelship_protocol::messages::{
    ChunkUploadResult, InitiateUploadRequest, InitiateUploadResponse, ModelAsset,
};
use reqwest::header;
use reqwest::multipart::{Form, Part};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::UploadError;
use crate::transport::UploadTransport;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const USER_AGENT: &str = concat!("modelship/", env!("CARGO_PKG_VERSION"));

/// Connection settings for the upload backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the backend API, without a trailing slash.
    pub base_url: String,
    /// Bearer token attached to every request when set.
    pub api_key: Option<String>,
    /// Per-request timeout. A timed-out chunk surfaces as a transient error.
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// [`UploadTransport`] backed by a shared reqwest client.
///
/// The client is built once with the bearer token as a sensitive default
/// header, so every protocol call is authenticated the same way.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig) -> Result<Self, UploadError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout);

        if let Some(api_key) = &config.api_key {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| UploadError::Init(format!("invalid API key: {e}")))?;
            value.set_sensitive(true);
            let mut headers = header::HeaderMap::new();
            headers.insert(header::AUTHORIZATION, value);
            builder = builder.default_headers(headers);
        }

        let http = builder
            .build()
            .map_err(|e| UploadError::Init(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Reads the response body for an error message, tolerating read failures.
async fn error_body(response: reqwest::Response) -> String {
    response.text().await.unwrap_or_default()
}

impl UploadTransport for HttpTransport {
    fn initiate<'a>(
        &'a self,
        map: &'a str,
        request: &'a InitiateUploadRequest,
        cancel: &'a CancellationToken,
    ) -> Pin<Box<dyn Future<Output = Result<InitiateUploadResponse, UploadError>> + Send + 'a>>
    {
        Box::pin(async move {
            let url = self.url(&format!("/{map}/3d/upload/initiate"));
            let send = self.http.post(&url).json(request).send();

            let response = tokio::select! {
                _ = cancel.cancelled() => return Err(UploadError::Cancelled),
                result = send => result
                    .map_err(|e| UploadError::Init(format!("initiate request failed: {e}")))?,
            };

            let status = response.status();
            if !status.is_success() {
                let body = error_body(response).await;
                return Err(UploadError::Init(format!(
                    "server refused session (status {status}): {body}"
                )));
            }

            response
                .json::<InitiateUploadResponse>()
                .await
                .map_err(|e| UploadError::Init(format!("malformed initiate response: {e}")))
        })
    }

    fn upload_chunk<'a>(
        &'a self,
        map: &'a str,
        session_id: &'a str,
        chunk_index: u32,
        data: &'a [u8],
        cancel: &'a CancellationToken,
    ) -> Pin<Box<dyn Future<Output = Result<ChunkUploadResult, UploadError>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.url(&format!("/{map}/3d/upload/chunk/{session_id}"));
            let part = Part::bytes(data.to_vec()).file_name(format!("chunk-{chunk_index}"));
            let form = Form::new()
                .text(CHUNK_INDEX_FIELD, chunk_index.to_string())
                .part(CHUNK_DATA_FIELD, part);
            let send = self.http.post(&url).multipart(form).send();

            let response = tokio::select! {
                _ = cancel.cancelled() => return Err(UploadError::Cancelled),
                result = send => result.map_err(|e| {
                    UploadError::ChunkTransfer(format!("chunk {chunk_index} request failed: {e}"))
                })?,
            };

            let status = response.status();
            if status.is_client_error() {
                return Err(UploadError::ChunkRejected {
                    status: status.as_u16(),
                    message: error_body(response).await,
                });
            }
            if !status.is_success() {
                let body = error_body(response).await;
                return Err(UploadError::ChunkTransfer(format!(
                    "server error (status {status}): {body}"
                )));
            }

            response
                .json::<ChunkUploadResult>()
                .await
                .map_err(|e| UploadError::ChunkTransfer(format!("malformed chunk response: {e}")))
        })
    }

    fn complete<'a>(
        &'a self,
        map: &'a str,
        session_id: &'a str,
        cancel: &'a CancellationToken,
    ) -> Pin<Box<dyn Future<Output = Result<ModelAsset, UploadError>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.url(&format!("/{map}/3d/upload/complete/{session_id}"));
            let send = self.http.post(&url).send();

            let response = tokio::select! {
                _ = cancel.cancelled() => return Err(UploadError::Cancelled),
                result = send => result
                    .map_err(|e| UploadError::Complete(format!("complete request failed: {e}")))?,
            };

            let status = response.status();
            if !status.is_success() {
                let body = error_body(response).await;
                return Err(UploadError::Complete(format!(
                    "server refused completion (status {status}): {body}"
                )));
            }

            response
                .json::<ModelAsset>()
                .await
                .map_err(|e| UploadError::Complete(format!("malformed complete response: {e}")))
        })
    }

    fn cancel_session<'a>(
        &'a self,
        map: &'a str,
        session_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), UploadError>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.url(&format!("/{map}/3d/upload/cancel/{session_id}"));
            // No cancellation token here: this call runs while the upload is
            // already being torn down.
            let response = self.http.delete(&url).send().await.map_err(|e| {
                UploadError::ChunkTransfer(format!("cancel request failed: {e}"))
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(UploadError::ChunkTransfer(format!(
                    "cancel refused (status {status})"
                )));
            }

            // Response body is ignored by contract.
            debug!(map, session_id, "session cancel acknowledged");
            Ok(())
        })
    }
}
