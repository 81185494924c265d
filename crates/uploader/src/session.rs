//! Per-file upload session: initiate, send chunks in order, complete.

use std::io::SeekFrom;
use std::ops::Range;

use modelship_protocol::messages::{InitiateUploadRequest, InitiateUploadResponse, ModelAsset};
use modelship_protocol::types::UploadProgress;
use modelship_transfer::{ChunkPlan, validate_model_file_name};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::UploadError;
use crate::retry::RetryPolicy;
use crate::transport::UploadTransport;
use crate::types::{UploadEvent, UploadSpec};

/// Manages one chunked upload session end to end.
///
/// Chunks are sent strictly in ascending index order, one at a time. That
/// bounds server-side buffering and keeps re-send reasoning simple, at the
/// cost of throughput; parallel upload would need a different ordering and
/// progress contract.
pub struct ChunkedUpload<'a> {
    transport: &'a dyn UploadTransport,
    retry: RetryPolicy,
    cancel: CancellationToken,
}

impl<'a> ChunkedUpload<'a> {
    /// Creates a session bound to a transport and a cancellation token.
    pub fn new(transport: &'a dyn UploadTransport, cancel: CancellationToken) -> Self {
        Self {
            transport,
            retry: RetryPolicy::default(),
            cancel,
        }
    }

    /// Overrides the per-chunk retry schedule.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Runs the full session for one file.
    ///
    /// On any fatal error after the session was opened, a best-effort cancel
    /// releases the server-side session before the error is surfaced.
    pub async fn run(
        &self,
        spec: &UploadSpec,
        events_tx: &mpsc::Sender<UploadEvent>,
    ) -> Result<ModelAsset, UploadError> {
        self.check_cancelled()?;

        let file_name = spec
            .local_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                UploadError::Init(format!("invalid file path: {}", spec.local_path.display()))
            })?;
        validate_model_file_name(file_name).map_err(|e| UploadError::Init(e.to_string()))?;

        let file_size = tokio::fs::metadata(&spec.local_path).await?.len();
        if file_size == 0 {
            return Err(UploadError::Init(format!("empty file: {file_name}")));
        }

        let request = InitiateUploadRequest {
            res_type: spec.res_type,
            credit: spec.credit.clone(),
            file_size,
            file_name: file_name.to_string(),
        };
        let session = self
            .transport
            .initiate(&spec.map, &request, &self.cancel)
            .await?;
        info!(
            map = %spec.map,
            res_type = %spec.res_type,
            session_id = %session.session_id,
            chunk_size = session.chunk_size,
            total_chunks = session.total_chunks,
            "upload session opened"
        );

        // The server's chunk_size is authoritative; the local plan must agree
        // with its chunk count before any bytes move.
        let plan = ChunkPlan::new(file_size, session.chunk_size)
            .map_err(|e| UploadError::Init(e.to_string()))?;
        if plan.total_chunks() != u64::from(session.total_chunks) {
            self.release_session(&spec.map, &session.session_id).await;
            return Err(UploadError::Init(format!(
                "server expects {} chunks, local plan has {}",
                session.total_chunks,
                plan.total_chunks()
            )));
        }

        if let Err(e) = self.send_chunks(spec, &session, &plan, events_tx).await {
            self.release_session(&spec.map, &session.session_id).await;
            return Err(e);
        }

        if self.cancel.is_cancelled() {
            self.release_session(&spec.map, &session.session_id).await;
            return Err(UploadError::Cancelled);
        }

        match self
            .transport
            .complete(&spec.map, &session.session_id, &self.cancel)
            .await
        {
            Ok(asset) => {
                info!(
                    map = %spec.map,
                    res_type = %spec.res_type,
                    url = %asset.url,
                    "upload session completed"
                );
                Ok(asset)
            }
            Err(e) => {
                self.release_session(&spec.map, &session.session_id).await;
                Err(e)
            }
        }
    }

    /// Sends every chunk in index order, with per-chunk retry and progress.
    async fn send_chunks(
        &self,
        spec: &UploadSpec,
        session: &InitiateUploadResponse,
        plan: &ChunkPlan,
        events_tx: &mpsc::Sender<UploadEvent>,
    ) -> Result<(), UploadError> {
        let mut file = tokio::fs::File::open(&spec.local_path).await?;

        for (index, range) in plan.ranges().enumerate() {
            let chunk_index = index as u32;

            self.check_cancelled()?;

            let data = read_chunk(&mut file, range).await?;

            let result = self
                .retry
                .run(&self.cancel, || {
                    self.transport.upload_chunk(
                        &spec.map,
                        &session.session_id,
                        chunk_index,
                        &data,
                        &self.cancel,
                    )
                })
                .await;

            let ack = match result {
                Ok(ack) => ack,
                Err(e) => {
                    if !e.is_cancelled() {
                        let _ = events_tx
                            .send(UploadEvent::ChunkFailed {
                                map: spec.map.clone(),
                                res_type: spec.res_type,
                                chunk_index,
                                error: e.to_string(),
                            })
                            .await;
                    }
                    return Err(e);
                }
            };

            // chunks_remaining is the server's own count; diagnostic only.
            debug!(
                map = %spec.map,
                chunk_index = ack.chunk_index,
                chunks_remaining = ack.chunks_remaining,
                "chunk acknowledged"
            );

            let progress = UploadProgress::after_chunk(
                chunk_index,
                session.total_chunks,
                session.chunk_size,
                plan.file_size(),
            );
            let _ = events_tx
                .send(UploadEvent::Progress {
                    map: spec.map.clone(),
                    res_type: spec.res_type,
                    progress,
                })
                .await;
        }

        Ok(())
    }

    /// Best-effort server-side cleanup; failure is logged, never propagated.
    async fn release_session(&self, map: &str, session_id: &str) {
        match self.transport.cancel_session(map, session_id).await {
            Ok(()) => debug!(map, session_id, "upload session released"),
            Err(e) => warn!(map, session_id, error = %e, "failed to release upload session"),
        }
    }

    fn check_cancelled(&self) -> Result<(), UploadError> {
        if self.cancel.is_cancelled() {
            Err(UploadError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Reads one chunk's byte range from the file.
async fn read_chunk(
    file: &mut tokio::fs::File,
    range: Range<u64>,
) -> Result<Vec<u8>, UploadError> {
    let len = (range.end - range.start) as usize;
    file.seek(SeekFrom::Start(range.start)).await?;
    let mut data = vec![0u8; len];
    file.read_exact(&mut data).await?;
    Ok(data)
}
