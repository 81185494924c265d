//! Orchestrates uploads across several model files.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::retry::RetryPolicy;
use crate::session::ChunkedUpload;
use crate::transport::UploadTransport;
use crate::types::{UploadEvent, UploadResult, UploadSpec};

/// Drives one or more chunked uploads sequentially over a shared transport.
///
/// Owns the event channel and the cancellation token. Callers take the
/// receiving end once with [`take_events`](Uploader::take_events) and cancel
/// everything in flight through [`cancel_token`](Uploader::cancel_token).
pub struct Uploader<T: UploadTransport> {
    transport: T,
    retry: RetryPolicy,
    cancel: CancellationToken,
    events_tx: mpsc::Sender<UploadEvent>,
    events_rx: Option<mpsc::Receiver<UploadEvent>>,
}

impl<T: UploadTransport> Uploader<T> {
    pub fn new(transport: T) -> Self {
        let (events_tx, events_rx) = mpsc::channel(256);
        Self {
            transport,
            retry: RetryPolicy::default(),
            cancel: CancellationToken::new(),
            events_tx,
            events_rx: Some(events_rx),
        }
    }

    /// Overrides the per-chunk retry schedule for every session.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Takes the event receiver. Returns `None` after the first call.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<UploadEvent>> {
        self.events_rx.take()
    }

    /// Token that aborts every running and pending upload when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Uploads each spec in order, one session at a time.
    ///
    /// A failed upload does not stop the remaining ones; cancellation does.
    /// Always returns one result per spec, in input order.
    pub async fn upload(&self, specs: &[UploadSpec]) -> Vec<UploadResult> {
        let mut results = Vec::with_capacity(specs.len());
        for spec in specs {
            results.push(self.upload_one(spec).await);
        }
        results
    }

    /// Runs a single upload session and reports its terminal event.
    pub async fn upload_one(&self, spec: &UploadSpec) -> UploadResult {
        let session = ChunkedUpload::new(&self.transport, self.cancel.clone())
            .with_retry(self.retry);

        match session.run(spec, &self.events_tx).await {
            Ok(asset) => {
                info!(map = %spec.map, res_type = %spec.res_type, "upload finished");
                self.emit(UploadEvent::Completed {
                    map: spec.map.clone(),
                    res_type: spec.res_type,
                })
                .await;
                UploadResult {
                    map: spec.map.clone(),
                    res_type: spec.res_type,
                    asset: Some(asset),
                    cancelled: false,
                    error: None,
                }
            }
            Err(e) if e.is_cancelled() => {
                info!(map = %spec.map, res_type = %spec.res_type, "upload cancelled");
                self.emit(UploadEvent::Cancelled {
                    map: spec.map.clone(),
                    res_type: spec.res_type,
                })
                .await;
                UploadResult {
                    map: spec.map.clone(),
                    res_type: spec.res_type,
                    asset: None,
                    cancelled: true,
                    error: None,
                }
            }
            Err(e) => {
                error!(map = %spec.map, res_type = %spec.res_type, error = %e, "upload failed");
                self.emit(UploadEvent::Failed {
                    map: spec.map.clone(),
                    res_type: spec.res_type,
                    error: e.to_string(),
                })
                .await;
                UploadResult {
                    map: spec.map.clone(),
                    res_type: spec.res_type,
                    asset: None,
                    cancelled: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn emit(&self, event: UploadEvent) {
        // Consumers that dropped the receiver just stop seeing events.
        let _ = self.events_tx.send(event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UploadError;
    use modelship_protocol::messages::{
        ChunkUploadResult, InitiateUploadRequest, InitiateUploadResponse, ModelAsset,
    };
    use modelship_protocol::types::Resolution;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    /// Always-succeeding backend, except for maps listed in `reject_maps`.
    struct StubTransport {
        chunk_size: u64,
        reject_maps: Vec<String>,
        chunk_log: Mutex<Vec<(String, u32)>>,
    }

    impl StubTransport {
        fn new(chunk_size: u64) -> Self {
            Self {
                chunk_size,
                reject_maps: Vec::new(),
                chunk_log: Mutex::new(Vec::new()),
            }
        }
    }

    impl UploadTransport for StubTransport {
        fn initiate<'a>(
            &'a self,
            map: &'a str,
            request: &'a InitiateUploadRequest,
            _cancel: &'a CancellationToken,
        ) -> Pin<Box<dyn Future<Output = Result<InitiateUploadResponse, UploadError>> + Send + 'a>>
        {
            Box::pin(async move {
                if self.reject_maps.iter().any(|m| m == map) {
                    return Err(UploadError::Init("map is locked".into()));
                }
                Ok(InitiateUploadResponse {
                    session_id: format!("sess-{map}"),
                    chunk_size: self.chunk_size,
                    total_chunks: request.file_size.div_ceil(self.chunk_size) as u32,
                })
            })
        }

        fn upload_chunk<'a>(
            &'a self,
            map: &'a str,
            _session_id: &'a str,
            chunk_index: u32,
            _data: &'a [u8],
            _cancel: &'a CancellationToken,
        ) -> Pin<Box<dyn Future<Output = Result<ChunkUploadResult, UploadError>> + Send + 'a>>
        {
            Box::pin(async move {
                self.chunk_log
                    .lock()
                    .unwrap()
                    .push((map.to_string(), chunk_index));
                Ok(ChunkUploadResult {
                    chunk_index,
                    received: true,
                    chunks_remaining: 0,
                })
            })
        }

        fn complete<'a>(
            &'a self,
            map: &'a str,
            _session_id: &'a str,
            _cancel: &'a CancellationToken,
        ) -> Pin<Box<dyn Future<Output = Result<ModelAsset, UploadError>> + Send + 'a>>
        {
            Box::pin(async move {
                Ok(ModelAsset {
                    map: map.to_string(),
                    res_type: Resolution::Low,
                    size: 0,
                    url: format!("/assets/{map}/model.glb"),
                    credit: None,
                })
            })
        }

        fn cancel_session<'a>(
            &'a self,
            _map: &'a str,
            _session_id: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<(), UploadError>> + Send + 'a>> {
            Box::pin(async move { Ok(()) })
        }
    }

    fn spec(map: &str, res: Resolution, path: std::path::PathBuf) -> UploadSpec {
        UploadSpec {
            map: map.into(),
            res_type: res,
            credit: None,
            local_path: path,
        }
    }

    #[tokio::test]
    async fn uploads_both_resolutions_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let low = dir.path().join("low.glb");
        let high = dir.path().join("high.gltf");
        std::fs::write(&low, vec![1u8; 8]).unwrap();
        std::fs::write(&high, vec![2u8; 12]).unwrap();

        let mut uploader = Uploader::new(StubTransport::new(4));
        let mut events = uploader.take_events().unwrap();
        assert!(uploader.take_events().is_none());

        let results = uploader
            .upload(&[
                spec("de_nuke", Resolution::Low, low),
                spec("de_nuke", Resolution::High, high),
            ])
            .await;

        assert_eq!(results.len(), 2);
        assert!(results[0].asset.is_some());
        assert!(results[1].asset.is_some());
        assert_eq!(results[1].res_type, Resolution::High);

        let log = uploader.transport.chunk_log.lock().unwrap();
        assert_eq!(log.len(), 2 + 3);
        drop(log);

        drop(uploader);
        let mut completed = 0;
        while let Some(event) = events.recv().await {
            if matches!(event, UploadEvent::Completed { .. }) {
                completed += 1;
            }
        }
        assert_eq!(completed, 2);
    }

    #[tokio::test]
    async fn failed_upload_does_not_stop_the_next() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.glb");
        let b = dir.path().join("b.glb");
        std::fs::write(&a, vec![0u8; 4]).unwrap();
        std::fs::write(&b, vec![0u8; 4]).unwrap();

        let mut transport = StubTransport::new(4);
        transport.reject_maps.push("broken".into());

        let uploader = Uploader::new(transport);
        let results = uploader
            .upload(&[
                spec("broken", Resolution::Low, a),
                spec("fine", Resolution::Low, b),
            ])
            .await;

        assert!(results[0].error.is_some());
        assert!(results[0].asset.is_none());
        assert!(results[1].asset.is_some());
    }

    #[tokio::test]
    async fn pre_cancelled_token_cancels_every_spec() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.glb");
        std::fs::write(&a, vec![0u8; 4]).unwrap();

        let uploader = Uploader::new(StubTransport::new(4));
        uploader.cancel_token().cancel();

        let results = uploader.upload(&[spec("de_inferno", Resolution::Low, a)]).await;

        assert!(results[0].cancelled);
        assert!(results[0].asset.is_none());
        assert!(uploader.transport.chunk_log.lock().unwrap().is_empty());
    }
}
