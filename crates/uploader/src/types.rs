//! Public types for the upload client.

use std::path::PathBuf;

use modelship_protocol::messages::ModelAsset;
use modelship_protocol::types::{Resolution, UploadProgress};

/// One model file to ship to the backend.
#[derive(Debug, Clone)]
pub struct UploadSpec {
    /// Map the model belongs to (path segment in the HTTP contract).
    pub map: String,
    /// Resolution slot the file fills.
    pub res_type: Resolution,
    /// Optional author credit stored with the asset.
    pub credit: Option<String>,
    /// Local file to upload.
    pub local_path: PathBuf,
}

/// Events emitted while uploads run.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    /// A chunk succeeded; progress was recomputed.
    Progress {
        map: String,
        res_type: Resolution,
        progress: UploadProgress,
    },
    /// A chunk failed fatally (after retries, or a client error).
    /// Cancellation never produces this event.
    ChunkFailed {
        map: String,
        res_type: Resolution,
        chunk_index: u32,
        error: String,
    },
    /// The session was finalized into a stored asset.
    Completed { map: String, res_type: Resolution },
    /// The upload stopped because the cancellation token fired.
    Cancelled { map: String, res_type: Resolution },
    /// The upload failed for any other reason.
    Failed {
        map: String,
        res_type: Resolution,
        error: String,
    },
}

/// Per-file outcome returned by [`Uploader::upload`](crate::Uploader::upload).
///
/// Exactly one of the three cases holds: `asset` is set on success,
/// `cancelled` is true on cancellation, `error` is set on failure.
#[derive(Debug)]
pub struct UploadResult {
    pub map: String,
    pub res_type: Resolution,
    pub asset: Option<ModelAsset>,
    pub cancelled: bool,
    pub error: Option<String>,
}
