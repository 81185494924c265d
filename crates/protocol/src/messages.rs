use serde::{Deserialize, Serialize};

use crate::types::Resolution;

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Opens a new upload session.
///
/// Sent as the JSON body of `POST /{map}/3d/upload/initiate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitiateUploadRequest {
    pub res_type: Resolution,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit: Option<String>,
    pub file_size: u64,
    pub file_name: String,
}

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

/// Server-side session parameters returned by the initiate call.
///
/// `chunk_size` is authoritative: the client must split the file with this
/// value, not with its own default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitiateUploadResponse {
    pub session_id: String,
    pub chunk_size: u64,
    pub total_chunks: u32,
}

/// Per-chunk acknowledgement.
///
/// `chunks_remaining` reflects the server's received-set and is diagnostic
/// only; completion is driven by the client after all local indices succeed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkUploadResult {
    pub chunk_index: u32,
    pub received: bool,
    pub chunks_remaining: u32,
}

/// Stored-asset descriptor returned when a session is finalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelAsset {
    pub map: String,
    pub res_type: Resolution,
    pub size: u64,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit: Option<String>,
}
