//! Wire types for the modelship chunked upload HTTP contract.
//!
//! The backend exposes four calls per map resource:
//!
//! | Step     | Method & Path                               |
//! |----------|---------------------------------------------|
//! | Initiate | `POST /{map}/3d/upload/initiate`            |
//! | Chunk    | `POST /{map}/3d/upload/chunk/{session_id}`  |
//! | Complete | `POST /{map}/3d/upload/complete/{session_id}` |
//! | Cancel   | `DELETE /{map}/3d/upload/cancel/{session_id}` |
//!
//! Field names in this crate are the literal wire names; do not rename them
//! without a matching server change.

pub mod constants;
pub mod messages;
pub mod types;

pub use messages::{
    ChunkUploadResult, InitiateUploadRequest, InitiateUploadResponse, ModelAsset,
};
pub use types::{ParseResolutionError, Resolution, UploadProgress};
