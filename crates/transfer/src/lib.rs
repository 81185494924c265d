//! Chunk planning for large model uploads.
//!
//! [`ChunkPlan`] computes byte ranges only; reading happens elsewhere, one
//! chunk at a time, so a file never has to fit in memory.

mod plan;
mod validation;

pub use plan::ChunkPlan;
pub use validation::validate_model_file_name;

use modelship_protocol::constants::CHUNKED_UPLOAD_THRESHOLD;

/// Returns `true` if a file of `file_size` bytes must take the chunked path.
///
/// Files at or below the threshold are sent as one multipart request by the
/// caller instead.
pub fn needs_chunked_upload(file_size: u64) -> bool {
    file_size > CHUNKED_UPLOAD_THRESHOLD
}

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("chunk size must be positive")]
    ZeroChunkSize,

    #[error("invalid file name: {0}")]
    InvalidFileName(String),
}
