//! Upload error taxonomy.

/// Errors produced during a chunked model upload.
///
/// Classification happens at the transport boundary: the HTTP layer maps
/// status codes and network failures onto these variants, and the retry
/// policy branches on [`is_retryable`](UploadError::is_retryable) alone.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The initiate call failed. Terminal, never retried.
    #[error("session init failed: {0}")]
    Init(String),

    /// The server rejected the chunk outright (HTTP 4xx). Retrying the same
    /// request cannot succeed.
    #[error("chunk rejected by server (status {status}): {message}")]
    ChunkRejected { status: u16, message: String },

    /// Transient chunk failure: network error, timeout, 5xx, or a malformed
    /// response body. Eligible for retry.
    #[error("chunk transfer failed: {0}")]
    ChunkTransfer(String),

    /// The complete call failed after all chunks were received.
    #[error("session completion failed: {0}")]
    Complete(String),

    /// The caller's cancellation token fired. Not a failure: consumers
    /// should report "cancelled", not "something went wrong".
    #[error("upload cancelled")]
    Cancelled,
}

impl UploadError {
    /// Returns `true` if the retry policy may re-attempt the operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, UploadError::ChunkTransfer(_))
    }

    /// Returns `true` for caller-initiated cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, UploadError::Cancelled)
    }
}
