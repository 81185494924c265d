//! Transport seam for the upload protocol.

use std::future::Future;
use std::pin::Pin;

use modelship_protocol::messages::{
    ChunkUploadResult, InitiateUploadRequest, InitiateUploadResponse, ModelAsset,
};
use tokio_util::sync::CancellationToken;

use crate::error::UploadError;

/// One attempt per protocol call against the upload backend.
///
/// The session manager drives this trait; the HTTP implementation lives in
/// [`crate::client`]. Using a trait keeps lifecycle logic decoupled from the
/// wire and testable with mocks. Every method is a single attempt; retry
/// lives above this seam, in [`crate::retry`].
pub trait UploadTransport: Send + Sync {
    /// Opens an upload session for `map`. Failures are terminal.
    fn initiate<'a>(
        &'a self,
        map: &'a str,
        request: &'a InitiateUploadRequest,
        cancel: &'a CancellationToken,
    ) -> Pin<Box<dyn Future<Output = Result<InitiateUploadResponse, UploadError>> + Send + 'a>>;

    /// Uploads one chunk. Re-sending an index the server already holds must
    /// overwrite, not duplicate, so a retry after a timeout whose request
    /// partially landed stays safe.
    fn upload_chunk<'a>(
        &'a self,
        map: &'a str,
        session_id: &'a str,
        chunk_index: u32,
        data: &'a [u8],
        cancel: &'a CancellationToken,
    ) -> Pin<Box<dyn Future<Output = Result<ChunkUploadResult, UploadError>> + Send + 'a>>;

    /// Finalizes the session into a stored asset.
    fn complete<'a>(
        &'a self,
        map: &'a str,
        session_id: &'a str,
        cancel: &'a CancellationToken,
    ) -> Pin<Box<dyn Future<Output = Result<ModelAsset, UploadError>> + Send + 'a>>;

    /// Releases server-side session state. Takes no cancellation token: it is
    /// issued precisely while the rest of the upload is being torn down, and
    /// must not be aborted by the signal that triggered the teardown.
    fn cancel_session<'a>(
        &'a self,
        map: &'a str,
        session_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), UploadError>> + Send + 'a>>;
}
