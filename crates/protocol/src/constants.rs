//! Shared protocol constants.

/// Client-side chunk size hint: 10 MiB.
///
/// Only a default before initiation. The server returns the authoritative
/// `chunk_size` in the initiate response and the client must use that value.
pub const DEFAULT_CHUNK_SIZE_HINT: u64 = 10 * 1024 * 1024;

/// Files larger than this take the chunked upload path.
///
/// Smaller files are sent as a single multipart request by callers outside
/// this workspace.
pub const CHUNKED_UPLOAD_THRESHOLD: u64 = 50 * 1024 * 1024;

/// Multipart field carrying the chunk index (as decimal text).
pub const CHUNK_INDEX_FIELD: &str = "chunk_index";

/// Multipart field carrying the raw chunk bytes.
pub const CHUNK_DATA_FIELD: &str = "chunk_data";
