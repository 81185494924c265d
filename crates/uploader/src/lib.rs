//! Chunked upload client for large map model files.
//!
//! This crate implements the **client half** of the chunked upload protocol:
//! it opens a session on the backend, streams the file as server-sized
//! chunks in strict index order, and finalizes the session into a stored
//! asset. It is a library crate with no UI dependencies: callers consume
//! progress through an event channel and drive cancellation through a token.
//!
//! # Pipeline
//!
//! 1. **Initiate**: open a session, receive the authoritative chunk size
//! 2. **Upload**: send chunks 0..n in order, each with bounded retry
//! 3. **Complete**: finalize the session into a [`ModelAsset`]
//!
//! Any fatal error after initiation triggers a best-effort session cancel so
//! the server can free its bookkeeping early.
//!
//! [`ModelAsset`]: modelship_protocol::messages::ModelAsset

pub mod client;
pub mod error;
pub mod retry;
pub mod session;
pub mod transport;
pub mod types;
pub mod uploader;

pub use client::{ApiConfig, HttpTransport};
pub use error::UploadError;
pub use retry::RetryPolicy;
pub use session::ChunkedUpload;
pub use transport::UploadTransport;
pub use types::{UploadEvent, UploadResult, UploadSpec};
pub use uploader::Uploader;
