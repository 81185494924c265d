//! Bounded retry with linear backoff for per-chunk uploads.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::error::UploadError;

/// Retry schedule for a single chunk upload.
///
/// Applies only to chunk transport calls; initiate, complete, and cancel
/// are never retried. The backoff is linear: the wait before retry `k` is
/// `k × backoff_unit`, so a 3-attempt policy sleeps 1s then 2s with the
/// default unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Base delay multiplied by the retry number.
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay before the given attempt (1-based). The first attempt has none.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.backoff_unit * attempt.saturating_sub(1)
    }

    /// Runs `operation` until it succeeds, fails fatally, or attempts run out.
    ///
    /// Cancellation and client errors are surfaced immediately without a
    /// backoff sleep; the backoff sleep itself races the cancellation token.
    /// After exhaustion the last observed error is returned.
    pub async fn run<T, F, Fut>(
        &self,
        cancel: &CancellationToken,
        mut operation: F,
    ) -> Result<T, UploadError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, UploadError>>,
    {
        let mut last_err = None;

        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(UploadError::Cancelled),
                    _ = tokio::time::sleep(self.delay_before(attempt)) => {}
                }
            }

            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() => {
                    warn!(attempt, max_attempts = self.max_attempts, error = %e, "chunk attempt failed");
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err.unwrap_or_else(|| {
            UploadError::ChunkTransfer(format!("failed after {} attempts", self.max_attempts))
        }))
    }
}
