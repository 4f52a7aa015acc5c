//! # Opt-in Retry
//!
//! Exponential backoff around a store operation. Backends never retry on
//! their own; a caller that wants retries wraps the call explicitly:
//!
//! ```rust,ignore
//! let policy = RetryPolicy::default();
//! let record = retry(&policy, || backend.create("ABC123", "qr")).await?;
//! ```
//!
//! Only errors with [`StoreError::is_retryable`] are retried. Everything else
//! is returned on the first failure.
//!
//! A retried `create` can store the record twice if the first attempt
//! reached the server but its response was lost.

use std::future::Future;
use std::time::Duration;

use backoff::ExponentialBackoff;
use scanqr_core::{StoreError, StoreResult};
use tracing::debug;

/// Backoff schedule for [`retry`].
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Delay before the first retry.
    pub initial_interval: Duration,
    /// Upper bound on a single delay.
    pub max_interval: Duration,
    /// Give up once this much time has passed since the first attempt.
    pub max_elapsed: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(5),
            max_elapsed: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    fn to_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.initial_interval,
            current_interval: self.initial_interval,
            max_interval: self.max_interval,
            multiplier: self.multiplier,
            max_elapsed_time: Some(self.max_elapsed),
            ..Default::default()
        }
    }
}

/// Runs `op` until it succeeds, fails permanently, or the policy's time
/// budget runs out. The last error is returned in the latter two cases.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> StoreResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = StoreResult<T>>,
{
    backoff::future::retry(policy.to_backoff(), || {
        let attempt = op();
        async move {
            attempt.await.map_err(|e: StoreError| {
                if e.is_retryable() {
                    debug!(error = %e, "Retryable store error");
                    backoff::Error::transient(e)
                } else {
                    backoff::Error::permanent(e)
                }
            })
        }
    })
    .await
}
