//! Bounded retry of store operations

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use super::Error;
use super::Result;

/// How often, and how patiently, a transient failure is retried
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,

    /// Pause between two attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Run `operation` until it succeeds, fails permanently or runs out of attempts
    ///
    /// Only errors for which [`Error::is_transient`] holds are retried, the last error is
    /// returned as-is.
    pub async fn run<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.run_when(operation, Error::is_transient).await
    }

    /// Like [`run`](Self::run), but only errors accepted by `retryable` are retried
    pub async fn run_when<T, F, Fut, R>(&self, mut operation: F, retryable: R) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
        R: Fn(&Error) -> bool,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if retryable(&err) && attempt < max_attempts => {
                    tracing::warn!(
                        "Transient store failure on attempt {attempt}/{max_attempts}, retrying in {:?}: {err}",
                        self.delay
                    );

                    sleep(self.delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
