use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout};

use crate::ProviderError;

/// What the timeout of a [`RetryPolicy`] bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutScope {
    /// Every attempt gets the full timeout
    PerAttempt,
    /// One deadline for all attempts and backoff sleeps together
    Overall,
}

/// Timeout plus exponential backoff retry for provider calls.
/// Only [retriable](ProviderError::is_retriable) failures are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub scope: TimeoutScope,
    /// Attempts after the first one
    pub max_retries: u32,
    pub base_backoff: Duration,
}

impl RetryPolicy {
    pub const ROUTING: RetryPolicy = RetryPolicy {
        timeout: Duration::from_secs(8),
        scope: TimeoutScope::Overall,
        max_retries: 2,
        base_backoff: Duration::from_millis(300),
    };

    pub const FLOW: RetryPolicy = RetryPolicy {
        timeout: Duration::from_secs(6),
        scope: TimeoutScope::PerAttempt,
        max_retries: 2,
        base_backoff: Duration::from_millis(200),
    };

    pub const INCIDENTS: RetryPolicy = RetryPolicy {
        timeout: Duration::from_secs(8),
        scope: TimeoutScope::PerAttempt,
        max_retries: 2,
        base_backoff: Duration::from_millis(300),
    };

    /// Delay before retry number `retry` (0-based): base, 2 * base, 4 * base...
    pub fn backoff(&self, retry: u32) -> Duration {
        self.base_backoff.saturating_mul(2u32.saturating_pow(retry))
    }

    /// Run `attempt` until it succeeds, fails with a non-retriable error,
    /// runs out of retries or hits the timeout.
    pub async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let per_attempt = self.scope == TimeoutScope::PerAttempt;

        let chain = async {
            let mut retries = 0;
            loop {
                let result = if per_attempt {
                    timeout(self.timeout, attempt())
                        .await
                        .unwrap_or(Err(ProviderError::Timeout))
                } else {
                    attempt().await
                };

                match result {
                    Ok(value) => return Ok(value),
                    Err(e) if e.is_retriable() && retries < self.max_retries => {
                        let delay = self.backoff(retries);
                        log::debug!("Retrying in {delay:?} after: {e}");
                        retries += 1;
                        sleep(delay).await;
                    }
                    Err(e) => return Err(e),
                }
            }
        };

        if per_attempt {
            chain.await
        } else {
            timeout(self.timeout, chain)
                .await
                .unwrap_or(Err(ProviderError::Timeout))
        }
    }
}
