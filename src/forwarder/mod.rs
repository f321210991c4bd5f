//! Backend forwarder: delivers relayed events to Wylto.
//!
//! Delivery is best-effort. Transport failures, timeouts and 5xx/429
//! responses are retried a bounded number of times with exponential
//! backoff; anything else fails immediately.

mod backoff;

pub use backoff::{BackoffConfig, ExponentialBackoff};

use std::future::Future;

use async_trait::async_trait;
use tracing::warn;

use crate::metrics::ForwardMetrics;
use crate::relay::RelayEnvelope;
use crate::wylto::{WyltoClient, WyltoError};

/// Destination for relayed webhook events
#[async_trait]
pub trait Forwarder: Send + Sync {
    async fn forward(&self, envelope: &RelayEnvelope) -> Result<(), WyltoError>;
}

/// Forwards events to the Wylto webhook endpoint over HTTPS
#[derive(Debug)]
pub struct HttpForwarder {
    client: WyltoClient,
    max_retries: u32,
    backoff: BackoffConfig,
}

impl HttpForwarder {
    pub fn new(client: WyltoClient, max_retries: u32) -> Self {
        Self {
            client,
            max_retries,
            backoff: BackoffConfig::default(),
        }
    }

    pub fn with_backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = backoff;
        self
    }
}

#[async_trait]
impl Forwarder for HttpForwarder {
    async fn forward(&self, envelope: &RelayEnvelope) -> Result<(), WyltoError> {
        with_retries(self.max_retries, &self.backoff, || {
            self.client.post_event(envelope)
        })
        .await
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or
/// `max_retries` extra attempts have been spent.
pub async fn with_retries<T, F, Fut>(
    max_retries: u32,
    backoff: &BackoffConfig,
    mut op: F,
) -> Result<T, WyltoError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, WyltoError>>,
{
    let mut backoff = ExponentialBackoff::new(backoff.clone());

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && backoff.attempt() < max_retries => {
                let delay = backoff.next_delay();
                ForwardMetrics::record_retry(e.reason());
                warn!(
                    error = %e,
                    attempt = backoff.attempt(),
                    max_retries,
                    delay_ms = delay.as_millis() as u64,
                    "Wylto call failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_backoff() -> BackoffConfig {
        BackoffConfig {
            initial_delay_ms: 1,
            max_delay_ms: 2,
            multiplier: 2.0,
            jitter_factor: 0.0,
        }
    }

    fn unavailable() -> WyltoError {
        WyltoError::Status {
            status: 503,
            body: "unavailable".to_string(),
        }
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = AtomicU32::new(0);

        let result = with_retries(2, &fast_backoff(), || async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(unavailable())
            } else {
                Ok(n)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = with_retries(2, &fast_backoff(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(unavailable())
        })
        .await;

        assert!(matches!(result, Err(WyltoError::Status { status: 503, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = with_retries(5, &fast_backoff(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(WyltoError::Status {
                status: 400,
                body: String::new(),
            })
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_retries_means_single_attempt() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = with_retries(0, &fast_backoff(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(unavailable())
        })
        .await;

        tokio_test::assert_err!(result);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
