//! Retry policy for record store requests.
//!
//! Transport failures (connection refused, timeouts) are retried with a
//! doubling delay. Any HTTP response ends the loop: status and body handling
//! belong to the caller, so a 500 or an undecodable table is reported on the
//! first attempt.

use std::future::Future;
use std::time::Duration;

use mrl_core::StoreError;

/// How many times, and how patiently, a store request is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// Retries after the first attempt.
    pub retries: u32,
    /// Delay before the first retry. Doubles for each further retry.
    pub base_delay: Duration,
}

impl Default for Backoff {
    /// Three retries after 200 ms, 400 ms and 800 ms.
    fn default() -> Self {
        Self {
            retries: 3,
            base_delay: Duration::from_millis(200),
        }
    }
}

impl Backoff {
    /// A single attempt; the first transport error is final.
    pub const NONE: Backoff = Backoff {
        retries: 0,
        base_delay: Duration::ZERO,
    };

    /// Delay before retry number `retry`, counting from zero.
    pub fn delay(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(retry))
    }

    /// Send a store request, retrying transport errors.
    ///
    /// Once every attempt has failed the last error becomes
    /// [`StoreError::Unavailable`] for `endpoint`.
    pub(crate) async fn send<F, Fut>(
        &self,
        endpoint: &str,
        mut request: F,
    ) -> Result<reqwest::Response, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let mut retry = 0;
        loop {
            match request().await {
                Ok(resp) => return Ok(resp),
                Err(e) if retry < self.retries => {
                    let delay = self.delay(retry);
                    retry += 1;
                    tracing::warn!(
                        endpoint,
                        retry,
                        retries = self.retries,
                        "record store unreachable, retrying in {delay:?}: {e}"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    let attempts = retry + 1;
                    tracing::error!(endpoint, attempts, "record store unreachable: {e}");
                    return Err(StoreError::Unavailable {
                        endpoint: endpoint.to_string(),
                        reason: format!("{e} (gave up after {attempts} attempt(s))"),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    type Attempt = Pin<Box<dyn Future<Output = Result<reqwest::Response, reqwest::Error>> + Send>>;

    fn closed_port_request(calls: Arc<AtomicU32>) -> impl FnMut() -> Attempt {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(client.get("http://127.0.0.1:1/rest/v1/pesticide_mrl").send())
        }
    }

    #[test]
    fn default_delays_double() {
        let backoff = Backoff::default();
        assert_eq!(backoff.delay(0), Duration::from_millis(200));
        assert_eq!(backoff.delay(1), Duration::from_millis(400));
        assert_eq!(backoff.delay(2), Duration::from_millis(800));
    }

    #[test]
    fn delay_saturates_instead_of_overflowing() {
        let backoff = Backoff {
            retries: 64,
            base_delay: Duration::from_secs(1),
        };
        assert!(backoff.delay(63) >= backoff.delay(62));
    }

    #[tokio::test]
    async fn unreachable_store_is_retried_then_unavailable() {
        let calls = Arc::new(AtomicU32::new(0));
        let backoff = Backoff {
            retries: 2,
            base_delay: Duration::from_millis(1),
        };

        let err = backoff
            .send("GET /rest/v1/pesticide_mrl (find)", closed_port_request(calls.clone()))
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match err {
            StoreError::Unavailable { endpoint, reason } => {
                assert_eq!(endpoint, "GET /rest/v1/pesticide_mrl (find)");
                assert!(reason.ends_with("(gave up after 3 attempt(s))"), "{reason}");
            }
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_backoff_makes_a_single_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = Backoff::NONE
            .send("GET /closed", closed_port_request(calls.clone()))
            .await;
        assert!(matches!(result, Err(StoreError::Unavailable { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
