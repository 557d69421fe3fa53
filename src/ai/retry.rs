//! Rate-Limit-Aware Completion Retry
//!
//! Wraps a completion provider with bounded exponential backoff. Only
//! rate-limit conditions are retried; every other error propagates to the
//! caller untouched.

use std::time::Duration;

use tracing::warn;

use super::provider::{Completion, SharedCompletions};
use crate::constants::retry;
use crate::types::{Result, WikiError};

/// Completion client with bounded exponential-backoff retry.
///
/// Attempt `n` of a rate-limited call sleeps `base_delay * 2^(n-1)` before
/// the next try (1s, 2s, 4s, 8s with the defaults). Once the attempt cap is
/// reached the last rate-limit error is returned wrapped in
/// [`WikiError::RetriesExhausted`]; no sleep is spent on an attempt that
/// will not happen.
#[derive(Clone)]
pub struct RetryingCompletionClient {
    inner: SharedCompletions,
    max_attempts: usize,
    base_delay: Duration,
}

impl RetryingCompletionClient {
    /// Wrap a provider with the default retry policy.
    pub fn new(inner: SharedCompletions) -> Self {
        Self::with_policy(
            inner,
            retry::MAX_ATTEMPTS,
            Duration::from_millis(retry::BASE_DELAY_MS),
        )
    }

    /// Wrap a provider with an explicit policy. The attempt cap is clamped
    /// to at least one so the wrapped call always runs.
    pub fn with_policy(inner: SharedCompletions, max_attempts: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Run a completion call, retrying rate-limited attempts with backoff.
    pub async fn complete(&self, prompt: &str) -> Result<Completion> {
        let mut attempt = 0usize;
        loop {
            match self.inner.complete(prompt).await {
                Ok(completion) => return Ok(completion),
                Err(err) if err.is_rate_limit() => {
                    attempt += 1;
                    if attempt >= self.max_attempts {
                        return Err(WikiError::RetriesExhausted {
                            attempts: attempt,
                            source: Box::new(err),
                        });
                    }

                    let delay = self.base_delay * 2u32.saturating_pow((attempt - 1) as u32);
                    warn!(
                        "{} rate limited (attempt {}/{}), retrying in {:?}: {}",
                        self.inner.name(),
                        attempt,
                        self.max_attempts,
                        delay,
                        err
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Name of the wrapped provider.
    pub fn provider_name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::CompletionProvider;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    /// Fails the first `rate_limited_calls` invocations with HTTP 429,
    /// then succeeds.
    struct FlakyProvider {
        rate_limited_calls: usize,
        calls: AtomicUsize,
    }

    impl FlakyProvider {
        fn new(rate_limited_calls: usize) -> Self {
            Self {
                rate_limited_calls,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for FlakyProvider {
        async fn complete(&self, _prompt: &str) -> crate::types::Result<Completion> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.rate_limited_calls {
                Err(WikiError::api_status("stub", 429, "Rate limit reached"))
            } else {
                Ok(Completion {
                    content: "ok".to_string(),
                    model: "stub-model".to_string(),
                })
            }
        }

        fn name(&self) -> &str {
            "stub"
        }

        fn model(&self) -> &str {
            "stub-model"
        }
    }

    /// Always fails with a non-rate-limit error.
    struct BrokenProvider;

    #[async_trait]
    impl CompletionProvider for BrokenProvider {
        async fn complete(&self, _prompt: &str) -> crate::types::Result<Completion> {
            Err(WikiError::api("stub", "invalid api key"))
        }

        fn name(&self) -> &str {
            "stub"
        }

        fn model(&self) -> &str {
            "stub-model"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_two_backoff_sleeps() {
        let provider = Arc::new(FlakyProvider::new(2));
        let client = RetryingCompletionClient::new(provider.clone());

        let started = Instant::now();
        let completion = client.complete("prompt").await.expect("should succeed");

        assert_eq!(completion.content, "ok");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
        // 1s after the first failure, 2s after the second
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_rate_limit_error_propagates_immediately() {
        let client = RetryingCompletionClient::new(Arc::new(BrokenProvider));

        let started = Instant::now();
        let err = client.complete("prompt").await.expect_err("should fail");

        assert!(matches!(err, WikiError::Api { .. }));
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_after_cap() {
        let provider = Arc::new(FlakyProvider::new(usize::MAX));
        let client = RetryingCompletionClient::new(provider.clone());

        let started = Instant::now();
        let err = client.complete("prompt").await.expect_err("should fail");

        match err {
            WikiError::RetriesExhausted { attempts, source } => {
                assert_eq!(attempts, 5);
                assert!(source.is_rate_limit());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 5);
        // 1 + 2 + 4 + 8 seconds of backoff; no sleep after the final attempt
        assert_eq!(started.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test]
    async fn test_attempt_cap_clamped_to_one() {
        let provider = Arc::new(FlakyProvider::new(usize::MAX));
        let client = RetryingCompletionClient::with_policy(provider, 0, Duration::ZERO);

        let err = client.complete("prompt").await.expect_err("should fail");
        assert!(matches!(
            err,
            WikiError::RetriesExhausted { attempts: 1, .. }
        ));
    }
}
