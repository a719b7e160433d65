//! Retrying model client.

use super::CompletionService;
use crate::config::RetrySettings;
use crate::error::{Result, StudyError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry policy for transient upstream failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Linear backoff step: the pause after attempt `n` is `step * n`.
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            backoff_step: Duration::from_millis(1500),
        }
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            backoff_step: Duration::from_millis(settings.backoff_ms),
        }
    }
}

impl RetryPolicy {
    /// Pause after the given (1-based) failed attempt.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }
}

/// The single chokepoint for outbound model calls.
///
/// Transient failures (rate limiting, oversized payload) are retried with
/// linear backoff up to `max_attempts`; anything else fails immediately.
#[derive(Clone)]
pub struct ModelClient {
    service: Arc<dyn CompletionService>,
    policy: RetryPolicy,
}

impl ModelClient {
    pub fn new(service: Arc<dyn CompletionService>, policy: RetryPolicy) -> Self {
        Self { service, policy }
    }

    /// Send `prompt` and return the completion text.
    pub async fn invoke(&self, prompt: &str) -> Result<String> {
        let mut attempt = 1;
        loop {
            match self.service.complete(prompt).await {
                Ok(text) => {
                    debug!("Model call succeeded on attempt {}", attempt);
                    return Ok(text);
                }
                Err(e) if e.is_transient() && attempt < self.policy.max_attempts => {
                    let pause = self.policy.backoff(attempt);
                    warn!(
                        "Transient model failure (attempt {}/{}), retrying in {:?}: {}",
                        attempt, self.policy.max_attempts, pause, e
                    );
                    tokio::time::sleep(pause).await;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(StudyError::Model {
                        attempts: attempt,
                        message: e.to_string(),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedCompletion;

    fn instant_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 4,
            backoff_step: Duration::ZERO,
        }
    }

    #[test]
    fn test_linear_backoff() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_millis(1500));
        assert_eq!(policy.backoff(3), Duration::from_millis(4500));
    }

    #[tokio::test]
    async fn test_retries_rate_limit_then_succeeds() {
        let service = Arc::new(
            ScriptedCompletion::new()
                .fail("Rate limit reached for model llama-3.1-8b-instant")
                .fail("429 Too Many Requests")
                .reply("done"),
        );
        let client = ModelClient::new(service.clone(), instant_policy());

        let result = client.invoke("prompt").await.unwrap();
        assert_eq!(result, "done");
        assert_eq!(service.calls(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let service = Arc::new(
            ScriptedCompletion::new()
                .fail("too many requests")
                .fail("too many requests")
                .fail("too many requests")
                .fail("too many requests")
                .reply("never reached"),
        );
        let client = ModelClient::new(service.clone(), instant_policy());

        match client.invoke("prompt").await {
            Err(StudyError::Model { attempts, message }) => {
                assert_eq!(attempts, 4);
                assert!(message.contains("too many requests"));
            }
            other => panic!("expected model error, got {:?}", other),
        }
        assert_eq!(service.calls(), 4);
    }

    #[tokio::test]
    async fn test_fatal_error_is_not_retried() {
        let service = Arc::new(
            ScriptedCompletion::new()
                .fail("invalid_api_key")
                .reply("never reached"),
        );
        let client = ModelClient::new(service.clone(), instant_policy());

        let err = client.invoke("prompt").await.unwrap_err();
        assert!(matches!(err, StudyError::Model { attempts: 1, .. }));
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn test_payload_too_large_is_transient() {
        let service = Arc::new(
            ScriptedCompletion::new()
                .fail("413 Request Entity Too Large")
                .reply("ok"),
        );
        let client = ModelClient::new(service.clone(), instant_policy());

        assert_eq!(client.invoke("prompt").await.unwrap(), "ok");
        assert_eq!(service.calls(), 2);
    }
}
