//! OpenAI-compatible client configuration with sensible defaults.

use crate::config::LlmSettings;
use crate::error::{Result, StudyError};
use async_openai::{config::OpenAIConfig, Client};
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use std::time::Duration;

/// Default timeout for completion requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create a client for the endpoint and key described by `settings`.
///
/// The API key is read from the environment variable named in
/// `settings.api_key_env`; a custom `api_base` points the client at any
/// OpenAI-compatible provider (Groq, a local server, ...).
pub fn create_client(settings: &LlmSettings) -> Result<Client<OpenAIConfig>> {
    let api_key = std::env::var(&settings.api_key_env).map_err(|_| {
        StudyError::Config(format!(
            "{} is not set. Export your API key or change llm.api_key_env.",
            settings.api_key_env
        ))
    })?;

    let mut config = OpenAIConfig::new().with_api_key(api_key);
    if let Some(base) = settings.api_base.as_deref().filter(|b| !b.is_empty()) {
        config = config.with_api_base(base);
    }

    let timeout = if settings.timeout_seconds == 0 {
        Duration::from_secs(DEFAULT_TIMEOUT_SECS)
    } else {
        settings.timeout()
    };

    create_client_with_timeout(config, timeout)
}

/// Create a client with a custom timeout.
pub fn create_client_with_timeout(
    config: OpenAIConfig,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    Ok(Client::with_config(config)
        .with_http_client(http_client)
        .with_backoff(no_retry_backoff()))
}

/// Backoff that gives up on the first failure.
///
/// Retries are owned by `ModelClient`; the transport reports every failure
/// straight away.
fn no_retry_backoff() -> ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoff::backoff::Backoff;

    #[test]
    fn test_transport_backoff_never_retries() {
        let mut backoff = no_retry_backoff();
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(backoff.next_backoff(), None);
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let settings = LlmSettings {
            api_key_env: "STUDYSYNTH_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..LlmSettings::default()
        };

        match create_client(&settings) {
            Err(StudyError::Config(msg)) => {
                assert!(msg.contains("STUDYSYNTH_TEST_KEY_THAT_IS_NEVER_SET"))
            }
            other => panic!("expected config error, got {:?}", other.map(|_| ())),
        }
    }
}
