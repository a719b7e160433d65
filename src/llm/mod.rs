//! Model invocation: the completion transport and the retrying client around it.
//!
//! Every outbound model call goes through [`ModelClient`], so the retry and
//! backoff policy lives in exactly one place. The transport itself is the
//! [`CompletionService`] trait; [`OpenAICompletion`] implements it for any
//! OpenAI-compatible chat completions endpoint.

mod client;
mod openai;

pub use client::{ModelClient, RetryPolicy};
pub use openai::OpenAICompletion;

use crate::error::Result;
use async_trait::async_trait;

/// A text-completion service: prompt in, completion text out.
///
/// Implementations report upstream failures as
/// [`StudyError::Completion`](crate::error::StudyError::Completion) carrying
/// the upstream message, which the client uses to decide whether to retry.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Complete a single prompt.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted completion service for pipeline tests.

    use super::CompletionService;
    use crate::error::{Result, StudyError};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned replies in order and records every prompt it receives.
    ///
    /// Once the script is exhausted it answers with `fallback`, if set.
    #[derive(Default)]
    pub struct ScriptedCompletion {
        replies: Mutex<VecDeque<std::result::Result<String, String>>>,
        prompts: Mutex<Vec<String>>,
        fallback: Option<String>,
    }

    impl ScriptedCompletion {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer every prompt with `reply`.
        pub fn always(reply: &str) -> Self {
            Self {
                fallback: Some(reply.to_string()),
                ..Self::default()
            }
        }

        pub fn reply(self, text: &str) -> Self {
            self.replies.lock().unwrap().push_back(Ok(text.to_string()));
            self
        }

        pub fn fail(self, message: &str) -> Self {
            self.replies
                .lock()
                .unwrap()
                .push_back(Err(message.to_string()));
            self
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionService for ScriptedCompletion {
        async fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let next = self.replies.lock().unwrap().pop_front();
            match next {
                Some(Ok(text)) => Ok(text),
                Some(Err(message)) => Err(StudyError::Completion(message)),
                None => self
                    .fallback
                    .clone()
                    .ok_or_else(|| StudyError::Completion("script exhausted".to_string())),
            }
        }
    }
}
