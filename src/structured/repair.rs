//! Structured-output repair loop.

use super::{extract_json, Validate};
use crate::config::Prompts;
use crate::error::{Result, StudyError};
use crate::llm::ModelClient;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Longest slice of a rejected reply echoed into logs.
const LOG_PREVIEW_CHARS: usize = 300;

/// Obtains validated JSON from the model, reprompting on malformed output.
#[derive(Clone)]
pub struct StructuredClient {
    client: ModelClient,
    repair_template: String,
    variables: HashMap<String, String>,
    max_attempts: u32,
}

impl StructuredClient {
    /// Create a repair loop over `client` using the repair prompt from `prompts`.
    pub fn new(client: ModelClient, prompts: &Prompts, max_attempts: u32) -> Self {
        Self {
            client,
            repair_template: prompts.generation.repair.clone(),
            variables: prompts.variables.clone(),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Send `prompt` and return the reply parsed as `T`.
    ///
    /// Extraction misses, parse errors and validation failures trigger a
    /// repair prompt carrying `schema_hint` and the rejected reply, up to
    /// `max_attempts` total calls. Model failures propagate immediately.
    #[instrument(skip(self, prompt, schema_hint), fields(max_attempts = self.max_attempts))]
    pub async fn invoke_json<T>(&self, prompt: &str, schema_hint: &str) -> Result<T>
    where
        T: DeserializeOwned + Validate,
    {
        let mut current_prompt = prompt.to_string();
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            let raw = self.client.invoke(&current_prompt).await?;

            match parse_reply::<T>(&raw) {
                Ok(value) => {
                    debug!("Structured reply accepted on attempt {}", attempt);
                    return Ok(value);
                }
                Err(reason) => {
                    warn!(
                        "Rejected structured reply (attempt {}/{}): {}. Reply began: {}",
                        attempt,
                        self.max_attempts,
                        reason,
                        preview(&raw)
                    );
                    current_prompt = self.repair_prompt(schema_hint, &raw, &reason);
                    last_error = reason;
                }
            }
        }

        Err(StudyError::JsonGeneration {
            attempts: self.max_attempts,
            message: last_error,
        })
    }

    fn repair_prompt(&self, schema_hint: &str, raw: &str, reason: &str) -> String {
        let mut vars = self.variables.clone();
        vars.insert("schema".to_string(), schema_hint.to_string());
        vars.insert("raw".to_string(), raw.to_string());
        vars.insert("error".to_string(), reason.to_string());
        Prompts::render(&self.repair_template, &vars)
    }
}

/// Extract, parse and validate a reply.
fn parse_reply<T>(raw: &str) -> std::result::Result<T, String>
where
    T: DeserializeOwned + Validate,
{
    let candidate = extract_json(raw).ok_or_else(|| "no JSON value found in reply".to_string())?;
    let value: T = serde_json::from_str(candidate).map_err(|e| format!("invalid JSON: {}", e))?;
    value.validate()?;
    Ok(value)
}

fn preview(raw: &str) -> String {
    raw.chars().take(LOG_PREVIEW_CHARS).collect()
}
