//! Summarization cascade: reduces an over-budget transcript to an in-budget summary.
//!
//! | transcript size                  | path                                          |
//! |----------------------------------|-----------------------------------------------|
//! | `<= transcript budget`           | returned unchanged, no model call             |
//! | `<= threshold` (4x budget)       | one call per chunk, plus one compression call |
//! |                                  | if the joined summaries exceed the summary    |
//! |                                  | budget                                        |
//! | `> threshold`                    | head/middle/tail sample, exactly one call     |
//!
//! Results for over-budget inputs are cached by content hash.

use crate::cache::{CacheKey, ContentCache, Operation};
use crate::chunking::{char_len, chunk_text, sample_text};
use crate::config::{BudgetSettings, Prompts, SummaryPrompts};
use crate::error::Result;
use crate::llm::ModelClient;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Separator between per-chunk summaries.
const SUMMARY_SEPARATOR: &str = "\n\n";

/// How the cascade will treat a transcript of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadePlan {
    /// Within the transcript budget.
    Passthrough,
    /// Chunk, summarize each chunk, compress if needed.
    Chunked,
    /// Too long to chunk affordably; sample and summarize once.
    Sampled,
}

/// Runs the summarization cascade and caches its results.
pub struct Summarizer {
    client: ModelClient,
    prompts: SummaryPrompts,
    variables: HashMap<String, String>,
    budget: BudgetSettings,
    cache: ContentCache<CacheKey, String>,
}

impl Summarizer {
    pub fn new(
        client: ModelClient,
        prompts: &Prompts,
        budget: BudgetSettings,
        cache_capacity: usize,
    ) -> Self {
        Self {
            client,
            prompts: prompts.summary.clone(),
            variables: prompts.variables.clone(),
            budget,
            cache: ContentCache::new("summary", cache_capacity),
        }
    }

    /// Decide which cascade path a transcript takes.
    pub fn plan(&self, transcript: &str) -> CascadePlan {
        let len = char_len(transcript);
        if len <= self.budget.transcript_chars {
            CascadePlan::Passthrough
        } else if len <= self.budget.sample_threshold() {
            CascadePlan::Chunked
        } else {
            CascadePlan::Sampled
        }
    }

    /// Reduce `transcript` to fit the prompt budget.
    #[instrument(skip(self, transcript), fields(chars = transcript.len()))]
    pub async fn summarize(&self, transcript: &str) -> Result<String> {
        let plan = self.plan(transcript);
        if plan == CascadePlan::Passthrough {
            return Ok(transcript.to_string());
        }

        let key = CacheKey::new(transcript, Operation::Summary, None);
        self.cache
            .get_or_try_insert_with(key, || self.run_cascade(transcript, plan))
            .await
    }

    async fn run_cascade(&self, transcript: &str, plan: CascadePlan) -> Result<String> {
        match plan {
            CascadePlan::Passthrough => Ok(transcript.to_string()),
            CascadePlan::Chunked => self.summarize_chunks(transcript).await,
            CascadePlan::Sampled => self.summarize_sample(transcript).await,
        }
    }

    async fn summarize_chunks(&self, transcript: &str) -> Result<String> {
        let chunks = chunk_text(transcript, self.budget.transcript_chars);
        info!("Summarizing transcript in {} chunks", chunks.len());

        let parts = chunks.len().to_string();
        let mut summaries = Vec::with_capacity(chunks.len());
        for (idx, chunk) in chunks.iter().enumerate() {
            let mut vars = HashMap::new();
            vars.insert("part".to_string(), (idx + 1).to_string());
            vars.insert("parts".to_string(), parts.clone());
            vars.insert("transcript".to_string(), chunk.clone());

            let prompt = self.render(&self.prompts.chunk, &vars);
            let summary = self.client.invoke(&prompt).await?;
            debug!("Chunk {}/{} summarized to {} chars", idx + 1, parts, char_len(&summary));
            summaries.push(summary);
        }

        let combined = summaries.join(SUMMARY_SEPARATOR);
        if char_len(&combined) <= self.budget.summary_chars {
            return Ok(combined);
        }

        info!(
            "Combined summary is {} chars (limit {}), compressing",
            char_len(&combined),
            self.budget.summary_chars
        );
        let mut vars = HashMap::new();
        vars.insert("limit".to_string(), self.budget.summary_chars.to_string());
        vars.insert("transcript".to_string(), combined);

        let prompt = self.render(&self.prompts.compress, &vars);
        self.client.invoke(&prompt).await
    }

    async fn summarize_sample(&self, transcript: &str) -> Result<String> {
        info!(
            "Transcript exceeds {} chars, summarizing a sampled excerpt",
            self.budget.sample_threshold()
        );
        let excerpt = sample_text(transcript, self.budget.transcript_chars);

        let mut vars = HashMap::new();
        vars.insert("transcript".to_string(), excerpt);

        let prompt = self.render(&self.prompts.excerpt, &vars);
        self.client.invoke(&prompt).await
    }

    fn render(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        merged.extend(vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        Prompts::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::SAMPLE_SEPARATOR;
    use crate::llm::testing::ScriptedCompletion;
    use crate::llm::RetryPolicy;
    use std::sync::Arc;
    use std::time::Duration;

    fn summarizer(service: Arc<ScriptedCompletion>) -> Summarizer {
        let client = ModelClient::new(
            service,
            RetryPolicy {
                max_attempts: 4,
                backoff_step: Duration::ZERO,
            },
        );
        Summarizer::new(client, &Prompts::default(), BudgetSettings::default(), 16)
    }

    fn lecture(chars: usize) -> String {
        let sentence = "Enzymes lower the activation energy of biochemical reactions. ";
        sentence.repeat(chars / sentence.len() + 1).chars().take(chars).collect()
    }

    #[tokio::test]
    async fn test_within_budget_is_passthrough() {
        let service = Arc::new(ScriptedCompletion::always("unused"));
        let summarizer = summarizer(service.clone());
        let text = lecture(15_000);

        assert_eq!(summarizer.plan(&text), CascadePlan::Passthrough);
        assert_eq!(summarizer.summarize(&text).await.unwrap(), text);
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn test_two_chunks_without_compression() {
        let service = Arc::new(
            ScriptedCompletion::new()
                .reply("- part one")
                .reply("- part two"),
        );
        let summarizer = summarizer(service.clone());
        let text = lecture(20_000);

        assert_eq!(summarizer.plan(&text), CascadePlan::Chunked);
        let summary = summarizer.summarize(&text).await.unwrap();

        assert_eq!(summary, "- part one\n\n- part two");
        let prompts = service.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("(1 of 2)"));
        assert!(prompts[1].contains("(2 of 2)"));
    }

    #[tokio::test]
    async fn test_long_chunk_summaries_are_compressed_once() {
        let long_summary = "x".repeat(5_000);
        let service = Arc::new(
            ScriptedCompletion::new()
                .reply(&long_summary)
                .reply(&long_summary)
                .reply("# Outline"),
        );
        let summarizer = summarizer(service.clone());

        let summary = summarizer.summarize(&lecture(20_000)).await.unwrap();

        assert_eq!(summary, "# Outline");
        let prompts = service.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[2].contains("under 9000 characters"));
        assert!(prompts[2].contains(&long_summary));
    }

    #[tokio::test]
    async fn test_very_long_input_is_sampled_with_one_call() {
        let service = Arc::new(ScriptedCompletion::new().reply("# Sampled outline"));
        let summarizer = summarizer(service.clone());
        let text = lecture(100_000);

        assert_eq!(summarizer.plan(&text), CascadePlan::Sampled);
        let summary = summarizer.summarize(&text).await.unwrap();

        assert_eq!(summary, "# Sampled outline");
        let prompts = service.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].matches(SAMPLE_SEPARATOR).count(), 2);
    }

    #[tokio::test]
    async fn test_cascade_results_are_cached() {
        let service = Arc::new(ScriptedCompletion::always("- summary"));
        let summarizer = summarizer(service.clone());
        let text = lecture(70_000);

        let first = summarizer.summarize(&text).await.unwrap();
        let second = summarizer.summarize(&text).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(service.calls(), 1);
    }
}
