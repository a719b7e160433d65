//! Study artifact generation: notes, flashcards and quizzes.
//!
//! Each operation checks its own cache first. On a miss the transcript is
//! reduced by the summarization cascade when needed, a prompt is built, and
//! the model is called directly (notes) or through the structured-output
//! repair loop (flashcards, quiz).

mod models;

pub use models::{AnswerLabel, Flashcard, QuizQuestion, FLASHCARD_SCHEMA, QUIZ_SCHEMA};

use crate::cache::{CacheKey, ContentCache, Operation};
use crate::chunking::char_len;
use crate::config::{BudgetSettings, GenerationSettings, Prompts, Settings};
use crate::error::{Result, StudyError};
use crate::llm::{CompletionService, ModelClient, OpenAICompletion, RetryPolicy};
use crate::structured::StructuredClient;
use crate::summary::Summarizer;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Entry point for generating study artifacts from a transcript.
pub struct StudyGenerator {
    client: ModelClient,
    structured: StructuredClient,
    summarizer: Summarizer,
    prompts: Prompts,
    generation: GenerationSettings,
    budget: BudgetSettings,
    notes_cache: ContentCache<CacheKey, String>,
    flashcards_cache: ContentCache<CacheKey, Vec<Flashcard>>,
    quiz_cache: ContentCache<CacheKey, Vec<QuizQuestion>>,
}

impl StudyGenerator {
    /// Create a generator talking to the configured OpenAI-compatible endpoint.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;

        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let service = Arc::new(OpenAICompletion::from_settings(&settings.llm)?);
        info!(
            "Using model {} (temperature {})",
            service.model(),
            settings.llm.temperature
        );

        Ok(Self::with_service(settings, prompts, service))
    }

    /// Create a generator over any completion service.
    pub fn with_service(
        settings: &Settings,
        prompts: Prompts,
        service: Arc<dyn CompletionService>,
    ) -> Self {
        let client = ModelClient::new(service, RetryPolicy::from(&settings.retry));
        let structured =
            StructuredClient::new(client.clone(), &prompts, settings.retry.repair_attempts);
        let summarizer = Summarizer::new(
            client.clone(),
            &prompts,
            settings.budget.clone(),
            settings.cache.capacity,
        );

        Self {
            client,
            structured,
            summarizer,
            prompts,
            generation: settings.generation.clone(),
            budget: settings.budget.clone(),
            notes_cache: ContentCache::new("notes", settings.cache.capacity),
            flashcards_cache: ContentCache::new("flashcards", settings.cache.capacity),
            quiz_cache: ContentCache::new("quiz", settings.cache.capacity),
        }
    }

    /// Clamp a requested flashcard count into the configured range.
    pub fn clamp_flashcards(&self, count: u32) -> u32 {
        count.clamp(self.generation.flashcards_min, self.generation.flashcards_max)
    }

    /// Clamp a requested question count into the configured range.
    pub fn clamp_quiz(&self, count: u32) -> u32 {
        count.clamp(self.generation.quiz_min, self.generation.quiz_max)
    }

    pub fn default_flashcards(&self) -> u32 {
        self.generation.flashcards_default
    }

    pub fn default_quiz(&self) -> u32 {
        self.generation.quiz_default
    }

    /// Generate structured notes.
    ///
    /// Over-budget transcripts return the cascade summary directly, since it
    /// is already an outline; others get one notes prompt.
    #[instrument(skip(self, transcript), fields(chars = transcript.len()))]
    pub async fn generate_notes(&self, transcript: &str) -> Result<String> {
        require_content(transcript)?;

        let key = CacheKey::new(transcript, Operation::Notes, None);
        self.notes_cache
            .get_or_try_insert_with(key, || async {
                if char_len(transcript) > self.budget.transcript_chars {
                    info!("Transcript over budget, using cascade summary as notes");
                    return self.summarizer.summarize(transcript).await;
                }

                let content = self.summarizer.summarize(transcript).await?;
                let mut vars = HashMap::new();
                vars.insert("transcript".to_string(), content);
                let prompt = self
                    .prompts
                    .render_with_custom(&self.prompts.generation.notes, &vars);
                self.client.invoke(&prompt).await
            })
            .await
    }

    /// Generate flashcards; `count` is clamped to the configured range.
    #[instrument(skip(self, transcript), fields(chars = transcript.len()))]
    pub async fn generate_flashcards(&self, transcript: &str, count: u32) -> Result<Vec<Flashcard>> {
        require_content(transcript)?;
        let count = self.clamp_flashcards(count);

        let key = CacheKey::new(transcript, Operation::Flashcards, Some(count));
        self.flashcards_cache
            .get_or_try_insert_with(key, || async {
                let prompt = self
                    .structured_prompt(&self.prompts.generation.flashcards, transcript, count, FLASHCARD_SCHEMA)
                    .await?;
                let cards: Vec<Flashcard> =
                    self.structured.invoke_json(&prompt, FLASHCARD_SCHEMA).await?;
                Ok(fit_to_count(cards, count, Operation::Flashcards))
            })
            .await
    }

    /// Generate a multiple-choice quiz; `count` is clamped to the configured range.
    #[instrument(skip(self, transcript), fields(chars = transcript.len()))]
    pub async fn generate_quiz(&self, transcript: &str, count: u32) -> Result<Vec<QuizQuestion>> {
        require_content(transcript)?;
        let count = self.clamp_quiz(count);

        let key = CacheKey::new(transcript, Operation::Quiz, Some(count));
        self.quiz_cache
            .get_or_try_insert_with(key, || async {
                let prompt = self
                    .structured_prompt(&self.prompts.generation.quiz, transcript, count, QUIZ_SCHEMA)
                    .await?;
                let questions: Vec<QuizQuestion> =
                    self.structured.invoke_json(&prompt, QUIZ_SCHEMA).await?;
                Ok(fit_to_count(questions, count, Operation::Quiz))
            })
            .await
    }

    /// Summarize (no-op when within budget) and render a structured-output prompt.
    async fn structured_prompt(
        &self,
        template: &str,
        transcript: &str,
        count: u32,
        schema: &str,
    ) -> Result<String> {
        let content = self.summarizer.summarize(transcript).await?;

        let mut vars = HashMap::new();
        vars.insert("count".to_string(), count.to_string());
        vars.insert("schema".to_string(), schema.to_string());
        vars.insert("transcript".to_string(), content);
        Ok(self.prompts.render_with_custom(template, &vars))
    }
}

fn require_content(transcript: &str) -> Result<()> {
    if transcript.trim().is_empty() {
        return Err(StudyError::InvalidInput("transcript is empty".to_string()));
    }
    Ok(())
}

/// Drop surplus records; a short list is kept as returned.
fn fit_to_count<T>(mut items: Vec<T>, count: u32, operation: Operation) -> Vec<T> {
    let count = count as usize;
    if items.len() > count {
        items.truncate(count);
    } else if items.len() < count {
        warn!(
            "Model returned {} {} items, {} requested",
            items.len(),
            operation,
            count
        );
    }
    items
}
