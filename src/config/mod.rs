//! Configuration module for StudySynth.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{GenerationPrompts, Prompts, SummaryPrompts};
pub use settings::{
    BudgetSettings, CacheSettings, GenerationSettings, LlmSettings, PromptSettings,
    RetrySettings, Settings, TranscriptSettings,
};
