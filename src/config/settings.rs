//! Configuration settings for StudySynth.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub llm: LlmSettings,
    pub retry: RetrySettings,
    pub budget: BudgetSettings,
    pub generation: GenerationSettings,
    pub cache: CacheSettings,
    pub transcript: TranscriptSettings,
    pub prompts: PromptSettings,
}

/// Completion service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model identifier sent with every completion request.
    pub model: String,
    /// OpenAI-compatible API base URL. None uses the OpenAI default.
    pub api_base: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// System message sent ahead of every prompt.
    pub system_prompt: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "llama-3.1-8b-instant".to_string(),
            api_base: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.3,
            timeout_seconds: 300,
            system_prompt: "You are an educational AI.".to_string(),
        }
    }
}

impl LlmSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Retry and repair ceilings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Total attempts per model call when the failure is transient.
    pub max_attempts: u32,
    /// Linear backoff step in milliseconds (sleep = step * attempt).
    pub backoff_ms: u64,
    /// Total attempts of the structured-output repair loop.
    pub repair_attempts: u32,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            backoff_ms: 1500,
            repair_attempts: 3,
        }
    }
}

/// Character budgets for prompting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetSettings {
    /// Maximum characters fed to a single summarization prompt.
    pub transcript_chars: usize,
    /// Maximum characters of a combined summary before a compression pass.
    pub summary_chars: usize,
    /// Inputs longer than `transcript_chars * sample_threshold_multiplier` are sampled.
    pub sample_threshold_multiplier: usize,
}

impl Default for BudgetSettings {
    fn default() -> Self {
        Self {
            transcript_chars: 15_000,
            summary_chars: 9_000,
            sample_threshold_multiplier: 4,
        }
    }
}

impl BudgetSettings {
    /// Size above which the cascade samples instead of chunking.
    pub fn sample_threshold(&self) -> usize {
        self.transcript_chars
            .saturating_mul(self.sample_threshold_multiplier)
    }
}

/// Item count ranges for structured artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub flashcards_min: u32,
    pub flashcards_max: u32,
    pub flashcards_default: u32,
    pub quiz_min: u32,
    pub quiz_max: u32,
    pub quiz_default: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            flashcards_min: 10,
            flashcards_max: 20,
            flashcards_default: 10,
            quiz_min: 5,
            quiz_max: 10,
            quiz_default: 5,
        }
    }
}

/// In-process cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Maximum entries per cache kind before least-recently-used eviction.
    pub capacity: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

/// Transcript acquisition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Preferred caption languages, tried in order before any available language.
    pub languages: Vec<String>,
    /// Attempts when the caption provider rate-limits us.
    pub fetch_attempts: u32,
    /// Pause between rate-limited fetch attempts, in milliseconds.
    pub fetch_backoff_ms: u64,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
            fetch_attempts: 3,
            fetch_backoff_ms: 2000,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            settings.validate()?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::StudyError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::StudyError;

        if self.retry.max_attempts == 0 || self.retry.repair_attempts == 0 {
            return Err(StudyError::Config(
                "retry.max_attempts and retry.repair_attempts must be > 0".to_string(),
            ));
        }
        if self.budget.transcript_chars < 3 || self.budget.summary_chars == 0 {
            return Err(StudyError::Config(
                "budget.transcript_chars must be >= 3 and budget.summary_chars > 0".to_string(),
            ));
        }
        if self.budget.sample_threshold_multiplier == 0 {
            return Err(StudyError::Config(
                "budget.sample_threshold_multiplier must be > 0".to_string(),
            ));
        }
        if self.cache.capacity == 0 {
            return Err(StudyError::Config("cache.capacity must be > 0".to_string()));
        }
        let g = &self.generation;
        if g.flashcards_min == 0 || g.flashcards_min > g.flashcards_max {
            return Err(StudyError::Config(format!(
                "invalid flashcard range [{}, {}]",
                g.flashcards_min, g.flashcards_max
            )));
        }
        if g.quiz_min == 0 || g.quiz_min > g.quiz_max {
            return Err(StudyError::Config(format!(
                "invalid quiz range [{}, {}]",
                g.quiz_min, g.quiz_max
            )));
        }
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("studysynth")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}
