//! Error types for StudySynth.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Library-level error type for StudySynth operations.
#[derive(Error, Debug)]
pub enum StudyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transcript unavailable: {0}")]
    TranscriptUnavailable(String),

    #[error("Completion request failed: {0}")]
    Completion(String),

    #[error("Model invocation failed after {attempts} attempt(s): {message}")]
    Model { attempts: u32, message: String },

    #[error("Could not generate valid JSON after {attempts} attempt(s): {message}")]
    JsonGeneration { attempts: u32, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl StudyError {
    /// Whether this error signals a momentary upstream condition worth retrying.
    ///
    /// Only raw completion failures are classified; everything else is fatal.
    pub fn is_transient(&self) -> bool {
        match self {
            StudyError::Completion(message) => is_transient_message(message),
            _ => false,
        }
    }
}

/// Rate-limit and oversized-payload signals recognised in upstream messages.
const TRANSIENT_MARKERS: &[&str] = &[
    "rate limit",
    "rate_limit",
    "ratelimit",
    "too many requests",
    "payload too large",
    "request too large",
    "request entity too large",
];

/// HTTP 429 or 413 as a standalone number, not part of an id or count.
fn status_code_regex() -> &'static Regex {
    static STATUS: OnceLock<Regex> = OnceLock::new();
    STATUS.get_or_init(|| Regex::new(r"\b(?:429|413)\b").expect("status pattern is valid"))
}

/// Check an upstream error message for a transient-failure signal.
pub fn is_transient_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    TRANSIENT_MARKERS.iter().any(|marker| lower.contains(marker))
        || status_code_regex().is_match(&lower)
}

/// Result type alias for StudySynth operations.
pub type Result<T> = std::result::Result<T, StudyError>;
