//! Content-addressed cache keys.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Pipeline operation a cache entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Notes,
    Flashcards,
    Quiz,
    /// Summarization cascade output for an over-budget transcript.
    Summary,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Notes => write!(f, "notes"),
            Operation::Flashcards => write!(f, "flashcards"),
            Operation::Quiz => write!(f, "quiz"),
            Operation::Summary => write!(f, "summary"),
        }
    }
}

/// SHA-256 of the UTF-8 bytes of `text`, hex encoded.
pub fn content_fingerprint(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

/// Fingerprint of (content, operation, item count).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub content_hash: String,
    pub operation: Operation,
    pub count: Option<u32>,
}

impl CacheKey {
    /// Key for `operation` over `transcript`, hashing the raw transcript text.
    pub fn new(transcript: &str, operation: Operation, count: Option<u32>) -> Self {
        Self {
            content_hash: content_fingerprint(transcript),
            operation,
            count,
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.operation, &self.content_hash[..12.min(self.content_hash.len())])?;
        if let Some(count) = self.count {
            write!(f, ":{}", count)?;
        }
        Ok(())
    }
}
