//! Transcript acquisition.
//!
//! The generation pipeline only consumes plain text; this module turns a
//! request's `url` / `transcript` fields into that text.

mod vtt;
mod youtube;

pub use vtt::vtt_to_text;
pub use youtube::YoutubeTranscripts;

use crate::error::{Result, StudyError};
use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;

/// Resolves a source reference (URL, id) to plain transcript text.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch_transcript(&self, reference: &str) -> Result<String>;
}

fn video_id_regex() -> &'static Regex {
    static VIDEO_ID: OnceLock<Regex> = OnceLock::new();
    VIDEO_ID.get_or_init(|| {
        Regex::new(
            r"(?x)
            (?:
                (?:https?://)?
                (?:www\.|m\.)?
                (?:youtube\.com/(?:watch\?(?:.*&)?v=|embed/|v/|shorts/|live/)|youtu\.be/)
                ([a-zA-Z0-9_-]{11})
            )
            |
            # Bare video ID
            ^([a-zA-Z0-9_-]{11})$
        ",
        )
        .expect("video id pattern is valid")
    })
}

/// Extract a YouTube video ID from a URL or bare ID.
pub fn extract_video_id(input: &str) -> Option<String> {
    let caps = video_id_regex().captures(input.trim())?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Pick the transcript for a request: inline text wins over a source URL.
pub async fn resolve_transcript(
    source: &dyn TranscriptSource,
    url: Option<&str>,
    transcript: Option<&str>,
) -> Result<String> {
    if let Some(text) = transcript.filter(|t| !t.trim().is_empty()) {
        return Ok(text.to_string());
    }
    match url.filter(|u| !u.trim().is_empty()) {
        Some(url) => source.fetch_transcript(url).await,
        None => Err(StudyError::InvalidInput(
            "either `url` or `transcript` is required".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource;

    #[async_trait]
    impl TranscriptSource for FixedSource {
        async fn fetch_transcript(&self, reference: &str) -> Result<String> {
            Ok(format!("captions for {}", reference))
        }
    }

    #[test]
    fn test_extract_video_id() {
        let cases = [
            ("https://www.youtube.com/watch?v=dQw4w9WgXcQ", "dQw4w9WgXcQ"),
            ("https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ", "dQw4w9WgXcQ"),
            ("https://youtu.be/dQw4w9WgXcQ?t=42", "dQw4w9WgXcQ"),
            ("https://www.youtube.com/shorts/dQw4w9WgXcQ", "dQw4w9WgXcQ"),
            ("https://m.youtube.com/embed/dQw4w9WgXcQ", "dQw4w9WgXcQ"),
            ("  dQw4w9WgXcQ  ", "dQw4w9WgXcQ"),
        ];
        for (input, expected) in cases {
            assert_eq!(extract_video_id(input).as_deref(), Some(expected), "{}", input);
        }
    }

    #[test]
    fn test_extract_video_id_rejects_garbage() {
        assert!(extract_video_id("https://example.com/video").is_none());
        assert!(extract_video_id("short").is_none());
    }

    #[tokio::test]
    async fn test_inline_transcript_wins() {
        let text = resolve_transcript(&FixedSource, Some("dQw4w9WgXcQ"), Some("inline text"))
            .await
            .unwrap();
        assert_eq!(text, "inline text");
    }

    #[tokio::test]
    async fn test_url_used_when_no_transcript() {
        let text = resolve_transcript(&FixedSource, Some("dQw4w9WgXcQ"), Some("  "))
            .await
            .unwrap();
        assert_eq!(text, "captions for dQw4w9WgXcQ");
    }

    #[tokio::test]
    async fn test_neither_field_is_invalid() {
        let err = resolve_transcript(&FixedSource, None, None).await.unwrap_err();
        assert!(matches!(err, StudyError::InvalidInput(_)));
    }
}
