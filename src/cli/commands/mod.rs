//! CLI command implementations.

mod config;
mod flashcards;
mod notes;
mod quiz;
mod serve;

pub use config::run_config;
pub use flashcards::run_flashcards;
pub use notes::run_notes;
pub use quiz::run_quiz;
pub use serve::run_serve;

use crate::config::Settings;
use crate::transcript::{vtt_to_text, TranscriptSource, YoutubeTranscripts};
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Read a transcript from stdin (`-`), a local text/WebVTT file, or a YouTube URL/ID.
pub(crate) async fn load_transcript(input: &str, settings: &Settings) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read transcript from stdin")?;
        return Ok(text);
    }

    let path = Path::new(input);
    if path.is_file() {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let is_vtt = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("vtt"));
        return Ok(if is_vtt { vtt_to_text(&content) } else { content });
    }

    crate::cli::preflight::check_tool("yt-dlp")?;
    let source = YoutubeTranscripts::new(&settings.transcript);
    Ok(source.fetch_transcript(input).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lecture.txt");
        std::fs::write(&path, "Plain lecture text.").unwrap();

        let text = load_transcript(path.to_str().unwrap(), &Settings::default())
            .await
            .unwrap();
        assert_eq!(text, "Plain lecture text.");
    }

    #[tokio::test]
    async fn test_load_vtt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lecture.vtt");
        std::fs::write(&path, "WEBVTT\n\n00:00.000 --> 00:01.000\nCaptioned <i>text</i>.\n").unwrap();

        let text = load_transcript(path.to_str().unwrap(), &Settings::default())
            .await
            .unwrap();
        assert_eq!(text, "Captioned text.");
    }
}
