//! YouTube caption retrieval via yt-dlp.

use super::{extract_video_id, vtt::vtt_to_text, TranscriptSource};
use crate::cache::ContentCache;
use crate::config::TranscriptSettings;
use crate::error::{is_transient_message, Result, StudyError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Number of videos whose transcripts are kept in memory.
const TRANSCRIPT_CACHE_CAPACITY: usize = 128;

/// One yt-dlp subtitle download attempt.
struct CaptionPass {
    sub_langs: String,
    manual: bool,
    automatic: bool,
}

/// Fetches caption tracks with yt-dlp and converts them to plain text.
pub struct YoutubeTranscripts {
    languages: Vec<String>,
    attempts: u32,
    backoff: Duration,
    cache: ContentCache<String, String>,
}

impl YoutubeTranscripts {
    pub fn new(settings: &TranscriptSettings) -> Self {
        Self {
            languages: settings.languages.clone(),
            attempts: settings.fetch_attempts.max(1),
            backoff: Duration::from_millis(settings.fetch_backoff_ms),
            cache: ContentCache::new("transcript", TRANSCRIPT_CACHE_CAPACITY),
        }
    }

    /// Preferred languages (manual or automatic), then any manual track,
    /// then the automatic track in the video's original language.
    fn passes(&self) -> Vec<CaptionPass> {
        let mut passes = Vec::new();
        if !self.languages.is_empty() {
            passes.push(CaptionPass {
                sub_langs: self.languages.join(","),
                manual: true,
                automatic: true,
            });
        }
        passes.push(CaptionPass {
            sub_langs: "all".to_string(),
            manual: true,
            automatic: false,
        });
        passes.push(CaptionPass {
            sub_langs: ".*-orig".to_string(),
            manual: false,
            automatic: true,
        });
        passes
    }

    /// Fetch with a fixed pause between attempts the provider rate-limits.
    async fn fetch_with_retry(&self, video_id: &str) -> Result<String> {
        let mut attempt = 1;
        loop {
            match self.download_captions(video_id).await {
                Ok(text) => return Ok(text),
                Err(e) if is_transient_message(&e.to_string()) => {
                    if attempt >= self.attempts {
                        return Err(StudyError::TranscriptUnavailable(
                            "YouTube blocked transcript requests temporarily. \
                             Please wait a few minutes or try another video."
                                .to_string(),
                        ));
                    }
                    warn!(
                        "Caption fetch rate-limited (attempt {}/{}): {}",
                        attempt, self.attempts, e
                    );
                    tokio::time::sleep(self.backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn download_captions(&self, video_id: &str) -> Result<String> {
        let url = format!("https://www.youtube.com/watch?v={}", video_id);
        let temp_dir = tempfile::tempdir()?;

        for pass in self.passes() {
            run_ytdlp(&url, &pass, temp_dir.path()).await?;

            if let Some(path) = first_vtt(temp_dir.path())? {
                debug!("Using caption track {}", path.display());
                let vtt = tokio::fs::read_to_string(&path).await?;
                let text = vtt_to_text(&vtt);
                if !text.is_empty() {
                    info!("Fetched transcript for {} ({} chars)", video_id, text.len());
                    return Ok(text);
                }
            }
            debug!("No captions for {} with sub-langs {}", video_id, pass.sub_langs);
        }

        Err(StudyError::TranscriptUnavailable(format!(
            "No captions are available for video {}",
            video_id
        )))
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscripts {
    #[instrument(skip(self))]
    async fn fetch_transcript(&self, reference: &str) -> Result<String> {
        let video_id = extract_video_id(reference).ok_or_else(|| {
            StudyError::InvalidInput(format!("Invalid YouTube URL or video ID: {}", reference))
        })?;

        self.cache
            .get_or_try_insert_with(video_id.clone(), || self.fetch_with_retry(&video_id))
            .await
    }
}

async fn run_ytdlp(url: &str, pass: &CaptionPass, out_dir: &Path) -> Result<()> {
    let template = out_dir.join("%(id)s.%(ext)s");
    let template = template.to_string_lossy();

    let mut args = vec!["--skip-download", "--no-warnings", "--sub-format", "vtt"];
    if pass.manual {
        args.push("--write-subs");
    }
    if pass.automatic {
        args.push("--write-auto-subs");
    }
    args.extend(["--sub-langs", pass.sub_langs.as_str(), "-o", &*template, url]);

    let output = tokio::process::Command::new("yt-dlp")
        .args(&args)
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StudyError::ToolNotFound("yt-dlp".to_string())
            } else {
                StudyError::ToolFailed(format!("Failed to run yt-dlp: {}", e))
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("Video unavailable") || stderr.contains("Private video") {
            return Err(StudyError::TranscriptUnavailable(stderr.trim().to_string()));
        }
        return Err(StudyError::ToolFailed(format!("yt-dlp: {}", stderr.trim())));
    }

    Ok(())
}

/// First `.vtt` file in `dir`, by name.
fn first_vtt(dir: &Path) -> Result<Option<PathBuf>> {
    let mut tracks: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "vtt"))
        .collect();
    tracks.sort();
    Ok(tracks.into_iter().next())
}
