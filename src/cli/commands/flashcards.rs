//! Flashcards command implementation.

use super::load_transcript;
use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::generator::StudyGenerator;
use anyhow::Result;

/// Run the flashcards command.
pub async fn run_flashcards(
    input: &str,
    count: Option<u32>,
    json: bool,
    settings: Settings,
) -> Result<()> {
    preflight::check_api_key(&settings.llm)?;
    let generator = StudyGenerator::from_settings(&settings)?;
    let count = count.unwrap_or_else(|| generator.default_flashcards());
    let clamped = generator.clamp_flashcards(count);
    if clamped != count {
        Output::warning(&format!("Flashcard count adjusted from {} to {}", count, clamped));
    }

    let transcript = load_transcript(input, &settings).await?;

    let spinner = Output::spinner("Generating flashcards...");
    match generator.generate_flashcards(&transcript, clamped).await {
        Ok(cards) => {
            spinner.finish_and_clear();
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({ "flashcards": cards }))?
                );
            } else {
                Output::header(&format!("Flashcards ({})", cards.len()));
                for (idx, card) in cards.iter().enumerate() {
                    Output::flashcard(idx + 1, card);
                }
                println!();
            }
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate flashcards: {}", e));
            Err(e.into())
        }
    }
}
