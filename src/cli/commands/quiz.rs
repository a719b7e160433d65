//! Quiz command implementation.

use super::load_transcript;
use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::generator::StudyGenerator;
use anyhow::Result;

/// Run the quiz command.
pub async fn run_quiz(input: &str, count: Option<u32>, json: bool, settings: Settings) -> Result<()> {
    preflight::check_api_key(&settings.llm)?;
    let generator = StudyGenerator::from_settings(&settings)?;
    let count = count.unwrap_or_else(|| generator.default_quiz());
    let clamped = generator.clamp_quiz(count);
    if clamped != count {
        Output::warning(&format!("Question count adjusted from {} to {}", count, clamped));
    }

    let transcript = load_transcript(input, &settings).await?;

    let spinner = Output::spinner("Generating quiz...");
    match generator.generate_quiz(&transcript, clamped).await {
        Ok(questions) => {
            spinner.finish_and_clear();
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({ "quiz": questions }))?
                );
            } else {
                Output::header(&format!("Quiz ({} questions)", questions.len()));
                for (idx, question) in questions.iter().enumerate() {
                    Output::quiz_question(idx + 1, question);
                }
                println!();
            }
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate quiz: {}", e));
            Err(e.into())
        }
    }
}
