//! Notes command implementation.

use super::load_transcript;
use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::generator::StudyGenerator;
use anyhow::Result;

/// Run the notes command.
pub async fn run_notes(input: &str, json: bool, settings: Settings) -> Result<()> {
    preflight::check_api_key(&settings.llm)?;
    let generator = StudyGenerator::from_settings(&settings)?;
    let transcript = load_transcript(input, &settings).await?;

    let spinner = Output::spinner("Generating notes...");
    match generator.generate_notes(&transcript).await {
        Ok(notes) => {
            spinner.finish_and_clear();
            if json {
                println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "notes": notes }))?);
            } else {
                println!("\n{}\n", notes);
            }
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate notes: {}", e));
            Err(e.into())
        }
    }
}
