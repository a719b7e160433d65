//! Prompt templates for StudySynth.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").expect("placeholder pattern is valid"))
}

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub generation: GenerationPrompts,
    pub summary: SummaryPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompts for the study artifacts and the JSON repair reprompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationPrompts {
    pub notes: String,
    pub flashcards: String,
    pub quiz: String,
    pub repair: String,
}

impl Default for GenerationPrompts {
    fn default() -> Self {
        Self {
            notes: r#"Convert this lecture into detailed, clean structured notes.
Use headings and bullet points. Keep definitions, examples and key terms.

Lecture:
{{transcript}}"#
                .to_string(),

            flashcards: r#"Create exactly {{count}} flashcards from the lecture below.
Each flashcard tests one idea from the lecture.
Return ONLY valid JSON, with no commentary.

Format:
{{schema}}

Lecture:
{{transcript}}"#
                .to_string(),

            quiz: r#"Create exactly {{count}} multiple-choice questions from the lecture below.
Each question has exactly 4 options and one correct answer.
"correct_answer" is the letter of the correct option: "A", "B", "C" or "D".
Return ONLY valid JSON, with no commentary.

Format:
{{schema}}

Lecture:
{{transcript}}"#
                .to_string(),

            repair: r#"Your previous reply could not be used: {{error}}

Return ONLY corrected JSON matching this schema, with no commentary or code fences:
{{schema}}

Previous reply:
{{raw}}"#
                .to_string(),
        }
    }
}

/// Prompts for the summarization cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPrompts {
    /// Summarizes one chunk of an over-budget transcript.
    pub chunk: String,
    /// Compresses the concatenated chunk summaries into one outline.
    pub compress: String,
    /// Summarizes a head/middle/tail excerpt of a very long transcript.
    pub excerpt: String,
}

impl Default for SummaryPrompts {
    fn default() -> Self {
        Self {
            chunk: r#"Summarize this part ({{part}} of {{parts}}) of a lecture transcript as concise bullet points.
Keep every concept, definition and example; drop filler and repetition.

Transcript part:
{{transcript}}"#
                .to_string(),

            compress: r#"These are bullet-point summaries of consecutive parts of one lecture.
Merge them into a single structured outline with headings and bullet points.
Remove duplication and keep it under {{limit}} characters.

Summaries:
{{transcript}}"#
                .to_string(),

            excerpt: r#"Below are excerpts from the beginning, middle and end of a long lecture transcript.
Produce a structured outline of the lecture with headings and bullet points,
covering the topics that appear in the excerpts.

Excerpts:
{{transcript}}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let generation_path = custom_path.join("generation.toml");
            if generation_path.exists() {
                let content = std::fs::read_to_string(&generation_path)?;
                prompts.generation = toml::from_str(&content)?;
            }

            let summary_path = custom_path.join("summary.toml");
            if summary_path.exists() {
                let content = std::fs::read_to_string(&summary_path)?;
                prompts.summary = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Placeholders are filled in one pass over the template; substituted
    /// values are never scanned again. Unknown placeholders are left as is.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        placeholder_regex()
            .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
