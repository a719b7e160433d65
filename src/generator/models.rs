//! Study artifact records and their structural validation.

use crate::structured::Validate;
use serde::{Deserialize, Serialize};

/// A question/answer flashcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

/// Label of a quiz option.
///
/// Accepts surrounding whitespace, lowercase, and a trailing `)` or `.`
/// ("b)", " C. ") when parsing model output; always serializes as "A".."D".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AnswerLabel {
    A,
    B,
    C,
    D,
}

impl AnswerLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerLabel::A => "A",
            AnswerLabel::B => "B",
            AnswerLabel::C => "C",
            AnswerLabel::D => "D",
        }
    }

    /// Position of the labelled option in `QuizQuestion::options`.
    pub fn index(&self) -> usize {
        match self {
            AnswerLabel::A => 0,
            AnswerLabel::B => 1,
            AnswerLabel::C => 2,
            AnswerLabel::D => 3,
        }
    }
}

impl std::str::FromStr for AnswerLabel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let label = s.trim().trim_end_matches(|c: char| c == ')' || c == '.').trim();
        match label.to_uppercase().as_str() {
            "A" => Ok(AnswerLabel::A),
            "B" => Ok(AnswerLabel::B),
            "C" => Ok(AnswerLabel::C),
            "D" => Ok(AnswerLabel::D),
            _ => Err(format!(
                "correct_answer must be one of \"A\", \"B\", \"C\", \"D\", got {:?}",
                s
            )),
        }
    }
}

impl TryFrom<String> for AnswerLabel {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AnswerLabel> for String {
    fn from(label: AnswerLabel) -> Self {
        label.as_str().to_string()
    }
}

impl std::fmt::Display for AnswerLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A multiple-choice question with exactly four options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: [String; 4],
    pub correct_answer: AnswerLabel,
}

impl QuizQuestion {
    /// Text of the correct option.
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_answer.index()]
    }
}

/// Schema shown to the model for flashcard requests.
pub const FLASHCARD_SCHEMA: &str = r#"[
  { "question": "...", "answer": "..." }
]"#;

/// Schema shown to the model for quiz requests.
pub const QUIZ_SCHEMA: &str = r#"[
  {
    "question": "...",
    "options": ["...", "...", "...", "..."],
    "correct_answer": "A"
  }
]"#;

fn require_text(field: &str, value: &str, item: usize) -> std::result::Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("item {} has an empty \"{}\"", item + 1, field));
    }
    Ok(())
}

impl Validate for Vec<Flashcard> {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.is_empty() {
            return Err("expected a non-empty array of flashcards".to_string());
        }
        for (idx, card) in self.iter().enumerate() {
            require_text("question", &card.question, idx)?;
            require_text("answer", &card.answer, idx)?;
        }
        Ok(())
    }
}

impl Validate for Vec<QuizQuestion> {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.is_empty() {
            return Err("expected a non-empty array of quiz questions".to_string());
        }
        for (idx, question) in self.iter().enumerate() {
            require_text("question", &question.question, idx)?;
            for option in &question.options {
                require_text("options", option, idx)?;
            }
        }
        Ok(())
    }
}
