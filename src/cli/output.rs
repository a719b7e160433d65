//! CLI output formatting utilities.

use crate::generator::{Flashcard, QuizQuestion};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print one flashcard.
    pub fn flashcard(number: usize, card: &Flashcard) {
        println!("\n{} {}", style(format!("{}.", number)).cyan().bold(), style(&card.question).bold());
        println!("   {}", card.answer);
    }

    /// Print one quiz question with its options, marking the correct one.
    pub fn quiz_question(number: usize, question: &QuizQuestion) {
        println!(
            "\n{} {}",
            style(format!("{}.", number)).cyan().bold(),
            style(&question.question).bold()
        );
        for (idx, option) in question.options.iter().enumerate() {
            let label = ["A", "B", "C", "D"][idx];
            if idx == question.correct_answer.index() {
                println!("   {} {}", style(format!("{})", label)).green().bold(), style(option).green());
            } else {
                println!("   {} {}", style(format!("{})", label)).dim(), option);
            }
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}
