//! CLI module for StudySynth.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// StudySynth - study material from lectures
///
/// Turns lecture transcripts and video captions into notes, flashcards and
/// multiple-choice quizzes using an OpenAI-compatible language model.
#[derive(Parser, Debug)]
#[command(name = "studysynth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate structured notes
    Notes {
        /// Transcript file (.txt or .vtt), YouTube URL/ID, or '-' for stdin
        input: String,

        /// Print JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Generate flashcards
    Flashcards {
        /// Transcript file (.txt or .vtt), YouTube URL/ID, or '-' for stdin
        input: String,

        /// Number of flashcards (clamped to the configured range)
        #[arg(short = 'n', long)]
        count: Option<u32>,

        /// Print JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Generate a multiple-choice quiz
    Quiz {
        /// Transcript file (.txt or .vtt), YouTube URL/ID, or '-' for stdin
        input: String,

        /// Number of questions (clamped to the configured range)
        #[arg(short = 'n', long)]
        count: Option<u32>,

        /// Print JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Start HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8000")]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quiz_command() {
        let cli = Cli::try_parse_from(["studysynth", "-vv", "quiz", "lecture.txt", "-n", "7"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Quiz { input, count, json } => {
                assert_eq!(input, "lecture.txt");
                assert_eq!(count, Some(7));
                assert!(!json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_config_edit() {
        let cli = Cli::try_parse_from(["studysynth", "--config", "~/study.toml", "config", "edit"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("~/study.toml"));
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Edit
            }
        ));
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["studysynth", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, 8000);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
