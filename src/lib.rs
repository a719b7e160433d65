//! StudySynth - study material from lectures
//!
//! Turns a lecture transcript into structured notes, flashcards and a
//! multiple-choice quiz using an OpenAI-compatible language model.
//!
//! # Overview
//!
//! Long transcripts are reduced before generation: text within the model's
//! input budget is used as-is, longer text is split into sentence-aligned
//! chunks and summarized piecewise, and very long text is sampled from its
//! beginning, middle and end. Every artifact and intermediate summary is
//! cached by a fingerprint of the transcript, so repeated requests for the
//! same content do not call the model again.
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `llm` - Completion transport and the retrying model client
//! - `structured` - Lenient JSON extraction and the schema repair loop
//! - `chunking` - Sentence-aligned chunking and head/middle/tail sampling
//! - `summary` - The summarization cascade
//! - `cache` - Content-addressed LRU caches with request coalescing
//! - `generator` - Notes, flashcards and quiz generation
//! - `transcript` - Caption retrieval and WebVTT conversion
//!
//! # Example
//!
//! ```rust,no_run
//! use studysynth::config::Settings;
//! use studysynth::generator::StudyGenerator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let generator = StudyGenerator::from_settings(&settings)?;
//!
//!     let transcript = std::fs::read_to_string("lecture.txt")?;
//!     let cards = generator.generate_flashcards(&transcript, 12).await?;
//!     println!("Generated {} flashcards", cards.len());
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod llm;
pub mod openai;
pub mod structured;
pub mod summary;
pub mod transcript;

pub use error::{Result, StudyError};
