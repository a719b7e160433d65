//! StudySynth CLI entry point.

use anyhow::Result;
use clap::Parser;
use studysynth::cli::{commands, Cli, Commands};
use studysynth::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("studysynth={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let config_path = cli.config.as_deref().map(Settings::expand_path);
    let settings = Settings::load_from(config_path.as_ref())?;

    match &cli.command {
        Commands::Notes { input, json } => {
            commands::run_notes(input, *json, settings).await?;
        }

        Commands::Flashcards { input, count, json } => {
            commands::run_flashcards(input, *count, *json, settings).await?;
        }

        Commands::Quiz { input, count, json } => {
            commands::run_quiz(input, *count, *json, settings).await?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host, *port, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, config_path.as_ref())?;
        }
    }

    Ok(())
}
