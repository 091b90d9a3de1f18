use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use titlecraft::config::Config;
use titlecraft::dataset::{table, VideoRecord};
use titlecraft::pipeline::analysis::{self, AnalysisOptions};
use titlecraft::schedule::UploadSchedule;
use titlecraft::scoring::importance::FitPolicy;
use titlecraft::AnalysisError;

/// Titlecraft: keyword ranking and title suggestions from trending video metadata.
///
/// Reads a JSON export of collected video metadata (title, tags, view count)
/// and reports which terms track view count, which words sit near a seed
/// word, and when well-viewed videos were uploaded.
#[derive(Parser)]
#[command(name = "titlecraft", version, about)]
struct Cli {
    /// Dataset path (overrides TITLECRAFT_DATA_PATH)
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank terms by correlation with view count and suggest a title
    Analyze {
        /// Base title for the suggestion (overrides TITLECRAFT_BASE_TITLE)
        #[arg(long)]
        base_title: Option<String>,

        /// Number of ranked terms to show and use in the title
        #[arg(long)]
        top: Option<usize>,

        /// Fit even when there are fewer videos than distinct terms
        #[arg(long)]
        allow_underdetermined: bool,

        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Find words used in similar contexts to a seed word
    Similar {
        /// The seed word (normalized before lookup)
        seed: String,

        /// Number of similar words to return (default: 10)
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Recommend an upload hour and weekday from publish times
    Schedule {
        /// Print the schedule as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("titlecraft=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::load()?;
    if let Some(input) = cli.input {
        config.data_path = input;
    }

    match cli.command {
        Commands::Analyze {
            base_title,
            top,
            allow_underdetermined,
            json,
        } => {
            let records = load(&config)?;
            let options = AnalysisOptions {
                stop_words: config.stop_words,
                fit_policy: if allow_underdetermined {
                    FitPolicy::MinimumNorm
                } else {
                    FitPolicy::Strict
                },
                top_terms: top.unwrap_or(config.top_terms),
                base_title: base_title.unwrap_or_else(|| config.base_title.clone()),
            };

            let report = match analysis::run(&records, &options) {
                Ok(report) => report,
                Err(AnalysisError::DegenerateInput { reason }) => {
                    anyhow::bail!(
                        "Cannot rank terms: {reason}\n\
                         Collect more videos or use --allow-underdetermined to accept an \
                         unstable, minimum-norm fit."
                    );
                }
                Err(e) => return Err(e.into()),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                titlecraft::output::terminal::display_report(&report, options.top_terms);
            }
        }

        Commands::Similar { seed, top } => {
            let records = load(&config)?;
            let seed = titlecraft::topics::normalize::normalize(seed.trim());

            let spinner = spinner("Training word embeddings...");
            let space = analysis::train_embeddings(&records, &config.embedding);
            spinner.finish_and_clear();
            let space = space?;

            info!(vocabulary = space.len(), "Embedding space ready");

            match space.most_similar(&seed, top) {
                Ok(neighbours) => {
                    titlecraft::output::terminal::display_similar(&seed, &neighbours);
                }
                Err(AnalysisError::UnknownToken(token)) => {
                    println!(
                        "{} '{}' does not appear in any title or tag ({} known words).",
                        "Unknown word:".yellow(),
                        token,
                        space.len()
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Schedule { json } => {
            let records = load(&config)?;
            let schedule = UploadSchedule::from_records(&records)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&schedule)?);
            } else {
                titlecraft::output::terminal::display_schedule(&schedule);
            }
        }
    }

    Ok(())
}

/// Load and validate the dataset named by the config.
fn load(config: &Config) -> Result<Vec<VideoRecord>> {
    config.require_data()?;
    let records = table::load_records(&config.data_path)?;
    if records.is_empty() {
        anyhow::bail!(
            "No usable rows in {} (every row lacked a numeric View Count)",
            config.data_path.display()
        );
    }
    Ok(records)
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
