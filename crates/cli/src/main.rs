//! lcpeval - prefix-aware evaluation of code completions
//!
//! This binary provides the command-line interface for the metric engine.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lcpeval::commands;
use lcpeval_core::config::Config;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(name = "lcpeval")]
#[command(about = "Prefix-aware metrics for code completion")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a predictions file against a references file
    Evaluate {
        /// JSON array of predictions (strings or records with a "prediction" field)
        #[arg(long, value_name = "FILE")]
        predictions: PathBuf,
        /// JSON array of references (strings or records with a "reference" field)
        #[arg(long, value_name = "FILE")]
        references: PathBuf,
        /// Comma-separated metric identifiers; defaults to the configured set
        #[arg(short, long, value_delimiter = ',')]
        metrics: Vec<String>,
        /// Write the full JSON report here
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Print the full JSON report instead of the summary table
        #[arg(long)]
        json: bool,
    },
    /// Score one prediction against one reference
    Score {
        #[arg(long)]
        prediction: String,
        #[arg(long)]
        reference: String,
        /// Comma-separated metric identifiers; defaults to the configured set
        #[arg(short, long, value_delimiter = ',')]
        metrics: Vec<String>,
    },
    /// Bucket ROUGE-LCP scores into quality bands
    Distribution {
        #[arg(long, value_name = "FILE")]
        predictions: PathBuf,
        #[arg(long, value_name = "FILE")]
        references: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Evaluate {
            predictions,
            references,
            metrics,
            output,
            json,
        }) => {
            let report = commands::evaluate_files(
                &config,
                &predictions,
                &references,
                &metrics,
                output.as_deref(),
            )?;
            if json {
                println!("{}", report.to_json_string(config.output.pretty)?);
            } else {
                print!("{}", commands::format_summary(&report));
            }
            Ok(())
        }
        Some(Commands::Score {
            prediction,
            reference,
            metrics,
        }) => {
            let scores = commands::score_pair(&config, &prediction, &reference, &metrics)?;
            print!("{}", commands::format_scores(&scores));
            Ok(())
        }
        Some(Commands::Distribution {
            predictions,
            references,
        }) => {
            let json = commands::distribution_json(&config, &predictions, &references)?;
            println!("{json}");
            Ok(())
        }
        None => {
            println!(
                "Run 'lcpeval evaluate --predictions FILE --references FILE', or --help for more options"
            );
            Ok(())
        }
    }
}

/// Initialize logging system
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    // stdout carries reports, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!(
            "lcpeval={level},lcpeval_core={level},lcpeval_metrics={level}"
        ))
        .init();

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = Config::load(path).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    debug!("Default metrics: {:?}", config.evaluation.metrics);
    Ok(config)
}
