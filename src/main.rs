use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use subsim::config::Config;
use subsim::graph::edges::write_edge_list;
use subsim::ingest::filter::{filter_by_date, remove_exact_duplicates, DateRange};
use subsim::ingest::records::{load_posts, PostRecord};
use subsim::output::{report, stage_spinner, terminal};
use subsim::pipeline::EngineParams;

/// Subsim: connect users whose cross-subreddit posting looks alike.
///
/// Reads a CSV of posts, turns each active user into a vector of posting
/// shares per subreddit, collapses near-identical accounts, and writes an
/// edge list of strongly similar pairs.
#[derive(Parser)]
#[command(name = "subsim", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the similarity graph and write the edge list
    Build {
        /// Dataset CSV (author_name, subreddit, post_created_time). Overrides SUBSIM_INPUT
        #[arg(long)]
        input: Option<PathBuf>,

        /// Edge list destination. Overrides SUBSIM_OUTPUT (default: output/edges.txt)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Minimum posts for a user to be included (default: 3)
        #[arg(long)]
        lurker_threshold: Option<u32>,

        /// Similarity at which a user collapses into an earlier duplicate (default: 1.0)
        #[arg(long)]
        duplicate_threshold: Option<f64>,

        /// Maximum deduplication rounds (default: 5)
        #[arg(long)]
        max_dedup_iterations: Option<usize>,

        /// Similarity required for an edge (default: 0.95)
        #[arg(long)]
        edge_threshold: Option<f64>,

        /// Only include posts on or after this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<NaiveDate>,

        /// Only include posts on or before this date (YYYY-MM-DD)
        #[arg(long)]
        until: Option<NaiveDate>,

        /// Also write the run summary as JSON to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Number of strongest pairs to print (default: 10)
        #[arg(long, default_value = "10")]
        show: usize,
    },

    /// Summarize a dataset without building a graph
    Inspect {
        /// Dataset CSV. Overrides SUBSIM_INPUT
        #[arg(long)]
        input: Option<PathBuf>,

        /// Lurker cutoff to evaluate (default: 3)
        #[arg(long)]
        lurker_threshold: Option<u32>,

        /// Number of busiest subreddits to list (default: 10)
        #[arg(long, default_value = "10")]
        top: usize,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("subsim=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            output,
            lurker_threshold,
            duplicate_threshold,
            max_dedup_iterations,
            edge_threshold,
            since,
            until,
            report: report_path,
            show,
        } => {
            let config = Config::load()?;
            let input = config.require_input(input)?;
            let output = output.unwrap_or_else(|| config.output_path.clone());

            let params = EngineParams {
                lurker_threshold: lurker_threshold.unwrap_or(config.params.lurker_threshold),
                duplicate_threshold: duplicate_threshold
                    .unwrap_or(config.params.duplicate_threshold),
                max_dedup_iterations: max_dedup_iterations
                    .unwrap_or(config.params.max_dedup_iterations),
                edge_threshold: edge_threshold.unwrap_or(config.params.edge_threshold),
            };
            params.validate()?;

            let range = DateRange::new(since, until);
            let records = load_snapshot(&input, &range)?;

            let pb = stage_spinner("Building similarity graph");
            let result = subsim::pipeline::run(&records, &params);
            pb.finish_and_clear();
            let output_data = result?;

            write_edge_list(&output_data.graph.edges, &output)?;
            terminal::display_run_report(&output_data.report, &output_data.graph, show);

            println!(
                "\n{}",
                format!("Edge list saved to: {}", output.display()).bold()
            );

            if let Some(path) = report_path {
                report::write_run_report(&output_data.report, &path)?;
                println!("Run report saved to: {}", path.display());
            }
        }

        Commands::Inspect {
            input,
            lurker_threshold,
            top,
        } => {
            let config = Config::load()?;
            let input = config.require_input(input)?;
            let lurker_threshold = lurker_threshold.unwrap_or(config.params.lurker_threshold);

            let records = load_snapshot(&input, &DateRange::default())?;
            let summary = subsim::inspect::summarize_dataset(&records, lurker_threshold, top);
            let file_size = std::fs::metadata(&input).map(|m| m.len()).ok();

            terminal::display_dataset_summary(
                &summary,
                &input.display().to_string(),
                file_size,
            );
        }
    }

    Ok(())
}

/// Load the dataset, apply the date window, and drop exact duplicate rows.
fn load_snapshot(path: &Path, range: &DateRange) -> Result<Vec<PostRecord>> {
    println!("Loading posts from {}...", path.display());

    let pb = stage_spinner("Reading CSV");
    let loaded = load_posts(path);
    pb.finish_and_clear();
    let records = loaded.context("Could not load the post dataset")?;

    let loaded_count = records.len();
    let records = remove_exact_duplicates(filter_by_date(records, range));
    info!(
        loaded = loaded_count,
        kept = records.len(),
        "Prepared post snapshot"
    );

    if records.len() < loaded_count {
        println!(
            "  {} of {} records kept after date filter and duplicate removal",
            records.len(),
            loaded_count
        );
    } else {
        println!("  {} records", records.len());
    }

    Ok(records)
}
