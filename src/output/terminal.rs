// Colored terminal output for run summaries and dataset inspection.
//
// main.rs delegates all human-facing formatting here.

use colored::Colorize;

use crate::graph::similarity::SimilarityGraph;
use crate::inspect::DatasetSummary;
use crate::pipeline::RunReport;

/// Display the outcome of a graph build.
pub fn display_run_report(report: &RunReport, graph: &SimilarityGraph, strongest: usize) {
    println!("\n{}", "=== Similarity Graph ===".bold());
    println!();

    println!("  Records:            {}", report.records);
    println!("  Subreddits:         {}", report.vocabulary_size);
    println!(
        "  Users:              {} seen, {} below {} posts dropped",
        report.users_seen,
        report.lurkers_dropped,
        report.params.lurker_threshold,
    );
    println!("  Vectorized:         {}", report.users_vectorized);

    let rounds = report.dedup_rounds.len();
    let convergence = if report.dedup_converged {
        "converged".green()
    } else {
        "hit iteration cap".yellow()
    };
    println!(
        "  After dedup:        {} ({} removed, {} round{}, {})",
        report.users_after_dedup,
        report.duplicates_removed(),
        rounds,
        if rounds == 1 { "" } else { "s" },
        convergence,
    );
    for round in &report.dedup_rounds {
        println!(
            "    {} {:>3}: {} -> {}",
            "round".dimmed(),
            round.round,
            round.users_before,
            round.users_after
        );
    }

    match &report.similarity {
        Some(stats) => {
            println!(
                "  Similarity:         mean {:.3}  median {:.3}  range [{:.3}, {:.3}] over {} pairs",
                stats.mean, stats.median, stats.min, stats.max, stats.pairs
            );
        }
        None => println!("  Similarity:         {}", "no pairs to compare".dimmed()),
    }

    let edge_line = format!(
        "{} edges between {} users (threshold {:.2})",
        report.edges, report.connected_users, report.params.edge_threshold
    );
    if report.edges == 0 {
        println!("  Edges:              {}", edge_line.yellow());
    } else {
        println!("  Edges:              {}", edge_line.bold());
    }

    let top = graph.strongest(strongest);
    if !top.is_empty() {
        println!("\n  Strongest pairs:");
        for edge in top {
            println!(
                "    {:.4}  {} {}",
                edge.similarity,
                super::truncate_chars(&edge.source, 30),
                super::truncate_chars(&edge.target, 30).dimmed(),
            );
        }
    }
}

/// Display the result of `subsim inspect`.
pub fn display_dataset_summary(summary: &DatasetSummary, source: &str, file_size: Option<u64>) {
    let size = file_size
        .map(super::format_bytes)
        .unwrap_or_else(|| "unknown size".to_string());
    println!("\n{}", format!("=== Dataset: {source} ({size}) ===").bold());
    println!();

    println!("  Records:     {}", summary.records);
    println!("  Users:       {}", summary.users);
    println!("  Subreddits:  {}", summary.subreddits);

    match (summary.first_post, summary.last_post) {
        (Some(first), Some(last)) => println!(
            "  Time span:   {} to {}",
            first.format("%Y-%m-%d %H:%M"),
            last.format("%Y-%m-%d %H:%M")
        ),
        _ => println!("  Time span:   {}", "no posts".dimmed()),
    }

    let active = summary.users - summary.lurkers;
    println!(
        "  Lurkers:     {} below {} posts ({} users would be vectorized)",
        summary.lurkers.to_string().yellow(),
        summary.lurker_threshold,
        active.to_string().green(),
    );

    if !summary.top_subreddits.is_empty() {
        println!("\n  {:<32} {:>8}", "Subreddit".dimmed(), "Posts".dimmed());
        println!("  {}", "-".repeat(41).dimmed());
        for (name, count) in &summary.top_subreddits {
            println!("  r/{:<30} {:>8}", super::truncate_chars(name, 27), count);
        }
    }
}
