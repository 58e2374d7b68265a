//! Labels command implementation
//!
//! Inspects a label CSV: partition sizes, membership checks, and the
//! closest-label lookup used for name repair.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use super::load_labels;

/// Run the labels command. With a query, prints the `n` closest labels;
/// without one, prints partition statistics.
pub fn run(labels_path: &str, query: Option<&str>, n: usize) -> Result<ExitCode> {
    let labels = load_labels(labels_path)?;

    match query {
        Some(q) => {
            if labels.contains(q) {
                println!("{} {} is a known label", "Exact:".green().bold(), q);
                return Ok(ExitCode::SUCCESS);
            }
            println!("{} {} not found, closest matches:", "Query:".cyan().bold(), q);
            for label in labels.find_closest(q, n) {
                println!("  {label}");
            }
            Ok(ExitCode::from(1))
        }
        None => {
            println!("{} {}", "Labels:".cyan().bold(), labels.len());
            println!("  {:<12} {}", "chains:", labels.chain_names().len());
            println!("  {:<12} {}", "collisions:", labels.collision_names().len());
            println!("  {:<12} {}", "bones:", labels.bone_names().len());
            Ok(ExitCode::SUCCESS)
        }
    }
}
