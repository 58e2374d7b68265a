//! Groups command implementation
//!
//! Generates collision groups for every chain in a document, optionally
//! repairing unknown names against a label CSV, and writes the result.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::ExitCode;

use swingkit_data::{generate_collision_groups, write_file, LabelDictionary};

use super::{load_document, load_labels};

/// Run the groups command, writing to `output` or back to `file`.
pub fn run(file: &str, labels_path: Option<&str>, output: Option<&str>) -> Result<ExitCode> {
    let mut doc = load_document(file)?;
    let labels = match labels_path {
        Some(p) => load_labels(p)?,
        None => LabelDictionary::new(),
    };

    let summary = generate_collision_groups(&mut doc, &labels);

    let dest = output.unwrap_or(file);
    write_file(&doc, dest).with_context(|| format!("failed to write {dest}"))?;

    println!("{} {}", "Groups:".cyan().bold(), dest);
    println!("  {:<12} {}", "created:", summary.created);
    println!("  {:<12} {}", "overwritten:", summary.overwritten);
    println!("  {:<12} {}", "repaired:", summary.repaired);
    println!("  {:<12} {}", "skipped:", summary.skipped);
    Ok(ExitCode::SUCCESS)
}
