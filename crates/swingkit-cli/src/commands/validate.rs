//! Validate command implementation
//!
//! Checks every hash reference of a document against a label CSV and
//! prints the conflicts.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use swingkit_data::{validate_document, ValidationOutcome};

use super::{load_document, load_labels};

/// Run the validate command.
///
/// # Returns
/// Exit code: 0 when every reference resolves, 1 otherwise.
pub fn run(file: &str, labels_path: &str) -> Result<ExitCode> {
    let doc = load_document(file)?;
    let labels = load_labels(labels_path)?;

    println!("{} {}", "Validating:".cyan().bold(), file);
    println!(
        "{} {} labels ({} chains, {} collisions)",
        "Loaded:".dimmed(),
        labels.len(),
        labels.chain_names().len(),
        labels.collision_names().len()
    );

    match validate_document(&doc, &labels) {
        ValidationOutcome::NotAttempted => {
            println!("{} label table is empty, nothing checked", "Skipped:".yellow().bold());
            Ok(ExitCode::from(1))
        }
        ValidationOutcome::Checked(conflicts) if conflicts.is_empty() => {
            println!("{} all references resolve", "OK:".green().bold());
            Ok(ExitCode::SUCCESS)
        }
        ValidationOutcome::Checked(conflicts) => {
            for c in &conflicts {
                println!(
                    "  {} {} = {}",
                    "conflict:".red(),
                    c.field_path,
                    c.value.bold()
                );
            }
            println!(
                "{} {} unresolved reference(s)",
                "FAIL:".red().bold(),
                conflicts.len()
            );
            Ok(ExitCode::from(1))
        }
    }
}
