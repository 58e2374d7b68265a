//! Transfer command implementation
//!
//! Copies a swing bone chain (optionally with its collision shape
//! closure) from a source file into a target file.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::ExitCode;

use swingkit_data::{transfer::transfer_swing_bone, write_file};

use super::load_document;

/// Run the transfer command, writing the updated target to `output` or
/// back to `target`.
pub fn run(
    source: &str,
    target: &str,
    chain: &str,
    with_shapes: bool,
    output: Option<&str>,
) -> Result<ExitCode> {
    let source_doc = load_document(source)?;
    let mut target_doc = load_document(target)?;

    transfer_swing_bone(&mut target_doc, &source_doc, chain, with_shapes)
        .with_context(|| format!("failed to transfer chain '{chain}' from {source}"))?;

    let dest = output.unwrap_or(target);
    write_file(&target_doc, dest).with_context(|| format!("failed to write {dest}"))?;

    println!(
        "{} chain {} from {} into {}{}",
        "Transferred:".green().bold(),
        chain.bold(),
        source,
        dest,
        if with_shapes { " (with shapes)" } else { "" }
    );
    Ok(ExitCode::SUCCESS)
}
