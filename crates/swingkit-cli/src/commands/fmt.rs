//! Fmt command implementation
//!
//! Re-serializes a swing parameter file into the canonical layout. The
//! round-trip preserves every entry, field, and ordering; only
//! formatting and advisory attributes are normalized.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::ExitCode;

use swingkit_data::{to_xml, StructKind};

use super::load_document;

/// Run the fmt command, writing to `output` or back to `file`.
pub fn run(file: &str, output: Option<&str>) -> Result<ExitCode> {
    let doc = load_document(file)?;
    let xml = to_xml(&doc).with_context(|| format!("failed to serialize {file}"))?;

    let dest = output.unwrap_or(file);
    std::fs::write(dest, xml).with_context(|| format!("failed to write {dest}"))?;

    println!("{} {} -> {}", "Formatted:".green().bold(), file, dest);
    for &kind in StructKind::fixed() {
        let n = doc.len(kind);
        if n > 0 {
            println!("  {:<12} {}", format!("{kind}:"), n);
        }
    }
    if !doc.groups.is_empty() {
        println!("  {:<12} {}", "groups:", doc.groups.len());
    }
    Ok(ExitCode::SUCCESS)
}
