//! CLI command implementations.
//!
//! Each command takes plain arguments, prints human-readable output,
//! and returns the process exit code. Shared loading helpers live here.

pub mod fmt;
pub mod groups;
pub mod labels;
pub mod transfer;
pub mod validate;

use anyhow::{Context, Result};
use tracing::info;
use swingkit_data::{Document, LabelDictionary};

/// Loads a swing parameter XML file with a path-bearing error context.
pub fn load_document(path: &str) -> Result<Document> {
    let doc = swingkit_data::read_file(path).with_context(|| format!("failed to load {path}"))?;
    info!(path, "document loaded");
    Ok(doc)
}

/// Loads a label CSV file with a path-bearing error context.
pub fn load_labels(path: &str) -> Result<LabelDictionary> {
    let labels = LabelDictionary::from_csv_path(path)
        .with_context(|| format!("failed to load labels {path}"))?;
    info!(path, count = labels.len(), "labels loaded");
    Ok(labels)
}
