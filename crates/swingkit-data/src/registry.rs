//! Open-document registry.
//!
//! Owns every open [`Document`], the active-document selector, and the
//! label dictionary shared by all of them. The dictionary is loaded or
//! replaced wholesale and cleared explicitly; there is no ambient
//! lookup path.

use std::path::Path;

use tracing::info;

use crate::document::Document;
use crate::error::{Result, SwingError};
use crate::labels::LabelDictionary;
use crate::validate::{validate_document, ValidationOutcome};
use crate::viz::VisualSink;
use crate::xml;

/// One open document with its display name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entry {
    pub name: String,
    pub document: Document,
}

/// Ordered open documents plus shared label state.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<Entry>,
    active: usize,
    labels: LabelDictionary,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Index of the active document, `None` when nothing is open.
    pub fn active_index(&self) -> Option<usize> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.active.min(self.entries.len() - 1))
        }
    }

    pub fn set_active(&mut self, index: usize) {
        self.active = index;
        self.clamp();
    }

    pub fn active(&self) -> Option<&Entry> {
        self.active_index().map(|i| &self.entries[i])
    }

    pub fn active_mut(&mut self) -> Option<&mut Entry> {
        self.active_index().map(|i| &mut self.entries[i])
    }

    /// Adds a new empty document and makes it active. Returns its index.
    pub fn add_empty(&mut self, name: impl Into<String>) -> usize {
        self.insert(Entry {
            name: name.into(),
            document: Document::new(),
        })
    }

    /// Loads a swing parameter XML file into a new active document
    /// named after the file.
    ///
    /// # Errors
    ///
    /// A failed load leaves the registry untouched.
    pub fn open_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let document = xml::read_file(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        info!(file = %name, "document opened");
        Ok(self.insert(Entry { name, document }))
    }

    fn insert(&mut self, entry: Entry) -> usize {
        self.entries.push(entry);
        self.active = self.entries.len() - 1;
        self.active
    }

    /// Closes the document at `index`, releasing its visualization
    /// objects through `sink`. Returns false when `index` is out of
    /// range.
    pub fn close(&mut self, index: usize, sink: &mut dyn VisualSink) -> bool {
        if index >= self.entries.len() {
            return false;
        }
        let mut entry = self.entries.remove(index);
        entry.document.clear(sink);
        info!(file = %entry.name, "document closed");
        self.clamp();
        true
    }

    /// Serializes the document at `index` to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SwingError::NotFound`] for an out-of-range index, or
    /// the underlying serialization/IO failure.
    pub fn save_file(&self, index: usize, path: impl AsRef<Path>) -> Result<()> {
        let entry = self
            .entries
            .get(index)
            .ok_or_else(|| SwingError::NotFound(format!("document index {index}")))?;
        xml::write_file(&entry.document, path)?;
        info!(file = %entry.name, "document saved");
        Ok(())
    }

    /// The shared label dictionary.
    pub fn labels(&self) -> &LabelDictionary {
        &self.labels
    }

    /// Replaces the shared label dictionary from a CSV file. The old
    /// table stays in place when loading fails.
    pub fn load_labels(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let labels = LabelDictionary::from_csv_path(path)?;
        let count = labels.len();
        self.labels = labels;
        Ok(count)
    }

    /// Drops every loaded label.
    pub fn clear_labels(&mut self) {
        self.labels.clear();
    }

    /// Validates the document at `index` against the shared labels.
    pub fn validate(&self, index: usize) -> Result<ValidationOutcome> {
        let entry = self
            .entries
            .get(index)
            .ok_or_else(|| SwingError::NotFound(format!("document index {index}")))?;
        Ok(validate_document(&entry.document, &self.labels))
    }

    fn clamp(&mut self) {
        if !self.entries.is_empty() {
            self.active = self.active.min(self.entries.len() - 1);
        } else {
            self.active = 0;
        }
    }
}
