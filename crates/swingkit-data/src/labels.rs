//! Hash-label dictionary.
//!
//! Loads `(hash, label)` rows from CSV and partitions the labels by the
//! swing naming convention: chain names (`s_*`, not ending in `col`),
//! collision-group names (ending in `col`), and per-segment bone names
//! (labels extending a known chain name). Also provides the positional
//! closest-label lookup used for label repair; the metric is an external
//! compatibility contract and intentionally cheaper than an edit
//! distance.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, SwingError};

/// Offline hash→label table with convention-based partitions.
///
/// The dictionary is replaced wholesale on reload (never mutated
/// incrementally), so a reader always observes either the old table or
/// the new one in full.
#[derive(Debug, Clone, Default)]
pub struct LabelDictionary {
    /// Every label, ascending. Backing set for validation and repair.
    labels: Vec<String>,
    /// Same contents as `labels`, for O(1) membership checks.
    index: HashSet<String>,
    /// Swing chain names: `s_*` not ending in `col`.
    chain_names: Vec<String>,
    /// Collision-group names: ending in `col`.
    collision_names: Vec<String>,
    /// Per-segment bone names: labels extending a known chain name.
    bone_names: Vec<String>,
}

impl LabelDictionary {
    /// Creates an empty dictionary. Validation against an empty
    /// dictionary reports "not attempted" rather than conflicts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a dictionary from a label CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or a row is
    /// malformed. On error no partial table is produced.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_csv_reader(file)
    }

    /// Loads a dictionary from CSV text: at least two columns
    /// `(hash, label)`, header row skipped. Rows whose label contains no
    /// ASCII letter are dropped (pure-numeric placeholder labels carry
    /// no name information).
    pub fn from_csv_reader(reader: impl Read) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut labels: Vec<String> = Vec::new();
        for record in csv.records() {
            let record = record.map_err(|e| SwingError::CsvParse(e.to_string()))?;
            if record.len() < 2 {
                return Err(SwingError::CsvParse(format!(
                    "expected at least 2 columns, got {} in row {:?}",
                    record.len(),
                    record
                )));
            }
            let label = record.get(1).unwrap_or_default().trim();
            if label.chars().any(|c| c.is_ascii_alphabetic()) {
                labels.push(label.to_string());
            }
        }
        labels.sort();
        labels.dedup();

        let dict = Self::from_labels(labels);
        debug!(
            labels = dict.labels.len(),
            chains = dict.chain_names.len(),
            collisions = dict.collision_names.len(),
            bones = dict.bone_names.len(),
            "label dictionary loaded"
        );
        Ok(dict)
    }

    /// Builds the partitioned dictionary from an already-filtered,
    /// sorted label list.
    fn from_labels(labels: Vec<String>) -> Self {
        let index: HashSet<String> = labels.iter().cloned().collect();

        let chain_names: Vec<String> = labels
            .iter()
            .filter(|l| l.starts_with("s_") && !l.ends_with("col"))
            .cloned()
            .collect();

        let collision_names: Vec<String> =
            labels.iter().filter(|l| l.ends_with("col")).cloned().collect();

        // Second pass: a bone name is a label that extends some chain
        // name (e.g. chain "s_hair" -> bone "s_hair1"). Chains that are
        // themselves extensions of shorter chains land in both subsets.
        let bone_names: Vec<String> = labels
            .iter()
            .filter(|l| {
                chain_names
                    .iter()
                    .any(|c| l.len() > c.len() && l.starts_with(c.as_str()))
            })
            .cloned()
            .collect();

        Self {
            labels,
            index,
            chain_names,
            collision_names,
            bone_names,
        }
    }

    /// True when no labels are loaded.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// O(1) membership check against the full label set.
    pub fn contains(&self, label: &str) -> bool {
        self.index.contains(label)
    }

    /// Every label, ascending.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Swing chain names (`s_*`, not ending in `col`).
    pub fn chain_names(&self) -> &[String] {
        &self.chain_names
    }

    /// Collision-group names (ending in `col`).
    pub fn collision_names(&self) -> &[String] {
        &self.collision_names
    }

    /// Per-segment bone names (labels extending a known chain name).
    pub fn bone_names(&self) -> &[String] {
        &self.bone_names
    }

    /// Drops every label. The next validation reports "not attempted".
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The `n` labels closest to `query` under the positional metric,
    /// best first.
    pub fn find_closest(&self, query: &str, n: usize) -> Vec<&str> {
        Self::closest_in(&self.labels, query, n)
    }

    /// Closest-label lookup over an arbitrary label slice (used with the
    /// partitioned subsets). Ties rank in ascending label order, which
    /// is deterministic for the sorted tables this crate builds.
    pub fn closest_in<'a>(labels: &'a [String], query: &str, n: usize) -> Vec<&'a str> {
        let mut ranked: Vec<(u64, &str)> = labels
            .iter()
            .map(|l| (label_cost(query, l), l.as_str()))
            .collect();
        ranked.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
        ranked.into_iter().take(n).map(|(_, l)| l).collect()
    }
}

/// Positional approximation of label distance: sum of absolute byte
/// differences over the aligned common length, plus the squared length
/// difference. Reproduced exactly for compatibility with existing
/// tooling; not an edit distance.
fn label_cost(query: &str, label: &str) -> u64 {
    let q = query.as_bytes();
    let l = label.as_bytes();
    let positional: u64 = q
        .iter()
        .zip(l.iter())
        .map(|(a, b)| a.abs_diff(*b) as u64)
        .sum();
    let len_delta = q.len().abs_diff(l.len()) as u64;
    positional + len_delta * len_delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CSV: &str = "\
hash,label
0x01,s_hair
0x02,s_hair1
0x03,s_hair2
0x04,s_haircol
0x05,s_skirt
0x06,headcol
0x07,12345
0x08,
";

    fn dict() -> LabelDictionary {
        LabelDictionary::from_csv_reader(CSV.as_bytes()).unwrap()
    }

    #[test]
    fn test_csv_load_skips_header_and_letterless_labels() {
        let d = dict();
        assert_eq!(d.len(), 6);
        assert!(d.contains("s_hair"));
        assert!(d.contains("headcol"));
        assert!(!d.contains("12345"));
        assert!(!d.contains("label"));
    }

    #[test]
    fn test_csv_rejects_single_column_rows() {
        let err = LabelDictionary::from_csv_reader("hash,label\nonlyone\n".as_bytes());
        assert!(matches!(err, Err(SwingError::CsvParse(_))));
    }

    #[test]
    fn test_partitions() {
        let d = dict();
        assert_eq!(d.chain_names(), ["s_hair", "s_hair1", "s_hair2", "s_skirt"]);
        assert_eq!(d.collision_names(), ["headcol", "s_haircol"]);
        // s_hair1 and s_hair2 extend s_hair; s_haircol extends it too but
        // is first and foremost a collision name. Overlap is fine: the
        // full set backs validation.
        assert_eq!(d.bone_names(), ["s_hair1", "s_hair2", "s_haircol"]);
    }

    #[test]
    fn test_clear_resets_to_not_loaded() {
        let mut d = dict();
        d.clear();
        assert!(d.is_empty());
        assert!(d.find_closest("s_hair", 3).is_empty());
    }

    #[test]
    fn test_closest_label_metric() {
        let labels: Vec<String> = ["s_hair1", "s_hair2", "s_head"]
            .into_iter()
            .map(String::from)
            .collect();
        // "s_hair3" vs s_hair2: |'3'-'2'| = 1.
        // "s_hair3" vs s_hair1: |'3'-'1'| = 2.
        // "s_hair3" vs s_head:  |a-e|+|i-a|+|r-d| + 1^2 = 4+8+14+1 = 27.
        let got = LabelDictionary::closest_in(&labels, "s_hair3", 3);
        assert_eq!(got, ["s_hair2", "s_hair1", "s_head"]);
    }

    #[test]
    fn test_closest_label_tie_order_is_lexicographic() {
        let labels: Vec<String> = ["s_hair2", "s_hair4"].into_iter().map(String::from).collect();
        // Both cost 1 against "s_hair3"; ascending label order decides.
        let got = LabelDictionary::closest_in(&labels, "s_hair3", 2);
        assert_eq!(got, ["s_hair2", "s_hair4"]);
    }

    #[test]
    fn test_closest_length_penalty_is_squared() {
        let labels: Vec<String> = ["abcd", "abx"].into_iter().map(String::from).collect();
        // "ab" vs "abcd": len delta 2 -> 4. "ab" vs "abx": len delta 1 -> 1.
        let got = LabelDictionary::closest_in(&labels, "ab", 1);
        assert_eq!(got, ["abx"]);
    }

    #[test]
    fn test_find_closest_truncates_to_n() {
        let d = dict();
        assert_eq!(d.find_closest("s_hair9", 2).len(), 2);
    }
}
