//! # Mapping Builder
//!
//! Reduces mapping-table rows into a canonical `(base_name, series_index) -> label`
//! mapping.
//!
//! For a row with `image_name = "Plate (Series 03)"` the key is
//! `("Plate.nd2", 3)`: the base name is the text before the literal `" (Series"`
//! with the acquisition extension appended, and the series index is taken from
//! the case-insensitive `(series N)` marker.
//!
//! Keys are unique. When the table holds the same key more than once, the
//! later row's label replaces the earlier one but the key keeps its original
//! position in table order.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::diagnostics::DiagnosticSink;
use crate::records::MatchRecord;
use crate::table::read_matches;

mod series;


pub use series::{find_series_marker, SeriesMarker};

/// Literal that ends the base name in an acquisition unit name
pub const UNIT_SERIES_DELIMITER: &str = " (Series";

/// Default acquisition container file extension
pub const DEFAULT_ACQUISITION_EXTENSION: &str = ".nd2";

/// Key of one mapping entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MappingKey {
    /// Acquisition file name, e.g. `"Plate.nd2"`
    pub base_name: String,
    /// Zero-based series index as numbered in the acquisition metadata
    pub series_index: u32,
}

impl MappingKey {
    /// Create a new key
    pub fn new(base_name: impl Into<String>, series_index: u32) -> Self {
        Self {
            base_name: base_name.into(),
            series_index,
        }
    }
}

/// Options controlling how keys are derived from unit names
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MappingOptions {
    /// Extension appended to the base name (including the dot)
    pub acquisition_extension: String,
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self {
            acquisition_extension: DEFAULT_ACQUISITION_EXTENSION.to_string(),
        }
    }
}

/// Canonical mapping from `(base_name, series_index)` to point label.
///
/// Iteration follows table order (first insertion of each key).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    entries: IndexMap<MappingKey, String>,
}

impl Mapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the label for `key`, returning the previous label
    pub fn insert(&mut self, key: MappingKey, label: impl Into<String>) -> Option<String> {
        self.entries.insert(key, label.into())
    }

    /// Look up the label for a key
    pub fn get(&self, key: &MappingKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the mapping has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in table order
    pub fn iter(&self) -> impl Iterator<Item = (&MappingKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }
}

impl FromIterator<(MappingKey, String)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (MappingKey, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Base name of an acquisition unit: the text before `" (Series"` plus `extension`.
///
/// The cut is case-sensitive; a name without the literal keeps its full text.
pub fn base_name_for(unit_name: &str, extension: &str) -> String {
    let base = unit_name
        .split_once(UNIT_SERIES_DELIMITER)
        .map_or(unit_name, |(base, _)| base);
    format!("{}{}", base, extension)
}

/// Derive the mapping key for a unit name, if it carries a series marker
pub fn key_for_unit(unit_name: &str, options: &MappingOptions) -> Option<MappingKey> {
    let marker = find_series_marker(unit_name)?;
    Some(MappingKey::new(
        base_name_for(unit_name, &options.acquisition_extension),
        marker.index,
    ))
}

/// Build the mapping from table rows.
///
/// Rows whose unit name has no series marker are reported and skipped.
pub fn build_mapping(
    rows: &[MatchRecord],
    options: &MappingOptions,
    sink: &mut dyn DiagnosticSink,
) -> Mapping {
    let mut mapping = Mapping::new();

    for row in rows {
        match key_for_unit(&row.unit_name, options) {
            Some(key) => {
                mapping.insert(key, row.label.clone());
            }
            None => sink.warning(format!("Bad image_name format: {}", row.unit_name)),
        }
    }

    if mapping.is_empty() {
        sink.info(format!(
            "Mapping is empty ({} table rows); nothing will be renamed",
            rows.len()
        ));
    }

    mapping
}

/// Load the mapping table at `path` and build the mapping.
///
/// An unreadable or malformed table is reported as an error and yields an
/// empty mapping.
pub fn load_mapping<P: AsRef<Path>>(
    path: P,
    options: &MappingOptions,
    sink: &mut dyn DiagnosticSink,
) -> Mapping {
    let path = path.as_ref();
    match read_matches(path) {
        Ok(rows) => build_mapping(&rows, options, sink),
        Err(e) => {
            sink.error(format!("Error reading table {}: {}", path.display(), e));
            Mapping::new()
        }
    }
}
