//! The ISBN → rendered links lookup table and its JSON file form.
//!
//! The table is the hand-off between the normalizer and the merge. Keys are
//! the raw ISBN from the coverage sheet; candidate expansion happens at
//! lookup time in [`crate::isbn`].

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::PipelineError;

/// Mapping from raw ISBN to the rendered links for that ISBN.
///
/// Links under a key keep coverage input order. Keys iterate in sorted
/// order so audits and the JSON file are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupTable {
    links_by_isbn: BTreeMap<String, Vec<String>>,
}

impl LookupTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rendered link under `isbn`, creating the entry if needed.
    pub fn push_link(&mut self, isbn: &str, link: String) {
        self.links_by_isbn
            .entry(isbn.to_string())
            .or_default()
            .push(link);
    }

    /// Returns the links stored under exactly `isbn`.
    #[must_use]
    pub fn get(&self, isbn: &str) -> Option<&[String]> {
        self.links_by_isbn.get(isbn).map(Vec::as_slice)
    }

    /// Returns the stored key and its links for exactly `isbn`.
    #[must_use]
    pub fn get_key_value(&self, isbn: &str) -> Option<(&str, &[String])> {
        self.links_by_isbn
            .get_key_value(isbn)
            .map(|(key, links)| (key.as_str(), links.as_slice()))
    }

    /// Iterates over all keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.links_by_isbn.keys().map(String::as_str)
    }

    /// Number of distinct ISBN keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links_by_isbn.len()
    }

    /// Whether the table has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links_by_isbn.is_empty()
    }

    /// Total number of links across all keys.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.links_by_isbn.values().map(Vec::len).sum()
    }

    /// Serializes the table as a JSON object of ISBN → array of links.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, PipelineError> {
        serde_json::to_string(self).map_err(|source| PipelineError::json("<memory>", source))
    }

    /// Parses a table from its JSON object form.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Json`] if `raw` is not an object of string
    /// arrays.
    pub fn from_json(raw: &str) -> Result<Self, PipelineError> {
        serde_json::from_str(raw).map_err(|source| PipelineError::json("<memory>", source))
    }

    /// Writes the table to `path` as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Io`] or [`PipelineError::Json`] on failure.
    #[instrument(skip(self), fields(keys = self.len()))]
    pub fn save(&self, path: &Path) -> Result<(), PipelineError> {
        let file = File::create(path).map_err(|source| PipelineError::io(path, source))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self)
            .map_err(|source| PipelineError::json(path.display().to_string(), source))?;
        writer
            .flush()
            .map_err(|source| PipelineError::io(path, source))?;
        debug!(path = %path.display(), "lookup table written");
        Ok(())
    }

    /// Reads a table previously written by [`LookupTable::save`].
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Io`] or [`PipelineError::Json`] on failure.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let file = File::open(path).map_err(|source| PipelineError::io(path, source))?;
        let table: Self = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| PipelineError::json(path.display().to_string(), source))?;
        debug!(keys = table.len(), links = table.link_count(), "lookup table loaded");
        Ok(table)
    }
}

impl FromIterator<(String, Vec<String>)> for LookupTable {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self {
            links_by_isbn: iter.into_iter().collect(),
        }
    }
}
