//! Header lookup with forgiving name matching.

use std::collections::HashMap;

use csv::StringRecord;

use crate::error::PipelineError;

/// Maps normalized header names to column positions.
///
/// When a header appears twice, the first occurrence wins.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    /// Indexes a header record.
    #[must_use]
    pub fn from_record(record: &StringRecord) -> Self {
        let names: Vec<String> = record.iter().map(str::to_string).collect();
        let mut positions = HashMap::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            positions.entry(normalize(name)).or_insert(index);
        }
        Self { names, positions }
    }

    /// Position of `name`, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(&normalize(name)).copied()
    }

    /// Position of a required column.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Schema`] naming `source_name` when the column
    /// is absent.
    pub fn require(&self, name: &str, source_name: &str) -> Result<usize, PipelineError> {
        self.position(name)
            .ok_or_else(|| PipelineError::missing_column(source_name, name, &self.names))
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
