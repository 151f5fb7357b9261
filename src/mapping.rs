//! Column mapping between spreadsheet headers and table columns.
//!
//! One oracle query is issued per source header. The oracle's answer is
//! taken verbatim (whitespace-trimmed) as the destination column name;
//! there is no check that it names one of the offered candidates. A bad
//! answer therefore fails later, at schema evolution or statement
//! preparation, never here.

use anyhow::Result;
use log::debug;

use crate::oracle::TextOracle;

/// Ordered source-header → destination-column mapping, built fresh for each
/// batch and discarded afterwards.
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    entries: Vec<(String, String)>,
}

impl ColumnMapping {
    pub fn from_pairs(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn destination(&self, source: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(from, _)| from == source)
            .map(|(_, to)| to.as_str())
    }

    /// Destination names in mapping order, duplicates included.
    pub fn destinations(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, to)| to.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Maps every source header onto a destination column by asking the oracle
/// once per header, offering the current target columns as candidates.
pub fn map_columns(
    source_headers: &[String],
    target_columns: &[String],
    oracle: &dyn TextOracle,
) -> Result<ColumnMapping> {
    let mut entries = Vec::with_capacity(source_headers.len());
    for header in source_headers {
        let answer = oracle.map_column(header, target_columns)?;
        let destination = answer.trim().to_string();
        debug!("Mapped column '{header}' -> '{destination}'");
        entries.push((header.clone(), destination));
    }
    Ok(ColumnMapping::from_pairs(entries))
}
