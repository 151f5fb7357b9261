//! Live schema snapshot and batch-scoped column evolution.
//!
//! The PRODUCT column list is read once per batch into a [`SchemaState`]
//! and threaded through the rest of the run; nothing re-queries table
//! metadata per row. Evolution only ever adds nullable TEXT columns:
//! nothing is ever dropped or retyped here, and every dynamically added
//! column is TEXT regardless of the data it will carry.

use anyhow::Result;
use log::info;

use crate::mapping::ColumnMapping;
use crate::store::Store;

/// Ordered snapshot of the PRODUCT table's column names, taken at the start
/// of a batch and kept in sync as columns are added during that batch.
#[derive(Debug, Clone)]
pub struct SchemaState {
    columns: Vec<String>,
}

impl SchemaState {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Case-sensitive membership. SQLite itself compares column names
    /// case-insensitively, so an oracle answer differing only in case from
    /// an existing column passes this check and fails at the ALTER.
    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    fn push(&mut self, name: String) {
        self.columns.push(name);
    }
}

/// Adds every destination column the mapping names that the snapshot does
/// not already contain, in mapping order, one ALTER per new name. Returns
/// the added names. Duplicate destinations within one batch are added once.
pub fn ensure_columns(
    store: &Store,
    schema: &mut SchemaState,
    mapping: &ColumnMapping,
) -> Result<Vec<String>> {
    let mut added = Vec::new();
    for destination in mapping.destinations() {
        if schema.contains(destination) {
            continue;
        }
        store.add_text_column(destination)?;
        schema.push(destination.to_string());
        added.push(destination.to_string());
    }
    if !added.is_empty() {
        info!("Added {} new column(s): {}", added.len(), added.join(", "));
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, &str)]) -> ColumnMapping {
        ColumnMapping::from_pairs(
            pairs
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        )
    }

    fn store_with_snapshot() -> (Store, SchemaState) {
        let store = Store::open_in_memory().expect("open store");
        store.init(false).expect("init table");
        let snapshot = SchemaState::new(store.column_names().expect("columns"));
        (store, snapshot)
    }

    #[test]
    fn adds_missing_columns_in_mapping_order() {
        let (store, mut schema) = store_with_snapshot();
        let mapping = mapping(&[("Item", "NAME"), ("Shade", "COLOR"), ("Mass", "WEIGHT")]);

        let added = ensure_columns(&store, &mut schema, &mapping).expect("ensure");

        assert_eq!(added, vec!["COLOR", "WEIGHT"]);
        let names = store.column_names().expect("columns");
        assert_eq!(names[names.len() - 2..], ["COLOR", "WEIGHT"]);
        assert!(schema.contains("COLOR"));
        assert!(schema.contains("WEIGHT"));
    }

    #[test]
    fn duplicate_destinations_are_added_once() {
        let (store, mut schema) = store_with_snapshot();
        let mapping = mapping(&[("Shade", "COLOR"), ("Colour", "COLOR")]);

        let added = ensure_columns(&store, &mut schema, &mapping).expect("ensure");

        assert_eq!(added, vec!["COLOR"]);
    }

    #[test]
    fn second_run_over_same_headers_adds_nothing() {
        let (store, mut schema) = store_with_snapshot();
        let mapping = mapping(&[("Item", "NAME"), ("Shade", "COLOR")]);

        ensure_columns(&store, &mut schema, &mapping).expect("first run");
        let added = ensure_columns(&store, &mut schema, &mapping).expect("second run");

        assert!(added.is_empty());
    }

    #[test]
    fn existing_columns_are_never_touched() {
        let (store, mut schema) = store_with_snapshot();
        let before = store.columns().expect("columns");
        let mapping = mapping(&[("Item", "NAME"), ("Qty", "STOCK")]);

        let added = ensure_columns(&store, &mut schema, &mapping).expect("ensure");

        assert!(added.is_empty());
        assert_eq!(store.columns().expect("columns"), before);
    }
}
