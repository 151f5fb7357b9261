//! Row reconciliation and the batch driver.
//!
//! One batch is one full pass over one uploaded spreadsheet under one
//! action. The driver snapshots the schema, runs the column mapper once,
//! the schema evolver once, then reconciles each row in file order inside
//! one transaction committed at the end. A row failure propagates
//! immediately; the dropped transaction guard rolls back the rows already
//! applied.

use anyhow::{Context, Result};
use log::{debug, info};

use crate::cli::Action;
use crate::mapping::{ColumnMapping, map_columns};
use crate::oracle::TextOracle;
use crate::schema::{SchemaState, ensure_columns};
use crate::sheet::Sheet;
use crate::store::{NAME_COLUMN, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Inserted,
    Updated,
    Deleted,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub rows_processed: usize,
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
    pub columns_added: Vec<String>,
}

/// A spreadsheet row rewritten to destination column names.
///
/// Duplicate destinations collapse last-wins while keeping first-seen
/// position. The reconciliation key is whatever landed under NAME; when the
/// mapper produced no NAME destination the key is absent and name matching
/// degenerates to `NAME = NULL`, which matches nothing.
#[derive(Debug)]
pub struct MappedRow {
    columns: Vec<String>,
    values: Vec<Option<String>>,
}

impl MappedRow {
    pub fn from_cells(mapping: &ColumnMapping, cells: &[String]) -> Self {
        let mut columns: Vec<String> = Vec::with_capacity(mapping.len());
        let mut values: Vec<Option<String>> = Vec::with_capacity(mapping.len());
        for (idx, destination) in mapping.destinations().enumerate() {
            let cell = cells.get(idx).map(|s| s.as_str()).unwrap_or("");
            let value = if cell.is_empty() {
                None
            } else {
                Some(cell.to_string())
            };
            match columns.iter().position(|column| column == destination) {
                Some(existing) => values[existing] = value,
                None => {
                    columns.push(destination.to_string());
                    values.push(value);
                }
            }
        }
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    pub fn name(&self) -> Option<&str> {
        self.columns
            .iter()
            .position(|column| column == NAME_COLUMN)
            .and_then(|idx| self.values[idx].as_deref())
    }
}

/// Applies one mapped row under the batch action.
///
/// remove and modify never check existence first: a remove of an unknown
/// name deletes zero rows and a modify of an unknown name updates zero
/// rows, and both count as success. add is an upsert keyed on NAME.
pub fn reconcile_row(store: &Store, row: &MappedRow, action: Action) -> Result<RowOutcome> {
    match action {
        Action::Remove => {
            let affected = store.delete_by_name(row.name())?;
            debug!(
                "Deleted {affected} row(s) for name {:?}",
                row.name().unwrap_or("<null>")
            );
            Ok(RowOutcome::Deleted)
        }
        Action::Modify => {
            store.update_by_name(row.columns(), row.values(), row.name())?;
            Ok(RowOutcome::Updated)
        }
        Action::Add => {
            if store.name_exists(row.name())? {
                store.update_by_name(row.columns(), row.values(), row.name())?;
                Ok(RowOutcome::Updated)
            } else {
                store.insert(row.columns(), row.values())?;
                Ok(RowOutcome::Inserted)
            }
        }
    }
}

/// Reconciles every row in file order within one transaction.
pub fn process_batch(
    store: &Store,
    rows: &[Vec<String>],
    mapping: &ColumnMapping,
    action: Action,
) -> Result<BatchReport> {
    let tx = store.begin_batch()?;
    let mut report = BatchReport::default();
    for (idx, cells) in rows.iter().enumerate() {
        let row = MappedRow::from_cells(mapping, cells);
        let outcome = reconcile_row(store, &row, action)
            .with_context(|| format!("Processing row {}", idx + 2))?;
        match outcome {
            RowOutcome::Inserted => report.inserted += 1,
            RowOutcome::Updated => report.updated += 1,
            RowOutcome::Deleted => report.deleted += 1,
        }
        report.rows_processed += 1;
    }
    tx.commit().context("Committing batch")?;
    Ok(report)
}

/// The full batch pipeline: snapshot, map, evolve, reconcile.
pub fn run_batch(
    store: &Store,
    sheet: &Sheet,
    action: Action,
    oracle: &dyn TextOracle,
) -> Result<BatchReport> {
    let mut schema = SchemaState::new(store.column_names()?);
    let mapping = map_columns(&sheet.headers, schema.columns(), oracle)
        .context("Mapping spreadsheet columns")?;
    // Column DDL commits on its own, outside the row transaction.
    let columns_added = ensure_columns(store, &mut schema, &mapping)?;
    let mut report = process_batch(store, &sheet.rows, &mapping, action)?;
    report.columns_added = columns_added;
    info!(
        "Processed {} row(s): {} inserted, {} updated, {} deleted",
        report.rows_processed, report.inserted, report.updated, report.deleted
    );
    Ok(report)
}
