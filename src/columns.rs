//! Column listing for the PRODUCT table.
//!
//! Renders the live column names and declared types as an ASCII table,
//! dynamically added columns included.

use anyhow::Result;
use log::info;

use crate::{cli::ColumnsArgs, store::Store, table};

pub fn execute(args: &ColumnsArgs) -> Result<()> {
    let store = Store::open(&args.db)?;
    let columns = store.columns()?;

    if columns.is_empty() {
        info!("Database {:?} has no PRODUCT table yet; run 'init' first", args.db);
        return Ok(());
    }

    let mut rows = Vec::with_capacity(columns.len());
    for (idx, (name, datatype)) in columns.iter().enumerate() {
        rows.push(vec![(idx + 1).to_string(), name.clone(), datatype.clone()]);
    }
    let headers = vec!["#".to_string(), "name".to_string(), "type".to_string()];
    table::print_table(&headers, &rows);
    info!("Listed {} column(s)", columns.len());
    Ok(())
}
