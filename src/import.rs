//! The `import` subcommand: one spreadsheet, one action, one batch.

use anyhow::{Context, Result};
use log::info;

use crate::{
    batch::run_batch,
    cli::ImportArgs,
    config::OracleConfig,
    oracle::GeminiOracle,
    sheet,
    store::Store,
};

pub fn execute(args: &ImportArgs) -> Result<()> {
    let sheet = sheet::load_sheet(&args.input, args.sheet.as_deref(), args.delimiter)
        .with_context(|| format!("Loading spreadsheet {:?}", args.input))?;
    info!(
        "Column names in the uploaded file: {}",
        sheet.headers.join(", ")
    );
    info!(
        "Importing {} row(s) from {:?} with action '{:?}'",
        sheet.rows.len(),
        args.input,
        args.action
    );

    let store = Store::open(&args.db)?;
    let oracle = GeminiOracle::new(OracleConfig::from_env()?);
    let report = run_batch(&store, &sheet, args.action, &oracle)
        .with_context(|| format!("Processing batch from {:?}", args.input))?;

    if !report.columns_added.is_empty() {
        info!("New columns added: {}", report.columns_added.join(", "));
    }
    info!(
        "✓ Import complete: {} row(s) processed ({} inserted, {} updated, {} deleted)",
        report.rows_processed, report.inserted, report.updated, report.deleted
    );
    Ok(())
}
