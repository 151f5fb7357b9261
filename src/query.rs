//! The `ask` subcommand: natural language in, SQL out, results rendered.
//!
//! The schema description offered to the oracle is built from the live
//! column list, so dynamically added columns are visible to later
//! questions. The generated statement is executed as-is after stripping
//! Markdown code fences; there is no allow-list beyond the SELECT/statement
//! split used to pick the execution path.

use std::sync::OnceLock;

use anyhow::{Context, Result};
use itertools::Itertools;
use log::info;
use regex::Regex;

use crate::{
    cli::AskArgs,
    config::OracleConfig,
    oracle::{GeminiOracle, TextOracle},
    store::{Store, TABLE},
    table,
};

pub fn execute(args: &AskArgs) -> Result<()> {
    let store = Store::open(&args.db)?;
    let oracle = GeminiOracle::new(OracleConfig::from_env()?);
    let description = schema_description(&store)?;
    let raw = oracle
        .translate_to_sql(&description, &args.question)
        .context("Translating question to SQL")?;
    let sql = strip_code_fences(&raw);
    info!("Generated SQL: {sql}");

    if args.dry_run {
        println!("{sql}");
        return Ok(());
    }

    if is_read_query(&sql) {
        let output = store.query(&sql)?;
        table::print_table(&output.columns, &output.rows);
        info!("{} row(s) returned", output.rows.len());
    } else {
        let affected = store.execute(&sql)?;
        info!("{affected} row(s) affected");
    }
    Ok(())
}

/// One-line schema summary in the shape the original prompt used,
/// e.g. `Product table schema: PRODUCT (ID INTEGER, NAME TEXT, ...)`.
pub fn schema_description(store: &Store) -> Result<String> {
    let columns = store
        .columns()?
        .into_iter()
        .map(|(name, datatype)| {
            if datatype.is_empty() {
                name
            } else {
                format!("{name} {datatype}")
            }
        })
        .join(", ");
    Ok(format!("Product table schema: {TABLE} ({columns})"))
}

pub fn is_read_query(sql: &str) -> bool {
    let upper = sql.trim_start().to_ascii_uppercase();
    upper.starts_with("SELECT") || upper.starts_with("WITH")
}

/// Oracles often wrap SQL in Markdown code fences despite being told not to.
pub fn strip_code_fences(response: &str) -> String {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE
        .get_or_init(|| Regex::new(r"(?s)^```[a-zA-Z]*\s*(.*?)\s*```$").expect("fence pattern"));
    let trimmed = response.trim();
    match fence.captures(trimmed) {
        Some(captures) => captures[1].trim().to_string(),
        None => trimmed.to_string(),
    }
}
