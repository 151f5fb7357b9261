//! Inventory analytics: dashboard metrics and oracle-backed narratives.
//!
//! The dashboard is computed locally. `insight` and `categorize` export
//! the whole table as CSV text and hand it to the oracle with a prompt;
//! the answer comes back as free text and is printed verbatim.

use anyhow::{Context, Result};
use log::info;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::{
    cli::{CategorizeArgs, DashboardArgs, InsightArgs, InsightFocus},
    config::OracleConfig,
    oracle::{GeminiOracle, TextOracle},
    store::{Store, TABLE},
    table,
};

pub fn dashboard(args: &DashboardArgs) -> Result<()> {
    let store = Store::open(&args.db)?;
    let count = store.product_count()?;
    let total = inventory_value(&store)?;

    let headers = vec!["metric".to_string(), "value".to_string()];
    let rows = vec![
        vec!["Total products".to_string(), count.to_string()],
        vec![
            "Total inventory value".to_string(),
            format!("${}", total.round_dp(2)),
        ],
    ];
    table::print_table(&headers, &rows);
    Ok(())
}

/// Σ price × stock over every product, accumulated as decimals so money
/// totals do not drift. Rows missing either field contribute nothing.
pub fn inventory_value(store: &Store) -> Result<Decimal> {
    let mut total = Decimal::ZERO;
    for (price, stock) in store.valuation_rows()? {
        let (Some(price), Some(stock)) = (price, stock) else {
            continue;
        };
        let Some(price) = Decimal::from_f64(price) else {
            continue;
        };
        total += price * Decimal::from(stock);
    }
    Ok(total)
}

pub fn insight(args: &InsightArgs) -> Result<()> {
    let store = Store::open(&args.db)?;
    let oracle = GeminiOracle::new(OracleConfig::from_env()?);
    let data = export_csv(&store)?;
    let prompt = match &args.prompt {
        Some(custom) => custom.as_str(),
        None => focus_prompt(args.focus),
    };
    info!("Requesting inventory analysis from the oracle");
    let answer = oracle
        .summarize(&data, prompt)
        .context("Summarizing inventory data")?;
    println!("{answer}");
    Ok(())
}

pub fn categorize(args: &CategorizeArgs) -> Result<()> {
    let store = Store::open(&args.db)?;
    let oracle = GeminiOracle::new(OracleConfig::from_env()?);
    let data = export_csv(&store)?;
    let prompt = format!(
        "Categorize this product: Name: {}, Description: {}. \
         Respond with the single best category.",
        args.name, args.description
    );
    let answer = oracle
        .summarize(&data, &prompt)
        .context("Categorizing product")?;
    println!("{answer}");
    Ok(())
}

fn focus_prompt(focus: InsightFocus) -> &'static str {
    match focus {
        InsightFocus::Overview => {
            "Analyze this inventory data and provide key insights about stock levels, \
             popular categories, and pricing trends."
        }
        InsightFocus::StockRisk => {
            "Based on the current inventory data, predict which products are likely to \
             run out of stock soon and explain why."
        }
        InsightFocus::Report => {
            "Generate a comprehensive inventory report. Include total inventory value, \
             low stock alerts, and any notable trends."
        }
    }
}

/// Renders the whole PRODUCT table as CSV text for oracle prompts.
pub fn export_csv(store: &Store) -> Result<String> {
    let output = store.query(&format!("SELECT * FROM {TABLE}"))?;
    let mut buffer = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        writer
            .write_record(&output.columns)
            .context("Writing CSV header")?;
        for row in &output.rows {
            writer.write_record(row).context("Writing CSV row")?;
        }
        writer.flush().context("Flushing CSV export")?;
    }
    String::from_utf8(buffer).context("Encoding CSV export")
}
