use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about = "Manage a product inventory database", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the PRODUCT table and optionally load seed rows from a CSV file
    Init(InitArgs),
    /// Import a spreadsheet, reconciling its columns and rows into the database
    Import(ImportArgs),
    /// Ask a natural-language question or command; the oracle translates it to SQL
    Ask(AskArgs),
    /// Show product count and total inventory value
    Dashboard(DashboardArgs),
    /// Generate a narrative analysis of the current inventory
    Insight(InsightArgs),
    /// Suggest a category for a single product
    Categorize(CategorizeArgs),
    /// List the current PRODUCT table columns
    Columns(ColumnsArgs),
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Path to the SQLite database file
    #[arg(short, long, default_value = "inventory.db")]
    pub db: PathBuf,
    /// CSV file of seed rows whose header matches the core columns
    #[arg(long)]
    pub seed: Option<PathBuf>,
    /// Drop any existing PRODUCT table before creating it
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Spreadsheet to import (.xlsx, .xlsm, .csv, or .tsv)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Path to the SQLite database file
    #[arg(short, long, default_value = "inventory.db")]
    pub db: PathBuf,
    /// How each row in the file is applied to the table
    #[arg(long, value_enum)]
    pub action: Action,
    /// Worksheet name for workbook inputs (defaults to the first sheet)
    #[arg(long)]
    pub sheet: Option<String>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
}

/// Per-batch action applied uniformly to every row in the uploaded file.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "lowercase")]
pub enum Action {
    /// Insert each row, updating in place when the name already exists
    Add,
    /// Delete each row by name
    Remove,
    /// Update each row's mapped columns by name
    Modify,
}

#[derive(Debug, Args)]
pub struct AskArgs {
    /// Natural-language question or command
    pub question: String,
    /// Path to the SQLite database file
    #[arg(short, long, default_value = "inventory.db")]
    pub db: PathBuf,
    /// Print the generated SQL without executing it
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Path to the SQLite database file
    #[arg(short, long, default_value = "inventory.db")]
    pub db: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum InsightFocus {
    /// Stock levels, popular categories, and pricing trends
    Overview,
    /// Products likely to run out of stock soon
    StockRisk,
    /// Full inventory report with valuation and notable trends
    Report,
}

#[derive(Debug, Args)]
pub struct InsightArgs {
    /// Path to the SQLite database file
    #[arg(short, long, default_value = "inventory.db")]
    pub db: PathBuf,
    /// Canned analytical focus (ignored when --prompt is given)
    #[arg(long, value_enum, default_value = "overview")]
    pub focus: InsightFocus,
    /// Free-form analytical prompt overriding --focus
    #[arg(long)]
    pub prompt: Option<String>,
}

#[derive(Debug, Args)]
pub struct CategorizeArgs {
    /// Product name
    #[arg(long)]
    pub name: String,
    /// Product description
    #[arg(long)]
    pub description: String,
    /// Path to the SQLite database file
    #[arg(short, long, default_value = "inventory.db")]
    pub db: PathBuf,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Path to the SQLite database file
    #[arg(short, long, default_value = "inventory.db")]
    pub db: PathBuf,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
