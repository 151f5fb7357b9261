pub mod analytics;
pub mod batch;
pub mod cli;
pub mod columns;
pub mod config;
pub mod import;
pub mod mapping;
pub mod oracle;
pub mod query;
pub mod schema;
pub mod sheet;
pub mod store;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::cli::{Cli, Commands};
use crate::store::Store;

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("inventory_managed", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    dotenv::dotenv().ok();
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Init(args) => handle_init(&args),
        Commands::Import(args) => import::execute(&args),
        Commands::Ask(args) => query::execute(&args),
        Commands::Dashboard(args) => analytics::dashboard(&args),
        Commands::Insight(args) => analytics::insight(&args),
        Commands::Categorize(args) => analytics::categorize(&args),
        Commands::Columns(args) => columns::execute(&args),
    }
}

fn handle_init(args: &cli::InitArgs) -> Result<()> {
    let store = Store::open(&args.db)?;
    store.init(args.force)?;
    info!("✓ PRODUCT table ready in {:?}", args.db);

    if let Some(seed) = &args.seed {
        let sheet = sheet::load_sheet(seed, None, None)
            .with_context(|| format!("Loading seed file {seed:?}"))?;
        let columns = sheet.headers.clone();
        let mut loaded = 0usize;
        for (idx, row) in sheet.rows.iter().enumerate() {
            let values = columns
                .iter()
                .enumerate()
                .map(|(col, _)| {
                    row.get(col)
                        .filter(|cell| !cell.is_empty())
                        .map(|cell| cell.to_string())
                })
                .collect::<Vec<_>>();
            store
                .insert(&columns, &values)
                .with_context(|| format!("Seeding row {} from {seed:?}", idx + 2))?;
            loaded += 1;
        }
        info!("✓ Seeded {loaded} row(s) from {seed:?}");
    }
    Ok(())
}
