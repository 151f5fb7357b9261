//! SQLite storage for the PRODUCT table.
//!
//! One `Store` wraps one connection, opened at the start of a command and
//! dropped at its end. Column identifiers coming out of the column mapper
//! are interpolated into statements as-is; a destination name that is not a
//! valid identifier surfaces here as a prepare error. Values always travel
//! as bound parameters.

use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use rusqlite::{Connection, OptionalExtension, ToSql, Transaction, params};

pub const TABLE: &str = "PRODUCT";
pub const NAME_COLUMN: &str = "NAME";

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS PRODUCT (
    ID INTEGER PRIMARY KEY AUTOINCREMENT,
    NAME TEXT,
    CATEGORY TEXT,
    BRAND TEXT,
    PRICE REAL,
    STOCK INTEGER
)";

#[derive(Debug)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn =
            Connection::open(path).with_context(|| format!("Opening database {path:?}"))?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Opening in-memory database")?;
        Ok(Self { conn })
    }

    /// Creates the PRODUCT table, optionally dropping an existing one first.
    pub fn init(&self, force: bool) -> Result<()> {
        if force {
            self.conn
                .execute(&format!("DROP TABLE IF EXISTS {TABLE}"), [])
                .context("Dropping existing PRODUCT table")?;
        }
        self.conn
            .execute(CREATE_TABLE_SQL, [])
            .context("Creating PRODUCT table")?;
        Ok(())
    }

    /// Current column names and declared types, in table order.
    pub fn columns(&self) -> Result<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({TABLE})"))
            .context("Reading PRODUCT table info")?;
        let columns = stmt
            .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    pub fn column_names(&self) -> Result<Vec<String>> {
        Ok(self.columns()?.into_iter().map(|(name, _)| name).collect())
    }

    /// Adds one nullable TEXT column. The destination name comes from the
    /// oracle unmodified, so this is where a nonsensical mapping fails.
    pub fn add_text_column(&self, column: &str) -> Result<()> {
        debug!("Adding column '{column}' to {TABLE}");
        self.conn
            .execute(&format!("ALTER TABLE {TABLE} ADD COLUMN {column} TEXT"), [])
            .with_context(|| format!("Adding column '{column}' to {TABLE}"))?;
        Ok(())
    }

    /// Opens the batch-scoped transaction. Dropping the guard without
    /// committing rolls back everything executed on this connection since.
    pub fn begin_batch(&self) -> Result<Transaction<'_>> {
        self.conn
            .unchecked_transaction()
            .context("Opening batch transaction")
    }

    /// `NAME = NULL` matches nothing, so an absent name reports not-found.
    pub fn name_exists(&self, name: Option<&str>) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                &format!("SELECT 1 FROM {TABLE} WHERE {NAME_COLUMN}=?1"),
                params![name],
                |row| row.get(0),
            )
            .optional()
            .context("Looking up product by name")?;
        Ok(found.is_some())
    }

    pub fn delete_by_name(&self, name: Option<&str>) -> Result<usize> {
        let affected = self
            .conn
            .execute(
                &format!("DELETE FROM {TABLE} WHERE {NAME_COLUMN}=?1"),
                params![name],
            )
            .context("Deleting product by name")?;
        Ok(affected)
    }

    pub fn update_by_name(
        &self,
        columns: &[String],
        values: &[Option<String>],
        name: Option<&str>,
    ) -> Result<usize> {
        let set_clause = columns
            .iter()
            .map(|column| format!("{column}=?"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE {TABLE} SET {set_clause} WHERE {NAME_COLUMN}=?");
        let mut bindings: Vec<&dyn ToSql> = values.iter().map(|v| v as &dyn ToSql).collect();
        bindings.push(&name);
        let affected = self
            .conn
            .execute(&sql, bindings.as_slice())
            .with_context(|| format!("Updating product '{}'", name.unwrap_or("<null>")))?;
        Ok(affected)
    }

    pub fn insert(&self, columns: &[String], values: &[Option<String>]) -> Result<()> {
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {TABLE} ({}) VALUES ({placeholders})",
            columns.join(", ")
        );
        let bindings: Vec<&dyn ToSql> = values.iter().map(|v| v as &dyn ToSql).collect();
        self.conn
            .execute(&sql, bindings.as_slice())
            .context("Inserting product row")?;
        Ok(())
    }

    /// Runs a read query and renders every cell as display text.
    pub fn query(&self, sql: &str) -> Result<QueryOutput> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .with_context(|| format!("Preparing query: {sql}"))?;
        let columns = stmt
            .column_names()
            .iter()
            .map(|name| name.to_string())
            .collect::<Vec<_>>();
        let column_count = columns.len();
        let rows = stmt
            .query_map([], |row| {
                let mut cells = Vec::with_capacity(column_count);
                for idx in 0..column_count {
                    cells.push(display_value(row.get_ref(idx)?));
                }
                Ok(cells)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context(|| format!("Executing query: {sql}"))?;
        Ok(QueryOutput { columns, rows })
    }

    /// Runs a write statement and reports rows affected.
    pub fn execute(&self, sql: &str) -> Result<usize> {
        self.conn
            .execute(sql, [])
            .with_context(|| format!("Executing statement: {sql}"))
    }

    /// Price and stock for every product, for the dashboard valuation.
    pub fn valuation_rows(&self) -> Result<Vec<(Option<f64>, Option<i64>)>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT PRICE, STOCK FROM {TABLE}"))
            .context("Reading valuation rows")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn product_count(&self) -> Result<i64> {
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM {TABLE}"), [], |row| row.get(0))
            .context("Counting products")
    }
}

fn display_value(value: rusqlite::types::ValueRef<'_>) -> String {
    use rusqlite::types::ValueRef;
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ValueRef::Blob(bytes) => format!("<{} byte blob>", bytes.len()),
    }
}
