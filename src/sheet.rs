//! Spreadsheet loading for imports.
//!
//! Workbook inputs (`.xlsx`, `.xlsm`) are read through `calamine`; delimited
//! inputs (`.csv`, `.tsv`) through the `csv` crate with extension-based
//! delimiter resolution. Either way the result is a header row plus data
//! rows of display strings; typing is left to the storage layer's column
//! affinity.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use calamine::{Data, Reader, Xlsx, open_workbook};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

#[derive(Debug, Clone)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn load_sheet(path: &Path, worksheet: Option<&str>, delimiter: Option<u8>) -> Result<Sheet> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xlsm") => {
            load_workbook(path, worksheet)
        }
        _ => load_delimited(path, resolve_input_delimiter(path, delimiter)),
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

fn load_workbook(path: &Path, worksheet: Option<&str>) -> Result<Sheet> {
    let mut workbook: Xlsx<_> =
        open_workbook(path).with_context(|| format!("Opening workbook {path:?}"))?;
    let sheet_name = match worksheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("Workbook {path:?} contains no worksheets"))?,
    };
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Reading worksheet '{sheet_name}' in {path:?}"))?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .ok_or_else(|| anyhow!("Worksheet '{sheet_name}' has no header row"))?
        .iter()
        .map(cell_to_string)
        .collect::<Vec<_>>();
    let data = rows
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>())
        .collect();
    Ok(Sheet {
        headers,
        rows: data,
    })
}

fn load_delimited(path: &Path, delimiter: u8) -> Result<Sheet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .from_path(path)
        .with_context(|| format!("Opening input file {path:?}"))?;
    let headers = reader
        .headers()
        .context("Reading header row")?
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Reading row {} in {path:?}", idx + 2))?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }
    Ok(Sheet { headers, rows })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{f:.0}")
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("#ERROR: {e:?}"),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}
