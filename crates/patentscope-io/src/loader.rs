//! JSON and CSV record loading
//!
//! CSV carries no type information, so the loader restores the wire types for
//! the known numeric columns and parses JSON-shaped cells (arrays/objects)
//! back into structure. Everything else stays a string; the normalizer's
//! shape check decides what survives.

use patentscope_core::RawRecord;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Columns restored to numbers when a CSV source is loaded
///
/// Matches the count fields of the search API projection; every other column
/// stays a string.
const NUMERIC_COLUMNS: &[&str] = &[
    "cited_patent_count",
    "citedby_patent_count",
    "patent_num_us_patents_cited",
    "patent_num_times_cited_by_us_patents",
];

/// Errors that can occur while loading a local data file
#[derive(Debug, Error)]
pub enum LoadError {
    /// I/O failure reading the file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse JSON content
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to parse CSV content
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON file whose top-level value is not an array
    #[error("expected a JSON array in {path}")]
    NotAnArray { path: String },
}

/// Load raw records from a local file
///
/// A `.json` extension selects JSON-array parsing; any other extension is
/// read as CSV with a header row, one record per row.
pub fn load_records(path: &Path) -> Result<Vec<RawRecord>, LoadError> {
    let records = if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
        load_json(path)?
    } else {
        load_csv(path)?
    };

    info!(
        event_type = "file_loaded",
        path = %path.display(),
        record_count = records.len(),
        "Loaded raw records from file"
    );

    Ok(records)
}

fn load_json(path: &Path) -> Result<Vec<RawRecord>, LoadError> {
    let content = fs::read_to_string(path)?;
    let parsed: Value = serde_json::from_str(&content)?;

    match parsed {
        Value::Array(records) => Ok(records),
        _ => Err(LoadError::NotAnArray {
            path: path.display().to_string(),
        }),
    }
}

fn load_csv(path: &Path) -> Result<Vec<RawRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut object = Map::new();

        for (header, cell) in headers.iter().zip(row.iter()) {
            if let Some(value) = coerce_cell(header, cell) {
                object.insert(header.to_string(), value);
            }
        }

        records.push(Value::Object(object));
    }

    Ok(records)
}

/// Coerce a CSV cell back into its wire type
///
/// Empty cells are omitted so the normalizer's defaults apply. Known numeric
/// columns are parsed as numbers (an unparseable cell stays a string and is
/// surfaced as a per-record skip downstream). Cells that look like embedded
/// JSON arrays or objects are parsed back into structure.
fn coerce_cell(header: &str, cell: &str) -> Option<Value> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }

    if NUMERIC_COLUMNS.contains(&header) {
        if let Ok(n) = trimmed.parse::<u64>() {
            return Some(Value::Number(n.into()));
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if let Some(n) = serde_json::Number::from_f64(f) {
                return Some(Value::Number(n));
            }
        }
        return Some(Value::String(cell.to_string()));
    }

    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        if let Ok(parsed) = serde_json::from_str::<Value>(trimmed) {
            return Some(parsed);
        }
    }

    Some(Value::String(cell.to_string()))
}
