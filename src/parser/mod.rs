use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{Result, ScanError};
use crate::types::{RawRecord, MULTI_VALUE_SEPARATOR};

/// Supported export encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    /// Guess from the file extension; anything but `.json` is read as CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
            _ => InputFormat::Csv,
        }
    }
}

/// Turns export bytes into raw records, normalizing every value to a list
/// of strings.
pub trait ExportParser {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<RawRecord>>;
}

pub fn parser_for(format: InputFormat) -> Box<dyn ExportParser> {
    match format {
        InputFormat::Csv => Box::new(CsvExportParser),
        InputFormat::Json => Box::new(PopBioJsonParser),
    }
}

/// Read and parse an export file.
pub fn read_records(path: &Path, format: InputFormat) -> Result<Vec<RawRecord>> {
    let bytes = std::fs::read(path)?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    let records = parser_for(format).parse(&bytes)?;
    info!("Parsed {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Flat CSV export with a header row. Multi-valued cells hold `;`-joined
/// values; an empty cell is an empty list.
pub struct CsvExportParser;

impl ExportParser for CsvExportParser {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<RawRecord>> {
        let mut reader = csv::Reader::from_reader(bytes);
        let headers = reader.headers()?.clone();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let mut record = RawRecord::new();
            for (name, cell) in headers.iter().zip(row.iter()) {
                record.insert(name, split_cell(cell));
            }
            records.push(record);
        }
        Ok(records)
    }
}

fn split_cell(cell: &str) -> Vec<String> {
    if cell.is_empty() {
        Vec::new()
    } else {
        cell.split(MULTI_VALUE_SEPARATOR).map(str::to_string).collect()
    }
}

/// Solr-style search response: `{"response": {"docs": [...]}}`. A bare
/// top-level array of documents is accepted as well.
pub struct PopBioJsonParser;

impl ExportParser for PopBioJsonParser {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<RawRecord>> {
        let document: Value = serde_json::from_slice(bytes)?;

        let docs = match &document {
            Value::Array(docs) => docs,
            other => other
                .pointer("/response/docs")
                .and_then(Value::as_array)
                .ok_or_else(|| ScanError::InputShape("expected response.docs array".into()))?,
        };

        docs.iter()
            .enumerate()
            .map(|(i, doc)| -> Result<RawRecord> {
                let object = doc
                    .as_object()
                    .ok_or_else(|| ScanError::InputShape(format!("document {} is not an object", i)))?;
                let mut record = RawRecord::new();
                for (name, value) in object {
                    record.insert(name, json_values(value));
                }
                Ok(record)
            })
            .collect()
    }
}

/// Scalars become one-element lists; arrays keep their order.
fn json_values(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().flat_map(json_values).collect(),
        Value::String(s) => vec![s.clone()],
        other => vec![other.to_string()],
    }
}
