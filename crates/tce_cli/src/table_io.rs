//! Tabular file loading and writing for the CLI.
//!
//! CSV and JSON only; spreadsheet formats and encoding fallbacks are the
//! concern of upstream tooling. CSV cells arrive as strings (empty cells
//! become nulls); JSON arrays of objects keep their scalar types.

use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use tce_validator::{Table, Value};

/// Loads a table from a CSV or JSON file, detecting the format from the
/// extension.
pub fn load_table(path: &Path, delimiter: Option<char>) -> Result<Table> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => load_csv(path, delimiter.unwrap_or(',')),
        "tsv" => load_csv(path, delimiter.unwrap_or('\t')),
        "json" => load_json(path),
        other => bail!("Unsupported data format '{other}' (expected csv, tsv or json)"),
    }
}

fn load_csv(path: &Path, delimiter: char) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header from {}", path.display()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];
    for (row_number, record) in reader.records().enumerate() {
        let record = record
            .with_context(|| format!("Failed to parse CSV row {} in {}", row_number + 2, path.display()))?;
        for (i, column) in columns.iter_mut().enumerate() {
            let cell = record.get(i).unwrap_or_default();
            column.push(if cell.is_empty() {
                Value::Null
            } else {
                Value::Str(cell.to_string())
            });
        }
    }

    let table = Table::from_columns(headers.into_iter().zip(columns))
        .with_context(|| format!("Invalid table shape in {}", path.display()))?;
    Ok(table)
}

fn load_json(path: &Path) -> Result<Table> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let rows: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(&content)
        .with_context(|| format!("Expected a JSON array of objects in {}", path.display()))?;

    // Column order follows first appearance across the rows.
    let mut names: Vec<String> = Vec::new();
    for row in &rows {
        for key in row.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }

    let mut columns: Vec<(String, Vec<Value>)> = names
        .into_iter()
        .map(|name| (name, Vec::with_capacity(rows.len())))
        .collect();

    for row in &rows {
        for (name, values) in columns.iter_mut() {
            values.push(match row.get(name) {
                None | Some(serde_json::Value::Null) => Value::Null,
                Some(serde_json::Value::Bool(b)) => Value::Bool(*b),
                Some(serde_json::Value::Number(n)) => {
                    if let Some(i) = n.as_i64() {
                        Value::Int(i)
                    } else {
                        Value::Float(n.as_f64().unwrap_or(f64::NAN))
                    }
                }
                Some(serde_json::Value::String(s)) => Value::Str(s.clone()),
                Some(other) => Value::Str(other.to_string()),
            });
        }
    }

    let table = Table::from_columns(columns)
        .with_context(|| format!("Invalid table shape in {}", path.display()))?;
    Ok(table)
}

/// Writes a table as CSV. Nulls become empty cells.
pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(table.column_names())?;
    for row in 0..table.n_rows() {
        let record: Vec<String> = table
            .iter_columns()
            .map(|column| match &column.values[row] {
                Value::Null => String::new(),
                value => value.string_form(),
            })
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
