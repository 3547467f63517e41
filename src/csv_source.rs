//! Minimal CSV ingestion for the CLI.
//!
//! Hand-rolled rather than pulling in a dedicated parsing crate for a small,
//! fully-controlled format. It is intentionally not a general CSV
//! implementation: no quoted-field escaping beyond a literal `"..."` wrapper,
//! no configurable delimiters.

use crate::attribute::{Attribute, NumericKind};
use crate::dataset::{Dataset, Row};
use crate::error::RipperError;
use std::fs;
use std::path::Path;

/// A source of labeled tabular data, the seam a CLI or embedding application
/// implements to feed training/prediction data from wherever it lives.
pub trait DatasetSource {
    fn load(&self) -> Result<Dataset, RipperError>;
}

/// Reads a comma-separated file with a header row naming the columns. The
/// class column must be present in the header; every other column's type
/// (discrete vs continuous) is inferred from its values.
pub struct CsvSource {
    pub path: std::path::PathBuf,
    pub class_column: String,
}

impl CsvSource {
    pub fn new(path: impl AsRef<Path>, class_column: impl Into<String>) -> Self {
        CsvSource { path: path.as_ref().to_path_buf(), class_column: class_column.into() }
    }
}

impl DatasetSource for CsvSource {
    fn load(&self) -> Result<Dataset, RipperError> {
        let text = fs::read_to_string(&self.path)?;
        let mut lines = text.lines();
        let header = lines.next().ok_or_else(|| RipperError::Codec("empty CSV file".into()))?;
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();

        let class_idx = columns
            .iter()
            .position(|c| *c == self.class_column)
            .ok_or_else(|| RipperError::Codec(format!("class column {:?} not found in header", self.class_column)))?;

        let records: Vec<Vec<String>> = lines
            .filter(|l| !l.trim().is_empty())
            .map(|l| split_csv_line(l))
            .collect();

        let mut order: Vec<usize> = (0..columns.len()).collect();
        order.swap(0, class_idx); // move the class column to schema position 0
        let reordered_names: Vec<&str> = order.iter().map(|&i| columns[i]).collect();

        let schema = infer_schema(&reordered_names, &records, &order);

        let mut rows = Vec::with_capacity(records.len());
        for record in &records {
            let mut values = Vec::with_capacity(order.len());
            for (col_pos, &orig_idx) in order.iter().enumerate() {
                let raw = record.get(orig_idx).map(String::as_str).unwrap_or("?");
                values.push(encode_cell(&schema[col_pos], raw));
            }
            rows.push(Row::new(values));
        }

        Ok(Dataset::new(schema, rows))
    }
}

fn infer_schema(names: &[&str], records: &[Vec<String>], order: &[usize]) -> Vec<Attribute> {
    names
        .iter()
        .enumerate()
        .map(|(col_pos, &name)| {
            let orig_idx = order[col_pos];
            let values: Vec<&str> = records.iter().filter_map(|r| r.get(orig_idx)).map(String::as_str).filter(|v| *v != "?").collect();
            if !values.is_empty() && values.iter().all(|v| v.parse::<f64>().is_ok()) {
                Attribute::continuous(name, NumericKind::Float)
            } else {
                let mut domain = Vec::new();
                for v in values {
                    if !domain.iter().any(|d: &String| d == v) {
                        domain.push(v.to_string());
                    }
                }
                Attribute::discrete(name, domain)
            }
        })
        .collect()
}

fn encode_cell(attr: &Attribute, raw: &str) -> f64 {
    if raw == "?" {
        return f64::NAN;
    }
    match attr {
        Attribute::Discrete { .. } => attr.index_of(raw).map(|i| i as f64).unwrap_or(f64::NAN),
        Attribute::Continuous { .. } => raw.parse().unwrap_or(f64::NAN),
    }
}

fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            other => current.push(other),
        }
    }
    fields.push(current);
    fields.iter().map(|f| f.trim().to_string()).collect()
}
