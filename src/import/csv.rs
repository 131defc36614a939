use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{FitRsError, Result};
use crate::models::DatedMetricSeries;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

/// Reads `date,value` CSV files into a [`DatedMetricSeries`]
///
/// Column names are matched case-insensitively against common variants
/// (`day`, `volume`, `calories`, ...). Rows keep file order.
pub struct SeriesCsvImporter {
    column_mapping: HashMap<String, String>,
}

impl SeriesCsvImporter {
    pub fn new() -> Self {
        let mut column_mapping = HashMap::new();

        Self::add_mapping(
            &mut column_mapping,
            "date",
            &["date", "day", "logged_on", "session_date"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "value",
            &["value", "volume", "total", "calories", "score", "amount"],
        );

        Self { column_mapping }
    }

    fn add_mapping(mapping: &mut HashMap<String, String>, standard: &str, variations: &[&str]) {
        for variation in variations {
            mapping.insert(variation.to_lowercase(), standard.to_string());
        }
    }

    fn normalize_column_name(&self, name: &str) -> String {
        let normalized = name.trim().to_lowercase().replace([' ', '-'], "_");

        self.column_mapping
            .get(&normalized)
            .cloned()
            .unwrap_or(normalized)
    }

    fn parse_date(raw: &str, row: usize) -> Result<NaiveDate> {
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
            .ok_or_else(|| {
                FitRsError::parse(format!("row {}", row), format!("invalid date '{}'", raw))
            })
    }

    fn column_index(&self, headers: &StringRecord, standard: &str) -> Result<usize> {
        headers
            .iter()
            .position(|h| self.normalize_column_name(h) == standard)
            .ok_or_else(|| FitRsError::parse("header", format!("missing '{}' column", standard)))
    }

    /// Read a series from any reader
    pub fn read<R: Read>(&self, reader: R) -> Result<DatedMetricSeries> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let date_idx = self.column_index(&headers, "date")?;
        let value_idx = self.column_index(&headers, "value")?;

        let mut series = DatedMetricSeries::new();
        for (i, record) in csv_reader.records().enumerate() {
            let record = record?;
            // header is line 1
            let row = i + 2;

            let raw_date = record.get(date_idx).unwrap_or_default();
            let raw_value = record.get(value_idx).unwrap_or_default();
            if raw_date.is_empty() && raw_value.is_empty() {
                continue;
            }

            let date = Self::parse_date(raw_date, row)?;
            let value: f64 = raw_value.parse().map_err(|_| {
                FitRsError::parse(format!("row {}", row), format!("invalid value '{}'", raw_value))
            })?;

            series.push(date, value);
        }

        tracing::debug!(points = series.len(), "Series imported from CSV");
        Ok(series)
    }

    /// Read a series from a file path
    pub fn import_file(&self, path: &Path) -> Result<DatedMetricSeries> {
        if !path.exists() {
            return Err(FitRsError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        self.read(File::open(path)?)
    }
}

impl Default for SeriesCsvImporter {
    fn default() -> Self {
        Self::new()
    }
}
