//! Raw training dataset CSV: ingest with row-level validation, plus the
//! writer used by the synthetic sample generator.
//!
//! Ingest is strict about schema (all required columns must exist) but
//! tolerant about rows: a malformed row is recorded and skipped rather than
//! aborting the run. Empty numeric cells are legal and survive as `None`
//! (they mark undefined lag/rolling windows and are dropped later by feature
//! cleanup).

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{COUNTRY_COL, DATE_COL, RAW_NUMERIC_COLS, RawRow, TARGET_COL};
use crate::error::AppError;
use crate::io::{
    RowError, build_header_map, ensure_columns_exist, ensure_parent_dir, fmt_f64, get_cell,
    parse_date, parse_f64,
};

/// Ingest output: parsed rows + whatever went wrong at row level.
#[derive(Debug, Clone)]
pub struct RawIngest {
    pub rows: Vec<RawRow>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load and validate the raw training dataset.
pub fn load_raw_csv(path: &Path) -> Result<RawIngest, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::schema(format!("Failed to open raw dataset '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::schema(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let mut required: Vec<&str> = vec![DATE_COL, COUNTRY_COL, TARGET_COL];
    required.extend_from_slice(&RAW_NUMERIC_COLS);
    ensure_columns_exist(&header_map, &required, "Raw dataset")?;

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // 1-based CSV line numbers, +1 for the header row.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_raw_row(&record, &header_map) {
            Ok(row) => rows.push(row),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if rows.is_empty() {
        return Err(AppError::empty("Raw dataset contains no parseable rows."));
    }

    Ok(RawIngest {
        rows,
        row_errors,
        rows_read,
    })
}

fn parse_raw_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<RawRow, String> {
    let date = parse_date(
        get_cell(record, header_map, DATE_COL).ok_or_else(|| format!("Missing `{DATE_COL}` value."))?,
    )?;
    let country = get_cell(record, header_map, COUNTRY_COL)
        .ok_or_else(|| format!("Missing `{COUNTRY_COL}` value."))?
        .to_string();

    let opt = |name: &str| -> Result<Option<f64>, String> {
        match get_cell(record, header_map, name) {
            Some(s) => parse_f64(s, name).map(Some),
            None => Ok(None),
        }
    };

    Ok(RawRow {
        date,
        country,
        economic_index: opt("ECONOMIC_INDEX")?,
        inflation_rate: opt("INFLATION_RATE")?,
        unemployment_rate: opt("UNEMPLOYMENT_RATE")?,
        baseline_demand: opt("BASELINE_DEMAND")?,
        total_spend: opt("TOTAL_SPEND")?,
        total_channel_response: opt("TOTAL_CHANNEL_RESPONSE")?,
        total_product_demand: opt(TARGET_COL)?,
        spend_lag_7: opt("SPEND_LAG_7")?,
        spend_lag_14: opt("SPEND_LAG_14")?,
        demand_rolling_7: opt("DEMAND_ROLLING_7")?,
        demand_rolling_14: opt("DEMAND_ROLLING_14")?,
    })
}

/// Write a raw dataset CSV (synthetic sample output).
pub fn write_raw_csv(path: &Path, rows: &[RawRow]) -> Result<(), AppError> {
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|e| {
        AppError::schema(format!("Failed to create raw dataset '{}': {e}", path.display()))
    })?;
    let mut writer = csv::Writer::from_writer(file);

    let mut header: Vec<&str> = vec![DATE_COL, COUNTRY_COL, TARGET_COL];
    header.extend_from_slice(&RAW_NUMERIC_COLS);
    writer
        .write_record(&header)
        .map_err(|e| AppError::schema(format!("Failed to write raw CSV header: {e}")))?;

    let cell = |v: Option<f64>| v.map(fmt_f64).unwrap_or_default();
    for row in rows {
        let record = vec![
            row.date.format("%Y-%m-%d").to_string(),
            row.country.clone(),
            cell(row.total_product_demand),
            cell(row.economic_index),
            cell(row.inflation_rate),
            cell(row.unemployment_rate),
            cell(row.baseline_demand),
            cell(row.total_spend),
            cell(row.total_channel_response),
            cell(row.spend_lag_7),
            cell(row.spend_lag_14),
            cell(row.demand_rolling_7),
            cell(row.demand_rolling_14),
        ];
        writer
            .write_record(&record)
            .map_err(|e| AppError::schema(format!("Failed to write raw CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::schema(format!("Failed to flush raw CSV: {e}")))?;
    Ok(())
}
