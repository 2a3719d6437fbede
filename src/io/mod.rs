//! File IO for every stage boundary.
//!
//! - `raw`: raw training dataset CSV (read + write)
//! - `features`: engineered feature matrix CSV (read + write)
//! - `cv_results`: per-fold CV scores CSV (read + write)
//! - `predictions`: baseline predictions CSV (read + write)
//! - `impact`: per-row financial impact CSV (write only)
//! - `artifact`: model bundle JSON (read + write)
//!
//! All readers are header-driven: columns are located by (case-preserving)
//! name, never by position, and missing columns are reported by set
//! difference.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::error::AppError;

pub mod artifact;
pub mod cv_results;
pub mod features;
pub mod impact;
pub mod predictions;
pub mod raw;

pub use artifact::*;
pub use cv_results::*;
pub use features::*;
pub use impact::*;
pub use predictions::*;
pub use raw::*;

/// A row-level problem encountered while reading a CSV file.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

pub(crate) fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

pub(crate) fn normalize_header_name(name: &str) -> String {
    // Strip a possible UTF-8 BOM on the first header; spreadsheet exports
    // produce these and they would otherwise break schema validation.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

/// Report every missing required column at once.
pub(crate) fn ensure_columns_exist(
    header_map: &HashMap<String, usize>,
    required: &[&str],
    file_label: &str,
) -> Result<(), AppError> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|c| !header_map.contains_key(*c))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::schema(format!(
            "{file_label}: missing required columns {missing:?}."
        )));
    }
    Ok(())
}

pub(crate) fn get_cell<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // ISO is canonical, but warehouse exports commonly use day-first forms.
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD."
    ))
}

pub(crate) fn parse_f64(s: &str, col: &str) -> Result<f64, String> {
    let v: f64 = s
        .parse()
        .map_err(|_| format!("Invalid numeric value '{s}' in `{col}`."))?;
    if !v.is_finite() {
        return Err(format!("Non-finite value '{s}' in `{col}`."));
    }
    Ok(v)
}

/// Deterministic float formatting for CSV output (shortest round-trip form).
pub(crate) fn fmt_f64(v: f64) -> String {
    format!("{v}")
}

/// Create the parent directory for an output file, mirroring the
/// `mkdir -p` behavior every stage relies on.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::schema(format!(
                    "Failed to create directory '{}': {e}",
                    parent.display()
                ))
            })?;
        }
    }
    Ok(())
}
