//! Engineered feature matrix CSV.
//!
//! Layout: `DATE,COUNTRY,TOTAL_PRODUCT_DEMAND,<numeric features...>`.
//! Readers are header-driven: every column that is not a key or the target
//! is treated as a numeric feature, in header order, so the artifact's
//! recorded column lists (not file position) decide what feeds the model.
//!
//! Unlike the raw dataset, the feature matrix contract is "no missing
//! values": an empty or invalid numeric cell here is a hard error.

use std::fs::File;
use std::path::Path;

use crate::domain::{COUNTRY_COL, DATE_COL, FeatureFrame, FeatureRow, TARGET_COL};
use crate::error::AppError;
use crate::io::{
    build_header_map, ensure_columns_exist, ensure_parent_dir, fmt_f64, normalize_header_name,
    parse_date, parse_f64,
};

/// Write the feature matrix.
pub fn write_features_csv(path: &Path, frame: &FeatureFrame) -> Result<(), AppError> {
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|e| {
        AppError::schema(format!(
            "Failed to create feature matrix '{}': {e}",
            path.display()
        ))
    })?;
    let mut writer = csv::Writer::from_writer(file);

    let mut header: Vec<&str> = vec![DATE_COL, COUNTRY_COL, TARGET_COL];
    header.extend(frame.numeric_names.iter().map(String::as_str));
    writer
        .write_record(&header)
        .map_err(|e| AppError::schema(format!("Failed to write feature CSV header: {e}")))?;

    for row in &frame.rows {
        let mut record = Vec::with_capacity(3 + row.numeric.len());
        record.push(row.date.format("%Y-%m-%d").to_string());
        record.push(row.country.clone());
        record.push(fmt_f64(row.target));
        record.extend(row.numeric.iter().copied().map(fmt_f64));
        writer
            .write_record(&record)
            .map_err(|e| AppError::schema(format!("Failed to write feature CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::schema(format!("Failed to flush feature CSV: {e}")))?;
    Ok(())
}

/// Load the feature matrix.
pub fn load_features_csv(path: &Path) -> Result<FeatureFrame, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::schema(format!(
            "Failed to open feature matrix '{}': {e}",
            path.display()
        ))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::schema(format!("Failed to read feature CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);
    ensure_columns_exist(&header_map, &[DATE_COL, COUNTRY_COL, TARGET_COL], "Feature matrix")?;

    // Numeric columns: everything that is not a key or target, in header order.
    let mut numeric_names = Vec::new();
    let mut numeric_idx = Vec::new();
    for (idx, name) in headers.iter().enumerate() {
        let name = normalize_header_name(name);
        if name == DATE_COL || name == COUNTRY_COL || name == TARGET_COL {
            continue;
        }
        numeric_names.push(name);
        numeric_idx.push(idx);
    }
    if numeric_names.is_empty() {
        return Err(AppError::schema(
            "Feature matrix has no numeric feature columns.",
        ));
    }

    let date_idx = header_map[DATE_COL];
    let country_idx = header_map[COUNTRY_COL];
    let target_idx = header_map[TARGET_COL];

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record =
            result.map_err(|e| AppError::schema(format!("Feature CSV line {line}: {e}")))?;

        let cell = |i: usize, col: &str| -> Result<&str, AppError> {
            record
                .get(i)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    AppError::schema(format!("Feature CSV line {line}: missing `{col}` value."))
                })
        };

        let date = parse_date(cell(date_idx, DATE_COL)?)
            .map_err(|e| AppError::schema(format!("Feature CSV line {line}: {e}")))?;
        let country = cell(country_idx, COUNTRY_COL)?.to_string();
        let target = parse_f64(cell(target_idx, TARGET_COL)?, TARGET_COL)
            .map_err(|e| AppError::schema(format!("Feature CSV line {line}: {e}")))?;

        let mut numeric = Vec::with_capacity(numeric_idx.len());
        for (&i, name) in numeric_idx.iter().zip(&numeric_names) {
            let v = parse_f64(cell(i, name)?, name)
                .map_err(|e| AppError::schema(format!("Feature CSV line {line}: {e}")))?;
            numeric.push(v);
        }

        rows.push(FeatureRow {
            date,
            country,
            target,
            numeric,
        });
    }

    if rows.is_empty() {
        return Err(AppError::empty("Feature matrix contains no rows."));
    }

    Ok(FeatureFrame {
        numeric_names,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn temp_path(tag: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("dcast_features_{tag}_{}.csv", std::process::id()));
        path
    }

    fn small_frame() -> FeatureFrame {
        FeatureFrame {
            numeric_names: vec!["A".to_string(), "B".to_string()],
            rows: vec![
                FeatureRow {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    country: "DE".to_string(),
                    target: 1200.0,
                    numeric: vec![1.5, -2.25],
                },
                FeatureRow {
                    date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                    country: "FR".to_string(),
                    target: 900.5,
                    numeric: vec![0.000001, 42.0],
                },
            ],
        }
    }

    #[test]
    fn round_trip_preserves_frame() {
        let frame = small_frame();
        let path = temp_path("rt");
        write_features_csv(&path, &frame).unwrap();
        let loaded = load_features_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, frame);
    }

    #[test]
    fn writing_twice_is_byte_identical() {
        let frame = small_frame();
        let a = temp_path("idem_a");
        let b = temp_path("idem_b");
        write_features_csv(&a, &frame).unwrap();
        write_features_csv(&b, &frame).unwrap();
        let bytes_a = std::fs::read(&a).unwrap();
        let bytes_b = std::fs::read(&b).unwrap();
        std::fs::remove_file(&a).ok();
        std::fs::remove_file(&b).ok();
        assert_eq!(bytes_a, bytes_b);
    }

    #[test]
    fn empty_numeric_cell_is_a_hard_error() {
        let path = temp_path("hole");
        std::fs::write(&path, "DATE,COUNTRY,TOTAL_PRODUCT_DEMAND,A\n2024-01-01,DE,10,\n").unwrap();
        let err = load_features_csv(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("A"));
    }

    #[test]
    fn missing_target_column_rejected() {
        let path = temp_path("notarget");
        std::fs::write(&path, "DATE,COUNTRY,A\n2024-01-01,DE,1\n").unwrap();
        let err = load_features_csv(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains(TARGET_COL));
    }
}
