//! Baseline predictions CSV
//! (`DATE,COUNTRY,ACTUAL_DEMAND,BASELINE_PREDICTION`).

use std::fs::File;
use std::path::Path;

use crate::domain::{ACTUAL_COL, COUNTRY_COL, DATE_COL, PREDICTION_COL, PredictionRow};
use crate::error::AppError;
use crate::io::{build_header_map, ensure_columns_exist, ensure_parent_dir, fmt_f64, parse_date};

/// Write predictions.
pub fn write_predictions_csv(path: &Path, rows: &[PredictionRow]) -> Result<(), AppError> {
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|e| {
        AppError::schema(format!("Failed to create predictions '{}': {e}", path.display()))
    })?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record([DATE_COL, COUNTRY_COL, ACTUAL_COL, PREDICTION_COL])
        .map_err(|e| AppError::schema(format!("Failed to write predictions header: {e}")))?;
    for row in rows {
        writer
            .write_record([
                row.date.format("%Y-%m-%d").to_string(),
                row.country.clone(),
                fmt_f64(row.actual),
                fmt_f64(row.prediction),
            ])
            .map_err(|e| AppError::schema(format!("Failed to write predictions row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::schema(format!("Failed to flush predictions: {e}")))?;
    Ok(())
}

/// Read predictions back for impact analysis.
pub fn load_predictions_csv(path: &Path) -> Result<Vec<PredictionRow>, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::schema(format!("Failed to open predictions '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);
    let headers = reader
        .headers()
        .map_err(|e| AppError::schema(format!("Failed to read predictions headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);
    ensure_columns_exist(
        &header_map,
        &[DATE_COL, COUNTRY_COL, ACTUAL_COL, PREDICTION_COL],
        "Predictions",
    )?;

    let date_idx = header_map[DATE_COL];
    let country_idx = header_map[COUNTRY_COL];
    let actual_idx = header_map[ACTUAL_COL];
    let pred_idx = header_map[PREDICTION_COL];

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record =
            result.map_err(|e| AppError::schema(format!("Predictions line {line}: {e}")))?;

        let cell = |i: usize, col: &str| -> Result<&str, AppError> {
            record
                .get(i)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    AppError::schema(format!("Predictions line {line}: missing `{col}` value."))
                })
        };

        let date = parse_date(cell(date_idx, DATE_COL)?)
            .map_err(|e| AppError::schema(format!("Predictions line {line}: {e}")))?;
        let country = cell(country_idx, COUNTRY_COL)?.to_string();
        let actual: f64 = cell(actual_idx, ACTUAL_COL)?.parse().map_err(|_| {
            AppError::schema(format!("Predictions line {line}: invalid actual demand."))
        })?;
        let prediction: f64 = cell(pred_idx, PREDICTION_COL)?.parse().map_err(|_| {
            AppError::schema(format!("Predictions line {line}: invalid prediction."))
        })?;

        rows.push(PredictionRow {
            date,
            country,
            actual,
            prediction,
        });
    }

    if rows.is_empty() {
        return Err(AppError::empty("Predictions file contains no rows."));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn round_trip() {
        let rows = vec![PredictionRow {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            country: "US".to_string(),
            actual: 120.0,
            prediction: 101.25,
        }];
        let mut path = std::env::temp_dir();
        path.push(format!("dcast_pred_rt_{}.csv", std::process::id()));
        write_predictions_csv(&path, &rows).unwrap();
        let loaded = load_predictions_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, rows);
    }

    #[test]
    fn missing_prediction_column_rejected() {
        let mut path = std::env::temp_dir();
        path.push(format!("dcast_pred_cols_{}.csv", std::process::id()));
        std::fs::write(&path, "DATE,COUNTRY,ACTUAL_DEMAND\n2024-01-01,DE,5\n").unwrap();
        let err = load_predictions_csv(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains(PREDICTION_COL));
    }
}
