//! Optional per-row financial impact CSV export.
//!
//! Column names mirror the prediction file plus the derived impact columns,
//! so the export drops straight into downstream reporting.

use std::fs::File;
use std::path::Path;

use crate::domain::{ACTUAL_COL, COUNTRY_COL, DATE_COL, PREDICTION_COL};
use crate::error::AppError;
use crate::impact::ImpactRow;
use crate::io::{ensure_parent_dir, fmt_f64};

pub fn write_impact_csv(path: &Path, rows: &[ImpactRow]) -> Result<(), AppError> {
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|e| {
        AppError::schema(format!("Failed to create impact CSV '{}': {e}", path.display()))
    })?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record([
            DATE_COL,
            COUNTRY_COL,
            ACTUAL_COL,
            PREDICTION_COL,
            "FORECAST_ERROR",
            "UNDER_FORECAST_UNITS",
            "OVER_FORECAST_UNITS",
            "UNDER_FORECAST_COST_$",
            "OVER_FORECAST_COST_$",
            "TOTAL_FORECAST_COST_$",
        ])
        .map_err(|e| AppError::schema(format!("Failed to write impact CSV header: {e}")))?;

    for row in rows {
        writer
            .write_record([
                row.date.format("%Y-%m-%d").to_string(),
                row.country.clone(),
                fmt_f64(row.actual),
                fmt_f64(row.prediction),
                fmt_f64(row.forecast_error),
                fmt_f64(row.under_units),
                fmt_f64(row.over_units),
                fmt_f64(row.under_cost),
                fmt_f64(row.over_cost),
                fmt_f64(row.total_cost),
            ])
            .map_err(|e| AppError::schema(format!("Failed to write impact CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::schema(format!("Failed to flush impact CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CostAssumptions, PredictionRow};
    use crate::impact::compute_impact;
    use chrono::NaiveDate;

    #[test]
    fn export_contains_derived_columns() {
        let rows = compute_impact(
            &[PredictionRow {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                country: "DE".to_string(),
                actual: 120.0,
                prediction: 100.0,
            }],
            &CostAssumptions::default(),
        );
        let mut path = std::env::temp_dir();
        path.push(format!("dcast_impact_{}.csv", std::process::id()));
        write_impact_csv(&path, &rows).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(content.contains("TOTAL_FORECAST_COST_$"));
        assert!(content.contains("1600"));
    }
}
