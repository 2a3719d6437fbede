//! Per-fold cross-validation results CSV (`fold,mae,wape`).
//!
//! The analyzer consumes this file and refuses to interpret anything with an
//! unexpected structure, so the reader validates the exact column set and
//! rejects non-finite values outright.

use std::fs::File;
use std::path::Path;

use crate::domain::FoldScore;
use crate::error::AppError;
use crate::io::{build_header_map, ensure_columns_exist, ensure_parent_dir, fmt_f64};

pub const FOLD_COL: &str = "fold";
pub const MAE_COL: &str = "mae";
pub const WAPE_COL: &str = "wape";

/// Write fold scores.
pub fn write_cv_results_csv(path: &Path, scores: &[FoldScore]) -> Result<(), AppError> {
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|e| {
        AppError::schema(format!("Failed to create CV results '{}': {e}", path.display()))
    })?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record([FOLD_COL, MAE_COL, WAPE_COL])
        .map_err(|e| AppError::schema(format!("Failed to write CV results header: {e}")))?;
    for score in scores {
        writer
            .write_record([
                score.fold.to_string(),
                fmt_f64(score.mae),
                fmt_f64(score.wape),
            ])
            .map_err(|e| AppError::schema(format!("Failed to write CV results row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::schema(format!("Failed to flush CV results: {e}")))?;
    Ok(())
}

/// Read and validate fold scores.
pub fn load_cv_results_csv(path: &Path) -> Result<Vec<FoldScore>, AppError> {
    if !path.exists() {
        return Err(AppError::schema(format!(
            "CV results not found at '{}'. Run the `cv` stage first.",
            path.display()
        )));
    }
    let file = File::open(path).map_err(|e| {
        AppError::schema(format!("Failed to open CV results '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);
    let headers = reader
        .headers()
        .map_err(|e| AppError::schema(format!("Failed to read CV results headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);
    ensure_columns_exist(&header_map, &[FOLD_COL, MAE_COL, WAPE_COL], "CV results")?;

    let fold_idx = header_map[FOLD_COL];
    let mae_idx = header_map[MAE_COL];
    let wape_idx = header_map[WAPE_COL];

    let mut scores = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record =
            result.map_err(|e| AppError::schema(format!("CV results line {line}: {e}")))?;

        let cell = |i: usize, col: &str| -> Result<&str, AppError> {
            record
                .get(i)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    AppError::schema(format!("CV results line {line}: missing `{col}` value."))
                })
        };

        let fold: usize = cell(fold_idx, FOLD_COL)?.parse().map_err(|_| {
            AppError::schema(format!("CV results line {line}: invalid fold number."))
        })?;
        let mae: f64 = cell(mae_idx, MAE_COL)?
            .parse()
            .map_err(|_| AppError::schema(format!("CV results line {line}: invalid mae.")))?;
        let wape: f64 = cell(wape_idx, WAPE_COL)?
            .parse()
            .map_err(|_| AppError::schema(format!("CV results line {line}: invalid wape.")))?;
        if !mae.is_finite() || !wape.is_finite() {
            return Err(AppError::schema(format!(
                "CV results line {line}: non-finite metric value."
            )));
        }

        scores.push(FoldScore { fold, mae, wape });
    }

    if scores.is_empty() {
        return Err(AppError::empty("CV results file contains no folds."));
    }
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(tag: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("dcast_cv_{tag}_{}.csv", std::process::id()));
        path
    }

    #[test]
    fn round_trip() {
        let scores = vec![
            FoldScore { fold: 1, mae: 12.5, wape: 0.012 },
            FoldScore { fold: 2, mae: 14.0, wape: 0.015 },
        ];
        let path = temp_path("rt");
        write_cv_results_csv(&path, &scores).unwrap();
        let loaded = load_cv_results_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, scores);
    }

    #[test]
    fn missing_file_points_at_cv_stage() {
        let err = load_cv_results_csv(Path::new("/nonexistent/dcast_cv.csv")).unwrap_err();
        assert!(err.to_string().contains("cv"));
    }

    #[test]
    fn nan_values_rejected() {
        let path = temp_path("nan");
        std::fs::write(&path, "fold,mae,wape\n1,NaN,0.1\n").unwrap();
        let err = load_cv_results_csv(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("non-finite"));
    }

    #[test]
    fn wrong_columns_rejected() {
        let path = temp_path("cols");
        std::fs::write(&path, "fold,rmse\n1,2.0\n").unwrap();
        let err = load_cv_results_csv(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("mae"));
    }
}
