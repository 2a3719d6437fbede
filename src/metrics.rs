//! Forecast accuracy metrics.
//!
//! - MAE: mean absolute error
//! - WAPE: weighted absolute percentage error,
//!   `Σ|actual - predicted| / Σ|actual|`
//!
//! Both are computed over paired slices; callers guarantee equal lengths via
//! the pipeline structure, but we still validate to fail loudly on bugs.

use crate::error::AppError;

/// Mean absolute error.
pub fn mae(actual: &[f64], predicted: &[f64]) -> Result<f64, AppError> {
    check_pairs(actual, predicted)?;
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum();
    Ok(sum / actual.len() as f64)
}

/// Weighted absolute percentage error.
///
/// Returns an error when `Σ|actual|` is zero, since the ratio is undefined.
pub fn wape(actual: &[f64], predicted: &[f64]) -> Result<f64, AppError> {
    check_pairs(actual, predicted)?;
    let abs_err: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum();
    let abs_actual: f64 = actual.iter().map(|a| a.abs()).sum();
    if abs_actual == 0.0 {
        return Err(AppError::model("WAPE undefined: sum of |actual| is zero."));
    }
    Ok(abs_err / abs_actual)
}

fn check_pairs(actual: &[f64], predicted: &[f64]) -> Result<(), AppError> {
    if actual.is_empty() {
        return Err(AppError::empty("Cannot compute a metric over zero rows."));
    }
    if actual.len() != predicted.len() {
        return Err(AppError::model(format!(
            "Metric length mismatch: {} actuals vs {} predictions.",
            actual.len(),
            predicted.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wape_matches_reference_case() {
        // true=[100,100], pred=[90,110] -> (10+10)/200 = 0.10
        let w = wape(&[100.0, 100.0], &[90.0, 110.0]).unwrap();
        assert!((w - 0.10).abs() < 1e-12);
    }

    #[test]
    fn mae_basic() {
        let m = mae(&[1.0, 2.0, 3.0], &[2.0, 2.0, 1.0]).unwrap();
        assert!((m - 1.0).abs() < 1e-12);
    }

    #[test]
    fn wape_rejects_zero_actuals() {
        assert!(wape(&[0.0, 0.0], &[1.0, 1.0]).is_err());
    }

    #[test]
    fn metrics_reject_length_mismatch() {
        assert!(mae(&[1.0], &[1.0, 2.0]).is_err());
    }
}
