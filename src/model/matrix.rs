//! Design-matrix assembly: numeric feature selection + one-hot blocks.
//!
//! Column selection is name-driven and validated by set difference, so a
//! feature file that lost a column fails loudly instead of training or
//! predicting against silently shifted columns.

use crate::domain::{COUNTRY_COL, FeatureFrame};
use crate::error::AppError;
use crate::model::encoder::OneHotEncoder;

/// Select named numeric columns from the frame, in the order given.
///
/// Errors list every missing column at once (set difference), matching the
/// artifact schema check performed before prediction.
pub fn select_numeric(frame: &FeatureFrame, names: &[String]) -> Result<Vec<Vec<f64>>, AppError> {
    let mut indices = Vec::with_capacity(names.len());
    let mut missing = Vec::new();
    for name in names {
        match frame.column_index(name) {
            Some(idx) => indices.push(idx),
            None => missing.push(name.clone()),
        }
    }
    if !missing.is_empty() {
        return Err(AppError::schema(format!(
            "Feature mismatch: missing numeric columns {missing:?}."
        )));
    }

    Ok(frame
        .rows
        .iter()
        .map(|row| indices.iter().map(|&i| row.numeric[i]).collect())
        .collect())
}

/// Validate that the requested categorical columns are all available.
///
/// The feature matrix carries exactly one categorical column (`COUNTRY`);
/// an artifact that records anything else came from an incompatible schema.
pub fn check_categorical(names: &[String]) -> Result<(), AppError> {
    let missing: Vec<&String> = names.iter().filter(|n| n.as_str() != COUNTRY_COL).collect();
    if !missing.is_empty() {
        return Err(AppError::schema(format!(
            "Feature mismatch: missing categorical columns {missing:?}."
        )));
    }
    Ok(())
}

/// Horizontally stack numeric rows with encoded categorical blocks.
pub fn hstack(numeric: &[Vec<f64>], encoded: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, AppError> {
    if numeric.len() != encoded.len() {
        return Err(AppError::model(format!(
            "Cannot stack {} numeric rows with {} encoded rows.",
            numeric.len(),
            encoded.len()
        )));
    }
    Ok(numeric
        .iter()
        .zip(encoded)
        .map(|(num, cat)| {
            let mut row = Vec::with_capacity(num.len() + cat.len());
            row.extend_from_slice(num);
            row.extend_from_slice(cat);
            row
        })
        .collect())
}

/// Build the full design matrix for the frame using a fitted encoder.
pub fn design_matrix(
    frame: &FeatureFrame,
    numeric_features: &[String],
    categorical_features: &[String],
    encoder: &OneHotEncoder,
) -> Result<Vec<Vec<f64>>, AppError> {
    check_categorical(categorical_features)?;
    let numeric = select_numeric(frame, numeric_features)?;
    let encoded = encoder.transform(&frame.countries());
    hstack(&numeric, &encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeatureRow;
    use chrono::NaiveDate;

    fn frame() -> FeatureFrame {
        let mk = |country: &str, a: f64, b: f64| FeatureRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            country: country.to_string(),
            target: 0.0,
            numeric: vec![a, b],
        };
        FeatureFrame {
            numeric_names: vec!["A".to_string(), "B".to_string()],
            rows: vec![mk("DE", 1.0, 2.0), mk("FR", 3.0, 4.0)],
        }
    }

    #[test]
    fn select_preserves_requested_order() {
        let f = frame();
        let m = select_numeric(&f, &["B".to_string(), "A".to_string()]).unwrap();
        assert_eq!(m, vec![vec![2.0, 1.0], vec![4.0, 3.0]]);
    }

    #[test]
    fn missing_columns_reported_together() {
        let f = frame();
        let err = select_numeric(&f, &["A".to_string(), "X".to_string(), "Y".to_string()])
            .unwrap_err()
            .to_string();
        assert!(err.contains("X") && err.contains("Y"), "got: {err}");
    }

    #[test]
    fn design_matrix_appends_onehot_block() {
        let f = frame();
        let enc = OneHotEncoder::fit(&f.countries());
        let m = design_matrix(
            &f,
            &["A".to_string(), "B".to_string()],
            &[COUNTRY_COL.to_string()],
            &enc,
        )
        .unwrap();
        assert_eq!(m, vec![vec![1.0, 2.0, 1.0, 0.0], vec![3.0, 4.0, 0.0, 1.0]]);
    }

    #[test]
    fn unsupported_categorical_rejected() {
        assert!(check_categorical(&["REGION".to_string()]).is_err());
    }
}
