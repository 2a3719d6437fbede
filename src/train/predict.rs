//! Baseline prediction generation from a persisted artifact.
//!
//! Inference never refits anything: the artifact's encoder and recorded
//! column ordering are applied as-is, and a feature file that lost a column
//! the model was trained on is rejected before any prediction is made.

use chrono::NaiveDate;

use crate::domain::{FeatureFrame, PredictionRow};
use crate::error::AppError;
use crate::model::artifact::ModelArtifact;
use crate::model::matrix;

/// Prediction output plus reporting context.
#[derive(Debug, Clone)]
pub struct PredictOutput {
    pub rows: Vec<PredictionRow>,
    pub date_range: (NaiveDate, NaiveDate),
    pub feature_width: usize,
}

/// Apply the trained artifact to the feature matrix.
pub fn generate_predictions(
    frame: &FeatureFrame,
    artifact: &ModelArtifact,
) -> Result<PredictOutput, AppError> {
    let mut frame = frame.clone();
    frame.sort_by_date();

    let date_range = frame
        .date_range()
        .ok_or_else(|| AppError::empty("Feature matrix contains no rows."))?;

    // Schema safety: the artifact's recorded columns decide the layout.
    let x = matrix::design_matrix(
        &frame,
        &artifact.numeric_features,
        &artifact.categorical_features,
        &artifact.encoder,
    )?;

    let predictions = artifact.model.predict(&x)?;

    let rows = frame
        .rows
        .iter()
        .zip(&predictions)
        .map(|(row, &prediction)| PredictionRow {
            date: row.date,
            country: row.country.clone(),
            actual: row.target,
            prediction,
        })
        .collect();

    Ok(PredictOutput {
        rows,
        date_range,
        feature_width: artifact.model.n_features(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeatureRow;
    use crate::model::forest::ForestParams;
    use crate::train::final_model::train_final_model;

    fn frame() -> FeatureFrame {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let rows = (0..40u64)
            .map(|i| FeatureRow {
                date: start + chrono::Days::new(i),
                country: if i % 2 == 0 { "DE" } else { "FR" }.to_string(),
                target: 100.0 + i as f64,
                numeric: vec![i as f64, (i * i) as f64],
            })
            .collect();
        FeatureFrame {
            numeric_names: vec!["T".to_string(), "T2".to_string()],
            rows,
        }
    }

    fn trained() -> ModelArtifact {
        train_final_model(
            &frame(),
            &ForestParams {
                n_trees: 10,
                max_depth: 5,
                min_samples_leaf: 2,
                seed: 42,
            },
        )
        .unwrap()
        .artifact
    }

    #[test]
    fn predictions_align_with_rows() {
        let out = generate_predictions(&frame(), &trained()).unwrap();
        assert_eq!(out.rows.len(), 40);
        assert!(out.rows.iter().all(|r| r.prediction.is_finite()));
        // Date-sorted output.
        for pair in out.rows.windows(2) {
            assert!(pair[0].date <= pair[1].date);
        }
    }

    #[test]
    fn missing_trained_column_is_rejected() {
        let artifact = trained();
        let mut crippled = frame();
        // Drop the T2 column the model was trained on.
        crippled.numeric_names = vec!["T".to_string()];
        for row in &mut crippled.rows {
            row.numeric.truncate(1);
        }
        let err = generate_predictions(&crippled, &artifact).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("T2"));
    }

    #[test]
    fn unknown_country_predicts_without_reordering() {
        let artifact = trained();
        let mut shifted = frame();
        for row in &mut shifted.rows {
            if row.country == "FR" {
                // A country never seen at fit time.
                row.country = "US".to_string();
            }
        }
        // Succeeds: unknown levels encode to all-zero blocks.
        let out = generate_predictions(&shifted, &artifact).unwrap();
        assert_eq!(out.rows.len(), 40);

        // DE rows keep the exact encoding they had at training time, so
        // their predictions are unchanged by the US rows.
        let baseline = generate_predictions(&frame(), &artifact).unwrap();
        for (a, b) in out.rows.iter().zip(&baseline.rows) {
            if a.country == "DE" {
                assert_eq!(a.prediction, b.prediction);
            }
        }
    }
}
