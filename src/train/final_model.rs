//! Final (production) baseline model training.
//!
//! Unlike the CV diagnostic, the final model sees the full history: the
//! encoder and the forest are both fit on every row, and the fitted pair is
//! bundled with the exact feature column ordering into the persistable
//! artifact.

use chrono::NaiveDate;

use crate::domain::{FeatureFrame, categorical_feature_names};
use crate::error::AppError;
use crate::model::artifact::ModelArtifact;
use crate::model::encoder::OneHotEncoder;
use crate::model::forest::{DemandForest, ForestParams};
use crate::model::matrix;

/// Training output: the artifact plus context for reporting.
#[derive(Debug, Clone)]
pub struct TrainOutput {
    pub artifact: ModelArtifact,
    pub rows: usize,
    pub date_range: (NaiveDate, NaiveDate),
    pub feature_width: usize,
}

/// Train the final baseline model on the full feature history.
pub fn train_final_model(frame: &FeatureFrame, params: &ForestParams) -> Result<TrainOutput, AppError> {
    let mut frame = frame.clone();
    frame.sort_by_date();

    let date_range = frame
        .date_range()
        .ok_or_else(|| AppError::empty("Feature matrix contains no rows."))?;

    let numeric_features = frame.numeric_names.clone();
    let categorical_features = categorical_feature_names();

    let encoder = OneHotEncoder::fit(&frame.countries());
    let x = matrix::design_matrix(&frame, &numeric_features, &categorical_features, &encoder)?;
    let y = frame.targets();

    let forest = DemandForest::fit(&x, &y, params)?;
    let feature_width = forest.n_features();

    Ok(TrainOutput {
        artifact: ModelArtifact::new(forest, encoder, numeric_features, categorical_features),
        rows: frame.len(),
        date_range,
        feature_width,
    })
}
