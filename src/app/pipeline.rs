//! Shared stage logic between the per-stage subcommands and `dcast run`.
//!
//! Each function here does the compute for one stage: load inputs, run the
//! core algorithm, return the results. Printing and output-file writing stay
//! in `app.rs` so the workflow code remains testable without touching stdout.

use std::path::Path;

use crate::domain::{CostAssumptions, FeatureFrame};
use crate::error::AppError;
use crate::features::{engineer_features, FeatureReport};
use crate::impact::{compute_impact, summarize_impact, ImpactRow, ImpactSummary};
use crate::io;
use crate::io::raw::RawIngest;
use crate::model::forest::ForestParams;
use crate::report::analysis::{analyze_cv_scores, CvAnalysis};
use crate::train::cross_validation::{run_cross_validation, FoldOutcome};
use crate::train::final_model::{train_final_model, TrainOutput};
use crate::train::predict::{generate_predictions, PredictOutput};

/// Outputs of the feature engineering stage.
#[derive(Debug, Clone)]
pub struct FeaturesOutput {
    pub ingest: RawIngest,
    pub report: FeatureReport,
    pub frame: FeatureFrame,
}

/// Load the raw dataset and build the engineered feature matrix.
pub fn run_features(input: &Path) -> Result<FeaturesOutput, AppError> {
    let ingest = io::load_raw_csv(input)?;
    let (frame, report) = engineer_features(&ingest.rows)?;
    Ok(FeaturesOutput {
        ingest,
        report,
        frame,
    })
}

/// Load features and run the time-series CV loop.
pub fn run_cv(
    input: &Path,
    params: &ForestParams,
    folds: usize,
) -> Result<Vec<FoldOutcome>, AppError> {
    let frame = io::load_features_csv(input)?;
    run_cross_validation(&frame, params, folds)
}

/// Load features and train the final model on the full history.
pub fn run_train(input: &Path, params: &ForestParams) -> Result<TrainOutput, AppError> {
    let frame = io::load_features_csv(input)?;
    train_final_model(&frame, params)
}

/// Load features + the persisted artifact and generate predictions.
pub fn run_predict(input: &Path, model_path: &Path) -> Result<PredictOutput, AppError> {
    let frame = io::load_features_csv(input)?;
    let artifact = io::read_model_json(model_path)?;
    generate_predictions(&frame, &artifact)
}

/// Load predictions and compute per-row + aggregate financial impact.
pub fn run_impact(
    input: &Path,
    costs: &CostAssumptions,
) -> Result<(Vec<ImpactRow>, ImpactSummary), AppError> {
    let predictions = io::load_predictions_csv(input)?;
    let rows = compute_impact(&predictions, costs);
    let summary = summarize_impact(&rows)?;
    Ok((rows, summary))
}

/// Load persisted CV results and classify accuracy/stability.
pub fn run_analyze(input: &Path) -> Result<CvAnalysis, AppError> {
    let scores = io::load_cv_results_csv(input)?;
    analyze_cv_scores(&scores)
}
