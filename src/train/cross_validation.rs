//! Time-series cross-validation of the baseline model.
//!
//! Leakage rules, per fold:
//! - rows are date-sorted before splitting, so test windows are strictly
//!   later than their training window
//! - the one-hot encoder is fit on the training window only; a country that
//!   first appears in the test window encodes to an all-zero block

use chrono::NaiveDate;

use crate::domain::{FeatureFrame, FoldScore};
use crate::error::AppError;
use crate::metrics;
use crate::model::encoder::OneHotEncoder;
use crate::model::forest::{DemandForest, ForestParams};
use crate::model::matrix;
use crate::train::split::time_series_folds;

/// Everything one fold produced (score + context for reporting).
#[derive(Debug, Clone, PartialEq)]
pub struct FoldOutcome {
    pub score: FoldScore,
    pub train_rows: usize,
    pub test_rows: usize,
    pub train_range: (NaiveDate, NaiveDate),
    pub test_range: (NaiveDate, NaiveDate),
}

/// Run the full diagnostic CV loop.
pub fn run_cross_validation(
    frame: &FeatureFrame,
    params: &ForestParams,
    n_splits: usize,
) -> Result<Vec<FoldOutcome>, AppError> {
    let mut frame = frame.clone();
    frame.sort_by_date();

    let numeric = matrix::select_numeric(&frame, &frame.numeric_names)?;
    let countries = frame.countries();
    let targets = frame.targets();

    let folds = time_series_folds(frame.len(), n_splits)?;
    let mut outcomes = Vec::with_capacity(folds.len());

    for fold in folds {
        let train_countries = &countries[fold.train.clone()];
        let test_countries = &countries[fold.test.clone()];

        // Fit the encoder on the training window only.
        let encoder = OneHotEncoder::fit(train_countries);

        let train_x = matrix::hstack(
            &numeric[fold.train.clone()],
            &encoder.transform(train_countries),
        )?;
        let test_x = matrix::hstack(
            &numeric[fold.test.clone()],
            &encoder.transform(test_countries),
        )?;

        let train_y = &targets[fold.train.clone()];
        let test_y = &targets[fold.test.clone()];

        let forest = DemandForest::fit(&train_x, train_y, params)?;
        let predictions = forest.predict(&test_x)?;

        let score = FoldScore {
            fold: fold.fold,
            mae: metrics::mae(test_y, &predictions)?,
            wape: metrics::wape(test_y, &predictions)?,
        };

        outcomes.push(FoldOutcome {
            score,
            train_rows: fold.train.len(),
            test_rows: fold.test.len(),
            train_range: slice_date_range(&frame, fold.train.clone()),
            test_range: slice_date_range(&frame, fold.test.clone()),
        });
    }

    Ok(outcomes)
}

fn slice_date_range(frame: &FeatureFrame, range: std::ops::Range<usize>) -> (NaiveDate, NaiveDate) {
    // Rows are date-sorted, so the slice endpoints are the range.
    (frame.rows[range.start].date, frame.rows[range.end - 1].date)
}
