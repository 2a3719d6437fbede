//! Core row/frame types shared by the pipeline stages.
//!
//! These are intentionally lightweight and serializable so they can be:
//!
//! - used in-memory by the feature/training/prediction stages
//! - written to and re-read from the stage CSV files
//! - embedded in reports

use std::env;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the raw training dataset.
///
/// Numeric cells are optional: the upstream extract leaves lag/rolling cells
/// empty at the start of each country's history. Cleanup drops any row with a
/// missing value before the matrix is written.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub date: NaiveDate,
    pub country: String,
    pub economic_index: Option<f64>,
    pub inflation_rate: Option<f64>,
    pub unemployment_rate: Option<f64>,
    pub baseline_demand: Option<f64>,
    pub total_spend: Option<f64>,
    pub total_channel_response: Option<f64>,
    pub total_product_demand: Option<f64>,
    pub spend_lag_7: Option<f64>,
    pub spend_lag_14: Option<f64>,
    pub demand_rolling_7: Option<f64>,
    pub demand_rolling_14: Option<f64>,
}

impl RawRow {
    /// All numeric cells in raw-schema order, target last.
    pub fn numeric_cells(&self) -> [Option<f64>; 11] {
        [
            self.economic_index,
            self.inflation_rate,
            self.unemployment_rate,
            self.baseline_demand,
            self.total_spend,
            self.total_channel_response,
            self.spend_lag_7,
            self.spend_lag_14,
            self.demand_rolling_7,
            self.demand_rolling_14,
            self.total_product_demand,
        ]
    }

    /// True when every numeric cell is present.
    pub fn is_complete(&self) -> bool {
        self.numeric_cells().iter().all(Option::is_some)
    }
}

/// One row of the engineered feature matrix.
///
/// `numeric` is parallel to the owning frame's `numeric_names`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub date: NaiveDate,
    pub country: String,
    pub target: f64,
    pub numeric: Vec<f64>,
}

/// The engineered feature matrix: named numeric columns plus the
/// `(date, country, target)` key/label carried alongside.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    pub numeric_names: Vec<String>,
    pub rows: Vec<FeatureRow>,
}

impl FeatureFrame {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.numeric_names.iter().position(|n| n == name)
    }

    /// Stable sort by date (training/prediction order).
    pub fn sort_by_date(&mut self) {
        self.rows.sort_by_key(|r| r.date);
    }

    /// Stable sort by `(country, date)` (feature-file order).
    pub fn sort_by_country_date(&mut self) {
        self.rows.sort_by(|a, b| (a.country.as_str(), a.date).cmp(&(b.country.as_str(), b.date)));
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.rows.iter().map(|r| r.date).min()?;
        let max = self.rows.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    pub fn countries(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.country.clone()).collect()
    }

    pub fn targets(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.target).collect()
    }
}

/// One row of the baseline predictions file.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRow {
    pub date: NaiveDate,
    pub country: String,
    pub actual: f64,
    pub prediction: f64,
}

/// Per-fold cross-validation score, as persisted to the CV results file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoldScore {
    pub fold: usize,
    pub mae: f64,
    pub wape: f64,
}

/// Static per-unit financial assumptions for spend-impact analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostAssumptions {
    /// Revenue per unit sold (reported for context).
    pub revenue_per_unit: f64,
    /// Holding / waste cost per excess unit.
    pub over_forecast_cost: f64,
    /// Lost margin per missed unit.
    pub under_forecast_cost: f64,
}

impl Default for CostAssumptions {
    fn default() -> Self {
        Self {
            revenue_per_unit: 120.0,
            over_forecast_cost: 30.0,
            under_forecast_cost: 80.0,
        }
    }
}

/// Resolved file locations for every stage boundary.
///
/// Defaults mirror the conventional layout (`data/processed` + `models`);
/// `DCAST_DATA_DIR` / `DCAST_MODEL_DIR` override the roots, and each CLI
/// stage accepts explicit path flags on top of that.
#[derive(Debug, Clone)]
pub struct StagePaths {
    pub raw_input: PathBuf,
    pub features: PathBuf,
    pub cv_results: PathBuf,
    pub model: PathBuf,
    pub predictions: PathBuf,
}

impl StagePaths {
    pub fn from_env() -> Self {
        let data_dir = env::var("DCAST_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/processed"));
        let model_dir = env::var("DCAST_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("models"));

        Self {
            raw_input: data_dir.join("model_training_dataset.csv"),
            features: data_dir.join("model_features_final.csv"),
            cv_results: data_dir.join("baseline_cv_results.csv"),
            model: model_dir.join("baseline_model.json"),
            predictions: data_dir.join("baseline_predictions.csv"),
        }
    }
}
