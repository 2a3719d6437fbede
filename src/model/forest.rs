//! Bootstrap random forest regressor.
//!
//! Each tree is fit on a bootstrap resample of the training rows drawn from a
//! `StdRng` seeded with `seed + tree_index`, so training is reproducible for
//! a given seed regardless of thread scheduling. Trees are grown in parallel
//! with rayon and predictions are the mean over trees.

use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::model::tree::{RegressionTree, TreeParams};

/// Forest hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_leaf: usize,
    pub seed: u64,
}

impl ForestParams {
    /// Diagnostic (cross-validation) configuration.
    pub fn cv_default() -> Self {
        Self {
            n_trees: 200,
            max_depth: 10,
            min_samples_leaf: 10,
            seed: 42,
        }
    }

    /// Production (full-history) configuration.
    pub fn final_default() -> Self {
        Self {
            n_trees: 300,
            max_depth: 12,
            min_samples_leaf: 10,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandForest {
    params: ForestParams,
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl DemandForest {
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: &ForestParams) -> Result<Self, AppError> {
        if x.is_empty() {
            return Err(AppError::empty("Cannot train a forest on zero rows."));
        }
        if x.len() != y.len() {
            return Err(AppError::model(format!(
                "Design matrix has {} rows but target has {} values.",
                x.len(),
                y.len()
            )));
        }
        if params.n_trees == 0 {
            return Err(AppError::schema("Forest must have at least one tree."));
        }
        let n_features = x[0].len();
        if n_features == 0 {
            return Err(AppError::schema("Design matrix has zero feature columns."));
        }
        if let Some(bad) = x.iter().position(|row| row.len() != n_features) {
            return Err(AppError::model(format!(
                "Ragged design matrix: row {bad} has {} columns, expected {n_features}.",
                x[bad].len()
            )));
        }
        if x.iter().flatten().any(|v| !v.is_finite()) || y.iter().any(|v| !v.is_finite()) {
            return Err(AppError::model("Non-finite value in training data."));
        }

        let n = x.len();
        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_leaf: params.min_samples_leaf,
        };

        let trees: Vec<RegressionTree> = (0..params.n_trees)
            .into_par_iter()
            .map(|t| {
                // Per-tree rng: deterministic and independent of thread order.
                let mut rng = StdRng::seed_from_u64(params.seed.wrapping_add(t as u64));
                let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                RegressionTree::fit(x, y, &sample, &tree_params)
            })
            .collect();

        Ok(Self {
            params: *params,
            n_features,
            trees,
        })
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Predict a single row (mean over trees).
    pub fn predict_row(&self, row: &[f64]) -> Result<f64, AppError> {
        if row.len() != self.n_features {
            return Err(AppError::model(format!(
                "Prediction row has {} features, model expects {}.",
                row.len(),
                self.n_features
            )));
        }
        let sum: f64 = self.trees.iter().map(|t| t.predict_row(row)).sum();
        let y = sum / self.trees.len() as f64;
        if !y.is_finite() {
            return Err(AppError::model("Non-finite forest prediction."));
        }
        Ok(y)
    }

    /// Predict a batch of rows.
    pub fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, AppError> {
        x.iter().map(|row| self.predict_row(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_params(n_trees: usize) -> ForestParams {
        ForestParams {
            n_trees,
            max_depth: 4,
            min_samples_leaf: 1,
            seed: 42,
        }
    }

    fn step_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        let x: Vec<Vec<f64>> = (0..40).map(|i| vec![i as f64]).collect();
        let y: Vec<f64> = (0..40).map(|i| if i < 20 { 5.0 } else { 50.0 }).collect();
        (x, y)
    }

    #[test]
    fn forest_learns_a_step() {
        let (x, y) = step_data();
        let forest = DemandForest::fit(&x, &y, &toy_params(25)).unwrap();
        let low = forest.predict_row(&[3.0]).unwrap();
        let high = forest.predict_row(&[36.0]).unwrap();
        assert!(low < 15.0, "low-side prediction {low} should be near 5");
        assert!(high > 40.0, "high-side prediction {high} should be near 50");
    }

    #[test]
    fn same_seed_same_model() {
        let (x, y) = step_data();
        let a = DemandForest::fit(&x, &y, &toy_params(10)).unwrap();
        let b = DemandForest::fit(&x, &y, &toy_params(10)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seed_usually_differs() {
        let (x, y) = step_data();
        let a = DemandForest::fit(&x, &y, &toy_params(10)).unwrap();
        let mut other = toy_params(10);
        other.seed = 7;
        let b = DemandForest::fit(&x, &y, &other).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_ragged_matrix() {
        let x = vec![vec![1.0, 2.0], vec![1.0]];
        let y = vec![1.0, 2.0];
        assert!(DemandForest::fit(&x, &y, &toy_params(2)).is_err());
    }

    #[test]
    fn rejects_wrong_prediction_width() {
        let (x, y) = step_data();
        let forest = DemandForest::fit(&x, &y, &toy_params(5)).unwrap();
        assert!(forest.predict_row(&[1.0, 2.0]).is_err());
    }
}
