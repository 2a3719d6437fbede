//! One-hot encoding for categorical features.
//!
//! Semantics match the training contract of the pipeline:
//!
//! - `fit` records the sorted unique category list of the *training* data
//! - `transform` emits a 0/1 block in fitted order
//! - categories unseen at fit time encode to an all-zero block; the column
//!   layout never changes after fitting
//!
//! The encoder is serialized inside the model artifact and must be reused
//! unmodified at inference time.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    categories: Vec<String>,
}

impl OneHotEncoder {
    /// Fit on training-set values: sorted unique categories.
    pub fn fit(values: &[String]) -> Self {
        let set: std::collections::BTreeSet<&str> = values.iter().map(String::as_str).collect();
        Self {
            categories: set.into_iter().map(str::to_string).collect(),
        }
    }

    /// Fitted categories, in encoded-column order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Width of the encoded block.
    pub fn width(&self) -> usize {
        self.categories.len()
    }

    /// Encode a single value. Unknown values produce an all-zero block.
    pub fn transform_one(&self, value: &str) -> Vec<f64> {
        let mut out = vec![0.0; self.categories.len()];
        if let Ok(idx) = self.categories.binary_search_by(|c| c.as_str().cmp(value)) {
            out[idx] = 1.0;
        }
        out
    }

    /// Encode a batch of values.
    pub fn transform(&self, values: &[String]) -> Vec<Vec<f64>> {
        values.iter().map(|v| self.transform_one(v)).collect()
    }
}
