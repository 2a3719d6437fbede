//! The persisted training bundle.
//!
//! Everything prediction needs travels together: the fitted forest, the
//! fitted encoder, and the ordered feature column lists recorded at training
//! time. Downstream stages treat the bundle as immutable.

use serde::{Deserialize, Serialize};

use crate::model::encoder::OneHotEncoder;
use crate::model::forest::DemandForest;

/// Identifies artifacts written by this tool.
pub const ARTIFACT_TOOL: &str = "dcast";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub tool: String,
    pub model: DemandForest,
    pub encoder: OneHotEncoder,
    /// Numeric columns, in the exact order the design matrix was assembled.
    pub numeric_features: Vec<String>,
    /// Categorical columns, in encoder-block order.
    pub categorical_features: Vec<String>,
}

impl ModelArtifact {
    pub fn new(
        model: DemandForest,
        encoder: OneHotEncoder,
        numeric_features: Vec<String>,
        categorical_features: Vec<String>,
    ) -> Self {
        Self {
            tool: ARTIFACT_TOOL.to_string(),
            model,
            encoder,
            numeric_features,
            categorical_features,
        }
    }

    /// Total design-matrix width the forest was trained against.
    pub fn feature_width(&self) -> usize {
        self.numeric_features.len() + self.encoder.width()
    }
}
