//! Model training and inference stages.
//!
//! - `split`: rolling time-series fold arithmetic
//! - `cross_validation`: the 5-fold diagnostic loop
//! - `final_model`: full-history training + artifact bundling
//! - `predict`: artifact reload + batch prediction

pub mod cross_validation;
pub mod final_model;
pub mod predict;
pub mod split;

pub use cross_validation::*;
pub use final_model::*;
pub use predict::*;
pub use split::*;
