//! Baseline demand model: seeded random forest over a one-hot-augmented
//! design matrix.
//!
//! - `encoder`: categorical one-hot encoding (fit on train only)
//! - `tree` / `forest`: CART regression trees and the bootstrap ensemble
//! - `matrix`: design-matrix assembly + schema checks
//! - `artifact`: the persisted training bundle

pub mod artifact;
pub mod encoder;
pub mod forest;
pub mod matrix;
pub mod tree;

pub use artifact::*;
pub use encoder::*;
pub use forest::*;
pub use matrix::*;
pub use tree::*;
