//! Reporting: stage summaries and the CV results analysis.

pub mod analysis;
pub mod format;

pub use analysis::{analyze_cv_scores, AccuracyBand, CvAnalysis, MetricStats};
