//! Command-line parsing for the demand forecasting pipeline.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the feature/modeling code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dcast", version, about = "Baseline demand forecasting pipeline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands, one per pipeline stage plus `run` for the whole chain.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a seeded synthetic raw training dataset.
    Sample(SampleArgs),
    /// Clean the raw dataset and build the engineered feature matrix.
    Features(FeaturesArgs),
    /// Run time-series cross-validation and persist per-fold scores.
    Cv(CvArgs),
    /// Train the final baseline model on the full feature history.
    Train(TrainArgs),
    /// Generate baseline predictions from the persisted model.
    Predict(PredictArgs),
    /// Translate forecast errors into financial impact.
    Impact(ImpactArgs),
    /// Analyze persisted CV results (accuracy bands + stability).
    Analyze(AnalyzeArgs),
    /// Run the full pipeline: features, train, predict, impact.
    Run(RunArgs),
}

/// Options for synthetic dataset generation.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Days of history per country.
    #[arg(long, default_value_t = 365)]
    pub days: usize,

    /// Countries to generate (repeat the flag for each).
    #[arg(long = "country", value_name = "CODE")]
    pub countries: Vec<String>,

    /// First date of the series (YYYY-MM-DD).
    #[arg(long, default_value = "2023-01-01")]
    pub start_date: String,

    /// Random seed for dataset generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Where to write the raw dataset CSV (defaults to the configured data dir).
    #[arg(long, value_name = "CSV")]
    pub output: Option<PathBuf>,
}

/// Options for feature engineering.
#[derive(Debug, Parser, Clone)]
pub struct FeaturesArgs {
    /// Raw dataset CSV (defaults to the configured data dir).
    #[arg(long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Where to write the feature matrix CSV.
    #[arg(long, value_name = "CSV")]
    pub output: Option<PathBuf>,
}

/// Options for cross-validation.
#[derive(Debug, Parser, Clone)]
pub struct CvArgs {
    /// Feature matrix CSV (defaults to the configured data dir).
    #[arg(long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Where to write per-fold scores.
    #[arg(long, value_name = "CSV")]
    pub output: Option<PathBuf>,

    /// Number of time-series folds.
    #[arg(long, default_value_t = 5)]
    pub folds: usize,

    /// Trees per fold model.
    #[arg(long, default_value_t = 200)]
    pub trees: usize,

    /// Maximum tree depth.
    #[arg(long, default_value_t = 10)]
    pub max_depth: usize,

    /// Minimum samples per leaf.
    #[arg(long, default_value_t = 10)]
    pub min_leaf: usize,

    /// Random seed for bootstrap sampling.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Options for final model training.
#[derive(Debug, Parser, Clone)]
pub struct TrainArgs {
    /// Feature matrix CSV (defaults to the configured data dir).
    #[arg(long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Where to write the model artifact JSON.
    #[arg(long, value_name = "JSON")]
    pub model: Option<PathBuf>,

    /// Trees in the final forest.
    #[arg(long, default_value_t = 300)]
    pub trees: usize,

    /// Maximum tree depth.
    #[arg(long, default_value_t = 12)]
    pub max_depth: usize,

    /// Minimum samples per leaf.
    #[arg(long, default_value_t = 10)]
    pub min_leaf: usize,

    /// Random seed for bootstrap sampling.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Options for prediction generation.
#[derive(Debug, Parser, Clone)]
pub struct PredictArgs {
    /// Feature matrix CSV (defaults to the configured data dir).
    #[arg(long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Model artifact JSON (defaults to the configured model dir).
    #[arg(long, value_name = "JSON")]
    pub model: Option<PathBuf>,

    /// Where to write the predictions CSV.
    #[arg(long, value_name = "CSV")]
    pub output: Option<PathBuf>,
}

/// Options for financial impact analysis.
#[derive(Debug, Parser, Clone)]
pub struct ImpactArgs {
    /// Predictions CSV (defaults to the configured data dir).
    #[arg(long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Optional per-row impact CSV for downstream reporting.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Revenue per unit sold.
    #[arg(long, default_value_t = 120.0)]
    pub revenue_per_unit: f64,

    /// Holding / waste cost per excess unit.
    #[arg(long, default_value_t = 30.0)]
    pub over_cost: f64,

    /// Lost margin per missed unit.
    #[arg(long, default_value_t = 80.0)]
    pub under_cost: f64,
}

/// Options for CV results analysis.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// CV results CSV (defaults to the configured data dir).
    #[arg(long, value_name = "CSV")]
    pub input: Option<PathBuf>,
}

/// Options for the full pipeline run.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Random seed for final training.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
