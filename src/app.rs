//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves stage file paths (env defaults + CLI overrides)
//! - runs the requested pipeline stage(s)
//! - prints stage summaries
//! - writes stage outputs

use clap::Parser;

use crate::cli::{
    AnalyzeArgs, Cli, Command, CvArgs, FeaturesArgs, ImpactArgs, PredictArgs, RunArgs, SampleArgs,
    TrainArgs,
};
use crate::domain::{CostAssumptions, StagePaths};
use crate::error::AppError;
use crate::model::forest::ForestParams;

pub mod pipeline;

/// Entry point for the `dcast` binary.
pub fn run() -> Result<(), AppError> {
    // Local .env overrides are optional; absence is not an error.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let paths = StagePaths::from_env();

    match cli.command {
        Command::Sample(args) => handle_sample(args, &paths),
        Command::Features(args) => handle_features(args, &paths),
        Command::Cv(args) => handle_cv(args, &paths),
        Command::Train(args) => handle_train(args, &paths),
        Command::Predict(args) => handle_predict(args, &paths),
        Command::Impact(args) => handle_impact(args, &paths),
        Command::Analyze(args) => handle_analyze(args, &paths),
        Command::Run(args) => handle_run(args, &paths),
    }
}

fn handle_sample(args: SampleArgs, paths: &StagePaths) -> Result<(), AppError> {
    let config = sample_config_from_args(&args)?;
    let output = args.output.unwrap_or_else(|| paths.raw_input.clone());

    let rows = crate::data::generate_sample(&config)?;
    crate::io::write_raw_csv(&output, &rows)?;

    println!("=== dcast - Sample Dataset ===");
    println!(
        "Wrote {} rows ({} countries x {} days) to {}",
        rows.len(),
        config.countries.len(),
        config.days,
        output.display()
    );
    Ok(())
}

fn handle_features(args: FeaturesArgs, paths: &StagePaths) -> Result<(), AppError> {
    let input = args.input.unwrap_or_else(|| paths.raw_input.clone());
    let output = args.output.unwrap_or_else(|| paths.features.clone());

    let out = pipeline::run_features(&input)?;
    crate::io::write_features_csv(&output, &out.frame)?;

    println!(
        "{}",
        crate::report::format::format_features_summary(&out.ingest, &out.report, &out.frame)
    );
    println!("Feature matrix written to {}", output.display());
    Ok(())
}

fn handle_cv(args: CvArgs, paths: &StagePaths) -> Result<(), AppError> {
    let input = args.input.clone().unwrap_or_else(|| paths.features.clone());
    let output = args.output.clone().unwrap_or_else(|| paths.cv_results.clone());
    let params = cv_params_from_args(&args);

    let outcomes = pipeline::run_cv(&input, &params, args.folds)?;
    let scores: Vec<_> = outcomes.iter().map(|o| o.score).collect();
    crate::io::write_cv_results_csv(&output, &scores)?;

    println!(
        "{}",
        crate::report::format::format_cv_summary(&outcomes, &params, args.folds)
    );
    println!("Fold scores written to {}", output.display());
    Ok(())
}

fn handle_train(args: TrainArgs, paths: &StagePaths) -> Result<(), AppError> {
    let input = args.input.clone().unwrap_or_else(|| paths.features.clone());
    let model_path = args.model.clone().unwrap_or_else(|| paths.model.clone());
    let params = train_params_from_args(&args);

    let out = pipeline::run_train(&input, &params)?;
    crate::io::write_model_json(&model_path, &out.artifact)?;

    println!("{}", crate::report::format::format_train_summary(&out, &params));
    println!("Model artifact written to {}", model_path.display());
    Ok(())
}

fn handle_predict(args: PredictArgs, paths: &StagePaths) -> Result<(), AppError> {
    let input = args.input.unwrap_or_else(|| paths.features.clone());
    let model_path = args.model.unwrap_or_else(|| paths.model.clone());
    let output = args.output.unwrap_or_else(|| paths.predictions.clone());

    let out = pipeline::run_predict(&input, &model_path)?;
    crate::io::write_predictions_csv(&output, &out.rows)?;

    println!("{}", crate::report::format::format_predict_summary(&out));
    println!("Predictions written to {}", output.display());
    Ok(())
}

fn handle_impact(args: ImpactArgs, paths: &StagePaths) -> Result<(), AppError> {
    let input = args.input.clone().unwrap_or_else(|| paths.predictions.clone());
    let costs = costs_from_args(&args);

    let (rows, summary) = pipeline::run_impact(&input, &costs)?;
    if let Some(export) = &args.export {
        crate::io::write_impact_csv(export, &rows)?;
    }

    println!(
        "{}",
        crate::report::format::format_impact_summary(&summary, &costs)
    );
    if let Some(export) = &args.export {
        println!("Per-row impact written to {}", export.display());
    }
    Ok(())
}

fn handle_analyze(args: AnalyzeArgs, paths: &StagePaths) -> Result<(), AppError> {
    let input = args.input.unwrap_or_else(|| paths.cv_results.clone());

    let analysis = pipeline::run_analyze(&input)?;
    println!("{}", crate::report::format::format_cv_analysis(&analysis));
    Ok(())
}

/// Full pipeline (features, train, predict, impact) with the default stage
/// settings. Stops at the first failure; later stages never run against
/// stale outputs from a failed earlier stage.
fn handle_run(args: RunArgs, paths: &StagePaths) -> Result<(), AppError> {
    handle_features(
        FeaturesArgs {
            input: None,
            output: None,
        },
        paths,
    )?;

    let final_params = ForestParams::final_default();
    handle_train(
        TrainArgs {
            input: None,
            model: None,
            trees: final_params.n_trees,
            max_depth: final_params.max_depth,
            min_leaf: final_params.min_samples_leaf,
            seed: args.seed,
        },
        paths,
    )?;

    handle_predict(
        PredictArgs {
            input: None,
            model: None,
            output: None,
        },
        paths,
    )?;

    let costs = CostAssumptions::default();
    handle_impact(
        ImpactArgs {
            input: None,
            export: None,
            revenue_per_unit: costs.revenue_per_unit,
            over_cost: costs.over_forecast_cost,
            under_cost: costs.under_forecast_cost,
        },
        paths,
    )
}

fn sample_config_from_args(args: &SampleArgs) -> Result<crate::data::SampleConfig, AppError> {
    let defaults = crate::data::SampleConfig::default();
    Ok(crate::data::SampleConfig {
        start_date: crate::io::parse_date(&args.start_date).map_err(AppError::schema)?,
        days: args.days,
        countries: if args.countries.is_empty() {
            defaults.countries
        } else {
            args.countries.clone()
        },
        seed: args.seed,
    })
}

fn cv_params_from_args(args: &CvArgs) -> ForestParams {
    ForestParams {
        n_trees: args.trees,
        max_depth: args.max_depth,
        min_samples_leaf: args.min_leaf,
        seed: args.seed,
    }
}

fn train_params_from_args(args: &TrainArgs) -> ForestParams {
    ForestParams {
        n_trees: args.trees,
        max_depth: args.max_depth,
        min_samples_leaf: args.min_leaf,
        seed: args.seed,
    }
}

fn costs_from_args(args: &ImpactArgs) -> CostAssumptions {
    CostAssumptions {
        revenue_per_unit: args.revenue_per_unit,
        over_forecast_cost: args.over_cost,
        under_forecast_cost: args.under_cost,
    }
}
