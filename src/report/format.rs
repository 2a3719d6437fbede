//! Formatted terminal output for every stage.
//!
//! We keep formatting code in one place so:
//! - the feature/training code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{CostAssumptions, FeatureFrame};
use crate::features::FeatureReport;
use crate::impact::ImpactSummary;
use crate::io::raw::RawIngest;
use crate::model::forest::ForestParams;
use crate::report::analysis::{AccuracyBand, CvAnalysis};
use crate::train::cross_validation::FoldOutcome;
use crate::train::final_model::TrainOutput;
use crate::train::predict::PredictOutput;

/// Format the feature engineering summary.
pub fn format_features_summary(
    ingest: &RawIngest,
    report: &FeatureReport,
    frame: &FeatureFrame,
) -> String {
    let mut out = String::new();

    out.push_str("=== dcast - Feature Engineering ===\n");
    out.push_str(&format!("Rows read: {}\n", ingest.rows_read));
    if !ingest.row_errors.is_empty() {
        out.push_str(&format!("Rows rejected at parse: {}\n", ingest.row_errors.len()));
        for err in ingest.row_errors.iter().take(5) {
            out.push_str(&format!("  line {}: {}\n", err.line, err.message));
        }
        if ingest.row_errors.len() > 5 {
            out.push_str(&format!("  ... and {} more\n", ingest.row_errors.len() - 5));
        }
    }
    out.push_str(&format!(
        "Cleanup: in={} dropped={} out={}\n",
        report.rows_in, report.rows_dropped, report.rows_out
    ));
    if let Some((min, max)) = frame.date_range() {
        out.push_str(&format!("Date range: {min} -> {max}\n"));
    }
    let mut countries: Vec<String> = frame.countries();
    countries.sort();
    countries.dedup();
    out.push_str(&format!("Countries: {}\n", countries.join(", ")));
    out.push_str(&format!("Feature columns: {}\n", frame.numeric_names.len()));
    out
}

/// Format the cross-validation run summary (fold table + settings).
pub fn format_cv_summary(outcomes: &[FoldOutcome], params: &ForestParams, n_splits: usize) -> String {
    let mut out = String::new();

    out.push_str("=== dcast - Baseline Cross-Validation ===\n");
    out.push_str(&format!(
        "Settings: folds={} trees={} max_depth={} min_leaf={} seed={}\n",
        n_splits, params.n_trees, params.max_depth, params.min_samples_leaf, params.seed
    ));
    out.push('\n');
    out.push_str(&format!(
        "{:<6} {:>8} {:>8} {:<25} {:>12} {:>10}\n",
        "fold", "train_n", "test_n", "test window", "MAE", "WAPE"
    ));
    for o in outcomes {
        out.push_str(&format!(
            "{:<6} {:>8} {:>8} {:<25} {:>12.2} {:>9.2}%\n",
            o.score.fold,
            o.train_rows,
            o.test_rows,
            format!("{} -> {}", o.test_range.0, o.test_range.1),
            o.score.mae,
            o.score.wape * 100.0
        ));
    }
    out
}

/// Format the final training summary.
pub fn format_train_summary(output: &TrainOutput, params: &ForestParams) -> String {
    let mut out = String::new();

    out.push_str("=== dcast - Final Baseline Training ===\n");
    out.push_str(&format!("Rows: {}\n", output.rows));
    out.push_str(&format!(
        "Date range: {} -> {}\n",
        output.date_range.0, output.date_range.1
    ));
    out.push_str(&format!(
        "Forest: trees={} max_depth={} min_leaf={} seed={}\n",
        params.n_trees, params.max_depth, params.min_samples_leaf, params.seed
    ));
    out.push_str(&format!(
        "Features: {} numeric + {} one-hot = {} columns\n",
        output.artifact.numeric_features.len(),
        output.artifact.encoder.width(),
        output.feature_width
    ));
    out.push_str(&format!(
        "Countries encoded: {}\n",
        output.artifact.encoder.categories().join(", ")
    ));
    out
}

/// Format the prediction run summary.
pub fn format_predict_summary(output: &PredictOutput) -> String {
    let mut out = String::new();

    out.push_str("=== dcast - Baseline Predictions ===\n");
    out.push_str(&format!("Rows predicted: {}\n", output.rows.len()));
    out.push_str(&format!(
        "Date range: {} -> {}\n",
        output.date_range.0, output.date_range.1
    ));
    out.push_str(&format!("Model feature width: {}\n", output.feature_width));
    out
}

/// Format the financial impact summary table.
pub fn format_impact_summary(summary: &ImpactSummary, costs: &CostAssumptions) -> String {
    let mut out = String::new();

    out.push_str("=== dcast - Forecast Financial Impact ===\n");
    out.push_str(&format!(
        "Assumptions: revenue/unit=${:.2} over-cost/unit=${:.2} under-cost/unit=${:.2}\n",
        costs.revenue_per_unit, costs.over_forecast_cost, costs.under_forecast_cost
    ));
    out.push_str(&format!("Prediction rows: {}\n", summary.rows));
    out.push('\n');

    let lines = [
        ("Total Actual Demand", summary.total_actual),
        ("Total Predicted Demand", summary.total_predicted),
        ("Total Under-Forecast Units", summary.under_units),
        ("Total Over-Forecast Units", summary.over_units),
        ("Total Under-Forecast Cost ($)", summary.under_cost),
        ("Total Over-Forecast Cost ($)", summary.over_cost),
        ("Total Forecast Cost ($)", summary.total_cost),
    ];
    for (label, value) in lines {
        out.push_str(&format!("{label:<35}: {}\n", fmt_grouped(value)));
    }
    out
}

/// Format the CV analysis report (fold breakdown + verdict).
pub fn format_cv_analysis(analysis: &CvAnalysis) -> String {
    let mut out = String::new();

    out.push_str("=== dcast - CV Results Analysis ===\n");

    out.push_str("\nFold-by-fold performance:\n");
    for s in &analysis.scores {
        out.push_str(&format!(
            "Fold {}: MAE = {:.2}, WAPE = {:.2}%\n",
            s.fold,
            s.mae,
            s.wape * 100.0
        ));
    }

    out.push_str("\nAggregate summary:\n");
    out.push_str(&format!(
        "MAE : mean={:.2} std={:.2} min={:.2} max={:.2}\n",
        analysis.mae.mean, analysis.mae.std, analysis.mae.min, analysis.mae.max
    ));
    out.push_str(&format!(
        "WAPE: mean={:.2}% std={:.2}% min={:.2}% max={:.2}%\n",
        analysis.wape.mean * 100.0,
        analysis.wape.std * 100.0,
        analysis.wape.min * 100.0,
        analysis.wape.max * 100.0
    ));

    out.push_str("\nInterpretation:\n");
    out.push_str(&format!("- {}\n", analysis.band.verdict()));

    out.push_str("\nStability check:\n");
    out.push_str(&format!("Best fold WAPE : {:.2}%\n", analysis.wape.min * 100.0));
    out.push_str(&format!("Worst fold WAPE: {:.2}%\n", analysis.wape.max * 100.0));
    if analysis.stable {
        out.push_str("- Model performance is stable across time\n");
    } else {
        out.push_str("- Model performance varies across time windows\n");
    }

    out.push_str("\nVerdict:\n");
    if analysis.band != AccuracyBand::NeedsImprovement && analysis.stable {
        out.push_str(
            "Baseline validated. Safe to proceed with final training,\n\
             prediction generation, and financial impact analysis.\n",
        );
    } else {
        out.push_str("Review fold metrics before promoting this baseline.\n");
    }
    out
}

/// Thousands-grouped number with two fixed decimals, for money/unit totals.
fn fmt_grouped(v: f64) -> String {
    let negative = v < 0.0;
    let fixed = format!("{:.2}", v.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::new();
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}
