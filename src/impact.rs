//! Forecast spend-impact analysis.
//!
//! Translates forecast error into dollars using static per-unit assumptions:
//! a positive error (actual above prediction) is missed demand costed at the
//! under-forecast rate; a negative error is excess supply costed at the
//! over-forecast (holding/waste) rate.

use chrono::NaiveDate;

use crate::domain::{CostAssumptions, PredictionRow};
use crate::error::AppError;

/// One prediction row with its financial impact columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactRow {
    pub date: NaiveDate,
    pub country: String,
    pub actual: f64,
    pub prediction: f64,
    pub forecast_error: f64,
    pub under_units: f64,
    pub over_units: f64,
    pub under_cost: f64,
    pub over_cost: f64,
    pub total_cost: f64,
}

/// Aggregate financial impact over all rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactSummary {
    pub rows: usize,
    pub total_actual: f64,
    pub total_predicted: f64,
    pub under_units: f64,
    pub over_units: f64,
    pub under_cost: f64,
    pub over_cost: f64,
    pub total_cost: f64,
}

/// Compute per-row impact columns.
pub fn compute_impact(rows: &[PredictionRow], costs: &CostAssumptions) -> Vec<ImpactRow> {
    rows.iter()
        .map(|row| {
            let forecast_error = row.actual - row.prediction;
            let under_units = forecast_error.max(0.0);
            let over_units = (-forecast_error).max(0.0);
            let under_cost = under_units * costs.under_forecast_cost;
            let over_cost = over_units * costs.over_forecast_cost;
            ImpactRow {
                date: row.date,
                country: row.country.clone(),
                actual: row.actual,
                prediction: row.prediction,
                forecast_error,
                under_units,
                over_units,
                under_cost,
                over_cost,
                total_cost: under_cost + over_cost,
            }
        })
        .collect()
}

/// Aggregate per-row impact into a summary.
pub fn summarize_impact(rows: &[ImpactRow]) -> Result<ImpactSummary, AppError> {
    if rows.is_empty() {
        return Err(AppError::empty("No prediction rows to analyze."));
    }
    let mut summary = ImpactSummary {
        rows: rows.len(),
        total_actual: 0.0,
        total_predicted: 0.0,
        under_units: 0.0,
        over_units: 0.0,
        under_cost: 0.0,
        over_cost: 0.0,
        total_cost: 0.0,
    };
    for row in rows {
        summary.total_actual += row.actual;
        summary.total_predicted += row.prediction;
        summary.under_units += row.under_units;
        summary.over_units += row.over_units;
        summary.under_cost += row.under_cost;
        summary.over_cost += row.over_cost;
        summary.total_cost += row.total_cost;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pred(actual: f64, prediction: f64) -> PredictionRow {
        PredictionRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            country: "DE".to_string(),
            actual,
            prediction,
        }
    }

    #[test]
    fn under_forecast_costed_at_80_per_unit() {
        let rows = compute_impact(&[pred(120.0, 100.0)], &CostAssumptions::default());
        let r = &rows[0];
        assert_eq!(r.forecast_error, 20.0);
        assert_eq!(r.under_units, 20.0);
        assert_eq!(r.over_units, 0.0);
        assert_eq!(r.under_cost, 1600.0);
        assert_eq!(r.over_cost, 0.0);
        assert_eq!(r.total_cost, 1600.0);
    }

    #[test]
    fn over_forecast_costed_at_30_per_unit() {
        let rows = compute_impact(&[pred(80.0, 100.0)], &CostAssumptions::default());
        let r = &rows[0];
        assert_eq!(r.forecast_error, -20.0);
        assert_eq!(r.under_units, 0.0);
        assert_eq!(r.over_units, 20.0);
        assert_eq!(r.over_cost, 600.0);
        assert_eq!(r.total_cost, 600.0);
    }

    #[test]
    fn perfect_forecast_costs_nothing() {
        let rows = compute_impact(&[pred(100.0, 100.0)], &CostAssumptions::default());
        assert_eq!(rows[0].total_cost, 0.0);
    }

    #[test]
    fn summary_sums_both_sides() {
        let rows = compute_impact(
            &[pred(120.0, 100.0), pred(80.0, 100.0)],
            &CostAssumptions::default(),
        );
        let s = summarize_impact(&rows).unwrap();
        assert_eq!(s.rows, 2);
        assert_eq!(s.total_actual, 200.0);
        assert_eq!(s.total_predicted, 200.0);
        assert_eq!(s.under_units, 20.0);
        assert_eq!(s.over_units, 20.0);
        assert_eq!(s.under_cost, 1600.0);
        assert_eq!(s.over_cost, 600.0);
        assert_eq!(s.total_cost, 2200.0);
    }

    #[test]
    fn custom_cost_assumptions_apply() {
        let costs = CostAssumptions {
            revenue_per_unit: 100.0,
            over_forecast_cost: 10.0,
            under_forecast_cost: 5.0,
        };
        let rows = compute_impact(&[pred(110.0, 100.0)], &costs);
        assert_eq!(rows[0].under_cost, 50.0);
    }
}
