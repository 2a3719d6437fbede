//! Feature engineering: raw demand rows → final ML feature matrix.
//!
//! Derived feature groups (formulas are part of the stage contract):
//!
//! - calendar seasonality: day-of-week (Monday = 0), ISO week, month, year,
//!   and a cyclical sin/cos encoding of the weekday
//! - marketing efficiency: spend/response ratios with an epsilon guard
//! - macro interactions: baseline demand × each macro indicator
//! - trend: 7d − 14d rolling/lag deltas
//!
//! Cleanup then drops every row with a missing numeric cell and sorts by
//! `(COUNTRY, DATE)`. The stage is deterministic: the same input bytes always
//! produce the same output bytes.

use std::f64::consts::PI;

use chrono::Datelike;

use crate::domain::{FeatureFrame, FeatureRow, RawRow, numeric_feature_names};
use crate::error::AppError;

/// Guard against division by zero in efficiency ratios.
const EPS: f64 = 1e-6;

/// What happened during the feature stage (for reporting).
#[derive(Debug, Clone, Copy)]
pub struct FeatureReport {
    pub rows_in: usize,
    pub rows_dropped: usize,
    pub rows_out: usize,
}

/// Build the engineered feature matrix from validated raw rows.
pub fn engineer_features(rows: &[RawRow]) -> Result<(FeatureFrame, FeatureReport), AppError> {
    let rows_in = rows.len();

    let mut out = Vec::with_capacity(rows_in);
    for row in rows {
        // dropna: any missing numeric cell removes the row.
        if !row.is_complete() {
            continue;
        }
        out.push(feature_row(row));
    }

    let rows_out = out.len();
    if rows_out == 0 {
        return Err(AppError::empty(
            "No complete rows remain after dropping missing values.",
        ));
    }

    let mut frame = FeatureFrame {
        numeric_names: numeric_feature_names(),
        rows: out,
    };
    // Time-series safety: deterministic per-country chronological order.
    frame.sort_by_country_date();

    let report = FeatureReport {
        rows_in,
        rows_dropped: rows_in - rows_out,
        rows_out,
    };
    Ok((frame, report))
}

/// Compute the full numeric feature vector for one complete raw row.
///
/// The output order must match [`numeric_feature_names`]: raw passthrough
/// columns first, then the engineered columns.
fn feature_row(row: &RawRow) -> FeatureRow {
    // Complete row: every unwrap_or below is unreachable in practice, but we
    // stay total instead of panicking.
    let economic = row.economic_index.unwrap_or_default();
    let inflation = row.inflation_rate.unwrap_or_default();
    let unemployment = row.unemployment_rate.unwrap_or_default();
    let baseline = row.baseline_demand.unwrap_or_default();
    let spend = row.total_spend.unwrap_or_default();
    let response = row.total_channel_response.unwrap_or_default();
    let spend_lag_7 = row.spend_lag_7.unwrap_or_default();
    let spend_lag_14 = row.spend_lag_14.unwrap_or_default();
    let demand_rolling_7 = row.demand_rolling_7.unwrap_or_default();
    let demand_rolling_14 = row.demand_rolling_14.unwrap_or_default();

    let dow = row.date.weekday().num_days_from_monday() as f64;

    let numeric = vec![
        // Raw passthrough.
        economic,
        inflation,
        unemployment,
        baseline,
        spend,
        response,
        spend_lag_7,
        spend_lag_14,
        demand_rolling_7,
        demand_rolling_14,
        // Calendar.
        dow,
        row.date.iso_week().week() as f64,
        row.date.month() as f64,
        row.date.year() as f64,
        (2.0 * PI * dow / 7.0).sin(),
        (2.0 * PI * dow / 7.0).cos(),
        // Marketing efficiency.
        spend / (response + EPS),
        response / (spend + EPS),
        spend / (baseline + EPS),
        // Macro interactions.
        baseline * economic,
        baseline * inflation,
        baseline * unemployment,
        // Trend.
        demand_rolling_7 - demand_rolling_14,
        spend_lag_7 - spend_lag_14,
    ];

    FeatureRow {
        date: row.date,
        country: row.country.clone(),
        target: row.total_product_demand.unwrap_or_default(),
        numeric,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn complete_row(date: NaiveDate, country: &str) -> RawRow {
        RawRow {
            date,
            country: country.to_string(),
            economic_index: Some(1.5),
            inflation_rate: Some(0.02),
            unemployment_rate: Some(0.05),
            baseline_demand: Some(1000.0),
            total_spend: Some(500.0),
            total_channel_response: Some(250.0),
            total_product_demand: Some(1200.0),
            spend_lag_7: Some(480.0),
            spend_lag_14: Some(460.0),
            demand_rolling_7: Some(1150.0),
            demand_rolling_14: Some(1100.0),
        }
    }

    fn col(frame: &FeatureFrame, row: usize, name: &str) -> f64 {
        frame.rows[row].numeric[frame.column_index(name).unwrap()]
    }

    #[test]
    fn calendar_features_for_known_date() {
        // 2024-01-03 is a Wednesday, ISO week 1.
        let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let (frame, _) = engineer_features(&[complete_row(date, "DE")]).unwrap();
        assert_eq!(col(&frame, 0, "DAY_OF_WEEK"), 2.0);
        assert_eq!(col(&frame, 0, "WEEK_OF_YEAR"), 1.0);
        assert_eq!(col(&frame, 0, "MONTH"), 1.0);
        assert_eq!(col(&frame, 0, "YEAR"), 2024.0);
        let angle = 2.0 * PI * 2.0 / 7.0;
        assert!((col(&frame, 0, "DOW_SIN") - angle.sin()).abs() < 1e-12);
        assert!((col(&frame, 0, "DOW_COS") - angle.cos()).abs() < 1e-12);
    }

    #[test]
    fn efficiency_and_interaction_formulas() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let (frame, _) = engineer_features(&[complete_row(date, "DE")]).unwrap();
        assert!((col(&frame, 0, "SPEND_PER_RESPONSE") - 500.0 / (250.0 + EPS)).abs() < 1e-9);
        assert!((col(&frame, 0, "RESPONSE_PER_SPEND") - 250.0 / (500.0 + EPS)).abs() < 1e-9);
        assert!((col(&frame, 0, "SPEND_VS_BASELINE") - 500.0 / (1000.0 + EPS)).abs() < 1e-9);
        assert!((col(&frame, 0, "DEMAND_X_ECONOMIC") - 1500.0).abs() < 1e-9);
        assert!((col(&frame, 0, "DEMAND_TREND_7_14") - 50.0).abs() < 1e-9);
        assert!((col(&frame, 0, "SPEND_TREND_7_14") - 20.0).abs() < 1e-9);
    }

    #[test]
    fn incomplete_rows_are_dropped_and_counted() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let mut bad = complete_row(date, "DE");
        bad.demand_rolling_14 = None;
        let rows = vec![complete_row(date, "FR"), bad];
        let (frame, report) = engineer_features(&rows).unwrap();
        assert_eq!(report.rows_in, 2);
        assert_eq!(report.rows_dropped, 1);
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.rows[0].country, "FR");
        // Contract: no missing values survive cleanup.
        assert!(frame.rows.iter().all(|r| r.numeric.iter().all(|v| v.is_finite())));
    }

    #[test]
    fn output_sorted_by_country_then_date() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let rows = vec![
            complete_row(d2, "FR"),
            complete_row(d1, "FR"),
            complete_row(d2, "DE"),
        ];
        let (frame, _) = engineer_features(&rows).unwrap();
        let keys: Vec<_> = frame
            .rows
            .iter()
            .map(|r| (r.country.clone(), r.date))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("DE".to_string(), d2),
                ("FR".to_string(), d1),
                ("FR".to_string(), d2)
            ]
        );
    }

    #[test]
    fn all_rows_incomplete_is_an_error() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let mut bad = complete_row(date, "DE");
        bad.spend_lag_7 = None;
        let err = engineer_features(&[bad]).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn engineering_is_deterministic() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let rows = vec![complete_row(date, "DE"), complete_row(date, "FR")];
        let (a, _) = engineer_features(&rows).unwrap();
        let (b, _) = engineer_features(&rows).unwrap();
        assert_eq!(a, b);
    }
}
