//! Column naming for the demand dataset and the engineered feature matrix.
//!
//! The raw training dataset and the feature matrix are plain CSV files keyed
//! by `(DATE, COUNTRY)`. Everything downstream (training, prediction, impact)
//! addresses columns by name, so the canonical names live here and nowhere
//! else.

/// Date key column.
pub const DATE_COL: &str = "DATE";

/// Country key column (the only categorical feature).
pub const COUNTRY_COL: &str = "COUNTRY";

/// Regression target.
pub const TARGET_COL: &str = "TOTAL_PRODUCT_DEMAND";

/// Numeric columns the raw training dataset must provide (besides the target).
///
/// The lag/rolling columns are precomputed upstream and are undefined at the
/// start of each country's history; those cells arrive empty and are dropped
/// during feature cleanup.
pub const RAW_NUMERIC_COLS: [&str; 10] = [
    "ECONOMIC_INDEX",
    "INFLATION_RATE",
    "UNEMPLOYMENT_RATE",
    "BASELINE_DEMAND",
    "TOTAL_SPEND",
    "TOTAL_CHANNEL_RESPONSE",
    "SPEND_LAG_7",
    "SPEND_LAG_14",
    "DEMAND_ROLLING_7",
    "DEMAND_ROLLING_14",
];

/// Columns added by feature engineering, in matrix order.
pub const ENGINEERED_COLS: [&str; 14] = [
    "DAY_OF_WEEK",
    "WEEK_OF_YEAR",
    "MONTH",
    "YEAR",
    "DOW_SIN",
    "DOW_COS",
    "SPEND_PER_RESPONSE",
    "RESPONSE_PER_SPEND",
    "SPEND_VS_BASELINE",
    "DEMAND_X_ECONOMIC",
    "DEMAND_X_INFLATION",
    "DEMAND_X_UNEMPLOYMENT",
    "DEMAND_TREND_7_14",
    "SPEND_TREND_7_14",
];

/// Prediction file columns.
pub const ACTUAL_COL: &str = "ACTUAL_DEMAND";
pub const PREDICTION_COL: &str = "BASELINE_PREDICTION";

/// Full ordered list of numeric feature names in the engineered matrix.
pub fn numeric_feature_names() -> Vec<String> {
    RAW_NUMERIC_COLS
        .iter()
        .chain(ENGINEERED_COLS.iter())
        .map(|s| s.to_string())
        .collect()
}

/// Categorical feature names (fitted order of the one-hot encoder blocks).
pub fn categorical_feature_names() -> Vec<String> {
    vec![COUNTRY_COL.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_names_have_no_duplicates() {
        let names = numeric_feature_names();
        let unique: std::collections::BTreeSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
        assert_eq!(names.len(), 24);
    }

    #[test]
    fn key_columns_are_not_features() {
        let names = numeric_feature_names();
        assert!(!names.iter().any(|n| n == DATE_COL || n == COUNTRY_COL || n == TARGET_COL));
    }
}
