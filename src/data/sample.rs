//! Synthetic raw training dataset generation.
//!
//! Produces a multi-country daily series shaped like the production extract:
//! macro indicators, spend, channel response, and demand, with lag and
//! rolling cells left empty during each country's warm-up window the same
//! way the upstream extract leaves them. Fully seeded, so a given
//! configuration always produces the same dataset.

use chrono::{Datelike, Days, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::domain::RawRow;
use crate::error::AppError;

/// Rolling/lag warm-up: the longest window in the raw schema.
const WARMUP_DAYS: usize = 14;

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub start_date: NaiveDate,
    /// Days of history per country.
    pub days: usize,
    pub countries: Vec<String>,
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid date"),
            days: 365,
            countries: vec![
                "DE".to_string(),
                "FR".to_string(),
                "GB".to_string(),
                "US".to_string(),
            ],
            seed: 42,
        }
    }
}

/// Generate the raw dataset described by `config`.
pub fn generate_sample(config: &SampleConfig) -> Result<Vec<RawRow>, AppError> {
    if config.days == 0 {
        return Err(AppError::schema("Sample day count must be > 0."));
    }
    if config.days <= WARMUP_DAYS {
        return Err(AppError::schema(format!(
            "Sample needs more than {WARMUP_DAYS} days per country so rows survive the lag warm-up."
        )));
    }
    if config.countries.is_empty() {
        return Err(AppError::schema("Sample needs at least one country."));
    }

    let noise = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::model(format!("Noise distribution error: {e}")))?;

    let mut rows = Vec::with_capacity(config.days * config.countries.len());

    for (ci, country) in config.countries.iter().enumerate() {
        let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(ci as u64));

        // Country-level baselines, fixed for the whole series.
        let demand_level = 800.0 + 400.0 * rng.r#gen::<f64>();
        let spend_level = 4000.0 + 2000.0 * rng.r#gen::<f64>();
        let mut economic_index = 95.0 + 10.0 * rng.r#gen::<f64>();
        let inflation_base = 2.0 + 3.0 * rng.r#gen::<f64>();
        let unemployment_base = 4.0 + 3.0 * rng.r#gen::<f64>();

        let mut spend_history: Vec<f64> = Vec::with_capacity(config.days);
        let mut demand_history: Vec<f64> = Vec::with_capacity(config.days);

        for day in 0..config.days {
            let date = config
                .start_date
                .checked_add_days(Days::new(day as u64))
                .ok_or_else(|| AppError::schema("Sample date range overflows the calendar."))?;

            // Slow macro drift.
            economic_index += 0.05 * noise.sample(&mut rng);
            let inflation_rate = inflation_base + 0.2 * noise.sample(&mut rng);
            let unemployment_rate = unemployment_base + 0.1 * noise.sample(&mut rng);

            // Weekday uplift peaks mid-week, drops at weekends.
            let dow = date.weekday().num_days_from_monday() as f64;
            let weekly = 1.0 + 0.15 * (std::f64::consts::TAU * dow / 7.0).sin();

            let total_spend = (spend_level * weekly * (1.0 + 0.05 * noise.sample(&mut rng))).max(0.0);
            let total_channel_response =
                (total_spend * 0.3 * (1.0 + 0.10 * noise.sample(&mut rng))).max(0.0);

            let baseline_demand = (demand_level * weekly).max(0.0);
            let total_product_demand = (baseline_demand
                + 0.05 * total_channel_response
                + 2.0 * (economic_index - 100.0)
                + 15.0 * noise.sample(&mut rng))
            .max(0.0);

            let spend_lag_7 = lag(&spend_history, 7);
            let spend_lag_14 = lag(&spend_history, 14);
            let demand_rolling_7 = rolling_mean(&demand_history, 7);
            let demand_rolling_14 = rolling_mean(&demand_history, 14);

            spend_history.push(total_spend);
            demand_history.push(total_product_demand);

            rows.push(RawRow {
                date,
                country: country.clone(),
                economic_index: Some(economic_index),
                inflation_rate: Some(inflation_rate),
                unemployment_rate: Some(unemployment_rate),
                baseline_demand: Some(baseline_demand),
                total_spend: Some(total_spend),
                total_channel_response: Some(total_channel_response),
                total_product_demand: Some(total_product_demand),
                spend_lag_7,
                spend_lag_14,
                demand_rolling_7,
                demand_rolling_14,
            });
        }
    }

    Ok(rows)
}

/// Value `window` days back, None during warm-up.
fn lag(history: &[f64], window: usize) -> Option<f64> {
    if history.len() < window {
        return None;
    }
    Some(history[history.len() - window])
}

/// Trailing mean over the last `window` values, None until the window fills.
fn rolling_mean(history: &[f64], window: usize) -> Option<f64> {
    if history.len() < window {
        return None;
    }
    let tail = &history[history.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}
