//! Cross-validation results analysis.
//!
//! Answers one question: is the baseline good enough to trust? No training
//! or prediction happens here; the analysis reads persisted fold scores and
//! classifies accuracy and stability against fixed review thresholds.

use crate::domain::FoldScore;
use crate::error::AppError;

/// Mean WAPE below this fraction is excellent for daily demand.
const EXCELLENT_WAPE: f64 = 0.01;
/// Mean WAPE below this fraction is still acceptable as a baseline.
const ACCEPTABLE_WAPE: f64 = 0.03;
/// Worst-minus-best fold WAPE spread below this counts as stable.
const STABLE_WAPE_SPREAD: f64 = 0.01;

/// Accuracy classification of the mean fold WAPE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccuracyBand {
    Excellent,
    Acceptable,
    NeedsImprovement,
}

impl AccuracyBand {
    pub fn verdict(self) -> &'static str {
        match self {
            AccuracyBand::Excellent => "Excellent baseline accuracy for demand forecasting",
            AccuracyBand::Acceptable => "Acceptable baseline accuracy",
            AccuracyBand::NeedsImprovement => "Baseline accuracy may need improvement",
        }
    }
}

/// Summary statistics over one metric's fold values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricStats {
    pub mean: f64,
    /// Sample standard deviation (n-1 denominator); 0 for a single fold.
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl MetricStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std = if values.len() > 1 {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1.0)).sqrt()
        } else {
            0.0
        };
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Some(Self { mean, std, min, max })
    }
}

/// The full CV analysis: per-fold scores plus aggregate assessment.
#[derive(Debug, Clone)]
pub struct CvAnalysis {
    pub scores: Vec<FoldScore>,
    pub mae: MetricStats,
    pub wape: MetricStats,
    pub band: AccuracyBand,
    /// True when fold WAPE spread stays under the stability threshold.
    pub stable: bool,
}

/// Classify the fold scores against the review thresholds.
pub fn analyze_cv_scores(scores: &[FoldScore]) -> Result<CvAnalysis, AppError> {
    if scores.is_empty() {
        return Err(AppError::empty("CV results contain no fold scores."));
    }
    for score in scores {
        if !score.mae.is_finite() || !score.wape.is_finite() {
            return Err(AppError::model(format!(
                "Non-finite metric in CV results (fold {}).",
                score.fold
            )));
        }
    }

    let maes: Vec<f64> = scores.iter().map(|s| s.mae).collect();
    let wapes: Vec<f64> = scores.iter().map(|s| s.wape).collect();
    let stats = |values: &[f64]| {
        MetricStats::from_values(values)
            .ok_or_else(|| AppError::empty("CV results contain no fold scores."))
    };
    let mae = stats(&maes)?;
    let wape = stats(&wapes)?;

    let band = if wape.mean < EXCELLENT_WAPE {
        AccuracyBand::Excellent
    } else if wape.mean < ACCEPTABLE_WAPE {
        AccuracyBand::Acceptable
    } else {
        AccuracyBand::NeedsImprovement
    };

    let stable = (wape.max - wape.min) < STABLE_WAPE_SPREAD;

    Ok(CvAnalysis {
        scores: scores.to_vec(),
        mae,
        wape,
        band,
        stable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(fold: usize, mae: f64, wape: f64) -> FoldScore {
        FoldScore { fold, mae, wape }
    }

    #[test]
    fn metric_stats_match_sample_std() {
        let stats = MetricStats::from_values(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((stats.mean - 2.5).abs() < 1e-12);
        // Sample std of 1..4 is sqrt(5/3).
        assert!((stats.std - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
    }

    #[test]
    fn single_fold_has_zero_std() {
        let stats = MetricStats::from_values(&[2.0]).unwrap();
        assert_eq!(stats.std, 0.0);
    }

    #[test]
    fn bands_follow_mean_wape() {
        let excellent = analyze_cv_scores(&[score(1, 5.0, 0.004), score(2, 5.0, 0.006)]).unwrap();
        assert_eq!(excellent.band, AccuracyBand::Excellent);

        let acceptable = analyze_cv_scores(&[score(1, 5.0, 0.02), score(2, 5.0, 0.025)]).unwrap();
        assert_eq!(acceptable.band, AccuracyBand::Acceptable);

        let poor = analyze_cv_scores(&[score(1, 5.0, 0.05), score(2, 5.0, 0.09)]).unwrap();
        assert_eq!(poor.band, AccuracyBand::NeedsImprovement);
    }

    #[test]
    fn stability_uses_one_point_spread() {
        let tight = analyze_cv_scores(&[score(1, 5.0, 0.020), score(2, 5.0, 0.028)]).unwrap();
        assert!(tight.stable);

        let loose = analyze_cv_scores(&[score(1, 5.0, 0.010), score(2, 5.0, 0.025)]).unwrap();
        assert!(!loose.stable);
    }

    #[test]
    fn empty_and_non_finite_rejected() {
        assert_eq!(analyze_cv_scores(&[]).unwrap_err().exit_code(), 3);
        let err = analyze_cv_scores(&[score(2, f64::NAN, 0.01)]).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("fold 2"));
    }
}
