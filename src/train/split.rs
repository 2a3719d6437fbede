//! Rolling time-series cross-validation folds.
//!
//! Fold arithmetic follows the standard expanding-window scheme used for
//! time-ordered data (scikit-learn's `TimeSeriesSplit`): with `n` samples and
//! `k` splits, each test window holds `n / (k + 1)` samples (integer
//! division), the windows tile the tail of the series, and every fold trains
//! on all samples before its test window. Later folds therefore always train
//! on strictly more history.

use std::ops::Range;

use crate::error::AppError;

/// Train/test row ranges for one fold (rows are assumed date-sorted).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldIndices {
    /// 1-based fold number.
    pub fold: usize,
    pub train: Range<usize>,
    pub test: Range<usize>,
}

/// Compute expanding-window folds over `n_samples` date-sorted rows.
pub fn time_series_folds(n_samples: usize, n_splits: usize) -> Result<Vec<FoldIndices>, AppError> {
    if n_splits < 2 {
        return Err(AppError::schema("Cross-validation needs at least 2 splits."));
    }
    let test_size = n_samples / (n_splits + 1);
    if test_size == 0 {
        return Err(AppError::empty(format!(
            "Too few rows ({n_samples}) for {n_splits}-fold time-series CV."
        )));
    }

    let first_test_start = n_samples - n_splits * test_size;
    let mut folds = Vec::with_capacity(n_splits);
    for i in 0..n_splits {
        let test_start = first_test_start + i * test_size;
        folds.push(FoldIndices {
            fold: i + 1,
            train: 0..test_start,
            test: test_start..test_start + test_size,
        });
    }
    Ok(folds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_match_reference_layout() {
        // n=12, k=5 -> test_size=2, first test starts at 2.
        let folds = time_series_folds(12, 5).unwrap();
        assert_eq!(folds.len(), 5);
        assert_eq!(folds[0].train, 0..2);
        assert_eq!(folds[0].test, 2..4);
        assert_eq!(folds[4].train, 0..10);
        assert_eq!(folds[4].test, 10..12);
    }

    #[test]
    fn uneven_division_keeps_head_in_first_train() {
        // n=13, k=5 -> test_size=2, first test starts at 3.
        let folds = time_series_folds(13, 5).unwrap();
        assert_eq!(folds[0].train, 0..3);
        assert_eq!(folds[4].test, 11..13);
    }

    #[test]
    fn windows_are_disjoint_and_expanding() {
        let folds = time_series_folds(100, 5).unwrap();
        for pair in folds.windows(2) {
            assert_eq!(pair[0].test.end, pair[1].test.start);
            assert!(pair[1].train.end > pair[0].train.end);
        }
        // Every fold trains only on rows before its test window.
        for f in &folds {
            assert_eq!(f.train.end, f.test.start);
            assert_eq!(f.train.start, 0);
        }
    }

    #[test]
    fn too_few_rows_is_an_error() {
        assert!(time_series_folds(5, 5).is_err());
        assert!(time_series_folds(6, 5).is_ok());
    }

    #[test]
    fn single_split_rejected() {
        assert!(time_series_folds(100, 1).is_err());
    }
}
