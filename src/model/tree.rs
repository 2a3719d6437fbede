//! CART regression trees.
//!
//! A tree is grown greedily: at each node we scan every feature for the
//! axis-aligned split that minimizes the summed squared error of the two
//! children, subject to `max_depth` and `min_samples_leaf`. Thresholds are
//! midpoints between adjacent distinct feature values, so training is fully
//! deterministic for a given sample.
//!
//! Split scoring uses prefix sums of `y` and `y²` over the rows sorted by the
//! candidate feature, which makes each feature scan O(n log n).

use serde::{Deserialize, Serialize};

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_leaf: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    root: TreeNode,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    children_sse: f64,
}

impl RegressionTree {
    /// Fit a tree on the rows selected by `sample` (indices into `x`/`y`,
    /// possibly repeated — bootstrap resamples reuse indices).
    pub fn fit(x: &[Vec<f64>], y: &[f64], sample: &[usize], params: &TreeParams) -> Self {
        let root = grow(x, y, sample.to_vec(), 0, params);
        Self { root }
    }

    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold { left } else { right };
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        fn walk(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Split { left, right, .. } => 1 + walk(left).max(walk(right)),
            }
        }
        walk(&self.root)
    }
}

fn grow(x: &[Vec<f64>], y: &[f64], idx: Vec<usize>, depth: usize, params: &TreeParams) -> TreeNode {
    let n = idx.len() as f64;
    let sum: f64 = idx.iter().map(|&i| y[i]).sum();
    let sum2: f64 = idx.iter().map(|&i| y[i] * y[i]).sum();
    let value = sum / n;
    let node_sse = sum2 - sum * sum / n;

    if depth >= params.max_depth || idx.len() < 2 * params.min_samples_leaf || node_sse <= 0.0 {
        return TreeNode::Leaf { value };
    }

    let Some(split) = best_split(x, y, &idx, params.min_samples_leaf) else {
        return TreeNode::Leaf { value };
    };

    // Require an actual SSE improvement; otherwise splitting is pointless.
    if split.children_sse >= node_sse - 1e-12 {
        return TreeNode::Leaf { value };
    }

    let (left_idx, right_idx): (Vec<usize>, Vec<usize>) =
        idx.into_iter().partition(|&i| x[i][split.feature] <= split.threshold);

    TreeNode::Split {
        feature: split.feature,
        threshold: split.threshold,
        left: Box::new(grow(x, y, left_idx, depth + 1, params)),
        right: Box::new(grow(x, y, right_idx, depth + 1, params)),
    }
}

/// Find the split minimizing total child SSE across all features.
///
/// Ties keep the earliest feature / earliest threshold, which keeps the tree
/// deterministic.
fn best_split(x: &[Vec<f64>], y: &[f64], idx: &[usize], min_leaf: usize) -> Option<BestSplit> {
    let n = idx.len();
    let n_features = x[idx[0]].len();
    let mut best: Option<BestSplit> = None;

    let mut order: Vec<usize> = Vec::with_capacity(n);
    for feature in 0..n_features {
        order.clear();
        order.extend_from_slice(idx);
        order.sort_by(|&a, &b| {
            x[a][feature]
                .partial_cmp(&x[b][feature])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // Prefix sums over the sorted order.
        let mut left_sum = 0.0;
        let mut left_sum2 = 0.0;
        let total_sum: f64 = order.iter().map(|&i| y[i]).sum();
        let total_sum2: f64 = order.iter().map(|&i| y[i] * y[i]).sum();

        for k in 1..n {
            let i = order[k - 1];
            left_sum += y[i];
            left_sum2 += y[i] * y[i];

            if k < min_leaf || n - k < min_leaf {
                continue;
            }

            let lo = x[order[k - 1]][feature];
            let hi = x[order[k]][feature];
            if lo == hi {
                // No threshold separates equal values.
                continue;
            }

            let nl = k as f64;
            let nr = (n - k) as f64;
            let right_sum = total_sum - left_sum;
            let right_sum2 = total_sum2 - left_sum2;
            let sse = (left_sum2 - left_sum * left_sum / nl) + (right_sum2 - right_sum * right_sum / nr);

            let better = match &best {
                None => true,
                Some(b) => sse < b.children_sse,
            };
            if better {
                best = Some(BestSplit {
                    feature,
                    threshold: lo + (hi - lo) / 2.0,
                    children_sse: sse,
                });
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(vals: &[f64]) -> Vec<Vec<f64>> {
        vals.iter().map(|&v| vec![v]).collect()
    }

    fn all_indices(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn constant_target_yields_single_leaf() {
        let x = rows(&[1.0, 2.0, 3.0, 4.0]);
        let y = [5.0, 5.0, 5.0, 5.0];
        let tree = RegressionTree::fit(
            &x,
            &y,
            &all_indices(4),
            &TreeParams {
                max_depth: 4,
                min_samples_leaf: 1,
            },
        );
        assert_eq!(tree.depth(), 0);
        assert!((tree.predict_row(&[10.0]) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn step_function_is_recovered() {
        // y jumps from 0 to 10 at x = 5.
        let x = rows(&[1.0, 2.0, 3.0, 4.0, 6.0, 7.0, 8.0, 9.0]);
        let y = [0.0, 0.0, 0.0, 0.0, 10.0, 10.0, 10.0, 10.0];
        let tree = RegressionTree::fit(
            &x,
            &y,
            &all_indices(8),
            &TreeParams {
                max_depth: 3,
                min_samples_leaf: 1,
            },
        );
        assert!((tree.predict_row(&[0.0]) - 0.0).abs() < 1e-12);
        assert!((tree.predict_row(&[9.5]) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn min_samples_leaf_is_respected() {
        let x = rows(&[1.0, 2.0, 3.0, 4.0]);
        let y = [0.0, 0.0, 10.0, 10.0];
        // min_samples_leaf = 3 makes any split illegal on 4 rows.
        let tree = RegressionTree::fit(
            &x,
            &y,
            &all_indices(4),
            &TreeParams {
                max_depth: 5,
                min_samples_leaf: 3,
            },
        );
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn max_depth_zero_is_a_stump() {
        let x = rows(&[1.0, 2.0, 3.0, 4.0]);
        let y = [0.0, 1.0, 2.0, 3.0];
        let tree = RegressionTree::fit(
            &x,
            &y,
            &all_indices(4),
            &TreeParams {
                max_depth: 0,
                min_samples_leaf: 1,
            },
        );
        assert!((tree.predict_row(&[2.0]) - 1.5).abs() < 1e-12);
    }
}
