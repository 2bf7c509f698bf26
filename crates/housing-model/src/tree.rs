//! CART regression tree with a squared-error split criterion.
//!
//! Nodes live in a flat arena (`Vec<Node>`) and refer to their children by
//! index. Features are scanned in column order and only strictly better
//! splits replace the incumbent, so fitting is fully deterministic.

use crate::error::ModelError;
use crate::model::{check_training_data, Regressor};
use ndarray::{Array1, ArrayView1, ArrayView2};
use tracing::debug;

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Decision tree regressor.
///
/// Default score: R² (see [`Regressor::score`]).
#[derive(Debug, Clone)]
pub struct DecisionTreeRegressor {
    max_depth: Option<usize>,
    min_samples_split: usize,
    min_samples_leaf: usize,
    nodes: Vec<Node>,
    n_features: Option<usize>,
}

impl Default for DecisionTreeRegressor {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            nodes: Vec::new(),
            n_features: None,
        }
    }
}

/// Best split found for a node.
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    sse: f64,
}

impl DecisionTreeRegressor {
    /// Fully grown tree: no depth limit, split while a node has ≥ 2 rows.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_min_samples_split(mut self, n: usize) -> Self {
        self.min_samples_split = n.max(2);
        self
    }

    pub fn with_min_samples_leaf(mut self, n: usize) -> Self {
        self.min_samples_leaf = n.max(1);
        self
    }

    /// Number of nodes in the fitted tree (0 before fitting).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the fitted tree; a single leaf has depth 0.
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    fn build(
        &mut self,
        x: &ArrayView2<'_, f64>,
        y: &ArrayView1<'_, f64>,
        indices: Vec<usize>,
        depth: usize,
    ) -> usize {
        let n = indices.len() as f64;
        let mean = indices.iter().map(|&i| y[i]).sum::<f64>() / n;
        let sse: f64 = indices.iter().map(|&i| (y[i] - mean).powi(2)).sum();

        let id = self.nodes.len();
        self.nodes.push(Node::Leaf { value: mean });

        let depth_reached = self.max_depth.is_some_and(|d| depth >= d);
        if depth_reached || indices.len() < self.min_samples_split || sse <= f64::EPSILON {
            return id;
        }

        let Some(best) = self.best_split(x, y, &indices) else {
            return id;
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| x[[i, best.feature]] <= best.threshold);
        if left_idx.is_empty() || right_idx.is_empty() {
            return id;
        }

        let left = self.build(x, y, left_idx, depth + 1);
        let right = self.build(x, y, right_idx, depth + 1);
        self.nodes[id] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        id
    }

    fn best_split(
        &self,
        x: &ArrayView2<'_, f64>,
        y: &ArrayView1<'_, f64>,
        indices: &[usize],
    ) -> Option<SplitCandidate> {
        let n = indices.len();
        let total_sum: f64 = indices.iter().map(|&i| y[i]).sum();
        let total_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();
        let mut best: Option<SplitCandidate> = None;
        let mut sorted = indices.to_vec();

        for feature in 0..x.ncols() {
            sorted.sort_by(|&a, &b| x[[a, feature]].total_cmp(&x[[b, feature]]));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for pos in 1..n {
                let prev = sorted[pos - 1];
                left_sum += y[prev];
                left_sq += y[prev] * y[prev];

                let lo = x[[prev, feature]];
                let hi = x[[sorted[pos], feature]];
                if lo >= hi || pos < self.min_samples_leaf || n - pos < self.min_samples_leaf {
                    continue;
                }

                let right_n = (n - pos) as f64;
                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / pos as f64)
                    + (right_sq - right_sum * right_sum / right_n);

                let mid = lo + (hi - lo) / 2.0;
                // Adjacent floats can round the midpoint up to `hi`.
                let threshold = if mid >= hi { lo } else { mid };
                // Infinite endpoints give a NaN or infinite midpoint, which
                // would not separate `lo` from `hi`.
                if !threshold.is_finite() {
                    continue;
                }

                if best.as_ref().is_none_or(|b| sse < b.sse) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        sse,
                    });
                }
            }
        }

        best
    }
}

impl Regressor for DecisionTreeRegressor {
    fn name(&self) -> &str {
        "DecisionTree"
    }

    fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<(), ModelError> {
        check_training_data(&x, &y)?;
        self.nodes.clear();
        self.n_features = Some(x.ncols());
        self.build(&x, &y, (0..x.nrows()).collect(), 0);
        debug!(
            "Fitted decision tree: {} nodes, depth {}",
            self.nodes.len(),
            self.depth()
        );
        Ok(())
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>, ModelError> {
        let n_features = self.n_features.ok_or_else(|| ModelError::NotFitted {
            model: self.name().to_string(),
        })?;
        if x.ncols() != n_features {
            return Err(ModelError::shape("feature count", n_features, x.ncols()));
        }

        let preds = x
            .rows()
            .into_iter()
            .map(|row| {
                let mut idx = 0;
                loop {
                    match self.nodes[idx] {
                        Node::Leaf { value } => break value,
                        Node::Split {
                            feature,
                            threshold,
                            left,
                            right,
                        } => {
                            idx = if row[feature] <= threshold { left } else { right };
                        }
                    }
                }
            })
            .collect();
        Ok(preds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn memorises_distinct_rows() {
        let x = array![[1.0, 0.0], [2.0, 1.0], [3.0, 0.0], [4.0, 1.0], [5.0, 0.5]];
        let y = array![3.0, -1.0, 7.5, 2.0, 0.0];
        let mut tree = DecisionTreeRegressor::new();
        tree.fit(x.view(), y.view()).unwrap();
        assert_eq!(tree.predict(x.view()).unwrap(), y);
    }

    #[test]
    fn step_function_threshold_is_midpoint() {
        let x = array![[0.0], [1.0], [10.0], [11.0]];
        let y = array![1.0, 1.0, 5.0, 5.0];
        let mut tree = DecisionTreeRegressor::new();
        tree.fit(x.view(), y.view()).unwrap();
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.depth(), 1);
        let queries = array![[5.4], [5.6]];
        assert_eq!(tree.predict(queries.view()).unwrap(), array![1.0, 5.0]);
    }

    #[test]
    fn max_depth_limits_growth() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0]];
        let y = array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut tree = DecisionTreeRegressor::new().with_max_depth(1);
        tree.fit(x.view(), y.view()).unwrap();
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn duplicate_features_average_targets() {
        let x = array![[1.0], [1.0]];
        let y = array![2.0, 4.0];
        let mut tree = DecisionTreeRegressor::new();
        tree.fit(x.view(), y.view()).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict(x.view()).unwrap(), array![3.0, 3.0]);
    }

    #[test]
    fn min_samples_leaf_blocks_small_split() {
        // The best unconstrained split isolates the single outlier row.
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![0.0, 0.0, 0.0, 100.0];

        let mut free = DecisionTreeRegressor::new().with_max_depth(1);
        free.fit(x.view(), y.view()).unwrap();
        assert_eq!(free.predict(array![[3.0], [4.0]].view()).unwrap(), array![0.0, 100.0]);

        let mut tree = DecisionTreeRegressor::new()
            .with_max_depth(1)
            .with_min_samples_leaf(2);
        tree.fit(x.view(), y.view()).unwrap();
        assert_eq!(tree.node_count(), 3);
        assert_eq!(
            tree.predict(array![[1.0], [2.0], [3.0], [4.0]].view()).unwrap(),
            array![0.0, 0.0, 50.0, 50.0]
        );
    }

    #[test]
    fn min_samples_leaf_larger_than_half_keeps_single_leaf() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![1.0, 2.0, 3.0];
        let mut tree = DecisionTreeRegressor::new().with_min_samples_leaf(2);
        tree.fit(x.view(), y.view()).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict(x.view()).unwrap(), array![2.0, 2.0, 2.0]);
    }

    #[test]
    fn min_samples_split_stops_at_small_nodes() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![1.0, 2.0, 3.0, 4.0];
        let mut tree = DecisionTreeRegressor::new().with_min_samples_split(3);
        tree.fit(x.view(), y.view()).unwrap();
        // Root splits 2 / 2; neither child has enough rows to split again.
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn nan_feature_is_an_error() {
        let x = array![[1.0], [f64::NAN], [3.0]];
        let y = array![1.0, 2.0, 3.0];
        let mut tree = DecisionTreeRegressor::new();
        assert!(matches!(
            tree.fit(x.view(), y.view()),
            Err(ModelError::NonFinite { .. })
        ));
    }

    #[test]
    fn split_search_skips_infinite_endpoints() {
        let tree = DecisionTreeRegressor::new();
        let x = array![[f64::NEG_INFINITY], [1.0], [2.0]];
        let y = array![0.0, 10.0, 20.0];
        let best = tree.best_split(&x.view(), &y.view(), &[0, 1, 2]).unwrap();
        assert_eq!(best.threshold, 1.5);

        let x = array![[f64::NEG_INFINITY], [f64::NEG_INFINITY], [1.0]];
        let best = tree.best_split(&x.view(), &y.view(), &[0, 1, 2]);
        assert!(best.is_none());
    }

    #[test]
    fn predict_before_fit_fails() {
        let tree = DecisionTreeRegressor::new();
        assert!(matches!(
            tree.predict(array![[1.0]].view()),
            Err(ModelError::NotFitted { .. })
        ));
    }

    #[test]
    fn refit_replaces_previous_tree() {
        let mut tree = DecisionTreeRegressor::new();
        tree.fit(array![[0.0], [1.0]].view(), array![0.0, 1.0].view())
            .unwrap();
        tree.fit(array![[0.0], [1.0]].view(), array![9.0, 9.0].view())
            .unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict(array![[0.0]].view()).unwrap(), array![9.0]);
    }

    #[test]
    fn wrong_feature_count_rejected() {
        let mut tree = DecisionTreeRegressor::new();
        tree.fit(array![[0.0, 1.0]].view(), array![1.0].view()).unwrap();
        assert!(tree.predict(array![[0.0]].view()).is_err());
    }
}
