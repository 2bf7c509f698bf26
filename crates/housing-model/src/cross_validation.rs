//! K-fold cross-validation.
//!
//! ## Partitioning
//!
//! Row indices `0..n` are shuffled with an RNG seeded from [`KFold::seed`]
//! and cut into `k` contiguous groups. The first `n % k` groups get one extra
//! row, so group sizes never differ by more than one. Group `i` is the
//! validation set of fold `i`; every other group together is its training
//! set. The validation groups are pairwise disjoint and cover every row
//! exactly once.
//!
//! ## Model ownership
//!
//! [`cross_val_score_avg`] borrows the model mutably for the whole call and
//! refits it on every fold. When the call returns the model holds whatever
//! the last fold's fit produced; callers must refit before reusing it.

use crate::error::ModelError;
use crate::metrics::Scorer;
use crate::model::Regressor;
use ndarray::{ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default number of folds.
pub const DEFAULT_FOLDS: usize = 5;

/// Shuffled k-fold splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KFold {
    pub n_splits: usize,
    pub seed: u64,
}

impl Default for KFold {
    fn default() -> Self {
        Self {
            n_splits: DEFAULT_FOLDS,
            seed: 42,
        }
    }
}

/// One round of k-fold: the rows to train on and the rows to validate on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
}

impl KFold {
    pub fn new(n_splits: usize, seed: u64) -> Self {
        Self { n_splits, seed }
    }

    /// Partition `n_rows` rows into `n_splits` folds.
    ///
    /// Fails when `n_splits < 2` or `n_splits > n_rows`.
    pub fn split(&self, n_rows: usize) -> Result<Vec<Fold>, ModelError> {
        let k = self.n_splits;
        if k < 2 || k > n_rows {
            return Err(ModelError::InvalidFoldCount {
                folds: k,
                rows: n_rows,
            });
        }

        let mut order: Vec<usize> = (0..n_rows).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        order.shuffle(&mut rng);

        let base = n_rows / k;
        let extra = n_rows % k;
        let mut bounds = Vec::with_capacity(k + 1);
        bounds.push(0);
        for i in 0..k {
            let size = base + usize::from(i < extra);
            bounds.push(bounds[i] + size);
        }

        let folds = (0..k)
            .map(|i| {
                let (start, end) = (bounds[i], bounds[i + 1]);
                let validation = order[start..end].to_vec();
                let train = order[..start]
                    .iter()
                    .chain(order[end..].iter())
                    .copied()
                    .collect();
                Fold { train, validation }
            })
            .collect();
        Ok(folds)
    }
}

/// Averaged cross-validation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValScore {
    /// Arithmetic mean of [`CrossValScore::scores`].
    pub mean: f64,
    /// One score per fold, in fold order.
    pub scores: Vec<f64>,
}

/// Estimate generalisation performance by averaging a score over k folds.
///
/// For each fold the model is refitted on the training rows and asked to
/// predict the validation rows. The fold score is `scoring(y_true, y_pred)`
/// or, without a scorer, the model's own [`Regressor::score`] on the
/// validation rows. Any failure aborts the whole run; the error names the
/// fold it came from.
///
/// # Example
/// ```rust
/// use housing_model::{cross_val_score_avg, metrics, DecisionTreeRegressor, KFold};
/// use ndarray::{Array1, Array2};
///
/// let x = Array2::from_shape_fn((20, 2), |(i, j)| (i * 2 + j) as f64);
/// let y = Array1::from_shape_fn(20, |i| i as f64);
/// let mut model = DecisionTreeRegressor::new();
///
/// let cv = cross_val_score_avg(
///     &mut model,
///     x.view(),
///     y.view(),
///     &KFold::new(4, 42),
///     Some(&metrics::mean_squared_error),
/// )
/// .unwrap();
/// assert_eq!(cv.scores.len(), 4);
/// ```
pub fn cross_val_score_avg<M>(
    model: &mut M,
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
    kfold: &KFold,
    scoring: Option<&Scorer>,
) -> Result<CrossValScore, ModelError>
where
    M: Regressor + ?Sized,
{
    if x.nrows() != y.len() {
        return Err(ModelError::shape("target length", x.nrows(), y.len()));
    }
    let folds = kfold.split(x.nrows())?;
    info!(
        "Cross-validating {} on {} rows with {} folds",
        model.name(),
        x.nrows(),
        folds.len()
    );

    let mut scores = Vec::with_capacity(folds.len());
    for (i, fold) in folds.iter().enumerate() {
        let fold_num = i + 1;
        let score = run_fold(model, x, y, fold, scoring).map_err(|e| ModelError::FoldFailed {
            fold: fold_num,
            source: Box::new(e),
        })?;
        debug!(
            "Fold {}/{}: train={} validation={} score={}",
            fold_num,
            folds.len(),
            fold.train.len(),
            fold.validation.len(),
            score
        );
        scores.push(score);
    }

    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    Ok(CrossValScore { mean, scores })
}

fn run_fold<M>(
    model: &mut M,
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
    fold: &Fold,
    scoring: Option<&Scorer>,
) -> Result<f64, ModelError>
where
    M: Regressor + ?Sized,
{
    let x_train = x.select(Axis(0), &fold.train);
    let y_train = y.select(Axis(0), &fold.train);
    let x_val = x.select(Axis(0), &fold.validation);
    let y_val = y.select(Axis(0), &fold.validation);

    model.fit(x_train.view(), y_train.view())?;
    let preds = model.predict(x_val.view())?;
    match scoring {
        Some(score_fn) => score_fn(y_val.view(), preds.view()),
        None => model.score(x_val.view(), y_val.view()),
    }
}

/// Score a fitted model once on held-out data.
pub fn evaluate_model<M>(
    model: &M,
    x_test: ArrayView2<'_, f64>,
    y_test: ArrayView1<'_, f64>,
    metric: &Scorer,
) -> Result<f64, ModelError>
where
    M: Regressor + ?Sized,
{
    let preds = model.predict(x_test)?;
    metric(y_test, preds.view())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::mean_squared_error;
    use crate::tree::DecisionTreeRegressor;
    use ndarray::{Array1, Array2};

    fn linear_data(n: usize) -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((n, 2), |(i, j)| (i + j) as f64);
        let y = Array1::from_shape_fn(n, |i| 2.0 * i as f64 + 1.0);
        (x, y)
    }

    #[test]
    fn fold_sizes_differ_by_at_most_one() {
        let folds = KFold::new(3, 0).split(10).unwrap();
        let sizes: Vec<usize> = folds.iter().map(|f| f.validation.len()).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
        for f in &folds {
            assert_eq!(f.train.len() + f.validation.len(), 10);
        }
    }

    #[test]
    fn leave_one_out_when_k_equals_n() {
        let folds = KFold::new(4, 9).split(4).unwrap();
        assert!(folds.iter().all(|f| f.validation.len() == 1));
    }

    #[test]
    fn too_many_folds_rejected() {
        assert!(matches!(
            KFold::new(6, 0).split(5),
            Err(ModelError::InvalidFoldCount { folds: 6, rows: 5 })
        ));
        assert!(KFold::new(1, 0).split(5).is_err());
    }

    #[test]
    fn mean_is_average_of_scores() {
        let (x, y) = linear_data(23);
        let mut model = DecisionTreeRegressor::new();
        let cv = cross_val_score_avg(
            &mut model,
            x.view(),
            y.view(),
            &KFold::default(),
            Some(&mean_squared_error),
        )
        .unwrap();
        assert_eq!(cv.scores.len(), DEFAULT_FOLDS);
        let avg = cv.scores.iter().sum::<f64>() / cv.scores.len() as f64;
        assert!((cv.mean - avg).abs() < 1e-12);
    }

    #[test]
    fn default_scoring_uses_model_score() {
        let (x, y) = linear_data(30);
        let mut model = DecisionTreeRegressor::new();
        let cv = cross_val_score_avg(&mut model, x.view(), y.view(), &KFold::new(3, 1), None)
            .unwrap();
        // A fully grown tree on a monotone target is a good but imperfect fit.
        assert!(cv.scores.iter().all(|&s| s > 0.9 && s <= 1.0), "{:?}", cv.scores);
    }

    #[test]
    fn scoring_error_aborts_with_fold_number() {
        let (x, y) = linear_data(10);
        let mut model = DecisionTreeRegressor::new();
        fn failing(_: ArrayView1<'_, f64>, _: ArrayView1<'_, f64>) -> Result<f64, ModelError> {
            Err(ModelError::Scoring("refused".into()))
        }
        let err = cross_val_score_avg(&mut model, x.view(), y.view(), &KFold::new(2, 0), Some(&failing))
            .unwrap_err();
        match err {
            ModelError::FoldFailed { fold, source } => {
                assert_eq!(fold, 1);
                assert!(matches!(*source, ModelError::Scoring(_)));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn misaligned_target_rejected() {
        let (x, _) = linear_data(10);
        let y = Array1::<f64>::zeros(9);
        let mut model = DecisionTreeRegressor::new();
        assert!(matches!(
            cross_val_score_avg(&mut model, x.view(), y.view(), &KFold::default(), None),
            Err(ModelError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn evaluate_model_scores_once() {
        let (x, y) = linear_data(8);
        let mut model = DecisionTreeRegressor::new();
        model.fit(x.view(), y.view()).unwrap();
        let mse = evaluate_model(&model, x.view(), y.view(), &mean_squared_error).unwrap();
        assert_eq!(mse, 0.0);
    }
}
