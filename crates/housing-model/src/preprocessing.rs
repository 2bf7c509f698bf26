//! Train/test splitting and feature standardisation.
//!
//! The fitted [`StandardScaler`] is an immutable value: it is computed from
//! training rows only and then applied, read-only, to any matrix with the
//! same columns. That keeps test statistics from leaking into training.

use crate::error::ModelError;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of [`train_test_split_data`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
}

/// Randomly partition rows into a training and a test set.
///
/// The rows are permuted with an RNG seeded from `seed`; the first
/// `ceil(test_size * n)` permuted rows become the test set and the rest the
/// training set. Identical inputs and seed always give the identical split.
pub fn train_test_split_data(
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
    test_size: f64,
    seed: u64,
) -> Result<TrainTestSplit, ModelError> {
    let n = x.nrows();
    if y.len() != n {
        return Err(ModelError::shape("target length", n, y.len()));
    }
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(ModelError::InvalidSplit(format!(
            "test_size must be in (0, 1), got {test_size}"
        )));
    }

    let n_test = (test_size * n as f64).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(ModelError::InvalidSplit(format!(
            "{n} rows with test_size {test_size} leaves an empty set (train={n_train}, test={n_test})"
        )));
    }

    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);
    let (test_idx, train_idx) = order.split_at(n_test);
    debug!("Split {} rows into {} train / {} test", n, n_train, n_test);

    Ok(TrainTestSplit {
        x_train: x.select(Axis(0), train_idx),
        x_test: x.select(Axis(0), test_idx),
        y_train: y.select(Axis(0), train_idx),
        y_test: y.select(Axis(0), test_idx),
    })
}

/// Per-feature standardisation `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Compute column means and population standard deviations.
    ///
    /// Constant columns get a scale of 1.0 so they map to zero instead of NaN.
    pub fn fit(x: ArrayView2<'_, f64>) -> Result<Self, ModelError> {
        if x.nrows() == 0 {
            return Err(ModelError::EmptyInput("cannot fit a scaler on zero rows"));
        }
        let mean = x
            .mean_axis(Axis(0))
            .ok_or(ModelError::EmptyInput("cannot fit a scaler on zero rows"))?;
        let std = x.std_axis(Axis(0), 0.0);
        let scale = std
            .iter()
            .map(|&s| if s == 0.0 || !s.is_finite() { 1.0 } else { s })
            .collect();
        Ok(Self {
            mean: mean.to_vec(),
            scale,
        })
    }

    /// Apply the fitted transform to a matrix with the same column count.
    pub fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, ModelError> {
        if x.ncols() != self.mean.len() {
            return Err(ModelError::shape("feature count", self.mean.len(), x.ncols()));
        }
        let mut out = x.to_owned();
        for (mut col, (m, s)) in out
            .columns_mut()
            .into_iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
        {
            col.mapv_inplace(|v| (v - m) / s);
        }
        Ok(out)
    }

    pub fn fit_transform(x: ArrayView2<'_, f64>) -> Result<(Self, Array2<f64>), ModelError> {
        let scaler = Self::fit(x)?;
        let out = scaler.transform(x)?;
        Ok((scaler, out))
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }
}

/// Output of [`scale_data`]: both matrices plus the scaler that produced them.
#[derive(Debug, Clone)]
pub struct ScaledData {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub scaler: StandardScaler,
}

/// Fit a scaler on `x_train` only and apply it to both matrices.
pub fn scale_data(
    x_train: ArrayView2<'_, f64>,
    x_test: ArrayView2<'_, f64>,
) -> Result<ScaledData, ModelError> {
    let (scaler, train) = StandardScaler::fit_transform(x_train)?;
    let test = scaler.transform(x_test)?;
    Ok(ScaledData {
        x_train: train,
        x_test: test,
        scaler,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn grid(rows: usize) -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((rows, 3), |(i, j)| (i * 3 + j) as f64);
        let y = Array1::from_shape_fn(rows, |i| i as f64);
        (x, y)
    }

    #[test]
    fn split_sizes_round_test_up() {
        let (x, y) = grid(11);
        let s = train_test_split_data(x.view(), y.view(), 0.2, 42).unwrap();
        assert_eq!(s.x_test.nrows(), 3);
        assert_eq!(s.x_train.nrows(), 8);
        assert_eq!(s.y_test.len(), 3);
        assert_eq!(s.y_train.len(), 8);
    }

    #[test]
    fn split_keeps_rows_aligned() {
        let (x, y) = grid(20);
        let s = train_test_split_data(x.view(), y.view(), 0.25, 7).unwrap();
        for (row, target) in s.x_train.rows().into_iter().zip(s.y_train.iter()) {
            assert_eq!(row[0], target * 3.0);
        }
        for (row, target) in s.x_test.rows().into_iter().zip(s.y_test.iter()) {
            assert_eq!(row[0], target * 3.0);
        }
    }

    #[test]
    fn split_is_a_partition() {
        let (x, y) = grid(30);
        let s = train_test_split_data(x.view(), y.view(), 0.3, 1).unwrap();
        let mut all: Vec<f64> = s.y_train.iter().chain(s.y_test.iter()).copied().collect();
        all.sort_by(f64::total_cmp);
        assert_eq!(all, y.to_vec());
    }

    #[test]
    fn split_rejects_bad_ratio() {
        let (x, y) = grid(5);
        assert!(train_test_split_data(x.view(), y.view(), 0.0, 1).is_err());
        assert!(train_test_split_data(x.view(), y.view(), 1.0, 1).is_err());
        assert!(train_test_split_data(x.view(), y.view(), f64::NAN, 1).is_err());
    }

    #[test]
    fn split_rejects_single_row() {
        let (x, y) = grid(1);
        assert!(matches!(
            train_test_split_data(x.view(), y.view(), 0.5, 1),
            Err(ModelError::InvalidSplit(_))
        ));
    }

    #[test]
    fn scaler_standardises_training_data() {
        let x = array![[1.0, 10.0, 3.0], [2.0, 20.0, 3.0], [3.0, 60.0, 3.0], [6.0, 30.0, 3.0]];
        let (scaler, z) = StandardScaler::fit_transform(x.view()).unwrap();
        for (j, col) in z.columns().into_iter().enumerate() {
            let mean = col.mean().unwrap();
            assert!(mean.abs() < 1e-12, "col {j} mean {mean}");
            if j < 2 {
                let var = col.var(0.0);
                assert!((var - 1.0).abs() < 1e-12, "col {j} var {var}");
            }
        }
        // Constant column keeps scale 1 and maps to zero
        assert_eq!(scaler.scale()[2], 1.0);
        assert!(z.column(2).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn scale_data_uses_training_statistics_only() {
        let train = array![[0.0], [2.0]];
        let test = array![[4.0]];
        let scaled = scale_data(train.view(), test.view()).unwrap();
        assert_eq!(scaled.scaler.mean(), &[1.0]);
        assert_eq!(scaled.scaler.scale(), &[1.0]);
        assert_eq!(scaled.x_test, array![[3.0]]);
    }

    #[test]
    fn transform_rejects_wrong_width() {
        let scaler = StandardScaler::fit(array![[1.0, 2.0]].view()).unwrap();
        assert!(scaler.transform(array![[1.0]].view()).is_err());
    }
}
