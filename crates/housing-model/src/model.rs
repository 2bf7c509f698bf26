//! The [`Regressor`] trait shared by every model in the pipeline.

use crate::error::ModelError;
use crate::metrics::r2_score;
use ndarray::{Array1, ArrayView1, ArrayView2};

/// A trainable regression model.
///
/// `fit` replaces any previously learned state, so a single instance can be
/// refitted repeatedly (cross-validation relies on this).
pub trait Regressor {
    /// Short display name used in reports, e.g. `"DecisionTree"`.
    fn name(&self) -> &str;

    /// Learn from `x` (n × m) and `y` (n).
    fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<(), ModelError>;

    /// Predict one value per row of `x`.
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>, ModelError>;

    /// Default goodness-of-fit on `(x, y)`: the R² of this model's predictions.
    ///
    /// Implementors may override this with a model-specific measure.
    fn score(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64, ModelError> {
        let pred = self.predict(x)?;
        r2_score(y, pred.view())
    }
}

impl<R: Regressor + ?Sized> Regressor for Box<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<(), ModelError> {
        (**self).fit(x, y)
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>, ModelError> {
        (**self).predict(x)
    }

    fn score(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<f64, ModelError> {
        (**self).score(x, y)
    }
}

/// Check that `x` and `y` describe the same rows, are non-empty and hold
/// only finite values.
pub(crate) fn check_training_data(
    x: &ArrayView2<'_, f64>,
    y: &ArrayView1<'_, f64>,
) -> Result<(), ModelError> {
    if x.nrows() != y.len() {
        return Err(ModelError::shape("target length", x.nrows(), y.len()));
    }
    if x.nrows() == 0 {
        return Err(ModelError::EmptyInput("cannot fit on zero rows"));
    }
    if !x.iter().all(|v| v.is_finite()) {
        return Err(ModelError::NonFinite { what: "features" });
    }
    if !y.iter().all(|v| v.is_finite()) {
        return Err(ModelError::NonFinite { what: "target" });
    }
    Ok(())
}
