//! Regression metrics.
//!
//! Every metric takes `(y_true, y_pred)` in that order, matching the
//! [`Scorer`] signature used by cross-validation.

use crate::error::ModelError;
use ndarray::ArrayView1;

/// A scoring function `(y_true, y_pred) -> score`.
pub type Scorer = dyn Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>) -> Result<f64, ModelError>;

fn check_pair(y_true: &ArrayView1<'_, f64>, y_pred: &ArrayView1<'_, f64>) -> Result<(), ModelError> {
    if y_true.len() != y_pred.len() {
        return Err(ModelError::shape("prediction length", y_true.len(), y_pred.len()));
    }
    if y_true.is_empty() {
        return Err(ModelError::EmptyInput("metric needs at least one sample"));
    }
    Ok(())
}

/// Average of squared differences.
pub fn mean_squared_error(
    y_true: ArrayView1<'_, f64>,
    y_pred: ArrayView1<'_, f64>,
) -> Result<f64, ModelError> {
    check_pair(&y_true, &y_pred)?;
    let sum: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    Ok(sum / y_true.len() as f64)
}

/// Average of absolute differences.
pub fn mean_absolute_error(
    y_true: ArrayView1<'_, f64>,
    y_pred: ArrayView1<'_, f64>,
) -> Result<f64, ModelError> {
    check_pair(&y_true, &y_pred)?;
    let sum: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).abs())
        .sum();
    Ok(sum / y_true.len() as f64)
}

/// Negated MAE, so that larger is better.
pub fn neg_mean_absolute_error(
    y_true: ArrayView1<'_, f64>,
    y_pred: ArrayView1<'_, f64>,
) -> Result<f64, ModelError> {
    mean_absolute_error(y_true, y_pred).map(|v| -v)
}

/// Coefficient of determination.
///
/// A constant `y_true` yields 1.0 for a perfect prediction and 0.0 otherwise.
pub fn r2_score(y_true: ArrayView1<'_, f64>, y_pred: ArrayView1<'_, f64>) -> Result<f64, ModelError> {
    check_pair(&y_true, &y_pred)?;
    let mean = y_true.sum() / y_true.len() as f64;
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn mse_and_mae() {
        let t = array![1.0, 2.0, 3.0];
        let p = array![1.0, 4.0, 0.0];
        assert_eq!(mean_squared_error(t.view(), p.view()).unwrap(), 13.0 / 3.0);
        assert_eq!(mean_absolute_error(t.view(), p.view()).unwrap(), 5.0 / 3.0);
        assert_eq!(neg_mean_absolute_error(t.view(), p.view()).unwrap(), -5.0 / 3.0);
    }

    #[test]
    fn r2_perfect_and_mean_predictor() {
        let t = array![1.0, 2.0, 3.0, 4.0];
        assert_eq!(r2_score(t.view(), t.view()).unwrap(), 1.0);
        let mean = array![2.5, 2.5, 2.5, 2.5];
        assert!(r2_score(t.view(), mean.view()).unwrap().abs() < 1e-12);
    }

    #[test]
    fn r2_constant_target() {
        let t = array![5.0, 5.0];
        assert_eq!(r2_score(t.view(), t.view()).unwrap(), 1.0);
        assert_eq!(r2_score(t.view(), array![5.0, 6.0].view()).unwrap(), 0.0);
    }

    #[test]
    fn length_mismatch_is_error() {
        let t = array![1.0, 2.0];
        let p = array![1.0];
        assert!(matches!(
            mean_squared_error(t.view(), p.view()),
            Err(ModelError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn empty_is_error() {
        let e = ndarray::Array1::<f64>::zeros(0);
        assert!(mean_absolute_error(e.view(), e.view()).is_err());
    }
}
