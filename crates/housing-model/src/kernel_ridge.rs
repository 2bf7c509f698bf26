//! Kernel ridge regression.
//!
//! Fitting solves the dual problem `(K + αI) c = y` where `K` is the kernel
//! matrix of the training rows; prediction is `K(X_new, X_train) · c`. The
//! training rows are kept because every prediction needs them.

use crate::error::ModelError;
use crate::linalg::cholesky_solve;
use crate::model::{check_training_data, Regressor};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use tracing::debug;

/// Kernel function used to compare two rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kernel {
    /// `k(a, b) = exp(-γ ‖a − b‖²)`; `gamma: None` means `1 / n_features`.
    Rbf { gamma: Option<f64> },
    /// `k(a, b) = a · b`
    Linear,
}

impl Default for Kernel {
    fn default() -> Self {
        Kernel::Rbf { gamma: None }
    }
}

/// Kernel ridge regressor.
///
/// Default score: R² (see [`Regressor::score`]).
#[derive(Debug, Clone)]
pub struct KernelRidge {
    alpha: f64,
    kernel: Kernel,
    fitted: Option<FittedKernelRidge>,
}

#[derive(Debug, Clone)]
struct FittedKernelRidge {
    x_train: Array2<f64>,
    dual_coef: Array1<f64>,
    gamma: f64,
}

impl Default for KernelRidge {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            kernel: Kernel::default(),
            fitted: None,
        }
    }
}

impl KernelRidge {
    /// Build a regressor; `alpha` must be strictly positive.
    pub fn new(alpha: f64, kernel: Kernel) -> Result<Self, ModelError> {
        if !(alpha > 0.0 && alpha.is_finite()) {
            return Err(ModelError::InvalidConfig(format!(
                "alpha must be a positive finite number, got {alpha}"
            )));
        }
        if let Kernel::Rbf { gamma: Some(g) } = kernel {
            if !(g > 0.0 && g.is_finite()) {
                return Err(ModelError::InvalidConfig(format!(
                    "gamma must be a positive finite number, got {g}"
                )));
            }
        }
        Ok(Self {
            alpha,
            kernel,
            fitted: None,
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    /// Dual coefficients of the fitted model.
    pub fn dual_coef(&self) -> Option<&Array1<f64>> {
        self.fitted.as_ref().map(|f| &f.dual_coef)
    }

    fn kernel_value(&self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>, gamma: f64) -> f64 {
        match self.kernel {
            Kernel::Rbf { .. } => {
                let dist: f64 = a.iter().zip(b.iter()).map(|(p, q)| (p - q).powi(2)).sum();
                (-gamma * dist).exp()
            }
            Kernel::Linear => a.dot(&b),
        }
    }

    fn kernel_matrix(&self, a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>, gamma: f64) -> Array2<f64> {
        Array2::from_shape_fn((a.nrows(), b.nrows()), |(i, j)| {
            self.kernel_value(a.row(i), b.row(j), gamma)
        })
    }
}

impl Regressor for KernelRidge {
    fn name(&self) -> &str {
        "KernelRidge"
    }

    fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<(), ModelError> {
        check_training_data(&x, &y)?;
        self.fitted = None;

        let gamma = match self.kernel {
            Kernel::Rbf { gamma: Some(g) } => g,
            Kernel::Rbf { gamma: None } => 1.0 / x.ncols().max(1) as f64,
            Kernel::Linear => 0.0,
        };

        let mut k = self.kernel_matrix(x, x, gamma);
        for i in 0..k.nrows() {
            k[[i, i]] += self.alpha;
        }
        let dual_coef = cholesky_solve(k.view(), y)?;
        debug!(
            "Fitted kernel ridge on {} rows (alpha={}, gamma={})",
            x.nrows(),
            self.alpha,
            gamma
        );

        self.fitted = Some(FittedKernelRidge {
            x_train: x.to_owned(),
            dual_coef,
            gamma,
        });
        Ok(())
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>, ModelError> {
        let fitted = self.fitted.as_ref().ok_or_else(|| ModelError::NotFitted {
            model: self.name().to_string(),
        })?;
        if x.ncols() != fitted.x_train.ncols() {
            return Err(ModelError::shape(
                "feature count",
                fitted.x_train.ncols(),
                x.ncols(),
            ));
        }
        let k = self.kernel_matrix(x, fitted.x_train.view(), fitted.gamma);
        Ok(k.dot(&fitted.dual_coef))
    }
}
