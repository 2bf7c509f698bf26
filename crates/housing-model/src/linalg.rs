//! Dense symmetric positive-definite solver.
//!
//! Kernel ridge only ever solves `(K + αI) c = y` with `α > 0`, which is SPD,
//! so a Cholesky factorisation is all that is needed.

use crate::error::ModelError;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Solve `a · x = b` for symmetric positive-definite `a`.
pub fn cholesky_solve(a: ArrayView2<'_, f64>, b: ArrayView1<'_, f64>) -> Result<Array1<f64>, ModelError> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(ModelError::shape("matrix columns", n, a.ncols()));
    }
    if b.len() != n {
        return Err(ModelError::shape("right-hand side length", n, b.len()));
    }

    let l = cholesky(a)?;

    // Forward substitution: L z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = b[i];
        for k in 0..i {
            sum -= l[[i, k]] * z[k];
        }
        z[i] = sum / l[[i, i]];
    }

    // Back substitution: Lᵀ x = z
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = z[i];
        for k in (i + 1)..n {
            sum -= l[[k, i]] * x[k];
        }
        x[i] = sum / l[[i, i]];
    }

    Ok(x)
}

/// Lower-triangular `L` with `a = L Lᵀ`.
fn cholesky(a: ArrayView2<'_, f64>) -> Result<Array2<f64>, ModelError> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for j in 0..n {
        let mut diag = a[[j, j]];
        for k in 0..j {
            diag -= l[[j, k]] * l[[j, k]];
        }
        if diag <= 0.0 || !diag.is_finite() {
            return Err(ModelError::Linalg(format!(
                "matrix is not positive definite (pivot {j} = {diag})"
            )));
        }
        let d = diag.sqrt();
        l[[j, j]] = d;

        for i in (j + 1)..n {
            let mut sum = a[[i, j]];
            for k in 0..j {
                sum -= l[[i, k]] * l[[j, k]];
            }
            l[[i, j]] = sum / d;
        }
    }

    Ok(l)
}
