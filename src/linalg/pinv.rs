//! Moore–Penrose pseudo-inverse via SVD

use nalgebra::DMatrix;
use ndarray::Array2;

use crate::error::{NormError, Result};

/// Default relative cutoff for small singular values
pub const DEFAULT_RCOND: f64 = 1e-15;

/// Pseudo-inverse of a dense matrix
///
/// Singular values at or below `rcond * σ_max` are treated as zero, so a
/// singular (or all-zero) matrix inverts on its range only. The result has
/// the transposed shape of the input.
pub fn pinv(matrix: &Array2<f64>, rcond: f64) -> Result<Array2<f64>> {
    if !(rcond >= 0.0 && rcond.is_finite()) {
        return Err(NormError::invalid_parameter(
            "rcond",
            format!("must be finite and non-negative, got {rcond}"),
        ));
    }

    let (rows, cols) = matrix.dim();
    if rows == 0 || cols == 0 {
        return Ok(Array2::zeros((cols, rows)));
    }

    let svd = to_nalgebra(matrix).svd(true, true);
    let sigma_max = svd.singular_values.iter().cloned().fold(0.0_f64, f64::max);
    let cutoff = rcond * sigma_max;

    let inverse = svd
        .pseudo_inverse(cutoff)
        .map_err(NormError::decomposition)?;

    Ok(from_nalgebra(&inverse))
}

pub(crate) fn to_nalgebra(matrix: &Array2<f64>) -> DMatrix<f64> {
    let (rows, cols) = matrix.dim();
    DMatrix::from_fn(rows, cols, |i, j| matrix[[i, j]])
}

pub(crate) fn from_nalgebra(matrix: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn(matrix.shape(), |(i, j)| matrix[(i, j)])
}
