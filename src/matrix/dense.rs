//! [`Operator`] for dense arrays

use ndarray::{Array1, Array2};

use super::{Matrix, Operator};
use crate::error::Result;

impl Operator for Array2<f64> {
    fn shape(&self) -> (usize, usize) {
        self.dim()
    }

    fn abs(&self) -> Self {
        self.mapv(f64::abs)
    }

    fn row_sums(&self) -> Array1<f64> {
        Array1::from_iter(self.rows().into_iter().map(|row| row.sum()))
    }

    fn from_diagonal(diagonal: &Array1<f64>) -> Self {
        Array2::from_diag(diagonal)
    }

    fn add(&self, other: &Self) -> Self {
        self + other
    }

    fn dot(&self, other: &Self) -> Self {
        Array2::dot(self, other)
    }

    fn transpose(&self) -> Self {
        self.t().to_owned()
    }

    fn scale(&self, alpha: f64) -> Self {
        self * alpha
    }

    fn pinv(&self, rcond: f64) -> Result<Self> {
        crate::linalg::pinv(self, rcond)
    }

    fn mul_vec(&self, x: &[f64]) -> Vec<f64> {
        self.rows()
            .into_iter()
            .map(|row| row.iter().zip(x).map(|(a, b)| a * b).sum())
            .collect()
    }

    fn to_dense(&self) -> Array2<f64> {
        self.clone()
    }

    fn into_matrix(self) -> Matrix {
        Matrix::Dense(self)
    }
}
