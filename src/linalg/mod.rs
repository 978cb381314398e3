//! Numerical collaborators: pseudo-inverse and dominant eigenvalue
//!
//! Both bind to `nalgebra` for the dense kernels (SVD, symmetric
//! tridiagonal eigen-decomposition). The sparse operators only ever enter
//! through matrix-vector products.

mod eigen;
mod pinv;

pub use eigen::{dominant_eigenvalue, EigenConfig};
pub use pinv::{pinv, DEFAULT_RCOND};
