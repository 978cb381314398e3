//! # RuVector Topo-Norm
//!
//! Normalization of the linear operators of simplicial, cell and hypergraph
//! complexes, so that diffusion and spectral computations on them are
//! numerically stable and comparable across complexes.
//!
//! ## Operators
//!
//! - **Laplacians**: scaled by the reciprocal of their dominant eigenvalue
//! - **(Co)adjacency**: Kipf–Welling symmetric degree normalization
//! - **Boundaries**: Xu's row-degree normalization, or the coupled Bunch
//!   normalization of a `(B1, B2)` pair
//!
//! The complex itself is out of scope: callers build the boundary,
//! adjacency and Laplacian matrices and hand them over as dense arrays or
//! CSR matrices.
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: matrices in, new matrices out, no shared state
//! 2. **Storage preserving**: dense in, dense out; sparse in, sparse out
//! 3. **Degenerate-safe**: zero-degree rows scale by zero, singular degree
//!    matrices go through the pseudo-inverse
//! 4. **Explicit solver controls**: the eigen-solver's iteration bound and
//!    tolerance are per-call configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use ndarray::array;
//! use ruvector_topo_norm::prelude::*;
//!
//! // Filled triangle
//! let b1 = array![[-1.0, -1.0, 0.0], [1.0, 0.0, -1.0], [0.0, 1.0, 1.0]];
//! let b2 = array![[1.0], [-1.0], [1.0]];
//!
//! let bunch = compute_bunch_normalized_matrices(&b1.clone().into(), &b2.into()).unwrap();
//! assert_eq!(bunch.b1t.shape(), (3, 3));
//!
//! let laplacian = Matrix::from(b1.t().dot(&b1));
//! let normalized = compute_laplacian_normalized_matrix(&laplacian).unwrap();
//! assert!(!normalized.is_sparse());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod linalg;
pub mod matrix;
pub mod normalize;

pub use error::{NormError, Result};
pub use linalg::{dominant_eigenvalue, pinv, EigenConfig, DEFAULT_RCOND};
pub use matrix::{CooMatrix, CsrMatrix, Matrix, Operator, Storage};
pub use normalize::{
    compute_b1_normalized_matrix, compute_b1t_normalized_matrix, compute_b2_normalized_matrix,
    compute_b2t_normalized_matrix, compute_bunch_normalized_matrices, compute_d1, compute_d2,
    compute_d3, compute_d5, compute_kipf_adjacency_normalized_matrix,
    compute_laplacian_normalized_matrix, compute_laplacian_normalized_matrix_with,
    compute_x_laplacian_normalized_matrix, compute_x_laplacian_normalized_matrix_with,
    compute_xu_asymmetric_normalized_matrix, BunchNormalized,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::linalg::*;
    pub use crate::matrix::*;
    pub use crate::normalize::*;
}
