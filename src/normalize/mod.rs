//! Normalizers for Laplacian, adjacency and boundary operators
//!
//! ## Normalizations
//!
//! | Function | Formula | Typical input |
//! |----------|---------|---------------|
//! | [`compute_laplacian_normalized_matrix`] | `L / λ_max(L)` | Hodge Laplacian |
//! | [`compute_x_laplacian_normalized_matrix`] | `Lx / λ_max(L)` | up/down Laplacian |
//! | [`compute_kipf_adjacency_normalized_matrix`] | `D^{-1/2} (abs(A) + mI) D^{-1/2}` | (co)adjacency |
//! | [`compute_xu_asymmetric_normalized_matrix`] | `D^{-1} B` | boundary |
//! | [`compute_bunch_normalized_matrices`] | see [`bunch`] | `B1`, `B2` pair |
//!
//! Every function accepts dense or CSR input and answers in the same
//! storage mode. None of them mutates its arguments.

pub mod bunch;
pub mod degree;
mod kipf;
mod laplacian;
mod xu;

pub use bunch::{
    compute_b1_normalized_matrix, compute_b1t_normalized_matrix, compute_b2_normalized_matrix,
    compute_b2t_normalized_matrix, compute_bunch_normalized_matrices, BunchNormalized,
};
pub use degree::{
    compute_d1, compute_d2, compute_d3, compute_d5, inverse_power, zero_degenerate_degrees,
};
pub use kipf::compute_kipf_adjacency_normalized_matrix;
pub use laplacian::{
    compute_laplacian_normalized_matrix, compute_laplacian_normalized_matrix_with,
    compute_x_laplacian_normalized_matrix, compute_x_laplacian_normalized_matrix_with,
};
pub use xu::compute_xu_asymmetric_normalized_matrix;
