//! Error types for ruvector-topo-norm

use thiserror::Error;

/// Result type alias for normalization operations
pub type Result<T> = std::result::Result<T, NormError>;

/// Errors that can occur while normalizing complex operators
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormError {
    /// An operator that must be square is not
    #[error("Matrix must be square, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// Dimension mismatch between operands
    #[error("Dimension mismatch in {context}: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Where the mismatch was detected
        context: String,
        /// Expected dimension
        expected: usize,
        /// Actual dimension received
        got: usize,
    },

    /// Matrix is neither a dense array nor a CSR matrix
    #[error("Input type must be either a dense array or a CSR sparse matrix, got {found}")]
    UnsupportedRepresentation {
        /// Storage mode that was passed in
        found: &'static str,
    },

    /// Operands of a single call use different storage modes
    #[error("Storage modes must match: got {left} and {right}")]
    StorageMismatch {
        /// Storage mode of the first operand
        left: &'static str,
        /// Storage mode of the second operand
        right: &'static str,
    },

    /// Eigen-solver did not converge
    #[error("Convergence failed after {iterations} iterations (residual: {residual:.2e})")]
    ConvergenceFailure {
        /// Number of iterations attempted
        iterations: usize,
        /// Final residual of the dominant Ritz pair
        residual: f64,
    },

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Reason why it's invalid
        reason: String,
    },

    /// Raw sparse parts do not describe a valid CSR matrix
    #[error("Invalid sparse structure: {message}")]
    InvalidStructure {
        /// Description of the violation
        message: String,
    },

    /// Dense decomposition failed
    #[error("Decomposition failed: {message}")]
    Decomposition {
        /// Message reported by the decomposition
        message: String,
    },
}

impl NormError {
    /// Create a non-square error
    pub fn not_square(rows: usize, cols: usize) -> Self {
        Self::NotSquare { rows, cols }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch(context: impl Into<String>, expected: usize, got: usize) -> Self {
        Self::DimensionMismatch {
            context: context.into(),
            expected,
            got,
        }
    }

    /// Create an unsupported representation error
    pub fn unsupported(found: &'static str) -> Self {
        Self::UnsupportedRepresentation { found }
    }

    /// Create a storage mismatch error
    pub fn storage_mismatch(left: &'static str, right: &'static str) -> Self {
        Self::StorageMismatch { left, right }
    }

    /// Create a convergence failure error
    pub fn convergence_failure(iterations: usize, residual: f64) -> Self {
        Self::ConvergenceFailure {
            iterations,
            residual,
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid structure error
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }

    /// Create a decomposition error
    pub fn decomposition(message: impl Into<String>) -> Self {
        Self::Decomposition {
            message: message.into(),
        }
    }
}
