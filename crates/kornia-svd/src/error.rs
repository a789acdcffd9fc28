use thiserror::Error;

use crate::precision::ScalarPrecision;

/// An error type for the SVD entry points.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SvdError {
    /// The matrix is neither 2x2 nor 3x3.
    #[error("Unsupported dimension. Only 2x2 and 3x3 matrices are supported, got {0}x{0}.")]
    UnsupportedDimension(usize),

    /// The requested precision does not match the element type of the matrix.
    #[error("Invalid precision. Requested {requested} for a matrix of {expected} elements.")]
    InvalidPrecision {
        /// The precision asked for by the caller.
        requested: ScalarPrecision,
        /// The precision of the matrix elements.
        expected: ScalarPrecision,
    },

    /// The precision name is not one of `f32` or `f64`.
    #[error("Invalid precision name '{0}'. Expected 'f32' or 'f64'.")]
    InvalidPrecisionName(String),

    /// The 3x3 kernel broke its output contract.
    #[error("Malformed kernel output. Expected {expected} scalars, got {actual}.")]
    MalformedOutput {
        /// The number of scalars the contract requires.
        expected: usize,
        /// The number of scalars the kernel returned.
        actual: usize,
    },
}
