//! Checks that a decomposition satisfies the SVD invariants.
//!
//! A decomposition that ran is not necessarily accurate. The functions here measure
//! orthogonality of `U` and `V`, the shape of `Σ` and the reconstruction error of
//! `U Σ Vᵀ` against `A`, and report the first property that exceeds its tolerance.

use thiserror::Error;

use crate::matrix::Matrix;
use crate::precision::{ScalarPrecision, SvdScalar};
use crate::svd::SvdSet;

/// Tolerances used by [`check`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Maximum entry of `|UᵀU - I|` and `|VᵀV - I|`.
    pub orthogonality: f64,
    /// Maximum entry of `|U Σ Vᵀ - A|`. Also the slack allowed when comparing
    /// consecutive singular values.
    pub reconstruction: f64,
    /// Maximum magnitude of an off-diagonal entry of `Σ`.
    pub off_diagonal: f64,
}

impl Tolerance {
    /// Default off-diagonal tolerance for `Σ`.
    pub const OFF_DIAGONAL: f64 = 1e-6;

    /// The tolerances for a precision: `1e-5` for `f32`, `1e-12` for `f64`.
    pub const fn for_precision(precision: ScalarPrecision) -> Self {
        let tol = precision.reconstruction_tolerance();
        Self {
            orthogonality: tol,
            reconstruction: tol,
            off_diagonal: Self::OFF_DIAGONAL,
        }
    }
}

/// A violated SVD property.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VerificationError {
    /// `UᵀU` or `VᵀV` is not the identity.
    #[error("{factor} is not orthogonal. Max deviation from identity is {error:e}.")]
    NotOrthogonal {
        /// `"U"` or `"V"`.
        factor: &'static str,
        /// Largest entry of `|XᵀX - I|`.
        error: f64,
    },

    /// `Σ` has a non-zero off-diagonal entry.
    #[error("Sigma is not diagonal. Entry ({row}, {col}) is {value:e}.")]
    NotDiagonal {
        /// Row of the entry.
        row: usize,
        /// Column of the entry.
        col: usize,
        /// Value of the entry.
        value: f64,
    },

    /// A singular value is negative.
    #[error("Singular value {index} is negative: {value:e}.")]
    NegativeSingularValue {
        /// Position on the diagonal.
        index: usize,
        /// The singular value.
        value: f64,
    },

    /// The singular values are not in descending order.
    #[error("Singular values are not sorted: {first} < {second} at index {index}.")]
    Unsorted {
        /// Position of the first of the two values.
        index: usize,
        /// The value at `index`.
        first: f64,
        /// The value at `index + 1`.
        second: f64,
    },

    /// `U Σ Vᵀ` does not reproduce `A`.
    #[error("Reconstruction failed. Max deviation from A is {error:e}.")]
    Reconstruction {
        /// Largest entry of `|U Σ Vᵀ - A|`.
        error: f64,
    },
}

/// Check every SVD property of `svd` as a decomposition of `a`.
///
/// # Arguments
///
/// * `a` - The decomposed matrix.
/// * `svd` - The decomposition of `a`.
/// * `tolerance` - The tolerances to check against.
///
/// # Errors
///
/// The first violated property, checked in the order: orthogonality of `U`, of `V`,
/// diagonality of `Σ`, non-negativity, ordering, reconstruction.
///
/// # Example
///
/// ```
/// use kornia_svd::{svd, verify::{check, Tolerance}, Matrix3, ScalarPrecision};
///
/// let a = Matrix3::new([[1.0f64, 1.0, 3.0], [9.0, -3.0, 2.0], [-3.0, 4.0, 2.0]]);
/// let result = svd(&a, ScalarPrecision::F64)?;
/// assert!(check(&a, &result, &Tolerance::for_precision(ScalarPrecision::F64)).is_ok());
/// # Ok::<(), kornia_svd::SvdError>(())
/// ```
pub fn check<T: SvdScalar, const N: usize>(
    a: &Matrix<T, N>,
    svd: &SvdSet<Matrix<T, N>>,
    tolerance: &Tolerance,
) -> Result<(), VerificationError> {
    let (u, s, v) = (svd.u(), svd.s(), svd.v());
    let identity = Matrix::identity();

    for (factor, m) in [("U", u), ("V", v)] {
        let error = (m.transpose() * *m).max_abs_diff(&identity).as_f64();
        if !(error < tolerance.orthogonality) {
            return Err(VerificationError::NotOrthogonal { factor, error });
        }
    }

    for row in 0..N {
        for col in 0..N {
            let value = s[(row, col)].as_f64();
            if row != col && !(value.abs() <= tolerance.off_diagonal) {
                return Err(VerificationError::NotDiagonal { row, col, value });
            }
        }
    }

    let sigma = s.diagonal();
    for (index, value) in sigma.iter().map(|x| x.as_f64()).enumerate() {
        if value < 0.0 {
            return Err(VerificationError::NegativeSingularValue { index, value });
        }
    }
    for (index, pair) in sigma.windows(2).enumerate() {
        let (first, second) = (pair[0].as_f64(), pair[1].as_f64());
        if first + tolerance.reconstruction < second {
            return Err(VerificationError::Unsorted {
                index,
                first,
                second,
            });
        }
    }

    let error = (*u * *s * v.transpose()).max_abs_diff(a).as_f64();
    if !(error < tolerance.reconstruction) {
        return Err(VerificationError::Reconstruction { error });
    }

    Ok(())
}

/// Whether `svd` is a valid decomposition of `a` at the tolerances of `precision`.
///
/// Logs the violated property at debug level when it returns `false`.
pub fn verify<T: SvdScalar, const N: usize>(
    a: &Matrix<T, N>,
    svd: &SvdSet<Matrix<T, N>>,
    precision: ScalarPrecision,
) -> bool {
    match check(a, svd, &Tolerance::for_precision(precision)) {
        Ok(()) => true,
        Err(e) => {
            log::debug!("svd verification failed: {e}");
            false
        }
    }
}
