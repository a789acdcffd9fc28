use crate::error::SvdError;
use crate::matrix::Matrix;
use crate::precision::{ensure_precision, ScalarPrecision, SvdScalar};
use crate::svd2::svd2d;
use crate::svd3::svd3d;

/// The factors `U`, `Σ`, `V` of a decomposition `A = U Σ Vᵀ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvdSet<M> {
    /// The matrix of left singular vectors.
    u: M,

    /// The diagonal matrix of singular values.
    s: M,

    /// The matrix of right singular vectors.
    v: M,
}

impl<M> SvdSet<M> {
    /// Bundle the three factors of a decomposition.
    #[inline]
    pub fn new(u: M, s: M, v: M) -> Self {
        Self { u, s, v }
    }

    /// Get the left singular vectors matrix.
    #[inline]
    pub fn u(&self) -> &M {
        &self.u
    }

    /// Get the diagonal matrix of singular values.
    #[inline]
    pub fn s(&self) -> &M {
        &self.s
    }

    /// Get the right singular vectors matrix.
    #[inline]
    pub fn v(&self) -> &M {
        &self.v
    }

    /// Consume the set, returning `(U, Σ, V)`.
    #[inline]
    pub fn into_parts(self) -> (M, M, M) {
        (self.u, self.s, self.v)
    }

    /// Apply `f` to each of the three factors.
    #[inline]
    pub fn map<N>(self, mut f: impl FnMut(M) -> N) -> SvdSet<N> {
        SvdSet {
            u: f(self.u),
            s: f(self.s),
            v: f(self.v),
        }
    }
}

impl<T: SvdScalar, const N: usize> SvdSet<Matrix<T, N>> {
    /// The singular values, in descending order.
    #[inline]
    pub fn singular_values(&self) -> [T; N] {
        self.s.diagonal()
    }
}

/// Compute the SVD of a 2x2 or 3x3 matrix.
///
/// 2x2 matrices use the closed form of [`svd2d`], 3x3 matrices the fixed-iteration
/// kernel of [`svd3d`] with the default iteration count of `precision`.
///
/// # Arguments
///
/// * `a` - The matrix to decompose.
/// * `precision` - The precision of the decomposition. Must match the element type.
///
/// # Errors
///
/// * [`SvdError::InvalidPrecision`] if `precision` is not the precision of `T`.
/// * [`SvdError::UnsupportedDimension`] if `N` is neither 2 nor 3.
///
/// # Example
///
/// ```
/// use kornia_svd::{svd, Matrix, ScalarPrecision, SvdError};
///
/// let a = Matrix::new([[1.0f32, 1.0], [9.0, -3.0]]);
/// let result = svd(&a, ScalarPrecision::F32)?;
/// assert!(result.singular_values()[0] >= result.singular_values()[1]);
///
/// let b = Matrix::<f32, 4>::identity();
/// assert_eq!(svd(&b, ScalarPrecision::F32), Err(SvdError::UnsupportedDimension(4)));
/// # Ok::<(), SvdError>(())
/// ```
pub fn svd<T: SvdScalar, const N: usize>(
    a: &Matrix<T, N>,
    precision: ScalarPrecision,
) -> Result<SvdSet<Matrix<T, N>>, SvdError> {
    ensure_precision::<T>(precision)?;
    log::trace!("svd of a {}x{} {} matrix", N, N, precision);

    match N {
        2 => Ok(svd2d(&resize::<T, N, 2>(a)).map(|m| resize::<T, 2, N>(&m))),
        3 => {
            let set = svd3d(&resize::<T, N, 3>(a), precision, None)?;
            Ok(set.map(|m| resize::<T, 3, N>(&m)))
        }
        n => {
            log::debug!("rejecting svd of a {n}x{n} matrix");
            Err(SvdError::UnsupportedDimension(n))
        }
    }
}

/// Copy a matrix into a matrix of another declared size. Only called with `N == M`.
#[inline(always)]
fn resize<T: SvdScalar, const N: usize, const M: usize>(a: &Matrix<T, N>) -> Matrix<T, M> {
    Matrix::from_fn(|i, j| a[(i, j)])
}
