//! Closed-form 2×2 Singular Value Decomposition.
//!
//! The input is first split into `A = R S` by [`polar_decompose2`]. `S` is
//! symmetric, so a single Jacobi rotation diagonalizes it:
//!
//! ```text
//! S = V Σ Vᵀ   =>   A = (R V) Σ Vᵀ = U Σ Vᵀ
//! ```
//!
//! There is no iteration; the result is deterministic and exact up to rounding.
//!
//! # References
//!
//! * Gast, Fu, Jiang, Teran (2016). "Implicit-shifted Symmetric QR Singular Value
//!   Decomposition of 3x3 Matrices." UCLA Mathematics Department Technical Report.

use crate::matrix::Matrix2;
use crate::polar::polar_decompose2;
use crate::precision::SvdScalar;
use crate::svd::SvdSet;

/// Jacobi rotation that zeroes the off-diagonal of the symmetric matrix
/// `[[s_pp, s_pq], [s_pq, s_qq]]`.
///
/// Returns `(c, s)` such that with `V = [[c, s], [-s, c]]` the product `Vᵀ S V` is
/// diagonal. `s_pq == 0` yields the identity `(1, 0)`.
///
/// The tangent is taken from the root of smaller magnitude, `s_pq / (tao ± w)` with
/// the sign following `tao`, so the denominator never cancels.
#[inline(always)]
pub fn jacobi_rotation<T: SvdScalar>(s_pp: T, s_qq: T, s_pq: T) -> (T, T) {
    if s_pq == T::zero() {
        return (T::one(), T::zero());
    }

    let tao = (s_pp - s_qq) * T::cast(0.5);
    let w = tao.hypot(s_pq);
    let t = if tao > T::zero() {
        s_pq / (tao + w)
    } else {
        s_pq / (tao - w)
    };

    let c = (t * t + T::one()).sqrt().recip();
    (c, -t * c)
}

/// Compute the SVD of a 2x2 matrix.
///
/// The singular values are returned sorted descending and non-negative. `V` is
/// always a rotation; `U` is a rotation when `det(A) >= 0` and a reflection otherwise.
///
/// # Arguments
///
/// * `a` - The matrix to decompose.
///
/// # Example
///
/// ```
/// use kornia_svd::{svd2::svd2d, Matrix2};
///
/// let a = Matrix2::new([[1.0f64, 1.0], [9.0, -3.0]]);
/// let svd = svd2d(&a);
/// let reconstruction = *svd.u() * *svd.s() * svd.v().transpose();
/// assert!(reconstruction.max_abs_diff(&a) < 1e-12);
/// ```
pub fn svd2d<T: SvdScalar>(a: &Matrix2<T>) -> SvdSet<Matrix2<T>> {
    let (r, s) = polar_decompose2(a);
    let (s00, s01, s11) = (s[(0, 0)], s[(0, 1)], s[(1, 1)]);

    let (c, sn) = jacobi_rotation(s00, s11, s01);

    let (mut s1, mut s2) = if s01 == T::zero() {
        (s00, s11)
    } else {
        let two = T::cast(2.0);
        (
            c * c * s00 - two * c * sn * s01 + sn * sn * s11,
            sn * sn * s00 + two * c * sn * s01 + c * c * s11,
        )
    };

    let v = if s1 < s2 {
        std::mem::swap(&mut s1, &mut s2);
        Matrix2::new([[-sn, c], [-c, -sn]])
    } else {
        Matrix2::new([[c, sn], [-sn, c]])
    };

    // S is semi-definite, anything below zero is rounding
    let sigma = Matrix2::from_diagonal([s1.max(T::zero()), s2.max(T::zero())]);

    SvdSet::new(r * v, sigma, v)
}
