//! Interop with the [`glam`](::glam) matrix types.
//!
//! glam stores matrices column-major while [`Matrix`] is row-major; the conversions
//! here preserve the mathematical matrix, so `m[(row, col)]` equals
//! `g.col(col)[row]`.

use ::glam::{DMat2, DMat3, Mat2, Mat3};

use crate::matrix::{Matrix, Matrix2, Matrix3};
use crate::svd::SvdSet;
use crate::svd2::svd2d;
use crate::svd3::svd3d_typed;

macro_rules! impl_glam_conversions {
    ($glam:ty, $t:ty, $n:literal) => {
        impl From<$glam> for Matrix<$t, $n> {
            #[inline]
            fn from(m: $glam) -> Self {
                let cols = m.to_cols_array_2d();
                Matrix::from_fn(|row, col| cols[col][row])
            }
        }

        impl From<&$glam> for Matrix<$t, $n> {
            #[inline]
            fn from(m: &$glam) -> Self {
                Self::from(*m)
            }
        }

        impl From<Matrix<$t, $n>> for $glam {
            #[inline]
            fn from(m: Matrix<$t, $n>) -> Self {
                <$glam>::from_cols_array_2d(m.transpose().rows())
            }
        }
    };
}

impl_glam_conversions!(Mat2, f32, 2);
impl_glam_conversions!(DMat2, f64, 2);
impl_glam_conversions!(Mat3, f32, 3);
impl_glam_conversions!(DMat3, f64, 3);

/// Compute the SVD of a [`Mat2`].
///
/// # Example
///
/// ```
/// use glam::{Mat2, Vec2};
/// use kornia_svd::glam::svd2;
///
/// let a = Mat2::from_cols(Vec2::new(1.0, 9.0), Vec2::new(1.0, -3.0));
/// let result = svd2(&a);
/// let reconstruction = *result.u() * *result.s() * result.v().transpose();
/// assert!(reconstruction.abs_diff_eq(a, 1e-5));
/// ```
pub fn svd2(a: &Mat2) -> SvdSet<Mat2> {
    svd2d(&Matrix2::<f32>::from(a)).map(Mat2::from)
}

/// Compute the SVD of a [`DMat2`].
pub fn svd2_f64(a: &DMat2) -> SvdSet<DMat2> {
    svd2d(&Matrix2::<f64>::from(a)).map(DMat2::from)
}

/// Compute the SVD of a [`Mat3`] with the default `f32` iteration count.
pub fn svd3(a: &Mat3) -> SvdSet<Mat3> {
    svd3d_typed(&Matrix3::<f32>::from(a)).map(Mat3::from)
}

/// Compute the SVD of a [`DMat3`] with the default `f64` iteration count.
pub fn svd3_f64(a: &DMat3) -> SvdSet<DMat3> {
    svd3d_typed(&Matrix3::<f64>::from(a)).map(DMat3::from)
}
