//! Small square matrix value type.
//!
//! [`Matrix`] is a stack allocated, row-major `N×N` array. It is `Copy` and every
//! operation returns a new value, so a decomposition never aliases its input.

use std::ops::{Index, Mul, Sub};

use crate::precision::SvdScalar;

/// A square `N×N` matrix stored row-major.
///
/// # Example
///
/// ```
/// use kornia_svd::Matrix;
///
/// let a = Matrix::new([[1.0, 2.0], [3.0, 4.0]]);
/// assert_eq!(a[(0, 1)], 2.0);
/// assert_eq!(a.transpose()[(0, 1)], 3.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix<T, const N: usize> {
    rows: [[T; N]; N],
}

/// A 2x2 matrix.
pub type Matrix2<T> = Matrix<T, 2>;

/// A 3x3 matrix.
pub type Matrix3<T> = Matrix<T, 3>;

impl<T: SvdScalar, const N: usize> Matrix<T, N> {
    /// Create a matrix from its rows.
    #[inline]
    pub const fn new(rows: [[T; N]; N]) -> Self {
        Self { rows }
    }

    /// Create a matrix by evaluating `f(row, col)` for every entry.
    #[inline]
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut rows = [[T::zero(); N]; N];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = f(i, j);
            }
        }
        Self { rows }
    }

    /// The zero matrix.
    #[inline]
    pub fn zeros() -> Self {
        Self::new([[T::zero(); N]; N])
    }

    /// The identity matrix.
    #[inline]
    pub fn identity() -> Self {
        Self::from_fn(|i, j| if i == j { T::one() } else { T::zero() })
    }

    /// A diagonal matrix with the given diagonal and exact zeros elsewhere.
    #[inline]
    pub fn from_diagonal(diagonal: [T; N]) -> Self {
        Self::from_fn(|i, j| if i == j { diagonal[i] } else { T::zero() })
    }

    /// The main diagonal.
    #[inline]
    pub fn diagonal(&self) -> [T; N] {
        let mut d = [T::zero(); N];
        for (i, value) in d.iter_mut().enumerate() {
            *value = self.rows[i][i];
        }
        d
    }

    /// The rows of the matrix.
    #[inline]
    pub fn rows(&self) -> &[[T; N]; N] {
        &self.rows
    }

    /// The transposed matrix.
    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_fn(|i, j| self.rows[j][i])
    }

    /// Largest absolute entry. NaN if any entry is NaN.
    pub fn max_abs(&self) -> T {
        self.rows.iter().flatten().fold(T::zero(), |acc, x| {
            if acc.is_nan() || x.is_nan() {
                T::nan()
            } else {
                acc.max(x.abs())
            }
        })
    }

    /// Largest absolute entry of `self - other`.
    pub fn max_abs_diff(&self, other: &Self) -> T {
        (*self - *other).max_abs()
    }
}

impl<T: SvdScalar> Matrix2<T> {
    /// Create a 2x2 matrix from 4 row-major entries.
    #[inline]
    pub fn from_row_slice(entries: &[T; 4]) -> Self {
        Self::new([[entries[0], entries[1]], [entries[2], entries[3]]])
    }

    /// The 4 entries in row-major order.
    #[inline]
    pub fn to_row_array(&self) -> [T; 4] {
        let [[a, b], [c, d]] = self.rows;
        [a, b, c, d]
    }

    /// The determinant.
    #[inline]
    pub fn determinant(&self) -> T {
        let [[a, b], [c, d]] = self.rows;
        a * d - b * c
    }
}

impl<T: SvdScalar> Matrix3<T> {
    /// Create a 3x3 matrix from 9 row-major entries.
    #[inline]
    pub fn from_row_slice(entries: &[T; 9]) -> Self {
        Self::from_fn(|i, j| entries[i * 3 + j])
    }

    /// The 9 entries in row-major order.
    #[inline]
    pub fn to_row_array(&self) -> [T; 9] {
        let mut out = [T::zero(); 9];
        for (k, value) in out.iter_mut().enumerate() {
            *value = self.rows[k / 3][k % 3];
        }
        out
    }

    /// The determinant.
    #[inline]
    pub fn determinant(&self) -> T {
        let m = &self.rows;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }
}

impl<T, const N: usize> Index<(usize, usize)> for Matrix<T, N> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.rows[row][col]
    }
}

impl<T: SvdScalar, const N: usize> Mul for Matrix<T, N> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Self::from_fn(|i, j| {
            (0..N).fold(T::zero(), |acc, k| acc + self.rows[i][k] * rhs.rows[k][j])
        })
    }
}

impl<T: SvdScalar, const N: usize> Sub for Matrix<T, N> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::from_fn(|i, j| self.rows[i][j] - rhs.rows[i][j])
    }
}

impl<T: SvdScalar, const N: usize> From<[[T; N]; N]> for Matrix<T, N> {
    #[inline]
    fn from(rows: [[T; N]; N]) -> Self {
        Self::new(rows)
    }
}
