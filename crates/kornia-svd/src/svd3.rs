//! Fixed-iteration 3×3 Singular Value Decomposition.
//!
//! The decomposition is reached through a narrow kernel contract, [`Svd3Kernel`]:
//! nine row-major entries of `A` and an iteration count in, 21 scalars out
//! (`U` row-major, `V` row-major, then the diagonal of `Σ`). [`svd3d_with_kernel`]
//! checks that contract and unpacks the result; [`svd3d`] does the same with the
//! built-in [`JacobiSvd3`] kernel.
//!
//! # Implementation Details
//!
//! [`JacobiSvd3`] follows the structure of McAdams et al.:
//! * cyclic Jacobi sweeps on `AᵀA` accumulated in a quaternion, giving `V`
//! * `B = A V` with columns sorted by norm, descending
//! * QR decomposition of `B` with Givens rotations, giving `U` and `Σ`
//!
//! The sweep count is fixed rather than convergence driven so every call costs the
//! same. Each sweep uses the exact Jacobi rotation of [`jacobi_rotation`], which is
//! what lets double precision reach `1e-12` in eight sweeps.
//!
//! # Sign convention
//!
//! `V` is always a proper rotation. `U` is a proper rotation when `det(A) >= 0` and
//! carries the reflection otherwise, so that every singular value is non-negative.
//! Equal column norms are never swapped.
//!
//! # References
//!
//! * McAdams, Selle, Tamstorf, Teran, and Sifakis (2011).
//!   "Computing the Singular Value Decomposition of 3x3 matrices with minimal
//!   branching and elementary floating point operations."
//!   University of Wisconsin-Madison Technical Report TR1690.

use std::ops::Mul;

use crate::error::SvdError;
use crate::matrix::Matrix3;
use crate::precision::{ensure_precision, ScalarPrecision, SvdScalar};
use crate::svd::SvdSet;
use crate::svd2::jacobi_rotation;

/// Number of scalars a [`Svd3Kernel`] must return.
pub const SVD3_OUTPUT_LEN: usize = 21;

/// A numerical kernel computing the SVD of a 3x3 matrix.
///
/// Implementations receive the 9 row-major entries of `A` and the number of
/// refinement iterations to run, and return exactly [`SVD3_OUTPUT_LEN`] scalars:
/// `U` (9, row-major), `V` (9, row-major), the diagonal of `Σ` (3).
///
/// The singular values are expected to be non-negative and sorted descending.
pub trait Svd3Kernel<T: SvdScalar> {
    /// The packed output of the kernel.
    type Output: AsRef<[T]>;

    /// Decompose the matrix given by its row-major `entries`.
    fn decompose(&self, entries: &[T; 9], iterations: usize) -> Self::Output;
}

/// The built-in 3x3 kernel: Jacobi eigenanalysis of `AᵀA` followed by a Givens QR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JacobiSvd3;

impl<T: SvdScalar> Svd3Kernel<T> for JacobiSvd3 {
    type Output = [T; SVD3_OUTPUT_LEN];

    fn decompose(&self, entries: &[T; 9], iterations: usize) -> Self::Output {
        let a = Matrix3::from_row_slice(entries);
        let (u, sigma, v) = decompose_jacobi(&a, iterations);

        let mut out = [T::zero(); SVD3_OUTPUT_LEN];
        out[..9].copy_from_slice(&u.to_row_array());
        out[9..18].copy_from_slice(&v.to_row_array());
        out[18..].copy_from_slice(&sigma);
        out
    }
}

/// Compute the SVD of a 3x3 matrix with the built-in kernel.
///
/// # Arguments
///
/// * `a` - The matrix to decompose.
/// * `precision` - The precision of the decomposition. Must match the element type.
/// * `iterations` - Number of Jacobi sweeps. Defaults to
///   [`ScalarPrecision::default_iterations`].
///
/// # Errors
///
/// [`SvdError::InvalidPrecision`] if `precision` is not the precision of `T`.
///
/// # Example
///
/// ```
/// use kornia_svd::{svd3::svd3d, Matrix3, ScalarPrecision};
///
/// let a = Matrix3::new([[1.0f64, 1.0, 3.0], [9.0, -3.0, 2.0], [-3.0, 4.0, 2.0]]);
/// let svd = svd3d(&a, ScalarPrecision::F64, None)?;
/// let reconstruction = *svd.u() * *svd.s() * svd.v().transpose();
/// assert!(reconstruction.max_abs_diff(&a) < 1e-12);
/// # Ok::<(), kornia_svd::SvdError>(())
/// ```
pub fn svd3d<T: SvdScalar>(
    a: &Matrix3<T>,
    precision: ScalarPrecision,
    iterations: Option<usize>,
) -> Result<SvdSet<Matrix3<T>>, SvdError> {
    svd3d_with_kernel(&JacobiSvd3, a, precision, iterations)
}

/// Compute the SVD of a 3x3 matrix with a caller supplied kernel.
///
/// # Errors
///
/// * [`SvdError::InvalidPrecision`] if `precision` is not the precision of `T`.
/// * [`SvdError::MalformedOutput`] if the kernel does not return exactly
///   [`SVD3_OUTPUT_LEN`] scalars.
pub fn svd3d_with_kernel<T: SvdScalar, K: Svd3Kernel<T>>(
    kernel: &K,
    a: &Matrix3<T>,
    precision: ScalarPrecision,
    iterations: Option<usize>,
) -> Result<SvdSet<Matrix3<T>>, SvdError> {
    ensure_precision::<T>(precision)?;
    let iterations = iterations.unwrap_or_else(|| precision.default_iterations());

    let output = kernel.decompose(&a.to_row_array(), iterations);
    unpack(output.as_ref())
}

/// The built-in kernel at the default iteration count of `T`, without packing.
pub(crate) fn svd3d_typed<T: SvdScalar>(a: &Matrix3<T>) -> SvdSet<Matrix3<T>> {
    let (u, sigma, v) = decompose_jacobi(a, T::PRECISION.default_iterations());
    SvdSet::new(u, Matrix3::from_diagonal(sigma), v)
}

/// Unpack `U(9), V(9), diag(Σ)(3)` into matrices.
fn unpack<T: SvdScalar>(packed: &[T]) -> Result<SvdSet<Matrix3<T>>, SvdError> {
    if packed.len() != SVD3_OUTPUT_LEN {
        return Err(malformed(packed.len()));
    }

    let u = Matrix3::from_fn(|i, j| packed[i * 3 + j]);
    let v = Matrix3::from_fn(|i, j| packed[9 + i * 3 + j]);
    let sigma = Matrix3::from_diagonal([packed[18], packed[19], packed[20]]);

    Ok(SvdSet::new(u, sigma, v))
}

fn malformed(actual: usize) -> SvdError {
    log::debug!("3x3 kernel returned {actual} scalars, expected {SVD3_OUTPUT_LEN}");
    SvdError::MalformedOutput {
        expected: SVD3_OUTPUT_LEN,
        actual,
    }
}

#[derive(Debug, Clone)]
/// A symmetric 3x3 matrix, storing only the lower triangle.
struct Symmetric3x3<T> {
    m_00: T,
    m_10: T,
    m_11: T,
    m_20: T,
    m_21: T,
    m_22: T,
}

impl<T: SvdScalar> Symmetric3x3<T> {
    /// `AᵀA` of a 3x3 matrix.
    fn gram(a: &Matrix3<T>) -> Self {
        let g = a.transpose() * *a;
        Symmetric3x3 {
            m_00: g[(0, 0)],
            m_10: g[(1, 0)],
            m_11: g[(1, 1)],
            m_20: g[(2, 0)],
            m_21: g[(2, 1)],
            m_22: g[(2, 2)],
        }
    }
}

/// A rotation in a coordinate plane, as the cosine and sine of its full angle
/// together with the cosine and sine of the half angle for the quaternion.
#[derive(Debug)]
struct Givens<T> {
    cos_theta: T,
    sin_theta: T,
    cos_half: T,
    sin_half: T,
}

/// Rotation zeroing the off-diagonal of `[[s_pp, s_pq], [s_pq, s_qq]]` when applied as
/// `Qᵀ S Q` with `Q = [[cos, -sin], [sin, cos]]`.
#[inline(always)]
fn jacobi_givens<T: SvdScalar>(s_pp: T, s_qq: T, s_pq: T) -> Givens<T> {
    let (c, s) = jacobi_rotation(s_pp, s_qq, s_pq);
    let cos_theta = c;
    let sin_theta = -s;

    // cos_theta >= 1/sqrt(2), so the half angle is well conditioned
    let cos_half = ((T::one() + cos_theta) * T::cast(0.5)).sqrt();
    let sin_half = sin_theta / (cos_half + cos_half);

    Givens {
        cos_theta,
        sin_theta,
        cos_half,
        sin_half,
    }
}

#[derive(Debug, Clone, Copy)]
struct Quaternion<T> {
    x: T,
    y: T,
    z: T,
    w: T,
}

impl<T: SvdScalar> Quaternion<T> {
    fn identity() -> Self {
        Quaternion {
            x: T::zero(),
            y: T::zero(),
            z: T::zero(),
            w: T::one(),
        }
    }

    /// Rotation matrix of the normalized quaternion.
    fn to_matrix(self) -> Matrix3<T> {
        let norm = (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w)
            .sqrt()
            .recip();
        let (x, y, z, w) = (self.x * norm, self.y * norm, self.z * norm, self.w * norm);
        let one = T::one();
        let two = T::cast(2.0);

        Matrix3::new([
            [
                one - two * (y * y + z * z),
                two * (x * y - z * w),
                two * (x * z + y * w),
            ],
            [
                two * (x * y + z * w),
                one - two * (x * x + z * z),
                two * (y * z - x * w),
            ],
            [
                two * (x * z - y * w),
                two * (y * z + x * w),
                one - two * (x * x + y * y),
            ],
        ])
    }
}

impl<T: SvdScalar> Mul for Quaternion<T> {
    type Output = Self;

    /// Hamilton product.
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        Quaternion {
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        }
    }
}

#[inline(always)]
fn conjugate_xy<T: SvdScalar>(s: &mut Symmetric3x3<T>, q: &mut Quaternion<T>) {
    let g = jacobi_givens(s.m_00, s.m_11, s.m_10);
    let (a, b) = (g.cos_theta, g.sin_theta);

    // entries before the update
    let s00 = s.m_00;
    let s10 = s.m_10;
    let s11 = s.m_11;
    let s20 = s.m_20;
    let s21 = s.m_21;

    s.m_00 = a * (a * s00 + b * s10) + b * (a * s10 + b * s11);
    s.m_10 = a * (-b * s00 + a * s10) + b * (-b * s10 + a * s11);
    s.m_11 = -b * (-b * s00 + a * s10) + a * (-b * s10 + a * s11);
    s.m_20 = a * s20 + b * s21;
    s.m_21 = -b * s20 + a * s21;

    // rotation about z
    *q = *q * Quaternion {
        x: T::zero(),
        y: T::zero(),
        z: g.sin_half,
        w: g.cos_half,
    };
}

#[inline(always)]
fn conjugate_yz<T: SvdScalar>(s: &mut Symmetric3x3<T>, q: &mut Quaternion<T>) {
    let g = jacobi_givens(s.m_11, s.m_22, s.m_21);
    let (a, b) = (g.cos_theta, g.sin_theta);

    let s11 = s.m_11;
    let s21 = s.m_21;
    let s22 = s.m_22;
    let s10 = s.m_10;
    let s20 = s.m_20;

    s.m_11 = a * (a * s11 + b * s21) + b * (a * s21 + b * s22);
    s.m_21 = a * (-b * s11 + a * s21) + b * (-b * s21 + a * s22);
    s.m_22 = -b * (-b * s11 + a * s21) + a * (-b * s21 + a * s22);
    s.m_10 = a * s10 + b * s20;
    s.m_20 = -b * s10 + a * s20;

    // rotation about x
    *q = *q * Quaternion {
        x: g.sin_half,
        y: T::zero(),
        z: T::zero(),
        w: g.cos_half,
    };
}

#[inline(always)]
fn conjugate_xz<T: SvdScalar>(s: &mut Symmetric3x3<T>, q: &mut Quaternion<T>) {
    let g = jacobi_givens(s.m_00, s.m_22, s.m_20);
    let (a, b) = (g.cos_theta, g.sin_theta);

    let s00 = s.m_00;
    let s20 = s.m_20;
    let s22 = s.m_22;
    let s10 = s.m_10;
    let s21 = s.m_21;

    s.m_00 = a * (a * s00 + b * s20) + b * (a * s20 + b * s22);
    s.m_20 = a * (-b * s00 + a * s20) + b * (-b * s20 + a * s22);
    s.m_22 = -b * (-b * s00 + a * s20) + a * (-b * s20 + a * s22);
    s.m_10 = a * s10 + b * s21;
    s.m_21 = -b * s10 + a * s21;

    // the (x, z) plane rotation is a rotation about y by the negated angle
    *q = *q * Quaternion {
        x: T::zero(),
        y: -g.sin_half,
        z: T::zero(),
        w: g.cos_half,
    };
}

/// Eigenvectors of the symmetric matrix `s` after `sweeps` cyclic Jacobi sweeps.
fn jacobi_eigenanalysis<T: SvdScalar>(mut s: Symmetric3x3<T>, sweeps: usize) -> Matrix3<T> {
    let mut q = Quaternion::identity();
    for _ in 0..sweeps {
        conjugate_xy(&mut s, &mut q);
        conjugate_yz(&mut s, &mut q);
        conjugate_xz(&mut s, &mut q);
    }
    q.to_matrix()
}

#[inline(always)]
fn column_norm_squared<T: SvdScalar>(m: &[[T; 3]; 3], col: usize) -> T {
    m.iter().fold(T::zero(), |acc, row| acc + row[col] * row[col])
}

#[inline(always)]
fn swap_columns<T: SvdScalar>(m: &mut [[T; 3]; 3], i: usize, j: usize) {
    for row in m.iter_mut() {
        row.swap(i, j);
    }
}

#[inline(always)]
fn negate_column<T: SvdScalar>(m: &mut [[T; 3]; 3], col: usize) {
    for row in m.iter_mut() {
        row[col] = -row[col];
    }
}

/// Sorts the columns of `b` by norm in descending order, applying the same swaps to
/// `v`. Every swap negates one of the two columns so `det(v)` is preserved.
fn sort_singular_values<T: SvdScalar>(b: &mut [[T; 3]; 3], v: &mut [[T; 3]; 3]) {
    let mut rho = [
        column_norm_squared(b, 0),
        column_norm_squared(b, 1),
        column_norm_squared(b, 2),
    ];

    for (i, j) in [(0, 1), (0, 2), (1, 2)] {
        if rho[i] < rho[j] {
            rho.swap(i, j);
            swap_columns(b, i, j);
            swap_columns(v, i, j);
            negate_column(b, j);
            negate_column(v, j);
        }
    }
}

/// Givens rotation `(cos, sin)` zeroing `a2` against the pivot `a1`, with
/// `sin` of the full angle. See Algorithm 4 of McAdams et al.
#[inline(always)]
fn qr_givens<T: SvdScalar>(a1: T, a2: T) -> (T, T) {
    let epsilon = T::GIVENS_EPSILON;
    let rho = a1.hypot(a2);

    let mut cos_half = a1.abs() + rho.max(epsilon);
    let mut sin_half = if rho > epsilon { a2 } else { T::zero() };
    if a1 < T::zero() {
        std::mem::swap(&mut cos_half, &mut sin_half);
    }

    let w = cos_half.hypot(sin_half).recip();
    cos_half = cos_half * w;
    sin_half = sin_half * w;

    let two = T::cast(2.0);
    (
        T::one() - two * sin_half * sin_half,
        two * cos_half * sin_half,
    )
}

/// Applies the transposed rotation to rows `p` and `q` of `b`.
#[inline(always)]
fn rotate_rows<T: SvdScalar>(b: &mut [[T; 3]; 3], p: usize, q: usize, c: T, s: T) {
    for col in 0..3 {
        let bp = b[p][col];
        let bq = b[q][col];
        b[p][col] = c * bp + s * bq;
        b[q][col] = -s * bp + c * bq;
    }
}

/// QR decomposition with Givens rotations, zeroing `b[1][0]`, `b[2][0]` and `b[2][1]`.
/// Returns `(Q, R)`.
fn qr_decomposition<T: SvdScalar>(mut b: [[T; 3]; 3]) -> (Matrix3<T>, [[T; 3]; 3]) {
    let mut q = Matrix3::identity();
    for (p, r, pivot) in [(0, 1, 0), (0, 2, 0), (1, 2, 1)] {
        let (c, s) = qr_givens(b[p][pivot], b[r][pivot]);
        rotate_rows(&mut b, p, r, c, s);

        let mut g = *Matrix3::<T>::identity().rows();
        g[p][p] = c;
        g[p][r] = -s;
        g[r][p] = s;
        g[r][r] = c;
        q = q * Matrix3::new(g);
    }
    (q, b)
}

/// Runs the full 3x3 pipeline, returning `(U, diag(Σ), V)`.
fn decompose_jacobi<T: SvdScalar>(
    a: &Matrix3<T>,
    sweeps: usize,
) -> (Matrix3<T>, [T; 3], Matrix3<T>) {
    // right singular vectors are the eigenvectors of AᵀA
    let v = jacobi_eigenanalysis(Symmetric3x3::gram(a), sweeps);

    let mut b = *(*a * v).rows();
    let mut v = *v.rows();
    sort_singular_values(&mut b, &mut v);

    let (q, r) = qr_decomposition(b);

    let mut u = *q.rows();
    let mut sigma = [T::zero(); 3];
    for (i, value) in sigma.iter_mut().enumerate() {
        if r[i][i] < T::zero() {
            negate_column(&mut u, i);
        }
        *value = r[i][i].abs();
    }

    // noise-level values of rank deficient input can come out of QR unordered
    for (i, j) in [(0, 1), (0, 2), (1, 2)] {
        if sigma[i] < sigma[j] {
            sigma.swap(i, j);
            swap_columns(&mut u, i, j);
            swap_columns(&mut v, i, j);
            negate_column(&mut u, j);
            negate_column(&mut v, j);
        }
    }

    (Matrix3::new(u), sigma, Matrix3::new(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Helper function to validate all critical SVD properties
    fn verify_svd_properties(a: &Matrix3<f64>, svd: &SvdSet<Matrix3<f64>>, epsilon: f64) {
        let (u, s, v) = (*svd.u(), *svd.s(), *svd.v());

        // Property 1: Reconstruction (A = U * S * V.T)
        let reconstruction = u * s * v.transpose();
        assert!(
            reconstruction.max_abs_diff(a) < epsilon,
            "Reconstruction failed: A != U*S*V.T\nA: {a:?}\nReconstruction: {reconstruction:?}"
        );

        // Property 2: U is Orthogonal (U.T * U = I)
        let u_t_u = u.transpose() * u;
        assert!(
            u_t_u.max_abs_diff(&Matrix3::identity()) < epsilon,
            "U is not orthogonal: U.T*U != I\nU.T*U: {u_t_u:?}"
        );

        // Property 3: V is a rotation
        let v_t_v = v.transpose() * v;
        assert!(
            v_t_v.max_abs_diff(&Matrix3::identity()) < epsilon,
            "V is not orthogonal: V.T*V != I\nV.T*V: {v_t_v:?}"
        );
        assert_relative_eq!(v.determinant(), 1.0, epsilon = epsilon);

        // Property 4: S is diagonal, non-negative and sorted
        let [s0, s1, s2] = s.diagonal();
        assert!(s2 >= 0.0, "Singular values are not non-negative: {s:?}");
        assert!(s0 >= s1 && s1 >= s2, "Singular values are not sorted: {s:?}");
        for i in 0..3 {
            for j in 0..3 {
                if i != j {
                    assert_eq!(s[(i, j)], 0.0);
                }
            }
        }
    }

    fn svd3_f64(a: &Matrix3<f64>) -> SvdSet<Matrix3<f64>> {
        match svd3d(a, ScalarPrecision::F64, None) {
            Ok(svd) => svd,
            Err(e) => panic!("svd3d failed: {e}"),
        }
    }

    #[test]
    fn test_svd3_diagonal_sorted() {
        let a = Matrix3::from_diagonal([3.0, 2.0, 1.0]);
        let svd = svd3_f64(&a);
        verify_svd_properties(&a, &svd, 1e-12);
        assert_eq!(svd.singular_values(), [3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_svd3_diagonal_unsorted() {
        let a = Matrix3::from_diagonal([2.0, 3.0, 1.0]);
        let svd = svd3_f64(&a);
        verify_svd_properties(&a, &svd, 1e-12);
        for (s, expected) in svd.singular_values().into_iter().zip([3.0, 2.0, 1.0]) {
            assert_relative_eq!(s, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_svd3_zero() {
        let a = Matrix3::zeros();
        let svd = svd3_f64(&a);
        verify_svd_properties(&a, &svd, 1e-12);
        assert_eq!(svd.singular_values(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_svd3_identity() {
        let a = Matrix3::identity();
        let svd = svd3_f64(&a);
        verify_svd_properties(&a, &svd, 1e-12);
        assert_eq!(*svd.s(), Matrix3::identity());
    }

    #[test]
    fn test_svd3_reference_matrix() {
        let a = Matrix3::new([[1.0, 1.0, 3.0], [9.0, -3.0, 2.0], [-3.0, 4.0, 2.0]]);
        let svd = svd3_f64(&a);
        verify_svd_properties(&a, &svd, 1e-12);

        // product of the singular values is |det(A)|
        let [s0, s1, s2] = svd.singular_values();
        assert_relative_eq!(s0 * s1 * s2, 43.0, epsilon = 1e-10);
        assert_relative_eq!(s0 * s0 + s1 * s1 + s2 * s2, 134.0, epsilon = 1e-10);
    }

    #[test]
    fn test_svd3_reflection_matrix() {
        let a = Matrix3::from_diagonal([1.0, -1.0, 1.0]);
        let svd = svd3_f64(&a);
        verify_svd_properties(&a, &svd, 1e-12);
        assert_relative_eq!(svd.u().determinant(), -1.0, epsilon = 1e-12);
        for s in svd.singular_values() {
            assert_relative_eq!(s, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_svd3_rotation_matrix() {
        let (sin, cos) = std::f64::consts::FRAC_PI_4.sin_cos();
        let a = Matrix3::new([[cos, 0.0, sin], [0.0, 1.0, 0.0], [-sin, 0.0, cos]]);
        let svd = svd3_f64(&a);
        verify_svd_properties(&a, &svd, 1e-12);
        assert_relative_eq!(svd.u().determinant(), 1.0, epsilon = 1e-12);
        for s in svd.singular_values() {
            assert_relative_eq!(s, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_svd3_singular_rank1() {
        let a = Matrix3::new([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [3.0, 6.0, 9.0]]);
        let svd = svd3_f64(&a);
        verify_svd_properties(&a, &svd, 1e-10);

        let [s0, s1, s2] = svd.singular_values();
        assert_relative_eq!(s0, 14.0, epsilon = 1e-10);
        assert!(s1.abs() < 1e-6);
        assert!(s2.abs() < 1e-6);
    }

    #[test]
    fn test_svd3_singular_rank2() {
        let a = Matrix3::new([[1.0, 4.0, 5.0], [2.0, 5.0, 7.0], [3.0, 6.0, 9.0]]);
        let svd = svd3_f64(&a);
        verify_svd_properties(&a, &svd, 1e-10);

        let [s0, s1, s2] = svd.singular_values();
        assert!(s0 > 1e-6);
        assert!(s1 > 1e-6);
        assert!(s2.abs() < 1e-6);
    }

    #[test]
    fn test_svd3_f32_reference_matrix() -> Result<(), SvdError> {
        let a = Matrix3::new([[1.0f32, 1.0, 3.0], [9.0, -3.0, 2.0], [-3.0, 4.0, 2.0]]);
        let svd = svd3d(&a, ScalarPrecision::F32, None)?;
        let (u, s, v) = (*svd.u(), *svd.s(), *svd.v());
        assert!((u * s * v.transpose()).max_abs_diff(&a) < 1e-5);
        assert!((u.transpose() * u).max_abs_diff(&Matrix3::identity()) < 1e-5);
        assert!((v.transpose() * v).max_abs_diff(&Matrix3::identity()) < 1e-5);
        Ok(())
    }

    #[test]
    fn test_svd3_precision_mismatch() {
        let a = Matrix3::<f32>::identity();
        assert_eq!(
            svd3d(&a, ScalarPrecision::F64, None),
            Err(SvdError::InvalidPrecision {
                requested: ScalarPrecision::F64,
                expected: ScalarPrecision::F32,
            })
        );
    }

    #[test]
    fn test_svd3_iteration_override() -> Result<(), SvdError> {
        let a = Matrix3::new([[1.0, 1.0, 3.0], [9.0, -3.0, 2.0], [-3.0, 4.0, 2.0]]);

        // no sweeps leaves V at the identity
        let svd = svd3d(&a, ScalarPrecision::F64, Some(0))?;
        assert_eq!(*svd.v(), Matrix3::identity());

        let svd = svd3d(&a, ScalarPrecision::F64, Some(12))?;
        verify_svd_properties(&a, &svd, 1e-12);
        Ok(())
    }

    struct TruncatedKernel;

    impl Svd3Kernel<f64> for TruncatedKernel {
        type Output = Vec<f64>;

        fn decompose(&self, entries: &[f64; 9], iterations: usize) -> Self::Output {
            let mut out = JacobiSvd3.decompose(entries, iterations).to_vec();
            out.pop();
            out
        }
    }

    struct EchoKernel;

    impl Svd3Kernel<f64> for EchoKernel {
        type Output = Vec<f64>;

        fn decompose(&self, entries: &[f64; 9], iterations: usize) -> Self::Output {
            let mut out = vec![0.0; 21];
            out[0] = iterations as f64;
            out[18..].copy_from_slice(&entries[..3]);
            out
        }
    }

    #[test]
    fn test_svd3_malformed_output() {
        let a = Matrix3::<f64>::identity();
        assert_eq!(
            svd3d_with_kernel(&TruncatedKernel, &a, ScalarPrecision::F64, None),
            Err(SvdError::MalformedOutput {
                expected: 21,
                actual: 20,
            })
        );
    }

    #[test]
    fn test_svd3_kernel_unpacking() -> Result<(), SvdError> {
        let a = Matrix3::new([[4.0, 5.0, 6.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]]);
        let svd = svd3d_with_kernel(&EchoKernel, &a, ScalarPrecision::F64, None)?;

        // the default iteration count reaches the kernel
        assert_eq!(svd.u()[(0, 0)], 8.0);
        assert_eq!(*svd.s(), Matrix3::from_diagonal([4.0, 5.0, 6.0]));
        assert_eq!(*svd.v(), Matrix3::zeros());
        Ok(())
    }

    #[test]
    fn test_qr_givens_negative_pivot() {
        let (c, s) = qr_givens(-1.0f64, 1.0);
        assert_relative_eq!(c, -std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-15);
        assert_relative_eq!(s, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-15);
        // the rotated entry vanishes
        assert_relative_eq!(-s * -1.0 + c * 1.0, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_svd3_deterministic() -> Result<(), SvdError> {
        let a = Matrix3::new([[0.3f32, -1.2, 2.5], [1.1, 0.4, -0.7], [2.2, 1.9, 0.1]]);
        let first = svd3d(&a, ScalarPrecision::F32, None)?;
        let second = svd3d(&a, ScalarPrecision::F32, None)?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_svd3_typed_matches_default() -> Result<(), SvdError> {
        let a = Matrix3::new([[1.0f64, 1.0, 3.0], [9.0, -3.0, 2.0], [-3.0, 4.0, 2.0]]);
        assert_eq!(svd3d_typed(&a), svd3d(&a, ScalarPrecision::F64, None)?);
        Ok(())
    }
}
