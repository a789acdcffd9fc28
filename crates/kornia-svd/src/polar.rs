use crate::matrix::Matrix2;
use crate::precision::SvdScalar;

/// Polar decomposition of a 2x2 matrix.
///
/// Returns `(R, S)` with `A = R S`, `R` orthogonal and `S` symmetric positive
/// semi-definite. `R` is a rotation when `det(A) >= 0` and a reflection otherwise,
/// which is what keeps `S` positive semi-definite for every input.
///
/// # Arguments
///
/// * `a` - The matrix to decompose.
///
/// # Example
///
/// ```
/// use kornia_svd::{polar::polar_decompose2, Matrix2};
///
/// let a = Matrix2::new([[1.0f64, 1.0], [9.0, -3.0]]);
/// let (r, s) = polar_decompose2(&a);
/// assert!((r * s).max_abs_diff(&a) < 1e-12);
/// assert_eq!(s[(0, 1)], s[(1, 0)]);
/// ```
pub fn polar_decompose2<T: SvdScalar>(a: &Matrix2<T>) -> (Matrix2<T>, Matrix2<T>) {
    let [[a00, a01], [a10, a11]] = *a.rows();

    let r = if a.determinant() >= T::zero() {
        let (c, s) = normalize(a00 + a11, a10 - a01);
        Matrix2::new([[c, -s], [s, c]])
    } else {
        let (c, s) = normalize(a00 - a11, a10 + a01);
        Matrix2::new([[c, s], [s, -c]])
    };

    let s = r.transpose() * *a;

    // S is symmetric in exact arithmetic, force it after rounding
    let off = (s[(0, 1)] + s[(1, 0)]) * T::cast(0.5);
    let s = Matrix2::new([[s[(0, 0)], off], [off, s[(1, 1)]]]);

    (r, s)
}

/// Unit vector along `(x, y)`, or `(1, 0)` for the zero vector.
#[inline(always)]
fn normalize<T: SvdScalar>(x: T, y: T) -> (T, T) {
    let norm = x.hypot(y);
    if norm == T::zero() {
        (T::one(), T::zero())
    } else {
        (x / norm, y / norm)
    }
}
