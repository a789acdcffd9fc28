use std::fmt;
use std::str::FromStr;

use num_traits::{AsPrimitive, Float};

use crate::error::SvdError;

/// Floating point precision of a decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarPrecision {
    /// Single precision (`f32`).
    F32,
    /// Double precision (`f64`).
    F64,
}

impl ScalarPrecision {
    /// Number of Jacobi sweeps the 3x3 kernel runs when no override is given.
    ///
    /// Five sweeps reach single precision accuracy for well conditioned inputs,
    /// eight reach double precision.
    pub const fn default_iterations(self) -> usize {
        match self {
            ScalarPrecision::F32 => 5,
            ScalarPrecision::F64 => 8,
        }
    }

    /// Maximum per-element deviation accepted for `U Σ Vᵀ` against `A` and for
    /// `UᵀU`, `VᵀV` against the identity.
    pub const fn reconstruction_tolerance(self) -> f64 {
        match self {
            ScalarPrecision::F32 => 1e-5,
            ScalarPrecision::F64 => 1e-12,
        }
    }
}

impl fmt::Display for ScalarPrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarPrecision::F32 => write!(f, "f32"),
            ScalarPrecision::F64 => write!(f, "f64"),
        }
    }
}

impl FromStr for ScalarPrecision {
    type Err = SvdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "f32" => Ok(ScalarPrecision::F32),
            "f64" => Ok(ScalarPrecision::F64),
            other => Err(SvdError::InvalidPrecisionName(other.to_string())),
        }
    }
}

/// Element type of the matrices accepted by the decompositions.
///
/// Implemented for `f32` and `f64` only.
pub trait SvdScalar:
    Float + AsPrimitive<f64> + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// The precision tag of the type.
    const PRECISION: ScalarPrecision;

    /// Threshold below which a Givens pivot is treated as zero during the QR step.
    const GIVENS_EPSILON: Self;

    /// Conversion from `f64`, used for constants and tolerances. Rounds to nearest
    /// for `f32`, so it never fails where `NumCast` would return an `Option`.
    fn cast(value: f64) -> Self;

    /// Widening conversion to `f64`.
    #[inline(always)]
    fn as_f64(self) -> f64 {
        self.as_()
    }
}

impl SvdScalar for f32 {
    const PRECISION: ScalarPrecision = ScalarPrecision::F32;
    const GIVENS_EPSILON: f32 = 1e-6;

    #[inline(always)]
    fn cast(value: f64) -> Self {
        value.as_()
    }
}

impl SvdScalar for f64 {
    const PRECISION: ScalarPrecision = ScalarPrecision::F64;
    const GIVENS_EPSILON: f64 = 1e-15;

    #[inline(always)]
    fn cast(value: f64) -> Self {
        value
    }
}

/// Fails with [`SvdError::InvalidPrecision`] unless `requested` is the precision of `T`.
pub(crate) fn ensure_precision<T: SvdScalar>(requested: ScalarPrecision) -> Result<(), SvdError> {
    if requested != T::PRECISION {
        log::debug!("rejecting {requested} request for {} elements", T::PRECISION);
        return Err(SvdError::InvalidPrecision {
            requested,
            expected: T::PRECISION,
        });
    }
    Ok(())
}
