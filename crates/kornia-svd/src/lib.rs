#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Kornia SVD
//!
//! Singular Value Decomposition `A = U Σ Vᵀ` of small square matrices, as used in
//! geometry pipelines for rotation extraction, pose estimation and rigid alignment.
//!
//! - **2x2**: closed form, polar decomposition followed by one Jacobi rotation.
//! - **3x3**: fixed number of Jacobi sweeps on `AᵀA`, then a Givens QR.
//!
//! Both paths return non-negative singular values sorted descending, an orthogonal
//! `U` and a rotation `V`.
//!
//! ## Example
//!
//! ```rust
//! use kornia_svd::{svd, verify, Matrix3, ScalarPrecision};
//!
//! let a = Matrix3::new([[1.0f64, 1.0, 3.0], [9.0, -3.0, 2.0], [-3.0, 4.0, 2.0]]);
//! let result = svd(&a, ScalarPrecision::F64)?;
//!
//! let [s0, s1, s2] = result.singular_values();
//! assert!(s0 >= s1 && s1 >= s2 && s2 >= 0.0);
//! assert!(verify(&a, &result, ScalarPrecision::F64));
//! # Ok::<(), kornia_svd::SvdError>(())
//! ```

/// Error types for the decompositions.
pub mod error;

/// Conversions from and to glam matrices and typed entry points.
pub mod glam;

/// Small square matrix type.
pub mod matrix;

/// Polar decomposition of 2x2 matrices.
pub mod polar;

/// Scalar precision and the element trait.
pub mod precision;

/// Decomposition result and the dimension dispatcher.
pub mod svd;

/// Closed-form 2x2 SVD.
pub mod svd2;

/// Fixed-iteration 3x3 SVD.
pub mod svd3;

/// Verification of decomposition results.
pub mod verify;

pub use crate::error::SvdError;
pub use crate::matrix::{Matrix, Matrix2, Matrix3};
pub use crate::precision::{ScalarPrecision, SvdScalar};
pub use crate::svd::{svd, SvdSet};
pub use crate::verify::{verify, Tolerance, VerificationError};
