//! Algebra kernel: complex scalars and 2×2 complex matrices.
//!
//! Purpose
//! - Provide the handful of checked operations the downstream stages need
//!   (division, principal square root, determinant, conjugate transpose, inverse).
//! - Reuse nalgebra's `Complex<f64>` and `Matrix2` instead of bespoke types; only the
//!   operations that must fail on near-zero divisors live here.
//!
//! Numeric policy
//! - Every division is guarded by an explicit `eps`; below it the operation returns
//!   `DegenerateArithmetic` instead of producing NaN/∞.
//!
//! Code cross-refs: `normalize`, `orbit::hermitian_image`, `bisector::derive_bisector`.

mod complex;
mod matrix;

pub use complex::{checked_div, principal_sqrt, Cx};
pub use matrix::{adjugate, conj_transpose, det, inverse, max_abs_diff, scale, Mat2c};
