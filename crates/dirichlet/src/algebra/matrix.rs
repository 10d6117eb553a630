use nalgebra::Matrix2;

use super::complex::Cx;
use crate::error::DirichletError;

/// 2×2 complex matrix `(a b; c d)`, an isometry of H³ up to scalar.
pub type Mat2c = Matrix2<Cx>;

#[inline]
pub fn det(m: &Mat2c) -> Cx {
    m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)]
}

/// Conjugate transpose `m*`.
#[inline]
pub fn conj_transpose(m: &Mat2c) -> Mat2c {
    m.adjoint()
}

/// Classical adjugate `(d −b; −c a)`.
#[inline]
pub fn adjugate(m: &Mat2c) -> Mat2c {
    Mat2c::new(m[(1, 1)], -m[(0, 1)], -m[(1, 0)], m[(0, 0)])
}

/// Inverse via adjugate / det; `DegenerateArithmetic` when `|det| < eps`.
pub fn inverse(m: &Mat2c, eps: f64) -> Result<Mat2c, DirichletError> {
    let d = det(m);
    let dn = d.norm();
    if !(dn.is_finite()) || dn < eps {
        return Err(DirichletError::arithmetic(format!(
            "matrix inverse with |det| = {dn:e} < {eps:e}"
        )));
    }
    let inv_d = Cx::new(1.0, 0.0) / d;
    Ok(adjugate(m).map(|e| e * inv_d))
}

#[inline]
pub fn scale(m: &Mat2c, s: Cx) -> Mat2c {
    m.map(|e| e * s)
}

/// Max-abs entrywise distance (used by tests and dedup diagnostics).
pub fn max_abs_diff(a: &Mat2c, b: &Mat2c) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}
