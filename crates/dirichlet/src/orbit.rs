//! Orbit points in the upper half-space via the Hermitian matrix model.
//!
//! Model
//! - A point `(w, t)` of H³ is the positive Hermitian matrix
//!   `P = (1/t)·(|w|²+t²  w; w̄  1)` of determinant one; the basepoint `j = (0, 1)` is `I`.
//! - `g` acts by `P ↦ g P g*`, so `g(j)` is encoded by `Q = g g*`, and
//!   `t = 1/Re(Q₂₂)`, `w = Q₁₂ / Re(Q₂₂)`.
//!
//! Code cross-refs: `bisector::derive_bisector` (reuses `hermitian_image`), `reduce`.

use nalgebra::Complex;

use crate::algebra::{conj_transpose, Cx, Mat2c};
use crate::error::DirichletError;

/// Point `(w, t)` of H³ with `t > 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitPoint {
    pub w: Cx,
    pub t: f64,
}

impl OrbitPoint {
    /// The basepoint `j = (0, 1)`.
    pub const BASEPOINT: OrbitPoint = OrbitPoint {
        w: Complex { re: 0.0, im: 0.0 },
        t: 1.0,
    };

    #[inline]
    pub fn new(w: Cx, t: f64) -> Self {
        Self { w, t }
    }

    /// Hermitian encoding of this point.
    pub fn to_hermitian(&self) -> Mat2c {
        let inv_t = 1.0 / self.t;
        let top = (self.w.norm_sqr() + self.t * self.t) * inv_t;
        Mat2c::new(
            Cx::new(top, 0.0),
            self.w * inv_t,
            self.w.conj() * inv_t,
            Cx::new(inv_t, 0.0),
        )
    }

    /// Decode a positive Hermitian matrix of determinant one.
    pub fn from_hermitian(q: &Mat2c, eps: f64) -> Result<Self, DirichletError> {
        let d = q[(1, 1)].re;
        if !(d.is_finite()) || d.abs() < eps {
            return Err(DirichletError::orbit(format!(
                "Re(Q22) = {d:e} below {eps:e}"
            )));
        }
        let t = 1.0 / d;
        if t <= 0.0 {
            return Err(DirichletError::orbit(format!("recovered height t = {t:e}")));
        }
        Ok(Self {
            w: q[(0, 1)] / d,
            t,
        })
    }

    /// Hyperbolic distance: `cosh d = 1 + (|w₁−w₂|² + (t₁−t₂)²) / (2 t₁ t₂)`.
    pub fn distance(&self, other: &OrbitPoint) -> f64 {
        let num = (self.w - other.w).norm_sqr() + (self.t - other.t).powi(2);
        let cosh = 1.0 + num / (2.0 * self.t * other.t);
        cosh.max(1.0).acosh()
    }
}

/// `Q = g g*`, the Hermitian image of the basepoint.
#[inline]
pub fn hermitian_image(g: &Mat2c) -> Mat2c {
    g * conj_transpose(g)
}

/// Image of the basepoint under `g`.
pub fn orbit_point(g: &Mat2c, eps: f64) -> Result<OrbitPoint, DirichletError> {
    OrbitPoint::from_hermitian(&hermitian_image(g), eps)
}

/// Image of an arbitrary point under `g` (`P ↦ g P g*`).
pub fn act(g: &Mat2c, p: &OrbitPoint, eps: f64) -> Result<OrbitPoint, DirichletError> {
    if !(p.t.is_finite() && p.t > 0.0) {
        return Err(DirichletError::orbit(format!("input height t = {:e}", p.t)));
    }
    let image = g * p.to_hermitian() * conj_transpose(g);
    OrbitPoint::from_hermitian(&image, eps)
}
