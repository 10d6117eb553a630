//! Bisectors between the basepoint and its images.
//!
//! Derivation
//! - For `Q = g g*` and a point `P`, `cosh d(P, j) = tr(P)/2` and `cosh d(P, g j) = tr(P Q⁻¹)/2`.
//! - With `A = I − Q⁻¹`, the signed quantity `s(w, t) = t·tr(P A)` reads
//!   `s = alpha·(|w|² + t²) + 2·Re(beta·w) + delta` and equals
//!   `2t·(cosh d(P, j) − cosh d(P, g j))`, so `s ≤ 0` is the basepoint's side.
//! - `alpha ≠ 0` gives a hemisphere centred at `−conj(beta)/alpha`; `alpha ≈ 0` gives a
//!   vertical plane.
//!
//! Plane convention
//! - `HalfPlane { normal, offset }` stores a unit normal `n = (Re β, −Im β)/|β|` (as a
//!   complex number `n.re + i·n.im`) and `offset = −delta / (2|β|)`; the plane is
//!   `n·(x, y) = offset` and the basepoint side is `n·(x, y) ≤ offset`.
//!
//! Code cross-refs: `orbit::hermitian_image`, `sample::sample_boundary`.

use crate::algebra::{inverse, Cx, Mat2c};
use crate::error::DirichletError;
use crate::orbit::{hermitian_image, OrbitPoint};

/// Geometric shape of the equidistant locus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BisectorShape {
    Hemisphere { center: Cx, radius: f64 },
    HalfPlane { normal: Cx, offset: f64 },
}

/// A bisector together with its half-space predicate coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bisector {
    pub shape: BisectorShape,
    pub alpha: f64,
    pub beta: Cx,
    pub delta: f64,
}

impl Bisector {
    /// `s(w, t)`: negative on the basepoint side, zero on the bisector.
    #[inline]
    pub fn eval(&self, w: Cx, t: f64) -> f64 {
        self.alpha * (w.norm_sqr() + t * t) + 2.0 * (self.beta * w).re + self.delta
    }

    #[inline]
    pub fn eval_point(&self, p: &OrbitPoint) -> f64 {
        self.eval(p.w, p.t)
    }

    /// `s(0, 1) = alpha + delta`; never positive for a correctly derived bisector.
    #[inline]
    pub fn basepoint_value(&self) -> f64 {
        self.alpha + self.delta
    }

    #[inline]
    pub fn contains_eps(&self, w: Cx, t: f64, eps: f64) -> bool {
        self.eval(w, t) <= eps
    }

    #[inline]
    pub fn is_plane(&self) -> bool {
        matches!(self.shape, BisectorShape::HalfPlane { .. })
    }
}

/// Thresholds used by the case split.
#[derive(Clone, Copy, Debug)]
pub struct BisectorCfg {
    /// Inverse and radius² threshold.
    pub eps: f64,
    /// `|alpha|` below this selects the plane branch.
    pub plane_eps: f64,
}

/// Derive the bisector between `j` and `g(j)`.
///
/// The caller filters out the identity (by canonical key); elements fixing `j`
/// (e.g. rotations about the vertical axis) still reach here and come back as
/// `DegenerateBisector`.
pub fn derive_bisector(g: &Mat2c, cfg: BisectorCfg) -> Result<Bisector, DirichletError> {
    let q = hermitian_image(g);
    let q_inv = inverse(&q, cfg.eps)?;
    let a = Mat2c::identity() - q_inv;

    let alpha = a[(0, 0)].re;
    let delta = a[(1, 1)].re;
    // average with conj(A12) to force Hermitian symmetry against rounding noise
    let beta = (a[(1, 0)] + a[(0, 1)].conj()) * 0.5;

    let shape = if alpha.abs() < cfg.plane_eps {
        let nb = beta.norm();
        if !(nb.is_finite()) || nb < cfg.eps {
            return Err(DirichletError::bisector(format!(
                "plane normal |beta| = {nb:e} below {:e}",
                cfg.eps
            )));
        }
        BisectorShape::HalfPlane {
            normal: Cx::new(beta.re / nb, -beta.im / nb),
            offset: -delta / (2.0 * nb),
        }
    } else {
        let r2 = beta.norm_sqr() / (alpha * alpha) - delta / alpha;
        if !(r2.is_finite()) || r2 <= cfg.eps {
            return Err(DirichletError::bisector(format!(
                "hemisphere radius² = {r2:e} below {:e}",
                cfg.eps
            )));
        }
        BisectorShape::Hemisphere {
            center: -beta.conj() / alpha,
            radius: r2.sqrt(),
        }
    };

    let bis = Bisector {
        shape,
        alpha,
        beta,
        delta,
    };
    debug_assert!(
        bis.basepoint_value() <= 1e-9 * (1.0 + alpha.abs() + delta.abs()),
        "basepoint on the wrong side of its bisector: s(0,1) = {}",
        bis.basepoint_value()
    );
    Ok(bis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_generators;
    use proptest::prelude::*;

    const CFG: BisectorCfg = BisectorCfg {
        eps: 1e-12,
        plane_eps: 1e-9,
    };

    fn real(a: f64, b: f64, c: f64, d: f64) -> Mat2c {
        Mat2c::new(
            Cx::new(a, 0.0),
            Cx::new(b, 0.0),
            Cx::new(c, 0.0),
            Cx::new(d, 0.0),
        )
    }

    #[test]
    fn parabolic_translation_gives_vertical_planes() {
        let t = derive_bisector(&real(1.0, 1.0, 0.0, 1.0), CFG).unwrap();
        match t.shape {
            BisectorShape::HalfPlane { normal, offset } => {
                assert!((normal - Cx::new(1.0, 0.0)).norm() < 1e-12);
                assert!((offset - 0.5).abs() < 1e-12);
            }
            other => panic!("expected plane, got {other:?}"),
        }
        assert!(t.is_plane());
        // Re(w) = 0.5 lies on the bisector for every height.
        assert!(t.eval(Cx::new(0.5, 3.0), 0.2).abs() < 1e-12);

        let ti = derive_bisector(&real(1.0, -1.0, 0.0, 1.0), CFG).unwrap();
        match ti.shape {
            BisectorShape::HalfPlane { normal, offset } => {
                // -x = 0.5, i.e. Re(w) = -0.5
                assert!((normal - Cx::new(-1.0, 0.0)).norm() < 1e-12);
                assert!((offset - 0.5).abs() < 1e-12);
            }
            other => panic!("expected plane, got {other:?}"),
        }
        assert!(ti.eval(Cx::new(-0.5, 0.0), 1.0).abs() < 1e-12);
    }

    #[test]
    fn loxodromic_axis_gives_centered_hemisphere() {
        let l = 1.2_f64;
        let b = derive_bisector(&real(l, 0.0, 0.0, 1.0 / l), CFG).unwrap();
        let trace = l + 1.0 / l;
        let lambda = (trace + (trace * trace - 4.0).sqrt()) / 2.0;
        match b.shape {
            BisectorShape::Hemisphere { center, radius } => {
                assert!(center.norm() < 1e-12);
                assert!((radius * radius - lambda * lambda).abs() < 1e-9);
            }
            other => panic!("expected hemisphere, got {other:?}"),
        }
        assert!(!b.is_plane());
        assert!(b.basepoint_value() < 0.0);
    }

    #[test]
    fn stabilizer_of_basepoint_is_degenerate() {
        let th = 0.9_f64;
        let rot = Mat2c::new(
            Cx::from_polar(1.0, th),
            Cx::new(0.0, 0.0),
            Cx::new(0.0, 0.0),
            Cx::from_polar(1.0, -th),
        );
        let err = derive_bisector(&rot, CFG).unwrap_err();
        assert!(matches!(err, DirichletError::DegenerateBisector { .. }));
    }

    #[test]
    fn bisector_is_equidistant_locus() {
        let g = normalize_generators(&[real(2.0, 1.0, 1.0, 3.0)], 1e-12).unwrap()[0];
        let b = derive_bisector(&g, CFG).unwrap();
        let image = crate::orbit::orbit_point(&g, 1e-12).unwrap();
        if let BisectorShape::Hemisphere { center, radius } = b.shape {
            // a point on the hemisphere straight above its horizontal centre offset
            let p = OrbitPoint::new(center + Cx::new(0.3 * radius, 0.0), radius * 0.91f64.sqrt());
            let d0 = p.distance(&OrbitPoint::BASEPOINT);
            let d1 = p.distance(&image);
            assert!((d0 - d1).abs() < 1e-9);
        } else {
            panic!("expected hemisphere");
        }
    }

    fn arb_entry() -> impl Strategy<Value = Cx> {
        (-3.0f64..3.0, -3.0f64..3.0).prop_map(|(re, im)| Cx::new(re, im))
    }

    proptest! {
        #[test]
        fn basepoint_is_on_nonpositive_side(
            a in arb_entry(), b in arb_entry(), c in arb_entry(), d in arb_entry()
        ) {
            let m = Mat2c::new(a, b, c, d);
            prop_assume!(crate::algebra::det(&m).norm() > 1e-2);
            let g = normalize_generators(&[m], 1e-12).unwrap()[0];
            if let Ok(bis) = derive_bisector(&g, CFG) {
                prop_assert!(bis.basepoint_value() <= 1e-9);
                prop_assert!(bis.eval_point(&OrbitPoint::BASEPOINT) <= 1e-9);
            }
        }
    }
}
