//! Membership in the intersection of bisector half-spaces.

use crate::algebra::Cx;
use crate::bisector::Bisector;

/// Evaluation of one point against every bisector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Membership {
    /// Largest `s` over all bisectors (`-∞` when there are none).
    pub max_value: f64,
    /// Index of the bisector attaining `max_value`.
    pub worst: Option<usize>,
    /// Smallest `|s|` over all bisectors (`+∞` when there are none).
    pub min_abs: f64,
    /// Index of the bisector attaining `min_abs`.
    pub nearest: Option<usize>,
}

impl Membership {
    /// Inside (or on) every half-space up to `eps`.
    #[inline]
    pub fn inside(&self, eps: f64) -> bool {
        self.max_value <= eps
    }

    /// Inside and within `tol` of some face.
    #[inline]
    pub fn near_boundary(&self, eps: f64, tol: f64) -> bool {
        self.inside(eps) && self.min_abs < tol
    }
}

/// Evaluate `(w, t)` against all bisectors in one pass.
///
/// Stops early once some `s` exceeds `reject_above`; pass `f64::INFINITY` for a full scan.
pub fn classify(bisectors: &[Bisector], w: Cx, t: f64, reject_above: f64) -> Membership {
    let mut m = Membership {
        max_value: f64::NEG_INFINITY,
        worst: None,
        min_abs: f64::INFINITY,
        nearest: None,
    };
    for (i, b) in bisectors.iter().enumerate() {
        let s = b.eval(w, t);
        if s > m.max_value {
            m.max_value = s;
            m.worst = Some(i);
        }
        if s.abs() < m.min_abs {
            m.min_abs = s.abs();
            m.nearest = Some(i);
        }
        if s > reject_above {
            break;
        }
    }
    m
}

/// Whether `(w, t)` lies in the approximate Dirichlet domain.
#[inline]
pub fn in_domain(bisectors: &[Bisector], w: Cx, t: f64, eps: f64) -> bool {
    bisectors.iter().all(|b| b.contains_eps(w, t, eps))
}
