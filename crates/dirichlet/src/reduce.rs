//! Greedy reduction of a point towards the basepoint.
//!
//! Repeatedly apply whichever generator (or inverse) brings the point strictly closer to
//! `j`, until none does. The result lies in the region cut out by the generators' own
//! bisectors, which contains the Dirichlet domain.

use crate::algebra::Mat2c;
use crate::error::DirichletError;
use crate::orbit::{act, OrbitPoint};
use crate::words::{symbol_table, Symbol};

/// Minimal strict improvement in hyperbolic distance for a step to count.
const IMPROVE_EPS: f64 = 1e-9;

#[derive(Clone, Debug)]
pub struct Reduction {
    pub point: OrbitPoint,
    /// Symbols in application order: the result is `M(s_k)⋯M(s_1)` applied to the input.
    pub applied: Vec<Symbol>,
    /// Hyperbolic distance of `point` to `j`.
    pub distance: f64,
    /// `false` when `max_iter` was exhausted while still improving.
    pub converged: bool,
}

pub fn reduce_point(
    gens: &[Mat2c],
    start: OrbitPoint,
    max_iter: usize,
    eps: f64,
) -> Result<Reduction, DirichletError> {
    if !(start.t.is_finite() && start.t > 0.0) {
        return Err(DirichletError::invalid(format!(
            "point height must be > 0, got {}",
            start.t
        )));
    }
    let symbols = symbol_table(gens, eps)?;
    let mut current = start;
    let mut dist = current.distance(&OrbitPoint::BASEPOINT);
    let mut applied = Vec::new();

    for _ in 0..max_iter {
        let mut best: Option<(Symbol, OrbitPoint, f64)> = None;
        for (sym, m) in &symbols {
            let candidate = act(m, &current, eps)?;
            let d = candidate.distance(&OrbitPoint::BASEPOINT);
            let bar = best.as_ref().map_or(dist - IMPROVE_EPS, |(_, _, bd)| *bd);
            if d < bar {
                best = Some((*sym, candidate, d));
            }
        }
        match best {
            Some((sym, p, d)) => {
                applied.push(sym);
                current = p;
                dist = d;
            }
            None => {
                return Ok(Reduction {
                    point: current,
                    applied,
                    distance: dist,
                    converged: true,
                })
            }
        }
    }
    tracing::warn!(max_iter, distance = dist, "point reduction hit the iteration limit");
    Ok(Reduction {
        point: current,
        applied,
        distance: dist,
        converged: false,
    })
}
