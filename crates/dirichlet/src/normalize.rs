//! Generator normalization into SL(2,C) representatives.

use crate::algebra::{det, principal_sqrt, scale, Cx, Mat2c};
use crate::error::DirichletError;

/// Rescale every generator by `1/√det` (principal branch).
///
/// Atomic: the first near-singular input aborts the whole call with
/// `InvalidGenerator`, and no partial list is returned.
pub fn normalize_generators(gens: &[Mat2c], eps: f64) -> Result<Vec<Mat2c>, DirichletError> {
    if gens.is_empty() {
        return Err(DirichletError::invalid("need at least one generator"));
    }
    gens.iter()
        .enumerate()
        .map(|(index, g)| {
            normalize_one(g, eps)
                .map_err(|reason| DirichletError::InvalidGenerator { index, reason })
        })
        .collect()
}

fn normalize_one(g: &Mat2c, eps: f64) -> Result<Mat2c, String> {
    if g.iter().any(|e| !(e.re.is_finite() && e.im.is_finite())) {
        return Err("non-finite entry".to_string());
    }
    let d = det(g);
    if d.norm() < eps {
        return Err(format!("|det| = {:e} below {eps:e}", d.norm()));
    }
    let root = principal_sqrt(d);
    Ok(scale(g, Cx::new(1.0, 0.0) / root))
}
