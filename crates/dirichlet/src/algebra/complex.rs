use nalgebra::Complex;

use crate::error::DirichletError;

/// Complex scalar used throughout the crate.
pub type Cx = Complex<f64>;

/// `num / den`, failing when `|den| < eps`.
#[inline]
pub fn checked_div(num: Cx, den: Cx, eps: f64) -> Result<Cx, DirichletError> {
    let m = den.norm();
    if !(m.is_finite()) || m < eps {
        return Err(DirichletError::arithmetic(format!(
            "complex division by |{m:e}| < {eps:e}"
        )));
    }
    Ok(num / den)
}

/// Principal square root with the branch fixed by the sign of `z.im`.
///
/// `re = √((r+x)/2)`, `im = sign(y)·√((r−x)/2)` with `r = |z|` and `sign(0) = +1`,
/// so the negative real axis maps to the positive imaginary axis.
pub fn principal_sqrt(z: Cx) -> Cx {
    let r = z.norm();
    // max(0) absorbs rounding when r ≈ |x|
    let re = ((r + z.re) * 0.5).max(0.0).sqrt();
    let im = ((r - z.re) * 0.5).max(0.0).sqrt();
    let sign = if z.im < 0.0 { -1.0 } else { 1.0 };
    Cx::new(re, sign * im)
}
