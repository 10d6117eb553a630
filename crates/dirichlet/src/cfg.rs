//! Build configuration (tolerances, sampling parameters, seed).
//!
//! Policy
//! - One flat struct passed explicitly into every stage; no global state.
//! - `validate` rejects inconsistent values up front so later stages can assume them.

use crate::error::DirichletError;

/// Largest accepted word length. The element count grows like `(2N-1)^L`.
pub const MAX_WORD_LENGTH: usize = 7;

/// Draws per sampler chunk; each chunk has its own seeded RNG.
pub const SAMPLE_CHUNK: usize = 256;

/// Chunks per parallel sampler batch; cancellation and the accepted-count cap are checked
/// between batches.
pub const SAMPLE_BATCH: usize = 64;

#[derive(Clone, Debug)]
pub struct DirichletCfg {
    pub max_word_length: usize,
    pub sample_count: usize,
    /// Accept a sample when `min |s|` over all bisectors is below this value.
    pub boundary_tolerance: f64,
    /// Margin added around the orbit points when deriving the bounding box.
    pub bounding_margin: f64,
    /// Determinant and denominator threshold.
    pub numeric_eps: f64,
    /// Decimal places kept by the canonical key.
    pub key_decimals: u32,
    /// `|alpha|` below this selects the plane branch.
    pub plane_eps: f64,
    /// `|alpha|` in `[plane_eps, borderline_alpha)` is logged as borderline.
    pub borderline_alpha: f64,
    /// Slack on `s <= 0` when testing half-space membership.
    pub feasibility_eps: f64,
    /// Lowest sampled height.
    pub height_floor: f64,
    /// Iteration cap = `iteration_factor * sample_count`.
    pub iteration_factor: usize,
    pub seed: u64,
}

impl Default for DirichletCfg {
    fn default() -> Self {
        Self {
            max_word_length: 3,
            sample_count: 2000,
            boundary_tolerance: 0.02,
            bounding_margin: 1.0,
            numeric_eps: 1e-12,
            key_decimals: 6,
            plane_eps: 1e-9,
            borderline_alpha: 1e-6,
            feasibility_eps: 1e-9,
            height_floor: 1e-3,
            iteration_factor: 30,
            seed: 0,
        }
    }
}

impl DirichletCfg {
    pub fn validate(&self) -> Result<(), DirichletError> {
        if self.max_word_length == 0 {
            return Err(DirichletError::invalid("max_word_length must be >= 1"));
        }
        if self.max_word_length > MAX_WORD_LENGTH {
            return Err(DirichletError::LengthTooLarge {
                requested: self.max_word_length,
                max: MAX_WORD_LENGTH,
            });
        }
        // Keys are i64; 12 decimals keeps entries up to ~1e6 representable.
        if self.key_decimals == 0 || self.key_decimals > 12 {
            return Err(DirichletError::invalid("key_decimals must be in 1..=12"));
        }
        for (name, v) in [
            ("boundary_tolerance", self.boundary_tolerance),
            ("numeric_eps", self.numeric_eps),
            ("plane_eps", self.plane_eps),
            ("height_floor", self.height_floor),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return Err(DirichletError::invalid(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if !(self.bounding_margin.is_finite() && self.bounding_margin >= 0.0) {
            return Err(DirichletError::invalid(
                "bounding_margin must be finite and >= 0",
            ));
        }
        if !(self.feasibility_eps.is_finite() && self.feasibility_eps >= 0.0) {
            return Err(DirichletError::invalid(
                "feasibility_eps must be finite and >= 0",
            ));
        }
        if self.borderline_alpha < self.plane_eps {
            return Err(DirichletError::invalid("borderline_alpha >= plane_eps required"));
        }
        if self.iteration_factor == 0 {
            return Err(DirichletError::invalid("iteration_factor must be > 0"));
        }
        Ok(())
    }

    /// Sampler iteration cap.
    #[inline]
    pub fn iteration_cap(&self) -> usize {
        self.iteration_factor.saturating_mul(self.sample_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        DirichletCfg::default().validate().unwrap();
    }

    #[test]
    fn rejects_long_words_and_bad_tolerances() {
        let cfg = DirichletCfg {
            max_word_length: MAX_WORD_LENGTH + 1,
            ..DirichletCfg::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(DirichletError::LengthTooLarge {
                requested: 8,
                max: MAX_WORD_LENGTH
            })
        );
        let cfg = DirichletCfg {
            max_word_length: 0,
            ..DirichletCfg::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(DirichletError::InvalidParams { .. })
        ));
        let cfg = DirichletCfg {
            boundary_tolerance: f64::NAN,
            ..DirichletCfg::default()
        };
        assert!(cfg.validate().is_err());
    }
}
