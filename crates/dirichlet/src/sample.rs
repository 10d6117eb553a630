//! Monte-Carlo sampling of the Dirichlet domain's boundary.
//!
//! Model
//! - Draw points uniformly in an axis-aligned box in `(x, y, t)`, keep those inside every
//!   half-space (up to `feasibility_eps`) and within `boundary_tolerance` of some face.
//! - The iteration cap is split into chunks of `SAMPLE_CHUNK` draws. Chunk `k` uses its own
//!   `StdRng` seeded from `(seed, k)`, so a chunk's draws do not depend on scheduling.
//! - Chunks run in parallel in fixed batches of `SAMPLE_BATCH`. Cancellation and the accepted
//!   count are checked between batches, so a run that reaches the target may overshoot it by
//!   up to one batch before truncation. Results depend only on `(params, bisectors)`.
//!
//! Code cross-refs: `domain::classify`, `cfg::SAMPLE_CHUNK`.

use std::sync::atomic::{AtomicUsize, Ordering};

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::algebra::Cx;
use crate::bisector::Bisector;
use crate::cancel::CancelToken;
use crate::cfg::{SAMPLE_BATCH, SAMPLE_CHUNK};
use crate::domain::classify;
use crate::error::DirichletError;
use crate::orbit::OrbitPoint;

/// Axis-aligned sampling region in `(x, y, t)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vector3<f64>,
    pub max: Vector3<f64>,
}

impl BoundingBox {
    /// Box around the orbit points and the basepoint, widened by `margin`.
    /// Heights span `[height_floor, max t + margin]`.
    pub fn from_orbit(points: &[OrbitPoint], margin: f64, height_floor: f64) -> Self {
        let mut lo = Vector3::new(0.0, 0.0, 1.0);
        let mut hi = lo;
        for p in points {
            let v = Vector3::new(p.w.re, p.w.im, p.t);
            lo = lo.inf(&v);
            hi = hi.sup(&v);
        }
        let min = Vector3::new(lo.x - margin, lo.y - margin, height_floor);
        let max = Vector3::new(
            hi.x + margin,
            hi.y + margin,
            (hi.z + margin).max(height_floor),
        );
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, p: &Vector3<f64>) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }

    pub fn volume(&self) -> f64 {
        let e = self.max - self.min;
        e.x * e.y * e.z
    }

    fn draw<R: Rng>(&self, rng: &mut R) -> Vector3<f64> {
        Vector3::new(
            self.min.x + (self.max.x - self.min.x) * rng.gen::<f64>(),
            self.min.y + (self.max.y - self.min.y) * rng.gen::<f64>(),
            self.min.z + (self.max.z - self.min.z) * rng.gen::<f64>(),
        )
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SampleParams {
    pub region: BoundingBox,
    pub target: usize,
    pub boundary_tolerance: f64,
    pub feasibility_eps: f64,
    pub iteration_cap: usize,
    pub seed: u64,
}

/// Accepted boundary points `(x, y, t)` plus sampling statistics.
#[derive(Clone, Debug, Default)]
pub struct SampleSet {
    pub points: Vec<Vector3<f64>>,
    pub attempts: usize,
    pub target: usize,
}

impl SampleSet {
    /// Whether the target count was reached before the cap.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.points.len() >= self.target
    }

    pub fn acceptance_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.points.len() as f64 / self.attempts as f64
        }
    }
}

/// Sample points near the boundary of the intersection of all half-spaces.
///
/// Never fails on geometry: an empty or thin domain just yields fewer points.
/// Returns `Cancelled` (dropping everything found so far) if `cancel` fires.
pub fn sample_boundary(
    bisectors: &[Bisector],
    params: &SampleParams,
    cancel: &CancelToken,
) -> Result<SampleSet, DirichletError> {
    sample_boundary_counted(bisectors, params, cancel, &AtomicUsize::new(0))
}

/// [`sample_boundary`] that also adds every finished chunk's draws to `drawn`, so another
/// thread can watch progress.
pub fn sample_boundary_counted(
    bisectors: &[Bisector],
    params: &SampleParams,
    cancel: &CancelToken,
    drawn: &AtomicUsize,
) -> Result<SampleSet, DirichletError> {
    cancel.check()?;
    if bisectors.is_empty() || params.target == 0 {
        return Ok(SampleSet {
            points: Vec::new(),
            attempts: 0,
            target: params.target,
        });
    }
    let cap = params.iteration_cap;
    let n_chunks = cap.div_ceil(SAMPLE_CHUNK);
    let mut points: Vec<Vector3<f64>> = Vec::new();
    let mut attempts = 0;

    let mut first = 0;
    while first < n_chunks && points.len() < params.target {
        let last = (first + SAMPLE_BATCH).min(n_chunks);
        let batch: Vec<(usize, Vec<Vector3<f64>>)> = (first..last)
            .into_par_iter()
            .map(|k| {
                if cancel.is_cancelled() {
                    return (0, Vec::new());
                }
                let draws = SAMPLE_CHUNK.min(cap - k * SAMPLE_CHUNK);
                let mut rng = chunk_rng(params.seed, k as u64);
                let mut out = Vec::new();
                for _ in 0..draws {
                    let p = params.region.draw(&mut rng);
                    let m = classify(bisectors, Cx::new(p.x, p.y), p.z, params.feasibility_eps);
                    if m.near_boundary(params.feasibility_eps, params.boundary_tolerance) {
                        out.push(p);
                    }
                }
                drawn.fetch_add(draws, Ordering::Relaxed);
                (draws, out)
            })
            .collect();
        cancel.check()?;
        for (draws, out) in batch {
            attempts += draws;
            points.extend(out);
        }
        first = last;
    }

    points.truncate(params.target);
    tracing::debug!(
        found = points.len(),
        attempts,
        target = params.target,
        "boundary sampling finished"
    );
    Ok(SampleSet {
        points,
        attempts,
        target: params.target,
    })
}

/// Per-chunk RNG: SplitMix64-style mixing of `(seed, chunk)`.
fn chunk_rng(seed: u64, chunk: u64) -> StdRng {
    fn mix(mut x: u64) -> u64 {
        x ^= x >> 30;
        x = x.wrapping_mul(0xbf58476d1ce4e5b9);
        x ^= x >> 27;
        x = x.wrapping_mul(0x94d049bb133111eb);
        x ^ (x >> 31)
    }
    StdRng::seed_from_u64(mix(seed ^ mix(chunk.wrapping_add(0x9e3779b97f4a7c15))))
}
