//! One Dirichlet build: generators → elements → orbit → bisectors → boundary samples.
//!
//! Purpose
//! - Run every stage with parameters passed explicitly, returning all intermediate results
//!   together with a human-readable `BuildLog`.
//! - Keep nothing between builds: a new configuration means a new call.
//!
//! Failure policy
//! - Invalid configuration or generators abort the build.
//! - Degenerate orbit points and bisectors skip the element and are logged. An element
//!   without an orbit point contributes no bisector either.
//! - The sampler never fails; a short sample set is logged as a warning.
//! - Cancellation returns `Cancelled` and drops every partial result.
//!
//! Code cross-refs: `normalize`, `words`, `orbit`, `bisector`, `sample`.

use std::fmt;

use crate::algebra::Mat2c;
use crate::bisector::{derive_bisector, Bisector, BisectorCfg};
use crate::cancel::CancelToken;
use crate::cfg::DirichletCfg;
use crate::error::DirichletError;
use crate::normalize::normalize_generators;
use crate::orbit::{orbit_point, OrbitPoint};
use crate::sample::{sample_boundary, BoundingBox, SampleParams, SampleSet};
use crate::words::{enumerate_words, Enumeration};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
}

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildCounts {
    pub elements: usize,
    pub collisions: usize,
    pub orbit_points: usize,
    pub skipped_orbit_points: usize,
    pub hemispheres: usize,
    pub planes: usize,
    pub skipped_bisectors: usize,
    pub borderline_alphas: usize,
    pub samples: usize,
    pub sample_attempts: usize,
}

/// Ordered log entries plus counters. Entries are mirrored to `tracing`.
#[derive(Clone, Debug, Default)]
pub struct BuildLog {
    pub entries: Vec<LogEntry>,
    pub counts: BuildCounts,
}

impl BuildLog {
    fn info(&mut self, message: String) {
        tracing::info!("{message}");
        self.entries.push(LogEntry {
            level: LogLevel::Info,
            message,
        });
    }

    fn warn(&mut self, message: String) {
        tracing::warn!("{message}");
        self.entries.push(LogEntry {
            level: LogLevel::Warn,
            message,
        });
    }

    pub fn warnings(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|e| e.level == LogLevel::Warn)
    }
}

impl fmt::Display for BuildLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for e in &self.entries {
            let tag = match e.level {
                LogLevel::Info => "info",
                LogLevel::Warn => "warn",
            };
            writeln!(f, "[{tag}] {}", e.message)?;
        }
        let c = &self.counts;
        write!(
            f,
            "elements={} collisions={} orbit={} (skipped {}) hemispheres={} planes={} \
             (skipped {}, borderline {}) samples={} attempts={}",
            c.elements,
            c.collisions,
            c.orbit_points,
            c.skipped_orbit_points,
            c.hemispheres,
            c.planes,
            c.skipped_bisectors,
            c.borderline_alphas,
            c.samples,
            c.sample_attempts
        )
    }
}

/// Orbit point of `enumeration.elements[element]`.
#[derive(Clone, Copy, Debug)]
pub struct OrbitRecord {
    pub element: usize,
    pub point: OrbitPoint,
}

/// Bisector of `enumeration.elements[element]` (never the identity).
#[derive(Clone, Copy, Debug)]
pub struct FaceRecord {
    pub element: usize,
    pub bisector: Bisector,
}

#[derive(Clone, Debug)]
pub struct DirichletBuild {
    pub generators: Vec<Mat2c>,
    pub enumeration: Enumeration,
    pub orbit: Vec<OrbitRecord>,
    pub faces: Vec<FaceRecord>,
    pub region: BoundingBox,
    pub samples: SampleSet,
    pub log: BuildLog,
}

impl DirichletBuild {
    pub fn bisectors(&self) -> Vec<Bisector> {
        self.faces.iter().map(|f| f.bisector).collect()
    }
}

pub fn build(
    generators: &[Mat2c],
    cfg: &DirichletCfg,
    cancel: &CancelToken,
) -> Result<DirichletBuild, DirichletError> {
    cfg.validate()?;
    let mut log = BuildLog::default();

    let gens = normalize_generators(generators, cfg.numeric_eps)?;
    log.info(format!("normalized {} generator(s)", gens.len()));

    let enumeration = enumerate_words(&gens, cfg, cancel)?;
    log.counts.elements = enumeration.len();
    log.counts.collisions = enumeration.collisions;
    log.info(format!(
        "enumerated {} element(s) up to length {} ({} word(s) merged by key)",
        enumeration.len(),
        cfg.max_word_length,
        enumeration.collisions
    ));
    cancel.check()?;

    let mut orbit = Vec::with_capacity(enumeration.len());
    let mut has_orbit = vec![false; enumeration.len()];
    for (i, e) in enumeration.elements.iter().enumerate() {
        match orbit_point(&e.matrix, cfg.numeric_eps) {
            Ok(point) => {
                orbit.push(OrbitRecord { element: i, point });
                has_orbit[i] = true;
            }
            Err(err) => {
                log.counts.skipped_orbit_points += 1;
                log.warn(format!("skipped orbit point of {}: {err}", e.word));
            }
        }
    }
    log.counts.orbit_points = orbit.len();

    let bcfg = BisectorCfg {
        eps: cfg.numeric_eps,
        plane_eps: cfg.plane_eps,
    };
    let mut faces = Vec::new();
    for (i, e) in enumeration.elements.iter().enumerate() {
        if enumeration.is_identity(e) || !has_orbit[i] {
            continue;
        }
        match derive_bisector(&e.matrix, bcfg) {
            Ok(bisector) => {
                let a = bisector.alpha.abs();
                if a >= cfg.plane_eps && a < cfg.borderline_alpha {
                    log.counts.borderline_alphas += 1;
                    log.warn(format!(
                        "borderline |alpha| = {a:e} for {}; treated as hemisphere",
                        e.word
                    ));
                }
                if bisector.is_plane() {
                    log.counts.planes += 1;
                } else {
                    log.counts.hemispheres += 1;
                }
                faces.push(FaceRecord {
                    element: i,
                    bisector,
                });
            }
            Err(err) => {
                log.counts.skipped_bisectors += 1;
                log.warn(format!("skipped bisector of {}: {err}", e.word));
            }
        }
    }
    log.info(format!(
        "derived {} bisector(s): {} hemisphere(s), {} plane(s)",
        faces.len(),
        log.counts.hemispheres,
        log.counts.planes
    ));
    cancel.check()?;

    let points: Vec<OrbitPoint> = orbit.iter().map(|o| o.point).collect();
    let region = BoundingBox::from_orbit(&points, cfg.bounding_margin, cfg.height_floor);
    log.info(format!(
        "sampling box x [{:.3}, {:.3}] y [{:.3}, {:.3}] t [{:.3}, {:.3}], volume {:.3}",
        region.min.x,
        region.max.x,
        region.min.y,
        region.max.y,
        region.min.z,
        region.max.z,
        region.volume()
    ));
    let bisectors: Vec<Bisector> = faces.iter().map(|f| f.bisector).collect();
    let params = SampleParams {
        region,
        target: cfg.sample_count,
        boundary_tolerance: cfg.boundary_tolerance,
        feasibility_eps: cfg.feasibility_eps,
        iteration_cap: cfg.iteration_cap(),
        seed: cfg.seed,
    };
    let samples = sample_boundary(&bisectors, &params, cancel)?;
    log.counts.samples = samples.points.len();
    log.counts.sample_attempts = samples.attempts;
    if samples.is_complete() {
        log.info(format!(
            "sampled {} boundary point(s) in {} draw(s)",
            samples.points.len(),
            samples.attempts
        ));
    } else {
        log.warn(format!(
            "found {}/{} boundary point(s) after {} draw(s); the domain may be thin or empty, \
             or the boundary tolerance too strict",
            samples.points.len(),
            samples.target,
            samples.attempts
        ));
    }

    Ok(DirichletBuild {
        generators: gens,
        enumeration,
        orbit,
        faces,
        region,
        samples,
        log,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bisector::BisectorShape;
    use crate::algebra::Cx;
    use crate::domain::in_domain;
    use crate::parse::parse_generator;

    fn cfg(len: usize, samples: usize) -> DirichletCfg {
        DirichletCfg {
            max_word_length: len,
            sample_count: samples,
            seed: 11,
            ..DirichletCfg::default()
        }
    }

    #[test]
    fn parabolic_scenario() {
        let g = parse_generator("1,1,0,1").unwrap();
        let b = build(&[g], &cfg(1, 200), &CancelToken::new()).unwrap();
        assert_eq!(b.enumeration.len(), 3);
        assert_eq!(b.orbit.len(), 3);
        assert_eq!(b.faces.len(), 2);
        assert_eq!(b.log.counts.planes, 2);
        // x in [-2, 2], y in [-1, 1], t in [1e-3, 2]
        assert!(b.log.to_string().contains("volume 15.992"));
        let offsets: Vec<(f64, f64)> = b
            .faces
            .iter()
            .map(|f| match f.bisector.shape {
                BisectorShape::HalfPlane { normal, offset } => (normal.re, offset),
                other => panic!("expected plane, got {other:?}"),
            })
            .collect();
        assert!((offsets[0].0 - 1.0).abs() < 1e-12 && (offsets[0].1 - 0.5).abs() < 1e-12);
        assert!((offsets[1].0 + 1.0).abs() < 1e-12 && (offsets[1].1 - 0.5).abs() < 1e-12);
        for p in &b.samples.points {
            assert!(p.x.abs() <= 0.5 + 1e-9);
        }
    }

    #[test]
    fn dilation_scenario() {
        let g = parse_generator("1.2,0,0,1/1.2").unwrap();
        let b = build(&[g], &cfg(1, 200), &CancelToken::new()).unwrap();
        assert_eq!(b.log.counts.hemispheres, 2);
        let trace = 1.2 + 1.0 / 1.2;
        let lambda = (trace + (trace * trace - 4.0_f64).sqrt()) / 2.0;
        let radii: Vec<f64> = b
            .faces
            .iter()
            .map(|f| match f.bisector.shape {
                BisectorShape::Hemisphere { center, radius } => {
                    assert!(center.norm() < 1e-12);
                    radius
                }
                other => panic!("expected hemisphere, got {other:?}"),
            })
            .collect();
        assert!((radii[0] * radii[0] - lambda * lambda).abs() < 1e-9);
        assert!((radii[1] * radii[1] - 1.0 / (lambda * lambda)).abs() < 1e-9);
    }

    #[test]
    fn every_face_keeps_basepoint_and_samples_hug_faces() {
        let gens = [
            parse_generator("1,2,0,1").unwrap(),
            parse_generator("1,0,2i,1").unwrap(),
        ];
        let c = cfg(2, 300);
        let b = build(&gens, &c, &CancelToken::new()).unwrap();
        let bis = b.bisectors();
        for f in &b.faces {
            assert!(f.bisector.basepoint_value() <= 0.0);
        }
        for p in &b.samples.points {
            let w = Cx::new(p.x, p.y);
            assert!(in_domain(&bis, w, p.z, c.feasibility_eps));
            let near = bis
                .iter()
                .map(|x| x.eval(w, p.z).abs())
                .fold(f64::INFINITY, f64::min);
            assert!(near < c.boundary_tolerance);
        }
    }

    #[test]
    fn stabilizer_is_skipped_and_logged() {
        // rotation by π/2 about the vertical axis fixes j
        let g = parse_generator("1+i,0,0,1-i").unwrap();
        let b = build(&[g], &cfg(2, 50), &CancelToken::new()).unwrap();
        assert!(b.log.counts.skipped_bisectors > 0);
        assert!(b.faces.is_empty());
        assert!(b.samples.points.is_empty());
        assert!(b.log.warnings().count() >= 2);
        assert!(b.log.to_string().contains("skipped bisector"));
    }

    #[test]
    fn singular_generator_aborts() {
        let g = parse_generator("1,2,2,4").unwrap();
        let err = build(&[g], &cfg(1, 10), &CancelToken::new()).unwrap_err();
        assert!(matches!(err, DirichletError::InvalidGenerator { index: 0, .. }));
    }

    #[test]
    fn rebuild_after_cancel_matches_fresh_build() {
        let gens = [
            parse_generator("1,2,0,1").unwrap(),
            parse_generator("1,0,2,1").unwrap(),
        ];
        // target stays out of reach so every chunk runs
        let c = DirichletCfg {
            boundary_tolerance: 0.1,
            ..cfg(2, 1000)
        };
        let clean = build(&gens, &c, &CancelToken::new()).unwrap();

        let tok = CancelToken::new();
        tok.cancel();
        assert_eq!(
            build(&gens, &c, &tok).unwrap_err(),
            DirichletError::Cancelled
        );

        // enumeration at length 2 takes microseconds; the sampler is running when cancel lands
        let endless = DirichletCfg {
            boundary_tolerance: 1e-300,
            ..cfg(2, 10_000_000)
        };
        let tok = CancelToken::new();
        let handle = {
            let (gens, tok) = (gens, tok.clone());
            std::thread::spawn(move || build(&gens, &endless, &tok))
        };
        std::thread::sleep(std::time::Duration::from_millis(50));
        tok.cancel();
        assert_eq!(handle.join().unwrap().unwrap_err(), DirichletError::Cancelled);

        let again = build(&gens, &c, &CancelToken::new()).unwrap();
        assert_eq!(clean.enumeration.len(), again.enumeration.len());
        assert_eq!(clean.faces.len(), again.faces.len());
        assert!(!clean.samples.is_complete());
        assert!(clean.samples.acceptance_rate() > 0.0);
        assert_eq!(clean.samples.attempts, again.samples.attempts);
        assert_eq!(clean.samples.acceptance_rate(), again.samples.acceptance_rate());
        assert_eq!(clean.samples.points, again.samples.points);
    }

    #[test]
    fn element_without_orbit_point_gets_no_face() {
        // eps 0.5 rejects Re(Q22) = 1/4 for diag(2, 1/2) while its hemisphere (r² = 4) is fine
        let g = parse_generator("2,0,0,1/2").unwrap();
        let c = DirichletCfg {
            numeric_eps: 0.5,
            ..cfg(1, 20)
        };
        let b = build(&[g], &c, &CancelToken::new()).unwrap();
        assert_eq!(b.enumeration.len(), 3);
        assert_eq!(b.log.counts.skipped_orbit_points, 1);
        let orbit_elements: Vec<usize> = b.orbit.iter().map(|o| o.element).collect();
        for f in &b.faces {
            assert!(orbit_elements.contains(&f.element));
        }
        assert!(b.faces.is_empty());
    }

    #[test]
    fn cancel_from_another_thread_drops_partial_results() {
        let gens = [
            parse_generator("1,2,0,1").unwrap(),
            parse_generator("1,0,2,1").unwrap(),
        ];
        let c = DirichletCfg {
            boundary_tolerance: 1e-300,
            ..cfg(3, 100_000)
        };
        let tok = CancelToken::new();
        let remote = tok.clone();
        let handle = std::thread::spawn(move || build(&gens, &c, &tok));
        remote.cancel();
        let result = handle.join().unwrap();
        assert!(matches!(result, Err(DirichletError::Cancelled)));
    }
}
