//! Curated internal API (UNSTABLE).
//!
//! Important
//! - This is not a public API. It is a convenience surface for the CLI and experiments.
//!   Breaking changes are allowed and expected.

// Algebra kernel
pub use crate::algebra::{
    checked_div, conj_transpose, det, inverse, principal_sqrt, Cx, Mat2c,
};
// Pipeline stages
pub use crate::bisector::{derive_bisector, Bisector, BisectorCfg, BisectorShape};
pub use crate::build::{
    build, BuildCounts, BuildLog, DirichletBuild, FaceRecord, LogEntry, LogLevel, OrbitRecord,
};
pub use crate::normalize::normalize_generators;
pub use crate::orbit::{act, orbit_point, OrbitPoint};
pub use crate::sample::{
    sample_boundary, sample_boundary_counted, BoundingBox, SampleParams, SampleSet,
};
pub use crate::words::{enumerate_words, CanonicalKey, Enumeration, GroupElement, Symbol, Word};
// Configuration, cancellation, errors
pub use crate::cancel::CancelToken;
pub use crate::cfg::{DirichletCfg, MAX_WORD_LENGTH};
pub use crate::error::DirichletError;
// Extras
pub use crate::domain::{classify, in_domain, Membership};
pub use crate::parse::{parse_complex, parse_generator};
pub use crate::reduce::{reduce_point, Reduction};

/// Hyperbolic distance between two points of H³.
pub fn hyperbolic_distance(a: &OrbitPoint, b: &OrbitPoint) -> f64 {
    a.distance(b)
}
