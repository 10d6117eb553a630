//! Approximate Dirichlet domains for discrete groups acting on hyperbolic 3-space.
//!
//! Pipeline (upper half-space model, basepoint `j = (0, 1)`):
//! 1. `algebra`: checked complex / 2×2 complex matrix operations.
//! 2. `normalize`: rescale generators to determinant one.
//! 3. `words`: breadth-first word enumeration with canonical-key deduplication.
//! 4. `orbit`: images of the basepoint via the Hermitian matrix model.
//! 5. `bisector`: equidistant hemispheres / vertical planes and their half-spaces.
//! 6. `sample`: Monte-Carlo sampling of the domain's boundary.
//!
//! `build::build` runs the whole pipeline for one configuration. Nothing is cached between
//! builds; a `CancelToken` stops an in-flight build cooperatively.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API; prefer `api` or
//!   `prelude` re-exports in callers.

pub mod algebra;
pub mod api;
pub mod bisector;
pub mod build;
pub mod cancel;
pub mod cfg;
pub mod domain;
pub mod error;
pub mod normalize;
pub mod orbit;
pub mod parse;
pub mod reduce;
pub mod sample;
pub mod words;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::DirichletError;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::algebra::{Cx, Mat2c};
    pub use crate::bisector::{Bisector, BisectorShape};
    pub use crate::build::{build, DirichletBuild};
    pub use crate::cancel::CancelToken;
    pub use crate::cfg::{DirichletCfg, MAX_WORD_LENGTH};
    pub use crate::error::DirichletError;
    pub use crate::orbit::OrbitPoint;
    pub use crate::parse::parse_generator;
}
