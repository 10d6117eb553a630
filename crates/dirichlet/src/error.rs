//! Error type shared by every stage of a Dirichlet build.
//!
//! Policy
//! - Generator failures abort the build.
//! - Orbit-point and bisector degeneracies are returned per element; the build
//!   pipeline skips the element and records it in the `BuildLog`.
//! - `Cancelled` means a `CancelToken` fired; no partial output is returned with it.

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum DirichletError {
    /// Near-singular generator matrix (|det| below the numeric epsilon).
    InvalidGenerator { index: usize, reason: String },
    /// Requested word length exceeds the enumeration bound.
    LengthTooLarge { requested: usize, max: usize },
    /// Division by a near-zero quantity.
    DegenerateArithmetic { reason: String },
    /// Recovered height is non-positive or its denominator vanishes.
    DegenerateOrbitPoint { reason: String },
    /// Hemisphere radius² or plane normal is too small.
    DegenerateBisector { reason: String },
    InvalidParams { reason: String },
    Parse { input: String, reason: String },
    Cancelled,
}

impl DirichletError {
    pub(crate) fn arithmetic(reason: impl Into<String>) -> Self {
        Self::DegenerateArithmetic {
            reason: reason.into(),
        }
    }

    pub(crate) fn orbit(reason: impl Into<String>) -> Self {
        Self::DegenerateOrbitPoint {
            reason: reason.into(),
        }
    }

    pub(crate) fn bisector(reason: impl Into<String>) -> Self {
        Self::DegenerateBisector {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }

    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for DirichletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGenerator { index, reason } => {
                write!(f, "invalid generator #{index}: {reason}")
            }
            Self::LengthTooLarge { requested, max } => {
                write!(f, "word length {requested} exceeds the bound {max}")
            }
            Self::DegenerateArithmetic { reason } => write!(f, "degenerate arithmetic: {reason}"),
            Self::DegenerateOrbitPoint { reason } => write!(f, "degenerate orbit point: {reason}"),
            Self::DegenerateBisector { reason } => write!(f, "degenerate bisector: {reason}"),
            Self::InvalidParams { reason } => write!(f, "invalid params: {reason}"),
            Self::Parse { input, reason } => write!(f, "cannot parse {input:?}: {reason}"),
            Self::Cancelled => write!(f, "build cancelled"),
        }
    }
}

impl std::error::Error for DirichletError {}
