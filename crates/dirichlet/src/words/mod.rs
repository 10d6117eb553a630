//! Word enumeration: distinct group elements reachable by words up to a length.
//!
//! Purpose
//! - Breadth-first expansion over locally reduced words in the generators and their
//!   inverses, deduplicated by a rounded canonical key of the product matrix.
//! - Relations are discovered numerically: two words whose matrices share a key are the
//!   same element, and only the first word (in the fixed expansion order) is kept.
//!
//! Conventions
//! - The matrix of the word `s1 s2 … sk` is `M(s1)·M(s2)·…·M(sk)`; each expansion step
//!   right-multiplies by the appended symbol. Acting on H³ the rightmost symbol applies first.
//! - Symbol order at every step: `g0, g0⁻¹, g1, g1⁻¹, …`.
//!
//! Caveat
//! - Rounding merges any two elements whose entries agree to `key_decimals` places, so
//!   extremely close but distinct elements can be merged. This is an accepted approximation.
//!
//! Code cross-refs: `cfg::DirichletCfg::{max_word_length,key_decimals}`, `cancel::CancelToken`.

mod enumerate;
mod types;

pub use enumerate::{enumerate_words, symbol_table, Enumeration};
pub use types::{CanonicalKey, GroupElement, Symbol, Word};
