//! Breadth-first word expansion with key deduplication.

use std::collections::HashSet;

use rayon::prelude::*;

use super::types::{CanonicalKey, GroupElement, Symbol, Word};
use crate::algebra::{inverse, Mat2c};
use crate::cancel::CancelToken;
use crate::cfg::DirichletCfg;
use crate::error::DirichletError;

/// All distinct elements up to the requested length, identity first.
#[derive(Clone, Debug)]
pub struct Enumeration {
    pub elements: Vec<GroupElement>,
    /// `new_per_level[k]` = elements first reached by a word of length `k`.
    pub new_per_level: Vec<usize>,
    /// Words discarded because their key was already known.
    pub collisions: usize,
    pub identity_key: CanonicalKey,
}

impl Enumeration {
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn is_identity(&self, e: &GroupElement) -> bool {
        e.key == self.identity_key
    }

    /// Element whose key matches `m`, if enumerated.
    pub fn find(&self, m: &Mat2c, decimals: u32) -> Option<&GroupElement> {
        let key = CanonicalKey::of(m, decimals);
        self.elements.iter().find(|e| e.key == key)
    }

    /// Cumulative element counts by maximal word length.
    pub fn cumulative_counts(&self) -> Vec<usize> {
        self.new_per_level
            .iter()
            .scan(0, |acc, &n| {
                *acc += n;
                Some(*acc)
            })
            .collect()
    }
}

/// Symbols with their matrices in the fixed expansion order `g0, g0⁻¹, g1, g1⁻¹, …`.
pub fn symbol_table(gens: &[Mat2c], eps: f64) -> Result<Vec<(Symbol, Mat2c)>, DirichletError> {
    let mut table = Vec::with_capacity(2 * gens.len());
    for (k, g) in gens.iter().enumerate() {
        table.push((Symbol::new(k, false), *g));
        table.push((Symbol::new(k, true), inverse(g, eps)?));
    }
    Ok(table)
}

/// Enumerate distinct elements of word length `<= cfg.max_word_length`.
///
/// Each level expands the previous level's new elements in parallel; candidate lists are
/// merged in frontier order, so the first-word-wins rule follows
/// (level, frontier position, symbol position) and does not depend on scheduling.
pub fn enumerate_words(
    gens: &[Mat2c],
    cfg: &DirichletCfg,
    cancel: &CancelToken,
) -> Result<Enumeration, DirichletError> {
    cfg.validate()?;
    if gens.is_empty() {
        return Err(DirichletError::invalid("need at least one generator"));
    }
    let decimals = cfg.key_decimals;
    let symbols = symbol_table(gens, cfg.numeric_eps)?;

    let identity = Mat2c::identity();
    let identity_key = CanonicalKey::of(&identity, decimals);
    let mut seen: HashSet<CanonicalKey> = HashSet::new();
    seen.insert(identity_key);
    let mut elements = vec![GroupElement {
        matrix: identity,
        key: identity_key,
        word: Word::identity(),
    }];
    let mut new_per_level = vec![1];
    let mut collisions = 0usize;
    let mut frontier: Vec<usize> = vec![0];

    for level in 1..=cfg.max_word_length {
        cancel.check()?;
        let candidates: Vec<Vec<(Word, Mat2c, CanonicalKey)>> = frontier
            .par_iter()
            .map(|&idx| {
                let base = &elements[idx];
                symbols
                    .iter()
                    .filter_map(|(sym, m)| {
                        let word = base.word.extended(*sym)?;
                        let matrix = base.matrix * m;
                        let key = CanonicalKey::of(&matrix, decimals);
                        Some((word, matrix, key))
                    })
                    .collect()
            })
            .collect();

        let mut next = Vec::new();
        for (word, matrix, key) in candidates.into_iter().flatten() {
            if seen.insert(key) {
                next.push(elements.len());
                elements.push(GroupElement { matrix, key, word });
            } else {
                collisions += 1;
            }
        }
        tracing::debug!(level, new = next.len(), collisions, "word level expanded");
        new_per_level.push(next.len());
        if next.is_empty() {
            // finite group exhausted; longer words only revisit known keys
            new_per_level.resize(cfg.max_word_length + 1, 0);
            break;
        }
        frontier = next;
    }

    Ok(Enumeration {
        elements,
        new_per_level,
        collisions,
        identity_key,
    })
}
