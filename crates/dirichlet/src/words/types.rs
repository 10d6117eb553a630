//! Symbols, words, canonical keys and element records.

use std::fmt;

use crate::algebra::Mat2c;

/// Signed reference to one of the input generators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Symbol {
    pub generator: usize,
    pub inverse: bool,
}

impl Symbol {
    #[inline]
    pub fn new(generator: usize, inverse: bool) -> Self {
        Self { generator, inverse }
    }

    /// Same generator with opposite sign.
    #[inline]
    pub fn inverted(self) -> Self {
        Self {
            generator: self.generator,
            inverse: !self.inverse,
        }
    }

    #[inline]
    pub fn sign(self) -> i8 {
        if self.inverse {
            -1
        } else {
            1
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generator < 26 {
            let base = if self.inverse { b'A' } else { b'a' };
            write!(f, "{}", (base + self.generator as u8) as char)
        } else if self.inverse {
            write!(f, "G{}", self.generator)
        } else {
            write!(f, "g{}", self.generator)
        }
    }
}

/// Locally reduced word: no symbol is followed by its own inverse.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Word(Vec<Symbol>);

impl Word {
    pub fn identity() -> Self {
        Self(Vec::new())
    }

    /// Build from symbols, `None` if two neighbours cancel.
    pub fn from_symbols(symbols: Vec<Symbol>) -> Option<Self> {
        if symbols.windows(2).any(|w| w[1] == w[0].inverted()) {
            return None;
        }
        Some(Self(symbols))
    }

    /// Append `s`, `None` if it would cancel the last symbol.
    pub fn extended(&self, s: Symbol) -> Option<Self> {
        if self.last() == Some(s.inverted()) {
            return None;
        }
        let mut v = Vec::with_capacity(self.0.len() + 1);
        v.extend_from_slice(&self.0);
        v.push(s);
        Some(Self(v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn last(&self) -> Option<Symbol> {
        self.0.last().copied()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "e");
        }
        for s in &self.0 {
            write!(f, "{s}")?;
        }
        Ok(())
    }
}

/// Rounded fingerprint of a matrix, taken modulo the global sign (PSL(2,C)).
///
/// Entries are read as `a, b, c, d` (row-major), each split into real and imaginary
/// parts and rounded to `decimals` places. The sign is fixed so that the first
/// nonzero rounded component is positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey(pub [i64; 8]);

impl CanonicalKey {
    pub fn of(m: &Mat2c, decimals: u32) -> Self {
        let scale = 10f64.powi(decimals as i32);
        let entries = [m[(0, 0)], m[(0, 1)], m[(1, 0)], m[(1, 1)]];
        let mut k = [0i64; 8];
        for (i, e) in entries.iter().enumerate() {
            k[2 * i] = (e.re * scale).round() as i64;
            k[2 * i + 1] = (e.im * scale).round() as i64;
        }
        if k.iter().find(|&&v| v != 0).is_some_and(|&v| v < 0) {
            for v in &mut k {
                *v = -*v;
            }
        }
        Self(k)
    }
}

/// One distinct group element: its matrix, key, and the first word that produced it.
#[derive(Clone, Debug)]
pub struct GroupElement {
    pub matrix: Mat2c,
    pub key: CanonicalKey,
    pub word: Word,
}

impl GroupElement {
    #[inline]
    pub fn word_length(&self) -> usize {
        self.word.len()
    }
}
