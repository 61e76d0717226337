//! Maps an identifier onto one formula from each catalog.
//!
//! The nibbles of the identifier are split by position into an even group and an odd group.
//! Each group's sum, reduced modulo the catalog length, picks a formula. Many identifiers share a
//! selection; there are only 49 distinct outcomes.

use crate::{
    formula::{Catalog, Formula, CATALOG_A, CATALOG_B, CATALOG_LEN},
    identifier::Identifier,
    signal::{self, Mix},
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    index_a: usize,
    index_b: usize,
}

/// Sums of the even-position and odd-position nibbles.
pub fn nibble_sums(identifier: &Identifier) -> (u32, u32) {
    identifier
        .nibbles()
        .enumerate()
        .fold((0, 0), |(even, odd), (i, nibble)| {
            if i % 2 == 0 {
                (even + nibble as u32, odd)
            } else {
                (even, odd + nibble as u32)
            }
        })
}

pub fn select(identifier: &Identifier) -> Selection {
    let (even, odd) = nibble_sums(identifier);
    Selection {
        index_a: even as usize % CATALOG_LEN,
        index_b: odd as usize % CATALOG_LEN,
    }
}

impl Selection {
    /// `None` unless both indices address a catalog entry.
    pub fn new(index_a: usize, index_b: usize) -> Option<Self> {
        (index_a < CATALOG_LEN && index_b < CATALOG_LEN).then_some(Self { index_a, index_b })
    }

    pub fn index_a(self) -> usize {
        self.index_a
    }

    pub fn index_b(self) -> usize {
        self.index_b
    }

    /// Looks the selection up in the standard catalogs.
    pub fn voices(self) -> Voices {
        self.voices_from(&CATALOG_A, &CATALOG_B)
    }

    pub fn voices_from(self, catalog_a: &Catalog, catalog_b: &Catalog) -> Voices {
        Voices {
            a: catalog_a[self.index_a],
            b: catalog_b[self.index_b],
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} and {}", self.index_a, self.index_b)
    }
}

/// The pair of formulas played together for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voices {
    pub a: Formula,
    pub b: Formula,
}

impl Voices {
    pub fn into_signal(self) -> Mix<Formula, Formula> {
        signal::mix(self.a, self.b)
    }
}

impl fmt::Display for Voices {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} [{}] + {} [{}]",
            self.a,
            self.a.expression(),
            self.b,
            self.b.expression()
        )
    }
}
