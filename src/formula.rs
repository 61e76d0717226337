//! The bytebeat formulas and the two catalogs they are drawn from.
//!
//! Every formula is a total function of the sample index. All arithmetic is on `u32` with
//! wraparound, and every shift amount is below 32.

use crate::signal::Signal;
use std::{fmt, ops::Index};

/// Number of formulas in each catalog.
pub const CATALOG_LEN: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Formula {
    Form1,
    Form2,
    Form5,
    Form6,
    Form7,
    Form8,
    Form9,
    Form11,
    Form12,
    Form13,
    Form14,
    Form15,
    Form16,
    Form17,
}

/// `a % b`, or 0 when `b` is 0.
fn rem_or_zero(a: u32, b: u32) -> u32 {
    a.checked_rem(b).unwrap_or(0)
}

impl Formula {
    pub const ALL: [Formula; 14] = [
        Formula::Form1,
        Formula::Form2,
        Formula::Form5,
        Formula::Form6,
        Formula::Form7,
        Formula::Form8,
        Formula::Form9,
        Formula::Form11,
        Formula::Form12,
        Formula::Form13,
        Formula::Form14,
        Formula::Form15,
        Formula::Form16,
        Formula::Form17,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Formula::Form1 => "form1",
            Formula::Form2 => "form2",
            Formula::Form5 => "form5",
            Formula::Form6 => "form6",
            Formula::Form7 => "form7",
            Formula::Form8 => "form8",
            Formula::Form9 => "form9",
            Formula::Form11 => "form11",
            Formula::Form12 => "form12",
            Formula::Form13 => "form13",
            Formula::Form14 => "form14",
            Formula::Form15 => "form15",
            Formula::Form16 => "form16",
            Formula::Form17 => "form17",
        }
    }

    /// The formula in conventional bytebeat notation, for diagnostics.
    pub fn expression(self) -> &'static str {
        match self {
            Formula::Form1 => "(t&t>>6)|(t>>2)%256",
            Formula::Form2 => "2*t&((t>>4)|(t>>14))%128",
            Formula::Form5 => "t*((t>>3|t>>9)&64&t>>2)",
            Formula::Form6 => "7*(t%((t>>13)&(t>>6)))",
            Formula::Form7 => "(t*5&t>>7)|(t*3&t>>10)",
            Formula::Form8 => "(t*t/256)&(t>>((t/1024)%16))",
            Formula::Form9 => "(t*t/128)&(t>>((t/256)%16))",
            Formula::Form11 => "2*((t&2*t>>16)|(t&2*t>>8))%128",
            Formula::Form12 => "2*(t*(t>>10|t>>5)&16)",
            Formula::Form13 => "2*(2*t*(t>>14|t>>12)&16)",
            Formula::Form14 => "2*(t*(t>>9|t>>13)&16)",
            Formula::Form15 => "2*(t*(t>>12|t>>6)&32)",
            Formula::Form16 => "2*(t*(3*t>>4|2*t>>10)&32)",
            Formula::Form17 => "8*(t*(t>>14|t>>10)&8)",
        }
    }

    pub fn eval(self, t: u32) -> u32 {
        match self {
            Formula::Form1 => (t & (t >> 6)) | ((t >> 2) % 256),
            Formula::Form2 => t.wrapping_mul(2) & (((t >> 4) | (t >> 14)) % 128),
            Formula::Form5 => t.wrapping_mul(((t >> 3) | (t >> 9)) & 64 & (t >> 2)),
            // the divisor is 0 for every t below 2^13, and for many above it
            Formula::Form6 => rem_or_zero(t, (t >> 13) & (t >> 6)).wrapping_mul(7),
            Formula::Form7 => (t.wrapping_mul(5) & (t >> 7)) | (t.wrapping_mul(3) & (t >> 10)),
            Formula::Form8 => (t.wrapping_mul(t) / 256) & (t >> ((t / 1024) % 16)),
            Formula::Form9 => (t.wrapping_mul(t) / 128) & (t >> ((t / 256) % 16)),
            Formula::Form11 => {
                let t2 = t.wrapping_mul(2);
                (((t & (t2 >> 16)) | (t & (t2 >> 8))).wrapping_mul(2)) % 128
            }
            Formula::Form12 => (t.wrapping_mul((t >> 10) | (t >> 5)) & 16).wrapping_mul(2),
            Formula::Form13 => {
                (t.wrapping_mul(2).wrapping_mul((t >> 14) | (t >> 12)) & 16).wrapping_mul(2)
            }
            Formula::Form14 => (t.wrapping_mul((t >> 9) | (t >> 13)) & 16).wrapping_mul(2),
            Formula::Form15 => (t.wrapping_mul((t >> 12) | (t >> 6)) & 32).wrapping_mul(2),
            Formula::Form16 => {
                let modulator = (t.wrapping_mul(3) >> 4) | (t.wrapping_mul(2) >> 10);
                (t.wrapping_mul(modulator) & 32).wrapping_mul(2)
            }
            Formula::Form17 => (t.wrapping_mul((t >> 14) | (t >> 10)) & 8).wrapping_mul(8),
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Sample indices past `u32::MAX` wrap, as a 32-bit hardware counter would.
impl Signal<u32> for Formula {
    fn sample(&mut self, i: u64) -> u32 {
        self.eval(i as u32)
    }
}

/// An ordered, immutable list of formulas addressed by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Catalog {
    formulas: [Formula; CATALOG_LEN],
}

impl Catalog {
    pub const fn new(formulas: [Formula; CATALOG_LEN]) -> Self {
        Self { formulas }
    }

    pub fn get(&self, index: usize) -> Option<Formula> {
        self.formulas.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Formula> + '_ {
        self.formulas.iter().copied()
    }
}

impl Index<usize> for Catalog {
    type Output = Formula;
    fn index(&self, index: usize) -> &Formula {
        &self.formulas[index]
    }
}

pub const CATALOG_A: Catalog = Catalog::new([
    Formula::Form1,
    Formula::Form2,
    Formula::Form5,
    Formula::Form7,
    Formula::Form11,
    Formula::Form15,
    Formula::Form16,
]);

pub const CATALOG_B: Catalog = Catalog::new([
    Formula::Form6,
    Formula::Form8,
    Formula::Form9,
    Formula::Form12,
    Formula::Form13,
    Formula::Form14,
    Formula::Form17,
]);
