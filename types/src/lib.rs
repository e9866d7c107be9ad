#![allow(non_camel_case_types)]

pub type c64 = num_complex::Complex<f64>;

/// Occupation word of one species: bit `i` is the occupation of mode `i`.
pub type Word = u64;

pub const WORD_BITS: usize = 64;
