use std::f64;
use types::c64;

//

pub const ONE_C64: c64 = c64 { re: 1.0, im: 0.0 };

// pi

pub const PI: f64 = f64::consts::PI;
pub const TWOPI: f64 = 2.0 * f64::consts::PI;

// species labels of the two-species (spin) bases

pub const SPIN_UP: usize = 0;
pub const SPIN_DOWN: usize = 1;

// safety bounds for dense and debug paths

pub const PRINT_MATRIX_MAX_DIM: usize = 40;
pub const DENSE_DIAG_MAX_DIM: usize = 1000;

// largest single-species basis table that is enumerated

pub const BASIS_MAX_DIM: usize = 1 << 28;

// perfect index: direct-address table up to this many modes, and only while
// the table has at most this many slots per basis state; sorted search otherwise

pub const DIRECT_ADDRESS_MAX_BITS: usize = 20;
pub const DIRECT_ADDRESS_MAX_SPARSITY: usize = 64;

// numerical convergence

pub const EPS8: f64 = 1E-8;
pub const EPS10: f64 = 1E-10;
pub const EPS12: f64 = 1E-12;
pub const EPS14: f64 = 1E-14;
