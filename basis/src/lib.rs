//! Occupation-number bases for fermionic lattice models.
//!
//! A [`Basis`] enumerates the words of one species with a fixed particle
//! number, in ascending numeric order, and inverts that enumeration with a
//! perfect index. A [`CompositeBasis`] glues several species into one
//! row-major product space and applies fermionic operators with their sign.
//!
//! Canonical ordering: a state is `c†(k1) c†(k2) ... |0>` with species 0
//! operators first, and within a species ascending mode index. Mode of
//! (site, orbital) is `site * orbitals + orbital`.

pub mod bitmanip;

mod onespecies;
pub use onespecies::*;

mod operator;
pub use operator::*;

mod composite;
pub use composite::*;
