mod chain;
pub use chain::*;

mod ladder;
pub use ladder::*;

mod custom;
pub use custom::*;

mod hopping;
pub use hopping::*;

use ederror::{EdError, Result};
use types::c64;

// Lattice provider interface.
//
// Sites are numbered 0..number_of_sites(); a mode is (site, orbital) and the
// coupling between two modes is the hopping amplitude T in
// H_hop = sum_{i != j} T_ij c†_i c_j.
pub trait Geometry: Send + Sync {
    fn number_of_sites(&self) -> usize;
    fn orbitals(&self) -> usize;
    fn coupling(&self, isite: usize, iorb: usize, jsite: usize, jorb: usize) -> c64;
    fn name(&self) -> &str;

    // Site permutation of one lattice translation.
    fn translation(&self) -> Vec<usize> {
        let n = self.number_of_sites();
        (0..n).map(|i| (i + 1) % n).collect()
    }

    // Site permutation of the mirror i -> n-1-i.
    fn reflection(&self) -> Vec<usize> {
        let n = self.number_of_sites();
        (0..n).map(|i| n - 1 - i).collect()
    }

    fn display(&self);
}

// Factory for the lattices selectable from the control file.
pub fn new(
    scheme: &str,
    n_sites: usize,
    orbitals: usize,
    hopping: f64,
    hopping_rung: f64,
) -> Result<Box<dyn Geometry>> {
    let t = c64::new(hopping, 0.0);

    match scheme {
        "chain" => Ok(Box::new(Chain::new(n_sites, orbitals, t, false)?)),
        "ring" => Ok(Box::new(Chain::new(n_sites, orbitals, t, true)?)),
        "ladder" => Ok(Box::new(Ladder::new(n_sites, orbitals, t, c64::new(hopping_rung, 0.0))?)),
        other => Err(EdError::Configuration(format!("unsupported geometry '{}'", other))),
    }
}

fn check_size(n_sites: usize, orbitals: usize) -> Result<()> {
    if n_sites == 0 || orbitals == 0 {
        return Err(EdError::Configuration(format!(
            "a lattice needs at least one site and one orbital, got n_sites = {}, orbitals = {}",
            n_sites, orbitals
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_schemes() {
        assert_eq!(new("chain", 4, 1, 1.0, 0.0).unwrap().name(), "chain");
        assert_eq!(new("ring", 4, 1, 1.0, 0.0).unwrap().name(), "ring");
        assert_eq!(new("ladder", 6, 1, 1.0, 0.5).unwrap().name(), "ladder");
        assert!(matches!(new("honeycomb", 4, 1, 1.0, 0.0), Err(EdError::Configuration(_))));
    }

    #[test]
    fn test_default_permutations() {
        let g = new("ring", 4, 1, 1.0, 0.0).unwrap();

        assert_eq!(g.translation(), vec![1, 2, 3, 0]);
        assert_eq!(g.reflection(), vec![3, 2, 1, 0]);
    }
}
