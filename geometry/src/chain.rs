use crate::{check_size, Geometry};
use num_traits::identities::Zero;
use types::c64;

/// Nearest-neighbor chain, open or closed into a ring.
///
/// Hopping is diagonal in the orbital index. The amplitude `t` is used for
/// i -> i+1 and its conjugate for the reverse direction.
#[derive(Debug, Clone)]
pub struct Chain {
    n_sites: usize,
    orbitals: usize,
    hopping: c64,
    periodic: bool,
}

impl Chain {
    pub fn new(n_sites: usize, orbitals: usize, hopping: c64, periodic: bool) -> ederror::Result<Chain> {
        check_size(n_sites, orbitals)?;

        Ok(Chain {
            n_sites,
            orbitals,
            hopping,
            periodic,
        })
    }

    pub fn is_periodic(&self) -> bool {
        self.periodic
    }

    // j is the right neighbor of i
    fn is_forward_bond(&self, i: usize, j: usize) -> bool {
        let n = self.n_sites;

        if j == i + 1 {
            return true;
        }

        // two sites share a single bond even when closed
        self.periodic && n > 2 && i == n - 1 && j == 0
    }
}

impl Geometry for Chain {
    fn number_of_sites(&self) -> usize {
        self.n_sites
    }

    fn orbitals(&self) -> usize {
        self.orbitals
    }

    fn coupling(&self, isite: usize, iorb: usize, jsite: usize, jorb: usize) -> c64 {
        if iorb != jorb {
            return c64::zero();
        }

        if self.is_forward_bond(isite, jsite) {
            self.hopping
        } else if self.is_forward_bond(jsite, isite) {
            self.hopping.conj()
        } else {
            c64::zero()
        }
    }

    fn name(&self) -> &str {
        if self.periodic {
            "ring"
        } else {
            "chain"
        }
    }

    fn display(&self) {
        const OUT_WIDTH1: usize = 20;
        const OUT_WIDTH2: usize = 18;

        println!("   {:<width1$} = {:>width2$}", "geometry", self.name(), width1 = OUT_WIDTH1, width2 = OUT_WIDTH2);
        println!("   {:<width1$} = {:>width2$}", "n_sites", self.n_sites, width1 = OUT_WIDTH1, width2 = OUT_WIDTH2);
        println!("   {:<width1$} = {:>width2$}", "orbitals", self.orbitals, width1 = OUT_WIDTH1, width2 = OUT_WIDTH2);
        println!(
            "   {:<width1$} = {:>width2$}",
            "hopping",
            format!("{:.6}", self.hopping),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );
    }
}
