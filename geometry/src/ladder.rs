use crate::{check_size, Geometry};
use ederror::{EdError, Result};
use num_traits::identities::Zero;
use types::c64;

/// Open two-leg ladder. Site `2 * x + leg` sits on rung `x`.
#[derive(Debug, Clone)]
pub struct Ladder {
    n_sites: usize,
    orbitals: usize,
    hopping_leg: c64,
    hopping_rung: c64,
}

impl Ladder {
    pub fn new(n_sites: usize, orbitals: usize, hopping_leg: c64, hopping_rung: c64) -> Result<Ladder> {
        check_size(n_sites, orbitals)?;

        if n_sites % 2 != 0 {
            return Err(EdError::Configuration(format!(
                "a two-leg ladder needs an even number of sites, got {}",
                n_sites
            )));
        }

        Ok(Ladder {
            n_sites,
            orbitals,
            hopping_leg,
            hopping_rung,
        })
    }

    pub fn rungs(&self) -> usize {
        self.n_sites / 2
    }

    // amplitude for the ordered pair (i, j) with i < j
    fn forward(&self, i: usize, j: usize) -> c64 {
        let (xi, li) = (i / 2, i % 2);
        let (xj, lj) = (j / 2, j % 2);

        if xi == xj && li != lj {
            self.hopping_rung
        } else if li == lj && xj == xi + 1 {
            self.hopping_leg
        } else {
            c64::zero()
        }
    }
}

impl Geometry for Ladder {
    fn number_of_sites(&self) -> usize {
        self.n_sites
    }

    fn orbitals(&self) -> usize {
        self.orbitals
    }

    fn coupling(&self, isite: usize, iorb: usize, jsite: usize, jorb: usize) -> c64 {
        if iorb != jorb || isite == jsite {
            return c64::zero();
        }

        if isite < jsite {
            self.forward(isite, jsite)
        } else {
            self.forward(jsite, isite).conj()
        }
    }

    fn name(&self) -> &str {
        "ladder"
    }

    // Shift by one rung.
    fn translation(&self) -> Vec<usize> {
        (0..self.n_sites).map(|i| (i + 2) % self.n_sites).collect()
    }

    fn display(&self) {
        const OUT_WIDTH1: usize = 20;
        const OUT_WIDTH2: usize = 18;

        println!("   {:<width1$} = {:>width2$}", "geometry", self.name(), width1 = OUT_WIDTH1, width2 = OUT_WIDTH2);
        println!("   {:<width1$} = {:>width2$}", "rungs", self.rungs(), width1 = OUT_WIDTH1, width2 = OUT_WIDTH2);
        println!("   {:<width1$} = {:>width2$}", "orbitals", self.orbitals, width1 = OUT_WIDTH1, width2 = OUT_WIDTH2);
        println!(
            "   {:<width1$} = {:>width2$}",
            "hopping_leg",
            format!("{:.6}", self.hopping_leg),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );
        println!(
            "   {:<width1$} = {:>width2$}",
            "hopping_rung",
            format!("{:.6}", self.hopping_rung),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );
    }
}
