use crate::Geometry;
use ederror::{EdError, Result};
use matrix::Matrix;
use types::c64;

/// Arbitrary couplings given as a dense matrix over modes
/// (`site * orbitals + orbital`).
#[derive(Debug, Clone)]
pub struct CustomGeometry {
    n_sites: usize,
    orbitals: usize,
    couplings: Matrix<c64>,
}

impl CustomGeometry {
    pub fn new(n_sites: usize, orbitals: usize, couplings: Matrix<c64>) -> Result<CustomGeometry> {
        crate::check_size(n_sites, orbitals)?;

        let n_modes = n_sites * orbitals;

        if couplings.nrow() != n_modes || couplings.ncol() != n_modes {
            return Err(EdError::Configuration(format!(
                "coupling matrix is {} x {}, expected {} x {}",
                couplings.nrow(),
                couplings.ncol(),
                n_modes,
                n_modes
            )));
        }

        Ok(CustomGeometry {
            n_sites,
            orbitals,
            couplings,
        })
    }
}

impl Geometry for CustomGeometry {
    fn number_of_sites(&self) -> usize {
        self.n_sites
    }

    fn orbitals(&self) -> usize {
        self.orbitals
    }

    fn coupling(&self, isite: usize, iorb: usize, jsite: usize, jorb: usize) -> c64 {
        self.couplings[[isite * self.orbitals + iorb, jsite * self.orbitals + jorb]]
    }

    fn name(&self) -> &str {
        "custom"
    }

    fn display(&self) {
        println!("   geometry = custom, n_sites = {}, orbitals = {}", self.n_sites, self.orbitals);
        println!("{}", self.couplings);
    }
}
