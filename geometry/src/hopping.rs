use crate::Geometry;
use edconsts::EPS12;
use log::warn;
use matrix::Matrix;
use types::c64;

/// Dense mode-by-mode hopping amplitudes, filled once from a geometry.
#[derive(Debug, Clone)]
pub struct HoppingTable {
    n_sites: usize,
    orbitals: usize,
    data: Matrix<c64>,
}

impl HoppingTable {
    pub fn from_geometry(geometry: &dyn Geometry) -> HoppingTable {
        let n_sites = geometry.number_of_sites();
        let orbitals = geometry.orbitals();
        let n_modes = n_sites * orbitals;

        let mut data = Matrix::<c64>::new(n_modes, n_modes);

        for isite in 0..n_sites {
            for iorb in 0..orbitals {
                for jsite in 0..n_sites {
                    for jorb in 0..orbitals {
                        data[[isite * orbitals + iorb, jsite * orbitals + jorb]] =
                            geometry.coupling(isite, iorb, jsite, jorb);
                    }
                }
            }
        }

        if !data.is_hermitian(EPS12) {
            warn!("hopping table of '{}' is not hermitian", geometry.name());
        }

        HoppingTable {
            n_sites,
            orbitals,
            data,
        }
    }

    pub fn n_sites(&self) -> usize {
        self.n_sites
    }

    pub fn orbitals(&self) -> usize {
        self.orbitals
    }

    pub fn n_modes(&self) -> usize {
        self.n_sites * self.orbitals
    }

    /// Amplitude between two modes.
    pub fn get(&self, imode: usize, jmode: usize) -> c64 {
        self.data[[imode, jmode]]
    }

    pub fn as_matrix(&self) -> &Matrix<c64> {
        &self.data
    }

    pub fn is_hermitian(&self, tol: f64) -> bool {
        self.data.is_hermitian(tol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Chain, CustomGeometry};

    #[test]
    fn test_table_from_multi_orbital_chain() {
        let chain = Chain::new(3, 2, c64::new(1.0, 0.0), false).unwrap();
        let table = HoppingTable::from_geometry(&chain);

        assert_eq!(table.n_modes(), 6);
        // site 0 orb 1 -> mode 1, site 1 orb 1 -> mode 3
        assert_eq!(table.get(1, 3), c64::new(1.0, 0.0));
        assert_eq!(table.get(1, 2), c64::new(0.0, 0.0));
        assert!(table.is_hermitian(EPS12));
    }

    #[test]
    fn test_custom_table_copies_couplings() {
        let mut m = Matrix::<c64>::new(2, 2);
        m[[0, 1]] = c64::new(0.0, 1.0);
        m[[1, 0]] = c64::new(0.0, -1.0);

        let custom = CustomGeometry::new(2, 1, m).unwrap();
        let table = HoppingTable::from_geometry(&custom);

        assert_eq!(table.get(0, 1), c64::new(0.0, 1.0));
        assert!(table.is_hermitian(EPS12));

        assert!(CustomGeometry::new(3, 1, Matrix::<c64>::new(2, 2)).is_err());
    }
}
