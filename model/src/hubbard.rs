use crate::ModelParameters;
use basis::{bitmanip, CompositeBasis, OperatorDescriptor};
use edconsts::*;
use ederror::{EdError, Result};
use geometry::{Geometry, HoppingTable};
use log::debug;
use rayon::prelude::*;
use sparse::{SparseMatrix, SparseRow};
use std::sync::{Arc, OnceLock};
use types::c64;

const PARALLEL_MIN_LEN: usize = 8192;

#[inline]
fn use_parallel_for_len(len: usize) -> bool {
    len >= PARALLEL_MIN_LEN && rayon::current_num_threads() > 1
}

/// Spin-1/2 Hubbard model in one `(nup, ndown)` sector.
///
/// H = sum_{i != j, sigma} T_ij c†_{i sigma} c_{j sigma}
///   + sum_i U_i n_{i up} n_{i down} + sum_{i sigma} V_i n_{i sigma}
///
/// with i running over modes and U, V taken from the mode's site. The
/// Hamiltonian of the model's own sector is built on first use and cached.
#[derive(Debug)]
pub struct HubbardModel {
    params: Arc<ModelParameters>,
    hoppings: Arc<HoppingTable>,
    basis: CompositeBasis,
    hamiltonian: OnceLock<SparseMatrix>,
}

impl HubbardModel {
    pub fn new(nup: usize, ndown: usize, params: &ModelParameters, geometry: &dyn Geometry) -> Result<HubbardModel> {
        let n_sites = geometry.number_of_sites();

        params.validate(n_sites)?;

        let hoppings = HoppingTable::from_geometry(geometry);

        HubbardModel::from_parts(nup, ndown, Arc::new(params.clone()), Arc::new(hoppings))
    }

    fn from_parts(
        nup: usize,
        ndown: usize,
        params: Arc<ModelParameters>,
        hoppings: Arc<HoppingTable>,
    ) -> Result<HubbardModel> {
        let basis = CompositeBasis::with_orbitals(hoppings.n_sites(), hoppings.orbitals(), &[nup, ndown])?;

        Ok(HubbardModel {
            params,
            hoppings,
            basis,
            hamiltonian: OnceLock::new(),
        })
    }

    /// The same model in another particle-number sector.
    pub fn with_sector(&self, nup: usize, ndown: usize) -> Result<HubbardModel> {
        HubbardModel::from_parts(nup, ndown, self.params.clone(), self.hoppings.clone())
    }

    pub fn size(&self) -> usize {
        self.basis.size()
    }

    pub fn basis(&self) -> &CompositeBasis {
        &self.basis
    }

    pub fn params(&self) -> &ModelParameters {
        &self.params
    }

    pub fn hoppings(&self) -> &HoppingTable {
        &self.hoppings
    }

    pub fn n_sites(&self) -> usize {
        self.hoppings.n_sites()
    }

    pub fn orbitals(&self) -> usize {
        self.hoppings.orbitals()
    }

    /// (nup, ndown) of this sector.
    pub fn quantum_numbers(&self) -> (usize, usize) {
        (self.basis.electrons(SPIN_UP), self.basis.electrons(SPIN_DOWN))
    }

    /// Particle counts after `desc`, or `None` if the operator cannot act.
    pub fn has_new_sector(&self, desc: &OperatorDescriptor) -> Result<Option<(usize, usize)>> {
        Ok(self.basis.has_new_sector(desc)?.map(|counts| (counts[SPIN_UP], counts[SPIN_DOWN])))
    }

    /// Cached Hamiltonian of this sector.
    pub fn hamiltonian(&self) -> Result<&SparseMatrix> {
        if let Some(h) = self.hamiltonian.get() {
            return Ok(h);
        }

        let h = self.setup_hamiltonian(&self.basis)?;

        // a concurrent caller may have won the race; both results are identical
        let _ = self.hamiltonian.set(h);

        self.hamiltonian
            .get()
            .ok_or_else(|| EdError::InvalidState("hamiltonian cache is empty".to_string()))
    }

    /// Builds the Hamiltonian over any basis compatible with the lattice.
    pub fn setup_hamiltonian(&self, basis: &CompositeBasis) -> Result<SparseMatrix> {
        if basis.n_species() != 2 || basis.n_sites() != self.n_sites() || basis.orbitals() != self.orbitals() {
            return Err(EdError::Configuration(format!(
                "basis ({}) does not match the model lattice of {} sites and {} orbitals",
                basis,
                self.n_sites(),
                self.orbitals()
            )));
        }

        let dim = basis.size();

        let rows = if use_parallel_for_len(dim) {
            (0..dim)
                .into_par_iter()
                .map(|a| self.build_row(basis, a))
                .collect::<Result<Vec<SparseRow>>>()?
        } else {
            (0..dim)
                .map(|a| self.build_row(basis, a))
                .collect::<Result<Vec<SparseRow>>>()?
        };

        let h = SparseMatrix::from_rows(dim, dim, rows, 0.0)?;

        debug!(
            "hamiltonian for sector {:?}: dim = {}, nnz = {}",
            basis.particle_counts(),
            dim,
            h.nnz()
        );

        Ok(h)
    }

    fn diagonal_element(&self, basis: &CompositeBasis, words: &[types::Word]) -> f64 {
        let orbitals = self.orbitals();
        let mut s = 0.0;

        for site in 0..self.n_sites() {
            let u = self.params.hubbard_u[site];
            let v = self.params.potential(site);

            for orb in 0..orbitals {
                let nup = basis.occupation_at(words, site, SPIN_UP, orb) as f64;
                let ndown = basis.occupation_at(words, site, SPIN_DOWN, orb) as f64;

                s += u * nup * ndown + v * (nup + ndown);
            }
        }

        s
    }

    // Row a holds <a|H|b> for every b reached by one hop.
    fn build_row(&self, basis: &CompositeBasis, a: usize) -> Result<SparseRow> {
        let words = basis.words_of(a);
        let n_modes = basis.n_modes();

        let mut row = SparseRow::new();

        let diag = self.diagonal_element(basis, &words);
        if diag != 0.0 {
            row.add(a, c64::new(diag, 0.0));
        }

        let mut bra = words.clone();

        for species in 0..basis.n_species() {
            let w = words[species];

            for i in 0..n_modes {
                let ni = (w >> i) & 1;

                for j in (i + 1)..n_modes {
                    let nj = (w >> j) & 1;

                    if ni + nj != 1 {
                        continue;
                    }

                    // <a|c†_i c_j|b> if a holds i, <a|c†_j c_i|b> if a holds j
                    let h = if ni == 1 {
                        self.hoppings.get(i, j)
                    } else {
                        self.hoppings.get(j, i)
                    };

                    if h == c64::new(0.0, 0.0) {
                        continue;
                    }

                    bra[species] = w ^ (bitmanip::bitmask(i) | bitmanip::bitmask(j));
                    let b = basis.perfect_index(&bra)?;
                    bra[species] = w;

                    let sign = basis.do_sign(&words, i, j, species);

                    row.add(b, h * sign as f64);
                }
            }
        }

        Ok(row)
    }

    pub fn display(&self) {
        const OUT_WIDTH1: usize = 20;
        const OUT_WIDTH2: usize = 18;

        let (nup, ndown) = self.quantum_numbers();

        println!("   {:<width1$} = {:>width2$}", "nup", nup, width1 = OUT_WIDTH1, width2 = OUT_WIDTH2);
        println!("   {:<width1$} = {:>width2$}", "ndown", ndown, width1 = OUT_WIDTH1, width2 = OUT_WIDTH2);
        println!(
            "   {:<width1$} = {:>width2$}",
            "basis_size",
            self.size(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geometry::Chain;

    fn dimer(u: f64) -> HubbardModel {
        let chain = Chain::new(2, 1, c64::new(1.0, 0.0), false).unwrap();
        let params = ModelParameters::uniform(2, u, 0.0);

        HubbardModel::new(1, 1, &params, &chain).unwrap()
    }

    #[test]
    fn test_dimer_matrix_elements() {
        let model = dimer(4.0);
        let h = model.hamiltonian().unwrap();

        assert_eq!(model.size(), 4);
        assert!(h.is_hermitian(EPS12));

        // doubly occupied states carry U on the diagonal
        let basis = model.basis();
        let mut n_doubles = 0;

        for a in 0..basis.size() {
            let words = basis.words_of(a);
            if words[0] == words[1] {
                assert_eq!(h.get(a, a), c64::new(4.0, 0.0));
                n_doubles += 1;
            } else {
                assert_eq!(h.get(a, a), c64::new(0.0, 0.0));
            }
        }

        assert_eq!(n_doubles, 2);

        // each state hops to two others
        assert_eq!(h.nnz(), 2 + 4 * 2);
    }

    #[test]
    fn test_hamiltonian_is_cached() {
        let model = dimer(1.0);

        let first = model.hamiltonian().unwrap() as *const SparseMatrix;
        let second = model.hamiltonian().unwrap() as *const SparseMatrix;

        assert_eq!(first, second);
    }

    #[test]
    fn test_with_sector_shares_the_lattice() {
        let model = dimer(2.0);
        let other = model.with_sector(2, 1).unwrap();

        assert_eq!(other.quantum_numbers(), (2, 1));
        assert_eq!(other.size(), 2);
        assert!(model.with_sector(3, 0).is_err());
    }

    #[test]
    fn test_basis_mismatch_is_rejected() {
        let model = dimer(2.0);
        let wrong = CompositeBasis::hubbard(3, 1, 1).unwrap();

        assert!(matches!(model.setup_hamiltonian(&wrong), Err(EdError::Configuration(_))));
    }

    #[test]
    fn test_oversized_sector_is_a_size_limit() {
        let chain = Chain::new(40, 1, c64::new(1.0, 0.0), false).unwrap();
        let params = ModelParameters::uniform(40, 1.0, 0.0);

        assert!(matches!(
            HubbardModel::new(20, 20, &params, &chain),
            Err(EdError::SizeLimit { .. })
        ));
    }
}
