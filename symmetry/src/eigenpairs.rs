use crate::SymmetryAdapter;
use ederror::Result;
use log::debug;
use matrix::Matrix;
use types::c64;

/// Lowest eigenpairs of one block of one particle-number sector.
///
/// Eigenvalues ascend; eigenvector columns live in the full composite space
/// of the sector.
#[derive(Debug, Clone)]
pub struct SectorEigenpairs {
    pub quantum_numbers: (usize, usize),
    pub block: usize,
    pub eigenvalues: Vec<f64>,
    pub eigenvectors: Matrix<c64>,
}

impl SectorEigenpairs {
    pub fn ground_state_energy(&self) -> Option<f64> {
        self.eigenvalues.first().copied()
    }

    pub fn display(&self) {
        let (nup, ndown) = self.quantum_numbers;

        println!(
            "   nup = {:>3}, ndown = {:>3}, block = {:>3}, n_eigs = {:>4}",
            nup,
            ndown,
            self.block,
            self.eigenvalues.len()
        );

        for (i, e) in self.eigenvalues.iter().enumerate() {
            println!("   {:>8} {:>20.12}", i, e);
        }
    }
}

/// Dense diagonalization of every non-empty block, keeping `n_eigs` pairs each.
pub fn diagonalize_blocks(
    adapter: &mut dyn SymmetryAdapter,
    quantum_numbers: (usize, usize),
    limit: usize,
    n_eigs: usize,
) -> Result<Vec<SectorEigenpairs>> {
    let mut results = Vec::with_capacity(adapter.sectors());

    for block in 0..adapter.sectors() {
        adapter.set_pointer(block)?;

        if adapter.rank() == 0 {
            debug!("{:?} block {} is empty", quantum_numbers, block);
            continue;
        }

        let (eigenvalues, vecs) = adapter.full_diag(limit)?;
        let n = n_eigs.min(eigenvalues.len());

        let full_dim = adapter.transform_gs(vecs.get_col(0)).len();
        let mut eigenvectors = Matrix::<c64>::new(full_dim, n);

        for i in 0..n {
            eigenvectors.set_col(i, &adapter.transform_gs(vecs.get_col(i)));
        }

        results.push(SectorEigenpairs {
            quantum_numbers,
            block,
            eigenvalues: eigenvalues[..n].to_vec(),
            eigenvectors,
        });
    }

    Ok(results)
}
