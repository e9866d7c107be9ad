mod default;
pub use default::*;

mod cyclic;
pub use cyclic::*;

mod eigenpairs;
pub use eigenpairs::*;

use edconsts::*;
use ederror::{EdError, Result};
use geometry::Geometry;
use log::warn;
use matrix::Matrix;
use model::HubbardModel;
use sparse::SparseMatrix;
use types::c64;

// Block-diagonal view of one sector's Hamiltonian.
//
// An iterative eigensolver only needs sectors/set_pointer/rank and the
// matrix-vector product of the active block; the transforms move vectors and
// operators between the block and the full composite space.
pub trait SymmetryAdapter: Send + Sync {
    fn sectors(&self) -> usize;
    fn set_pointer(&mut self, k: usize) -> Result<()>;
    fn pointer(&self) -> usize;
    fn rank(&self) -> usize;

    // y = H_active x
    fn matrix_vector_product(&self, x: &[c64], y: &mut [c64]);

    // a full-space operator projected onto every block
    fn transform_matrix(&self, matrix: &SparseMatrix) -> Result<Vec<SparseMatrix>>;

    // an active-block vector expressed in the full space
    fn transform_gs(&self, gs: &[c64]) -> Vec<c64>;

    fn active_matrix(&self) -> &SparseMatrix;
    fn name(&self) -> &str;
    fn display(&self);

    fn full_diag(&self, limit: usize) -> Result<(Vec<f64>, Matrix<c64>)> {
        let rank = self.rank();

        if rank > limit {
            return Err(EdError::SizeLimit {
                what: "full_diag".to_string(),
                dim: rank,
                limit,
            });
        }

        let dense = self.active_matrix().to_dense(limit)?;

        Ok(linalg::eigh(&dense))
    }

    fn print_active(&self) -> Result<()> {
        let dense = self.active_matrix().to_dense(PRINT_MATRIX_MAX_DIM)?;
        let eigs = linalg::eigvalsh(&dense);

        println!("   block {} of '{}', rank = {}", self.pointer(), self.name(), self.rank());
        println!("{}", dense);

        for e in eigs.iter() {
            println!("   {:>16.10}", e);
        }

        Ok(())
    }

    /// Prints the active block when it fits the print bound, otherwise warns
    /// and returns `false`. Diagonalization does not depend on it.
    fn print_active_if_small(&self) -> Result<bool> {
        if self.rank() > PRINT_MATRIX_MAX_DIM {
            warn!(
                "block {} of '{}' has rank {} > {}, not printed",
                self.pointer(),
                self.name(),
                self.rank(),
                PRINT_MATRIX_MAX_DIM
            );
            return Ok(false);
        }

        self.print_active()?;

        Ok(true)
    }
}

fn check_pointer(k: usize, sectors: usize) -> Result<()> {
    if k >= sectors {
        return Err(EdError::IndexOutOfRange {
            index: k,
            len: sectors,
            context: "symmetry block pointer".to_string(),
        });
    }

    Ok(())
}

// Factory for the symmetry schemes selectable from the control file.
pub fn new<'a>(
    scheme: &str,
    model: &'a HubbardModel,
    geometry: &dyn Geometry,
    print_matrix: bool,
) -> Result<Box<dyn SymmetryAdapter + 'a>> {
    if geometry.number_of_sites() != model.n_sites() {
        return Err(EdError::Configuration(format!(
            "geometry has {} sites but the model has {}",
            geometry.number_of_sites(),
            model.n_sites()
        )));
    }

    match scheme {
        "default" => Ok(Box::new(DefaultSymmetry::new(model, print_matrix)?)),
        "translation" => Ok(Box::new(CyclicSymmetry::new(
            model,
            &geometry.translation(),
            "translation",
            print_matrix,
        )?)),
        "reflection" => Ok(Box::new(CyclicSymmetry::new(
            model,
            &geometry.reflection(),
            "reflection",
            print_matrix,
        )?)),
        other => Err(EdError::Configuration(format!("unsupported symmetry scheme '{}'", other))),
    }
}
