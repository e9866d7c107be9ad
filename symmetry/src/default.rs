use crate::{check_pointer, SymmetryAdapter};
use ederror::Result;
use model::HubbardModel;
use sparse::SparseMatrix;
use types::c64;

/// The whole sector as a single block.
pub struct DefaultSymmetry<'a> {
    matrix: &'a SparseMatrix,
}

impl<'a> DefaultSymmetry<'a> {
    pub fn new(model: &'a HubbardModel, print_matrix: bool) -> Result<DefaultSymmetry<'a>> {
        let symm = DefaultSymmetry {
            matrix: model.hamiltonian()?,
        };

        if print_matrix {
            symm.print_active_if_small()?;
        }

        Ok(symm)
    }
}

impl<'a> SymmetryAdapter for DefaultSymmetry<'a> {
    fn sectors(&self) -> usize {
        1
    }

    fn set_pointer(&mut self, k: usize) -> Result<()> {
        check_pointer(k, 1)
    }

    fn pointer(&self) -> usize {
        0
    }

    fn rank(&self) -> usize {
        self.matrix.nrow()
    }

    fn matrix_vector_product(&self, x: &[c64], y: &mut [c64]) {
        self.matrix.matrix_vector_product(x, y);
    }

    fn transform_matrix(&self, matrix: &SparseMatrix) -> Result<Vec<SparseMatrix>> {
        Ok(vec![matrix.clone()])
    }

    fn transform_gs(&self, gs: &[c64]) -> Vec<c64> {
        assert_eq!(gs.len(), self.rank());

        gs.to_vec()
    }

    fn active_matrix(&self) -> &SparseMatrix {
        self.matrix
    }

    fn name(&self) -> &str {
        "default"
    }

    fn display(&self) {
        println!("   symmetry = default, rank = {}", self.rank());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edconsts::*;
    use ederror::EdError;
    use geometry::Chain;
    use model::ModelParameters;

    fn ring_model(n: usize, nup: usize, ndown: usize) -> HubbardModel {
        let ring = Chain::new(n, 1, c64::new(-1.0, 0.0), true).unwrap();
        let params = ModelParameters::uniform(n, 2.0, 0.0);

        HubbardModel::new(nup, ndown, &params, &ring).unwrap()
    }

    #[test]
    fn test_default_is_one_block() {
        let model = ring_model(4, 2, 2);
        let mut symm = DefaultSymmetry::new(&model, false).unwrap();

        assert_eq!(symm.sectors(), 1);
        assert_eq!(symm.rank(), 36);
        assert_eq!(symm.name(), "default");
        assert!(symm.set_pointer(0).is_ok());
        assert!(matches!(symm.set_pointer(1), Err(EdError::IndexOutOfRange { .. })));

        let x = vec![c64::new(1.0, 0.0); 36];
        let mut y1 = vec![c64::new(0.0, 0.0); 36];
        let mut y2 = vec![c64::new(0.0, 0.0); 36];

        symm.matrix_vector_product(&x, &mut y1);
        model.hamiltonian().unwrap().matrix_vector_product(&x, &mut y2);

        assert_eq!(y1, y2);
        assert_eq!(symm.transform_gs(&x), x);
        assert_eq!(symm.transform_matrix(model.hamiltonian().unwrap()).unwrap().len(), 1);
    }

    #[test]
    fn test_full_diag_and_print_are_bounded() {
        let model = ring_model(6, 3, 3);
        let symm = DefaultSymmetry::new(&model, false).unwrap();

        assert_eq!(symm.rank(), 400);
        assert!(matches!(symm.full_diag(100), Err(EdError::SizeLimit { .. })));
        assert!(matches!(symm.print_active(), Err(EdError::SizeLimit { .. })));

        let printed = DefaultSymmetry::new(&model, true).unwrap();
        assert_eq!(printed.rank(), 400);
        assert!(!printed.print_active_if_small().unwrap());

        let small = ring_model(2, 1, 1);
        let symm = DefaultSymmetry::new(&small, true).unwrap();
        assert!(symm.print_active_if_small().unwrap());

        let (e, v) = symm.full_diag(DENSE_DIAG_MAX_DIM).unwrap();

        assert_eq!(e.len(), 4);
        assert_eq!(v.ncol(), 4);
    }
}
