use crate::Matrix;

use nalgebra::DMatrix;
use types::c64;

impl Matrix<c64> {
    pub fn is_hermitian(&self, tol: f64) -> bool {
        if self.nrow != self.ncol {
            return false;
        }

        for j in 0..self.ncol {
            for i in j..self.nrow {
                if (self[[i, j]] - self[[j, i]].conj()).norm() > tol {
                    return false;
                }
            }
        }

        true
    }

    pub fn to_dmatrix(&self) -> DMatrix<c64> {
        DMatrix::<c64>::from_column_slice(self.nrow, self.ncol, self.as_slice())
    }
}
