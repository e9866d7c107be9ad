use matrix::Matrix;
use types::c64;

/// Eigenpairs of a Hermitian matrix; eigenvalues ascending, eigenvectors as
/// columns in the same order.
pub fn eigh(mat: &Matrix<c64>) -> (Vec<f64>, Matrix<c64>) {
    let nn = mat.nrow();

    if nn == 0 {
        return (Vec::new(), Matrix::new(0, 0));
    }

    let eig = mat.to_dmatrix().symmetric_eigen();

    let order = utility::argsort(eig.eigenvalues.as_slice());

    let eigval: Vec<f64> = order.iter().map(|&i| eig.eigenvalues[i]).collect();

    let mut eigvec = Matrix::<c64>::new(nn, nn);

    for (icol, &i) in order.iter().enumerate() {
        let col: Vec<c64> = eig.eigenvectors.column(i).iter().copied().collect();
        eigvec.set_col(icol, &col);
    }

    (eigval, eigvec)
}

/// Ascending eigenvalues only.
pub fn eigvalsh(mat: &Matrix<c64>) -> Vec<f64> {
    if mat.nrow() == 0 {
        return Vec::new();
    }

    let mut e: Vec<f64> = mat.to_dmatrix().symmetric_eigenvalues().iter().copied().collect();
    e.sort_by(|a, b| a.total_cmp(b));

    e
}
