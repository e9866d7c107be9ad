//! Compressed sparse row storage for complex operators.
//!
//! Rows are appended one at a time with `push_row`; each row is sorted by
//! column and duplicate columns are merged before it is stored.

use edconsts::*;
use ederror::{EdError, Result};
use matrix::Matrix;
use num_traits::identities::Zero;
use rayon::prelude::*;
use std::fmt;
use types::c64;

const PARALLEL_MIN_LEN: usize = 8192;

#[inline]
fn use_parallel_for_len(len: usize) -> bool {
    len >= PARALLEL_MIN_LEN && rayon::current_num_threads() > 1
}

/// Entries of one row under construction.
#[derive(Debug, Clone, Default)]
pub struct SparseRow {
    entries: Vec<(usize, c64)>,
}

impl SparseRow {
    pub fn new() -> SparseRow {
        SparseRow::default()
    }

    pub fn add(&mut self, col: usize, val: c64) {
        self.entries.push((col, val));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sort by column, merge duplicates and drop entries with `|v| <= drop_tol`.
    pub fn finalize(&mut self, drop_tol: f64) -> &[(usize, c64)] {
        self.entries.sort_by_key(|&(col, _)| col);

        let mut merged: Vec<(usize, c64)> = Vec::with_capacity(self.entries.len());

        for &(col, val) in self.entries.iter() {
            if let Some(last) = merged.last_mut() {
                if last.0 == col {
                    last.1 += val;
                    continue;
                }
            }
            merged.push((col, val));
        }

        merged.retain(|(_, v)| v.norm() > drop_tol);

        self.entries = merged;

        &self.entries
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    nrow: usize,
    ncol: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<c64>,
}

impl SparseMatrix {
    /// An empty matrix ready for `nrow` calls to `push_row`.
    pub fn new(nrow: usize, ncol: usize) -> SparseMatrix {
        let mut row_ptr = Vec::with_capacity(nrow + 1);
        row_ptr.push(0);

        SparseMatrix {
            nrow,
            ncol,
            row_ptr,
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn from_rows(nrow: usize, ncol: usize, rows: Vec<SparseRow>, drop_tol: f64) -> Result<SparseMatrix> {
        let mut mat = SparseMatrix::new(nrow, ncol);

        for mut row in rows.into_iter() {
            mat.push_row(&mut row, drop_tol)?;
        }

        mat.check_complete()?;

        Ok(mat)
    }

    pub fn push_row(&mut self, row: &mut SparseRow, drop_tol: f64) -> Result<()> {
        let irow = self.row_ptr.len() - 1;

        if irow >= self.nrow {
            return Err(EdError::IndexOutOfRange {
                index: irow,
                len: self.nrow,
                context: "sparse matrix row".to_string(),
            });
        }

        for &(col, val) in row.finalize(drop_tol).iter() {
            if col >= self.ncol {
                return Err(EdError::IndexOutOfRange {
                    index: col,
                    len: self.ncol,
                    context: format!("sparse matrix column in row {}", irow),
                });
            }

            self.col_idx.push(col);
            self.values.push(val);
        }

        self.row_ptr.push(self.col_idx.len());

        Ok(())
    }

    pub fn check_complete(&self) -> Result<()> {
        if self.row_ptr.len() != self.nrow + 1 {
            return Err(EdError::InvalidState(format!(
                "sparse matrix has {} of {} rows",
                self.row_ptr.len() - 1,
                self.nrow
            )));
        }

        Ok(())
    }

    pub fn nrow(&self) -> usize {
        self.nrow
    }

    pub fn ncol(&self) -> usize {
        self.ncol
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    pub fn col_idx(&self) -> &[usize] {
        &self.col_idx
    }

    pub fn values(&self) -> &[c64] {
        &self.values
    }

    /// Column indices and values of row `i`.
    pub fn row(&self, i: usize) -> (&[usize], &[c64]) {
        let (start, end) = (self.row_ptr[i], self.row_ptr[i + 1]);

        (&self.col_idx[start..end], &self.values[start..end])
    }

    pub fn get(&self, i: usize, j: usize) -> c64 {
        let (cols, vals) = self.row(i);

        match cols.binary_search(&j) {
            Ok(k) => vals[k],
            Err(_) => c64::zero(),
        }
    }

    fn row_dot(&self, i: usize, x: &[c64]) -> c64 {
        let (cols, vals) = self.row(i);

        let mut sum = c64::zero();
        for (&j, &v) in cols.iter().zip(vals.iter()) {
            sum += v * x[j];
        }

        sum
    }

    /// y = A x, overwriting `y`.
    pub fn matrix_vector_product(&self, x: &[c64], y: &mut [c64]) {
        assert_eq!(x.len(), self.ncol);
        assert_eq!(y.len(), self.nrow);

        if use_parallel_for_len(y.len()) {
            y.par_iter_mut().enumerate().for_each(|(i, yi)| {
                *yi = self.row_dot(i, x);
            });
        } else {
            for (i, yi) in y.iter_mut().enumerate() {
                *yi = self.row_dot(i, x);
            }
        }
    }

    /// y = A^T x without conjugation, overwriting `y`.
    pub fn transpose_vector_product(&self, x: &[c64], y: &mut [c64]) {
        assert_eq!(x.len(), self.nrow);
        assert_eq!(y.len(), self.ncol);

        y.iter_mut().for_each(|v| *v = c64::zero());

        for i in 0..self.nrow {
            let (cols, vals) = self.row(i);
            for (&j, &v) in cols.iter().zip(vals.iter()) {
                y[j] += v * x[i];
            }
        }
    }

    pub fn transpose(&self) -> SparseMatrix {
        let mut counts = vec![0usize; self.ncol + 1];

        for &j in self.col_idx.iter() {
            counts[j + 1] += 1;
        }

        for j in 0..self.ncol {
            counts[j + 1] += counts[j];
        }

        let row_ptr = counts.clone();
        let mut next = counts;
        let mut col_idx = vec![0usize; self.nnz()];
        let mut values = vec![c64::zero(); self.nnz()];

        for i in 0..self.nrow {
            let (cols, vals) = self.row(i);
            for (&j, &v) in cols.iter().zip(vals.iter()) {
                let k = next[j];
                col_idx[k] = i;
                values[k] = v;
                next[j] += 1;
            }
        }

        SparseMatrix {
            nrow: self.ncol,
            ncol: self.nrow,
            row_ptr,
            col_idx,
            values,
        }
    }

    pub fn adjoint(&self) -> SparseMatrix {
        let mut t = self.transpose();
        t.values.iter_mut().for_each(|v| *v = v.conj());
        t
    }

    pub fn is_hermitian(&self, tol: f64) -> bool {
        if self.nrow != self.ncol {
            return false;
        }

        for i in 0..self.nrow {
            let (cols, vals) = self.row(i);
            for (&j, &v) in cols.iter().zip(vals.iter()) {
                if (v - self.get(j, i).conj()).norm() > tol {
                    return false;
                }
            }
        }

        true
    }

    /// Dense copy; refuses dimensions above `limit`.
    pub fn to_dense(&self, limit: usize) -> Result<Matrix<c64>> {
        let dim = self.nrow.max(self.ncol);

        if dim > limit {
            return Err(EdError::SizeLimit {
                what: "sparse to dense conversion".to_string(),
                dim,
                limit,
            });
        }

        let mut mat = Matrix::<c64>::new(self.nrow, self.ncol);

        for i in 0..self.nrow {
            let (cols, vals) = self.row(i);
            for (&j, &v) in cols.iter().zip(vals.iter()) {
                mat[[i, j]] = v;
            }
        }

        Ok(mat)
    }

    /// Matrix dump for small debugging cases.
    pub fn print(&self) -> Result<()> {
        let mat = self.to_dense(PRINT_MATRIX_MAX_DIM)?;

        println!("{}", mat);

        Ok(())
    }
}

impl fmt::Display for SparseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "   sparse {} x {}, nnz = {}", self.nrow, self.ncol, self.nnz())?;

        for i in 0..self.nrow {
            let (cols, vals) = self.row(i);
            for (&j, v) in cols.iter().zip(vals.iter()) {
                writeln!(f, "   {:>6} {:>6} {:+12.6} {:+12.6}", i, j, v.re, v.im)?;
            }
        }

        Ok(())
    }
}
