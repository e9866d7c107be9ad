use crate::{check_pointer, SymmetryAdapter};
use basis::{bitmanip, CompositeBasis};
use edconsts::*;
use ederror::{EdError, Result};
use log::debug;
use model::HubbardModel;
use num_traits::identities::Zero;
use rayon::prelude::*;
use sparse::{SparseMatrix, SparseRow};
use types::c64;

const PARALLEL_MIN_LEN: usize = 8192;

#[inline]
fn use_parallel_for_len(len: usize) -> bool {
    len >= PARALLEL_MIN_LEN && rayon::current_num_threads() > 1
}

/// Blocks of the cyclic group generated by one site permutation `g`.
///
/// Block `m` is spanned by the normalized projections
/// `P_m|a> = (1/k) sum_r w^{-m r} U^r |a>`, `w = exp(2 pi i / k)`, of one
/// representative per orbit, where `U` moves every fermion from site `i` to
/// `g(i)` and `k` is the order of `g`. Blocks whose projections all vanish
/// have rank zero.
pub struct CyclicSymmetry {
    name: String,
    order: usize,
    dim: usize,

    // vectors[m][p]: sparse coefficients of the p-th basis vector of block m
    vectors: Vec<Vec<Vec<(usize, c64)>>>,

    // owner[m][a]: basis vector of block m containing state a, and its coefficient
    owner: Vec<Vec<Option<(usize, c64)>>>,

    blocks: Vec<SparseMatrix>,
    pointer: usize,
}

fn permutation_order(perm: &[usize]) -> usize {
    let n = perm.len();
    let mut current: Vec<usize> = (0..n).collect();
    let mut order = 0;

    loop {
        current = current.iter().map(|&i| perm[i]).collect();
        order += 1;

        if current.iter().enumerate().all(|(i, &j)| i == j) {
            return order;
        }
    }
}

fn check_permutation(perm: &[usize], n_sites: usize) -> Result<()> {
    if perm.len() != n_sites {
        return Err(EdError::Configuration(format!(
            "site permutation has {} entries for {} sites",
            perm.len(),
            n_sites
        )));
    }

    let mut seen = vec![false; n_sites];

    for &p in perm.iter() {
        if p >= n_sites || seen[p] {
            return Err(EdError::Configuration(format!("{:?} is not a site permutation", perm)));
        }
        seen[p] = true;
    }

    Ok(())
}

// U|a> = sign[a] |image[a]>
fn map_states(basis: &CompositeBasis, mode_perm: &[usize]) -> Result<(Vec<usize>, Vec<i32>)> {
    let dim = basis.size();
    let mut image = Vec::with_capacity(dim);
    let mut sign = Vec::with_capacity(dim);

    let mut mapped = vec![0; basis.n_species()];

    for a in 0..dim {
        let mut s = 1;

        for (species, m) in mapped.iter_mut().enumerate() {
            let (w, ws) = bitmanip::permute_word(basis.word(a, species), mode_perm);
            *m = w;
            s *= ws;
        }

        image.push(basis.perfect_index(&mapped)?);
        sign.push(s);
    }

    Ok((image, sign))
}

fn check_commutes(h: &SparseMatrix, image: &[usize], sign: &[i32]) -> bool {
    for a in 0..h.nrow() {
        let (cols, vals) = h.row(a);

        for (&b, &v) in cols.iter().zip(vals.iter()) {
            let mapped = h.get(image[a], image[b]) * (sign[a] * sign[b]) as f64;

            if (mapped - v).norm() > EPS10 {
                return false;
            }
        }
    }

    true
}

impl CyclicSymmetry {
    pub fn new(model: &HubbardModel, perm: &[usize], name: &str, print_matrix: bool) -> Result<CyclicSymmetry> {
        let basis = model.basis();
        let n_sites = basis.n_sites();
        let orbitals = basis.orbitals();

        check_permutation(perm, n_sites)?;

        let mode_perm: Vec<usize> = (0..n_sites * orbitals)
            .map(|mode| perm[mode / orbitals] * orbitals + mode % orbitals)
            .collect();

        let h = model.hamiltonian()?;
        let (image, sign) = map_states(basis, &mode_perm)?;

        if !check_commutes(h, &image, &sign) {
            return Err(EdError::Configuration(format!(
                "site permutation {:?} ({}) does not commute with the hamiltonian",
                perm, name
            )));
        }

        let order = permutation_order(perm);
        let dim = basis.size();

        let (vectors, owner) = project_orbits(&image, &sign, order);

        let mut symm = CyclicSymmetry {
            name: name.to_string(),
            order,
            dim,
            vectors,
            owner,
            blocks: Vec::new(),
            pointer: 0,
        };

        let ht = h.transpose();
        symm.blocks = (0..order)
            .map(|m| symm.project(&ht, m))
            .collect::<Result<Vec<SparseMatrix>>>()?;

        debug!(
            "{} symmetry: order = {}, block ranks = {:?}",
            symm.name,
            order,
            symm.blocks.iter().map(|b| b.nrow()).collect::<Vec<usize>>()
        );

        if print_matrix {
            for m in 0..order {
                symm.set_pointer(m)?;
                symm.print_active_if_small()?;
            }
            symm.set_pointer(0)?;
        }

        Ok(symm)
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn block_rank(&self, m: usize) -> usize {
        self.vectors[m].len()
    }

    // <v_p|M|v_q> over block m, from the transpose of M (rows of mt are columns of M)
    fn project(&self, mt: &SparseMatrix, m: usize) -> Result<SparseMatrix> {
        let n = self.vectors[m].len();

        let column = |q: usize| -> SparseRow {
            let mut w = SparseRow::new();

            for &(b, cb) in self.vectors[m][q].iter() {
                let (rows, vals) = mt.row(b);
                for (&a, &v) in rows.iter().zip(vals.iter()) {
                    w.add(a, v * cb);
                }
            }

            let mut col = SparseRow::new();

            for &(a, wa) in w.finalize(0.0).iter() {
                if let Some((p, ca)) = self.owner[m][a] {
                    col.add(p, ca.conj() * wa);
                }
            }

            col
        };

        let columns: Vec<SparseRow> = if use_parallel_for_len(self.dim) {
            (0..n).into_par_iter().map(column).collect()
        } else {
            (0..n).map(column).collect()
        };

        // row q of this matrix is column q of the block
        let transposed = SparseMatrix::from_rows(n, n, columns, EPS12)?;

        Ok(transposed.transpose())
    }
}

// Projected, normalized orbit vectors for every character m.
fn project_orbits(
    image: &[usize],
    sign: &[i32],
    order: usize,
) -> (Vec<Vec<Vec<(usize, c64)>>>, Vec<Vec<Option<(usize, c64)>>>) {
    let dim = image.len();

    let mut vectors = vec![Vec::new(); order];
    let mut owner = vec![vec![None; dim]; order];
    let mut visited = vec![false; dim];

    let phases: Vec<c64> = (0..order)
        .map(|r| c64::from_polar(1.0, -TWOPI * r as f64 / order as f64))
        .collect();

    let mut orbit: Vec<(usize, f64)> = Vec::with_capacity(order);

    for a in 0..dim {
        if visited[a] {
            continue;
        }

        orbit.clear();

        let (mut state, mut s) = (a, 1);
        for _ in 0..order {
            orbit.push((state, s as f64));
            visited[state] = true;

            s *= sign[state];
            state = image[state];
        }

        for m in 0..order {
            let mut row = SparseRow::new();

            for (r, &(state, s)) in orbit.iter().enumerate() {
                row.add(state, phases[(m * r) % order] * (s / order as f64));
            }

            let mut v = row.finalize(EPS14).to_vec();
            let norm = v.iter().map(|(_, c)| c.norm_sqr()).sum::<f64>().sqrt();

            if norm * norm < EPS10 {
                continue;
            }

            v.iter_mut().for_each(|(_, c)| *c /= norm);

            let p = vectors[m].len();
            for &(state, c) in v.iter() {
                owner[m][state] = Some((p, c));
            }

            vectors[m].push(v);
        }
    }

    (vectors, owner)
}

impl SymmetryAdapter for CyclicSymmetry {
    fn sectors(&self) -> usize {
        self.order
    }

    fn set_pointer(&mut self, k: usize) -> Result<()> {
        check_pointer(k, self.order)?;
        self.pointer = k;

        Ok(())
    }

    fn pointer(&self) -> usize {
        self.pointer
    }

    fn rank(&self) -> usize {
        self.blocks[self.pointer].nrow()
    }

    fn matrix_vector_product(&self, x: &[c64], y: &mut [c64]) {
        self.blocks[self.pointer].matrix_vector_product(x, y);
    }

    fn transform_matrix(&self, matrix: &SparseMatrix) -> Result<Vec<SparseMatrix>> {
        if matrix.nrow() != self.dim || matrix.ncol() != self.dim {
            return Err(EdError::Configuration(format!(
                "cannot project a {} x {} operator onto blocks of a sector of size {}",
                matrix.nrow(),
                matrix.ncol(),
                self.dim
            )));
        }

        let mt = matrix.transpose();

        (0..self.order).map(|m| self.project(&mt, m)).collect()
    }

    fn transform_gs(&self, gs: &[c64]) -> Vec<c64> {
        assert_eq!(gs.len(), self.rank());

        let mut full = vec![c64::zero(); self.dim];

        for (x, v) in gs.iter().zip(self.vectors[self.pointer].iter()) {
            for &(a, c) in v.iter() {
                full[a] += x * c;
            }
        }

        full
    }

    fn active_matrix(&self) -> &SparseMatrix {
        &self.blocks[self.pointer]
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn display(&self) {
        const OUT_WIDTH1: usize = 20;
        const OUT_WIDTH2: usize = 18;

        println!("   {:<width1$} = {:>width2$}", "symmetry", self.name, width1 = OUT_WIDTH1, width2 = OUT_WIDTH2);
        println!("   {:<width1$} = {:>width2$}", "order", self.order, width1 = OUT_WIDTH1, width2 = OUT_WIDTH2);

        for m in 0..self.order {
            println!(
                "   {:<width1$} = {:>width2$}",
                format!("rank(block {})", m),
                self.block_rank(m),
                width1 = OUT_WIDTH1,
                width2 = OUT_WIDTH2
            );
        }
    }
}
