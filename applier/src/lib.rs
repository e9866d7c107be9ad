//! Operator action on state vectors, possibly across particle-number sectors.
//!
//! Source vectors live on a source `CompositeBasis` and results on a
//! destination basis, usually the sector reported by `has_new_sector`.
//! The number operator acts as the total site density `n_up + n_down`;
//! `Sz` acts as `(n_up - n_down) / 2`.

use basis::{CompositeBasis, OperatorDescriptor, OperatorKind};
use edconsts::*;
use ederror::{EdError, Result};
use log::debug;
use num_traits::identities::Zero;
use types::c64;

/// Destination basis of `desc` acting on `src`, or `None` if it cannot act.
pub fn target_basis(src: &CompositeBasis, desc: &OperatorDescriptor) -> Result<Option<CompositeBasis>> {
    match src.has_new_sector(desc)? {
        Some(counts) => Ok(Some(CompositeBasis::with_orbitals(
            src.n_sites(),
            src.orbitals(),
            &counts,
        )?)),
        None => Ok(None),
    }
}

// z += coeff * O |gs> for one single-word operator O.
fn acc_single(
    z: &mut [c64],
    desc: &OperatorDescriptor,
    src: &CompositeBasis,
    dst: &CompositeBasis,
    gs: &[c64],
    coeff: c64,
) -> Result<()> {
    let mut hits = 0;

    for (i, &amp) in gs.iter().enumerate() {
        if amp.is_zero() {
            continue;
        }

        let words = src.words_of(i);

        let (index, sign) = match src.get_bra_index(dst, desc, &words)? {
            Some(x) => x,
            None => continue,
        };

        if index >= z.len() {
            return Err(EdError::IndexOutOfRange {
                index,
                len: z.len(),
                context: format!("destination of {} from source state {} ({:?})", desc, i, words),
            });
        }

        z[index] += coeff * amp * sign as f64;
        hits += 1;
    }

    debug!("{}: {} of {} source amplitudes mapped", desc, hits, gs.len());

    Ok(())
}

/// z += coeff * O |gs>.
pub fn acc_modified_state(
    z: &mut [c64],
    desc: &OperatorDescriptor,
    src: &CompositeBasis,
    dst: &CompositeBasis,
    gs: &[c64],
    coeff: c64,
) -> Result<()> {
    assert_eq!(gs.len(), src.size());

    match desc.kind {
        OperatorKind::N => {
            for species in 0..src.n_species() {
                let n = OperatorDescriptor { species, ..*desc };
                acc_single(z, &n, src, dst, gs, coeff)?;
            }

            Ok(())
        }

        OperatorKind::Sz => {
            if src.n_species() != 2 {
                return Err(EdError::UnsupportedOperator {
                    operator: desc.kind.to_string(),
                    context: format!("composite basis with {} species", src.n_species()),
                });
            }

            let up = OperatorDescriptor {
                kind: OperatorKind::N,
                species: SPIN_UP,
                ..*desc
            };
            let down = OperatorDescriptor {
                kind: OperatorKind::N,
                species: SPIN_DOWN,
                ..*desc
            };

            acc_single(z, &up, src, dst, gs, coeff * 0.5)?;
            acc_single(z, &down, src, dst, gs, -coeff * 0.5)
        }

        _ => acc_single(z, desc, src, dst, gs, coeff),
    }
}

/// O |gs> over `dst`.
pub fn apply(desc: &OperatorDescriptor, src: &CompositeBasis, dst: &CompositeBasis, gs: &[c64]) -> Result<Vec<c64>> {
    let mut z = vec![c64::zero(); dst.size()];

    acc_modified_state(&mut z, desc, src, dst, gs, ONE_C64)?;

    Ok(z)
}

/// sum_k coeff_k O_k |gs> over `dst`.
pub fn apply_linear_combination(
    terms: &[(c64, OperatorDescriptor)],
    src: &CompositeBasis,
    dst: &CompositeBasis,
    gs: &[c64],
) -> Result<Vec<c64>> {
    let mut z = vec![c64::zero(); dst.size()];

    for (coeff, desc) in terms.iter() {
        acc_modified_state(&mut z, desc, src, dst, gs, *coeff)?;
    }

    Ok(z)
}

/// State for the two-site Green's function of type `gf_type`:
/// `O_i|gs> + s O_j|gs>`, with `O = kind` for odd `gf_type` and its adjoint
/// otherwise, `s = -1` for `gf_type > 1` and `+1` otherwise.
#[allow(clippy::too_many_arguments)]
pub fn modified_state(
    kind: OperatorKind,
    gs: &[c64],
    src: &CompositeBasis,
    dst: &CompositeBasis,
    gf_type: usize,
    isite: usize,
    jsite: usize,
    species: usize,
    orbital: usize,
) -> Result<Vec<c64>> {
    if gf_type >= 4 {
        return Err(EdError::Configuration(format!(
            "green's function type must be 0, 1, 2 or 3, got {}",
            gf_type
        )));
    }

    let op = if gf_type & 1 == 1 { kind } else { kind.transpose_conjugate() };
    let isign = if gf_type > 1 { -1.0 } else { 1.0 };

    let oi = OperatorDescriptor::new(op, isite, species).with_orbital(orbital);
    let oj = OperatorDescriptor::new(op, jsite, species).with_orbital(orbital);

    let z = apply_linear_combination(&[(ONE_C64, oi), (c64::new(isign, 0.0), oj)], src, dst, gs)?;

    debug!(
        "{} at sites {} and {}, gf_type = {}: |modified state|^2 = {:.10}",
        op,
        isite,
        jsite,
        gf_type,
        utility::vec_norm(&z).powi(2)
    );

    Ok(z)
}
