use crate::bitmanip;
use crate::{Basis, OperatorDescriptor, OperatorKind};
use edconsts::{BASIS_MAX_DIM, SPIN_DOWN, SPIN_UP};
use ederror::{EdError, Result};
use std::fmt;
use types::Word;

/// Words and sign of `O|ket>` for a single operator `O`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BraState {
    pub words: Vec<Word>,
    pub sign: i32,
}

/// Product space of independent species bases.
///
/// Index `i = x0 + x1 * size0 + x2 * size0 * size1 + ...`, the first species
/// running fastest.
#[derive(Debug, Clone)]
pub struct CompositeBasis {
    bases: Vec<Basis>,
    strides: Vec<usize>,
    size: usize,
}

impl CompositeBasis {
    pub fn new(bases: Vec<Basis>) -> Result<CompositeBasis> {
        if bases.len() < 2 {
            return Err(EdError::Configuration(format!(
                "a composite basis needs at least two species, got {}",
                bases.len()
            )));
        }

        let n_sites = bases[0].n_sites();
        let orbitals = bases[0].orbitals();

        if bases
            .iter()
            .any(|b| b.n_sites() != n_sites || b.orbitals() != orbitals)
        {
            return Err(EdError::Configuration(
                "all species of a composite basis must share sites and orbitals".to_string(),
            ));
        }

        let mut strides = Vec::with_capacity(bases.len());
        let mut size: usize = 1;

        for b in bases.iter() {
            strides.push(size);
            size = size.saturating_mul(b.size());
        }

        if size > BASIS_MAX_DIM {
            return Err(EdError::SizeLimit {
                what: "composite basis".to_string(),
                dim: size,
                limit: BASIS_MAX_DIM,
            });
        }

        Ok(CompositeBasis {
            bases,
            strides,
            size,
        })
    }

    /// Spin-1/2 fermions, one orbital per site.
    pub fn hubbard(n_sites: usize, nup: usize, ndown: usize) -> Result<CompositeBasis> {
        CompositeBasis::with_orbitals(n_sites, 1, &[nup, ndown])
    }

    pub fn with_orbitals(n_sites: usize, orbitals: usize, counts: &[usize]) -> Result<CompositeBasis> {
        let bases = counts
            .iter()
            .map(|&n| Basis::with_orbitals(n_sites, n, orbitals))
            .collect::<Result<Vec<Basis>>>()?;

        CompositeBasis::new(bases)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn n_species(&self) -> usize {
        self.bases.len()
    }

    pub fn basis(&self, species: usize) -> &Basis {
        &self.bases[species]
    }

    pub fn bases(&self) -> &[Basis] {
        &self.bases
    }

    pub fn n_sites(&self) -> usize {
        self.bases[0].n_sites()
    }

    pub fn orbitals(&self) -> usize {
        self.bases[0].orbitals()
    }

    pub fn n_modes(&self) -> usize {
        self.bases[0].n_modes()
    }

    pub fn electrons(&self, species: usize) -> usize {
        self.bases[species].electrons()
    }

    pub fn particle_counts(&self) -> Vec<usize> {
        self.bases.iter().map(|b| b.electrons()).collect()
    }

    pub fn sub_index(&self, i: usize, species: usize) -> usize {
        (i / self.strides[species]) % self.bases[species].size()
    }

    pub fn word(&self, i: usize, species: usize) -> Word {
        self.bases[species].word(self.sub_index(i, species))
    }

    pub fn decompose(&self, i: usize) -> Vec<usize> {
        (0..self.n_species()).map(|s| self.sub_index(i, s)).collect()
    }

    pub fn words_of(&self, i: usize) -> Vec<Word> {
        (0..self.n_species()).map(|s| self.word(i, s)).collect()
    }

    pub fn perfect_index(&self, words: &[Word]) -> Result<usize> {
        if words.len() != self.n_species() {
            return Err(EdError::InvalidState(format!(
                "{} words given for {} species",
                words.len(),
                self.n_species()
            )));
        }

        let mut index = 0;

        for (s, (&w, b)) in words.iter().zip(self.bases.iter()).enumerate() {
            index += b.perfect_index(w)? * self.strides[s];
        }

        Ok(index)
    }

    pub fn occupation_at(&self, words: &[Word], site: usize, species: usize, orb: usize) -> usize {
        self.bases[species].occupation_at(words[species], site, orb)
    }

    /// Sign of a same-species pair operator between modes `i` and `j`.
    ///
    /// The pair passes every other species' operators twice, so only the
    /// occupations strictly between `i` and `j` of `species` count.
    pub fn do_sign(&self, words: &[Word], i: usize, j: usize, species: usize) -> i32 {
        self.bases[species].do_sign(words[species], i, j)
    }

    /// Occupation parity of all species ordered before `species`.
    pub fn cross_species_sign(&self, words: &[Word], species: usize) -> i32 {
        let n: usize = words[..species].iter().map(|&w| bitmanip::count(w)).sum();

        bitmanip::parity_sign(n)
    }

    /// Sign of a single creation or annihilation at (site, orb) of `species`.
    pub fn do_sign_gf(&self, words: &[Word], site: usize, species: usize, orb: usize) -> i32 {
        self.cross_species_sign(words, species) * self.bases[species].do_sign_gf(words[species], site, orb)
    }

    fn check_descriptor(&self, desc: &OperatorDescriptor) -> Result<()> {
        if desc.species >= self.n_species() {
            return Err(EdError::IndexOutOfRange {
                index: desc.species,
                len: self.n_species(),
                context: "species".to_string(),
            });
        }

        self.bases[0].check_site(desc.site, desc.orbital)
    }

    // (annihilated species, created species) of a spin flip
    fn spin_flip_species(&self, kind: OperatorKind) -> Result<(usize, usize)> {
        if self.n_species() != 2 {
            return Err(EdError::UnsupportedOperator {
                operator: kind.to_string(),
                context: format!("composite basis with {} species", self.n_species()),
            });
        }

        match kind {
            // S+ = c†(up) c(down)
            OperatorKind::Splus => Ok((SPIN_DOWN, SPIN_UP)),
            // S- = c†(down) c(up)
            OperatorKind::Sminus => Ok((SPIN_UP, SPIN_DOWN)),
            _ => Err(EdError::UnsupportedOperator {
                operator: kind.to_string(),
                context: "spin flip".to_string(),
            }),
        }
    }

    /// Target particle counts after `desc`, or `None` if it cannot act on
    /// this sector.
    pub fn has_new_sector(&self, desc: &OperatorDescriptor) -> Result<Option<Vec<usize>>> {
        self.check_descriptor(desc)?;

        let mut counts = self.particle_counts();

        match desc.kind {
            OperatorKind::C | OperatorKind::Cdagger | OperatorKind::N | OperatorKind::Sz => {
                match self.bases[desc.species].new_particle_count_after(desc.kind)? {
                    Some(n) => counts[desc.species] = n,
                    None => return Ok(None),
                }
            }

            OperatorKind::Splus | OperatorKind::Sminus => {
                let (annihilated, created) = self.spin_flip_species(desc.kind)?;

                let n_annihilated = self.bases[annihilated].new_particle_count_after(OperatorKind::C)?;
                let n_created = self.bases[created].new_particle_count_after(OperatorKind::Cdagger)?;

                match (n_annihilated, n_created) {
                    (Some(a), Some(c)) => {
                        counts[annihilated] = a;
                        counts[created] = c;
                    }
                    _ => return Ok(None),
                }
            }
        }

        Ok(Some(counts))
    }

    /// `desc` applied to the state `words`: new words and sign, or `None`
    /// when the operator annihilates the state.
    pub fn operator_apply(&self, desc: &OperatorDescriptor, words: &[Word]) -> Result<Option<BraState>> {
        self.check_descriptor(desc)?;

        if words.len() != self.n_species() {
            return Err(EdError::InvalidState(format!(
                "{} words given for {} species",
                words.len(),
                self.n_species()
            )));
        }

        match desc.kind {
            OperatorKind::C | OperatorKind::Cdagger | OperatorKind::N => {
                let s = desc.species;

                let bra = match self.bases[s].get_bra(words[s], desc.kind, desc.site, desc.orbital)? {
                    Some(bra) => bra,
                    None => return Ok(None),
                };

                let sign = if desc.kind.is_fermionic() {
                    self.do_sign_gf(words, desc.site, s, desc.orbital)
                } else {
                    1
                };

                let mut new_words = words.to_vec();
                new_words[s] = bra;

                Ok(Some(BraState {
                    words: new_words,
                    sign,
                }))
            }

            OperatorKind::Splus | OperatorKind::Sminus => {
                let (annihilated, created) = self.spin_flip_species(desc.kind)?;

                // rightmost operator acts first
                let first = OperatorDescriptor {
                    kind: OperatorKind::C,
                    species: annihilated,
                    ..*desc
                };

                let step1 = match self.operator_apply(&first, words)? {
                    Some(b) => b,
                    None => return Ok(None),
                };

                let second = OperatorDescriptor {
                    kind: OperatorKind::Cdagger,
                    species: created,
                    ..*desc
                };

                let step2 = match self.operator_apply(&second, &step1.words)? {
                    Some(b) => b,
                    None => return Ok(None),
                };

                Ok(Some(BraState {
                    words: step2.words,
                    sign: step1.sign * step2.sign,
                }))
            }

            OperatorKind::Sz => Err(EdError::UnsupportedOperator {
                operator: desc.kind.to_string(),
                context: "composite basis (a sum of number operators, apply it through the operator applier)"
                    .to_string(),
            }),
        }
    }

    /// Index of `desc|words>` in `target` and its sign.
    pub fn get_bra_index(
        &self,
        target: &CompositeBasis,
        desc: &OperatorDescriptor,
        words: &[Word],
    ) -> Result<Option<(usize, i32)>> {
        match self.operator_apply(desc, words)? {
            Some(bra) => Ok(Some((target.perfect_index(&bra.words)?, bra.sign))),
            None => Ok(None),
        }
    }
}

impl fmt::Display for CompositeBasis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "sites = {}, orbitals = {}, particles = {:?}, size = {}",
            self.n_sites(),
            self.orbitals(),
            self.particle_counts(),
            self.size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_index_is_row_major() {
        let cb = CompositeBasis::hubbard(3, 1, 2).unwrap();

        assert_eq!(cb.size(), 9);

        for i in 0..cb.size() {
            let x = cb.sub_index(i, 0);
            let y = cb.sub_index(i, 1);

            assert!(x < cb.basis(0).size());
            assert!(y < cb.basis(1).size());
            assert_eq!(i, x + y * cb.basis(0).size());
            assert_eq!(cb.decompose(i), vec![x, y]);
            assert_eq!(cb.words_of(i), vec![cb.basis(0).word(x), cb.basis(1).word(y)]);
            assert_eq!(cb.perfect_index(&cb.words_of(i)).unwrap(), i);
        }
    }

    #[test]
    fn test_oversized_product_is_a_size_limit() {
        assert!(matches!(
            CompositeBasis::hubbard(24, 12, 12),
            Err(EdError::SizeLimit { limit: BASIS_MAX_DIM, .. })
        ));
    }

    #[test]
    fn test_composite_needs_two_matching_species() {
        let one = vec![Basis::new(3, 1).unwrap()];
        assert!(matches!(CompositeBasis::new(one), Err(EdError::Configuration(_))));

        let mismatched = vec![Basis::new(3, 1).unwrap(), Basis::new(4, 1).unwrap()];
        assert!(matches!(CompositeBasis::new(mismatched), Err(EdError::Configuration(_))));
    }

    #[test]
    fn test_sector_shift_law() {
        let cb = CompositeBasis::hubbard(4, 1, 2).unwrap();

        let cdag_up = OperatorDescriptor::new(OperatorKind::Cdagger, 2, SPIN_UP);
        let c_down = OperatorDescriptor::new(OperatorKind::C, 0, SPIN_DOWN);

        assert_eq!(cb.has_new_sector(&cdag_up).unwrap(), Some(vec![2, 2]));
        assert_eq!(cb.has_new_sector(&c_down).unwrap(), Some(vec![1, 1]));

        // up word 0b0001, down word 0b0011
        let words = vec![0b0001, 0b0011];

        let bra = cb.operator_apply(&cdag_up, &words).unwrap().unwrap();
        assert_eq!(bra.words, vec![0b0101, 0b0011]);

        let bra = cb.operator_apply(&c_down, &words).unwrap().unwrap();
        assert_eq!(bra.words, vec![0b0001, 0b0010]);

        // wrong occupation: not applicable
        let cdag_occupied = OperatorDescriptor::new(OperatorKind::Cdagger, 0, SPIN_UP);
        assert_eq!(cb.operator_apply(&cdag_occupied, &words).unwrap(), None);

        let c_empty = OperatorDescriptor::new(OperatorKind::C, 3, SPIN_DOWN);
        assert_eq!(cb.operator_apply(&c_empty, &words).unwrap(), None);
    }

    #[test]
    fn test_has_new_sector_boundaries() {
        let cb = CompositeBasis::hubbard(2, 0, 2).unwrap();

        let c_up = OperatorDescriptor::new(OperatorKind::C, 0, SPIN_UP);
        assert_eq!(cb.has_new_sector(&c_up).unwrap(), None);

        let cdag_down = OperatorDescriptor::new(OperatorKind::Cdagger, 0, SPIN_DOWN);
        assert_eq!(cb.has_new_sector(&cdag_down).unwrap(), None);

        let splus = OperatorDescriptor::new(OperatorKind::Splus, 0, SPIN_UP);
        assert_eq!(cb.has_new_sector(&splus).unwrap(), Some(vec![1, 1]));

        let sminus = OperatorDescriptor::new(OperatorKind::Sminus, 0, SPIN_UP);
        assert_eq!(cb.has_new_sector(&sminus).unwrap(), None);

        let n = OperatorDescriptor::new(OperatorKind::N, 1, SPIN_DOWN);
        assert_eq!(cb.has_new_sector(&n).unwrap(), Some(vec![0, 2]));

        // vacuum is a valid target
        let single = CompositeBasis::hubbard(2, 1, 0).unwrap();
        assert_eq!(single.has_new_sector(&c_up).unwrap(), Some(vec![0, 0]));
    }

    #[test]
    fn test_cross_species_sign() {
        let cb = CompositeBasis::hubbard(3, 1, 1).unwrap();

        // one up particle below: creation on down species picks up a minus
        let words = vec![0b100, 0b001];
        let cdag_down = OperatorDescriptor::new(OperatorKind::Cdagger, 1, SPIN_DOWN);

        let bra = cb.operator_apply(&cdag_down, &words).unwrap().unwrap();
        assert_eq!(bra.words, vec![0b100, 0b011]);
        assert_eq!(bra.sign, -1 * -1);

        let cdag_up = OperatorDescriptor::new(OperatorKind::Cdagger, 0, SPIN_UP);
        let bra = cb.operator_apply(&cdag_up, &words).unwrap().unwrap();
        assert_eq!(bra.sign, 1);
    }

    #[test]
    fn test_sz_is_not_a_single_word_operator() {
        let cb = CompositeBasis::hubbard(2, 1, 1).unwrap();
        let sz = OperatorDescriptor::new(OperatorKind::Sz, 0, SPIN_UP);

        assert!(matches!(
            cb.operator_apply(&sz, &[0b01, 0b01]),
            Err(EdError::UnsupportedOperator { .. })
        ));
    }

    #[test]
    fn test_spin_flip_needs_two_species() {
        let cb = CompositeBasis::with_orbitals(2, 1, &[1, 1, 0]).unwrap();
        let splus = OperatorDescriptor::new(OperatorKind::Splus, 0, 0);

        assert!(matches!(
            cb.has_new_sector(&splus),
            Err(EdError::UnsupportedOperator { .. })
        ));
    }
}
