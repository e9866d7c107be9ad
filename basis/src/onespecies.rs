use crate::bitmanip;
use crate::OperatorKind;
use edconsts::{BASIS_MAX_DIM, DIRECT_ADDRESS_MAX_BITS, DIRECT_ADDRESS_MAX_SPARSITY};
use ederror::{EdError, Result};
use log::debug;
use std::fmt;
use types::{Word, WORD_BITS};

/// Particle-number sector of one species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sector {
    pub n_sites: usize,
    pub orbitals: usize,
    pub n_particles: usize,
}

impl Sector {
    pub fn n_modes(&self) -> usize {
        self.n_sites * self.orbitals
    }
}

#[derive(Debug, Clone)]
enum PerfectIndex {
    // word -> index, u32::MAX marks words outside the sector
    Direct(Vec<u32>),
    // binary search in the ascending word table
    Sorted,
}

/// All occupation words of one species in one sector, ascending.
#[derive(Debug, Clone)]
pub struct Basis {
    sector: Sector,
    data: Vec<Word>,
    lookup: PerfectIndex,
}

impl Basis {
    pub fn new(n_sites: usize, n_particles: usize) -> Result<Basis> {
        Basis::with_orbitals(n_sites, n_particles, 1)
    }

    pub fn with_orbitals(n_sites: usize, n_particles: usize, orbitals: usize) -> Result<Basis> {
        if n_sites == 0 || orbitals == 0 {
            return Err(EdError::Configuration(format!(
                "basis needs at least one site and one orbital, got {} sites x {} orbitals",
                n_sites, orbitals
            )));
        }

        let n_modes = n_sites * orbitals;

        if n_modes > WORD_BITS {
            return Err(EdError::Configuration(format!(
                "{} modes do not fit a {}-bit occupation word",
                n_modes, WORD_BITS
            )));
        }

        if n_particles > n_modes {
            return Err(EdError::Configuration(format!(
                "{} particles do not fit {} modes",
                n_particles, n_modes
            )));
        }

        let size = bitmanip::binomial(n_modes, n_particles).ok_or_else(|| {
            EdError::Configuration(format!(
                "sector C({}, {}) is too large to enumerate",
                n_modes, n_particles
            ))
        })?;

        if size > BASIS_MAX_DIM {
            return Err(EdError::SizeLimit {
                what: format!("basis C({}, {})", n_modes, n_particles),
                dim: size,
                limit: BASIS_MAX_DIM,
            });
        }

        let mut data = Vec::with_capacity(size);

        let mut w = bitmanip::low_mask(n_particles);
        data.push(w);

        for _ in 1..size {
            w = bitmanip::next_same_population(w);
            data.push(w);
        }

        let direct = n_modes <= DIRECT_ADDRESS_MAX_BITS
            && (1usize << n_modes) <= size.saturating_mul(DIRECT_ADDRESS_MAX_SPARSITY);

        let lookup = if direct {
            let mut table = vec![u32::MAX; 1 << n_modes];

            for (i, &w) in data.iter().enumerate() {
                table[w as usize] = i as u32;
            }

            PerfectIndex::Direct(table)
        } else {
            PerfectIndex::Sorted
        };

        debug!(
            "basis: {} modes, {} particles, {} states",
            n_modes, n_particles, size
        );

        Ok(Basis {
            sector: Sector {
                n_sites,
                orbitals,
                n_particles,
            },
            data,
            lookup,
        })
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn word(&self, i: usize) -> Word {
        self.data[i]
    }

    pub fn words(&self) -> &[Word] {
        &self.data
    }

    pub fn sector(&self) -> Sector {
        self.sector
    }

    pub fn n_sites(&self) -> usize {
        self.sector.n_sites
    }

    pub fn orbitals(&self) -> usize {
        self.sector.orbitals
    }

    pub fn n_modes(&self) -> usize {
        self.sector.n_modes()
    }

    pub fn electrons(&self) -> usize {
        self.sector.n_particles
    }

    pub fn mode(&self, site: usize, orb: usize) -> usize {
        site * self.sector.orbitals + orb
    }

    /// Inverse of [`Basis::word`].
    pub fn perfect_index(&self, w: Word) -> Result<usize> {
        let n_modes = self.n_modes();

        if n_modes < WORD_BITS && (w >> n_modes) != 0 {
            return Err(EdError::InvalidState(format!(
                "word {:#b} occupies modes beyond {}",
                w, n_modes
            )));
        }

        let found = bitmanip::count(w);

        if found != self.sector.n_particles {
            return Err(EdError::InvalidState(format!(
                "word {:#b} holds {} particles, sector expects {}",
                w, found, self.sector.n_particles
            )));
        }

        match &self.lookup {
            PerfectIndex::Direct(table) => Ok(table[w as usize] as usize),
            PerfectIndex::Sorted => self.data.binary_search(&w).map_err(|_| {
                EdError::InvalidState(format!("word {:#b} is not in the basis table", w))
            }),
        }
    }

    /// 0 or 1.
    pub fn occupation_at(&self, w: Word, site: usize, orb: usize) -> usize {
        ((w >> self.mode(site, orb)) & 1) as usize
    }

    /// Fermion sign of moving a particle between modes `i` and `j`.
    pub fn do_sign(&self, w: Word, i: usize, j: usize) -> i32 {
        bitmanip::sign_between(w, i, j)
    }

    /// Sign of a single creation or annihilation at (site, orb) within this species.
    pub fn do_sign_gf(&self, w: Word, site: usize, orb: usize) -> i32 {
        bitmanip::sign_below(w, self.mode(site, orb))
    }

    pub fn new_particle_count_after(&self, kind: OperatorKind) -> Result<Option<usize>> {
        let n = self.sector.n_particles;

        match kind {
            OperatorKind::C => Ok(n.checked_sub(1)),
            OperatorKind::Cdagger => Ok(if n < self.n_modes() { Some(n + 1) } else { None }),
            OperatorKind::N | OperatorKind::Sz => Ok(Some(n)),
            OperatorKind::Splus | OperatorKind::Sminus => Err(EdError::UnsupportedOperator {
                operator: kind.to_string(),
                context: "single-species basis".to_string(),
            }),
        }
    }

    /// Word reached by C, Cdagger or N at (site, orb), or `None` when the
    /// operator annihilates `ket`.
    pub fn get_bra(&self, ket: Word, kind: OperatorKind, site: usize, orb: usize) -> Result<Option<Word>> {
        self.check_site(site, orb)?;

        let mask = bitmanip::bitmask(self.mode(site, orb));
        let occupied = (ket & mask) != 0;

        match kind {
            OperatorKind::C => Ok(if occupied { Some(ket ^ mask) } else { None }),
            OperatorKind::Cdagger => Ok(if occupied { None } else { Some(ket ^ mask) }),
            OperatorKind::N => Ok(if occupied { Some(ket) } else { None }),
            _ => Err(EdError::UnsupportedOperator {
                operator: kind.to_string(),
                context: "single-species bra".to_string(),
            }),
        }
    }

    pub fn check_site(&self, site: usize, orb: usize) -> Result<()> {
        if site >= self.sector.n_sites {
            return Err(EdError::IndexOutOfRange {
                index: site,
                len: self.sector.n_sites,
                context: "site".to_string(),
            });
        }

        if orb >= self.sector.orbitals {
            return Err(EdError::IndexOutOfRange {
                index: orb,
                len: self.sector.orbitals,
                context: "orbital".to_string(),
            });
        }

        Ok(())
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let width = self.n_modes();

        writeln!(
            f,
            "   basis: modes = {}, particles = {}, size = {}",
            width,
            self.sector.n_particles,
            self.size()
        )?;

        for (i, w) in self.data.iter().enumerate() {
            writeln!(f, "   {:>8} {:0width$b}", i, w, width = width)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_enumerates_ascending() {
        let basis = Basis::new(4, 2).unwrap();

        assert_eq!(basis.size(), 6);
        assert_eq!(basis.words(), &[0b0011, 0b0101, 0b0110, 0b1001, 0b1010, 0b1100]);
    }

    #[test]
    fn test_perfect_index_is_a_bijection() {
        for n_sites in 1..=8 {
            for n in 0..=n_sites {
                let basis = Basis::new(n_sites, n).unwrap();

                for i in 0..basis.size() {
                    let w = basis.word(i);
                    assert_eq!(bitmanip::count(w), n);
                    assert_eq!(basis.perfect_index(w).unwrap(), i);
                }
            }
        }
    }

    #[test]
    fn test_sorted_lookup_above_direct_address_width() {
        let basis = Basis::new(DIRECT_ADDRESS_MAX_BITS + 2, 2).unwrap();

        assert!(matches!(basis.lookup, PerfectIndex::Sorted));

        for i in (0..basis.size()).step_by(7) {
            assert_eq!(basis.perfect_index(basis.word(i)).unwrap(), i);
        }
    }

    #[test]
    fn test_direct_table_only_for_dense_sectors() {
        let dense = Basis::new(DIRECT_ADDRESS_MAX_BITS, DIRECT_ADDRESS_MAX_BITS / 2).unwrap();
        assert!(matches!(dense.lookup, PerfectIndex::Direct(_)));

        let sparse = Basis::new(DIRECT_ADDRESS_MAX_BITS, 1).unwrap();
        assert!(matches!(sparse.lookup, PerfectIndex::Sorted));
        assert_eq!(sparse.perfect_index(1 << 7).unwrap(), 7);

        let small = Basis::new(4, 1).unwrap();
        assert!(matches!(small.lookup, PerfectIndex::Direct(_)));
    }

    #[test]
    fn test_oversized_sector_is_refused_before_enumeration() {
        match Basis::new(64, 32) {
            Err(EdError::SizeLimit { dim, limit, .. }) => {
                assert!(dim > limit);
                assert_eq!(limit, BASIS_MAX_DIM);
            }
            other => panic!("expected a size limit, got {:?}", other.map(|b| b.size())),
        }

        assert!(matches!(Basis::new(40, 20), Err(EdError::SizeLimit { .. })));
        assert!(matches!(Basis::new(64, 1), Ok(_)));
    }

    #[test]
    fn test_perfect_index_rejects_wrong_population() {
        let basis = Basis::new(4, 2).unwrap();

        assert!(matches!(basis.perfect_index(0b0111), Err(EdError::InvalidState(_))));
        assert!(matches!(basis.perfect_index(0b10001), Err(EdError::InvalidState(_))));
    }

    #[test]
    fn test_empty_and_full_sectors() {
        let empty = Basis::new(5, 0).unwrap();
        assert_eq!(empty.words(), &[0]);

        let full = Basis::new(5, 5).unwrap();
        assert_eq!(full.words(), &[0b11111]);

        let wide = Basis::new(64, 64).unwrap();
        assert_eq!(wide.words(), &[Word::MAX]);
        assert_eq!(wide.perfect_index(Word::MAX).unwrap(), 0);
    }

    #[test]
    fn test_invalid_configurations() {
        assert!(matches!(Basis::new(0, 0), Err(EdError::Configuration(_))));
        assert!(matches!(Basis::new(3, 4), Err(EdError::Configuration(_))));
        assert!(matches!(Basis::with_orbitals(33, 1, 2), Err(EdError::Configuration(_))));
    }

    #[test]
    fn test_orbitals_are_per_instance() {
        let one = Basis::with_orbitals(3, 1, 1).unwrap();
        let two = Basis::with_orbitals(3, 1, 2).unwrap();

        assert_eq!(one.n_modes(), 3);
        assert_eq!(two.n_modes(), 6);
        assert_eq!(two.mode(2, 1), 5);
        assert_eq!(one.mode(2, 0), 2);
        assert_eq!(two.occupation_at(0b100000, 2, 1), 1);
        assert_eq!(two.occupation_at(0b100000, 2, 0), 0);
    }

    #[test]
    fn test_new_particle_count_after() {
        let basis = Basis::new(3, 0).unwrap();
        assert_eq!(basis.new_particle_count_after(OperatorKind::C).unwrap(), None);
        assert_eq!(basis.new_particle_count_after(OperatorKind::Cdagger).unwrap(), Some(1));

        let full = Basis::new(3, 3).unwrap();
        assert_eq!(full.new_particle_count_after(OperatorKind::Cdagger).unwrap(), None);
        assert_eq!(full.new_particle_count_after(OperatorKind::C).unwrap(), Some(2));
        assert_eq!(full.new_particle_count_after(OperatorKind::N).unwrap(), Some(3));

        assert!(full.new_particle_count_after(OperatorKind::Splus).is_err());
    }

    #[test]
    fn test_get_bra() {
        let basis = Basis::new(4, 2).unwrap();
        let ket = 0b0101;

        assert_eq!(basis.get_bra(ket, OperatorKind::C, 2, 0).unwrap(), Some(0b0001));
        assert_eq!(basis.get_bra(ket, OperatorKind::C, 1, 0).unwrap(), None);
        assert_eq!(basis.get_bra(ket, OperatorKind::Cdagger, 1, 0).unwrap(), Some(0b0111));
        assert_eq!(basis.get_bra(ket, OperatorKind::Cdagger, 0, 0).unwrap(), None);
        assert_eq!(basis.get_bra(ket, OperatorKind::N, 0, 0).unwrap(), Some(ket));
        assert_eq!(basis.get_bra(ket, OperatorKind::N, 3, 0).unwrap(), None);

        assert!(matches!(
            basis.get_bra(ket, OperatorKind::C, 4, 0),
            Err(EdError::IndexOutOfRange { .. })
        ));
    }
}
