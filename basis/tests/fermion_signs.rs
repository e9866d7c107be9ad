use basis::*;
use types::Word;

// A state as its ordered list of creation operators, keyed by (species, mode).
fn to_operators(cb: &CompositeBasis, words: &[Word]) -> Vec<(usize, usize)> {
    let mut ops = Vec::new();

    for (s, &w) in words.iter().enumerate() {
        for m in 0..cb.n_modes() {
            if (w >> m) & 1 == 1 {
                ops.push((s, m));
            }
        }
    }

    ops
}

fn to_words(cb: &CompositeBasis, ops: &[(usize, usize)]) -> Vec<Word> {
    let mut words = vec![0; cb.n_species()];

    for &(s, m) in ops.iter() {
        words[s] |= 1 << m;
    }

    words
}

// c†(key) moved from the front into place, one transposition per smaller key.
fn create(ops: &[(usize, usize)], key: (usize, usize)) -> Option<(Vec<(usize, usize)>, i32)> {
    if ops.contains(&key) {
        return None;
    }

    let swaps = ops.iter().filter(|&&k| k < key).count();
    let mut out = ops.to_vec();
    out.push(key);
    out.sort();

    Some((out, if swaps % 2 == 0 { 1 } else { -1 }))
}

fn annihilate(ops: &[(usize, usize)], key: (usize, usize)) -> Option<(Vec<(usize, usize)>, i32)> {
    let p = ops.iter().position(|&k| k == key)?;
    let mut out = ops.to_vec();
    out.remove(p);

    Some((out, if p % 2 == 0 { 1 } else { -1 }))
}

#[test]
fn test_single_operator_signs_match_reordering() {
    for counts in [[1, 1], [2, 1], [1, 2], [2, 2]] {
        let cb = CompositeBasis::with_orbitals(4, 1, &counts).unwrap();

        for i in 0..cb.size() {
            let words = cb.words_of(i);
            let ops = to_operators(&cb, &words);

            for s in 0..2 {
                for site in 0..4 {
                    let cdag = OperatorDescriptor::new(OperatorKind::Cdagger, site, s);
                    let got = cb.operator_apply(&cdag, &words).unwrap();
                    let expected = create(&ops, (s, site));

                    match (got, expected) {
                        (None, None) => {}
                        (Some(b), Some((e, sign))) => {
                            assert_eq!(b.words, to_words(&cb, &e));
                            assert_eq!(b.sign, sign);
                        }
                        _ => panic!("applicability mismatch for c† at {} {}", site, s),
                    }

                    let c = OperatorDescriptor::new(OperatorKind::C, site, s);
                    let got = cb.operator_apply(&c, &words).unwrap();
                    let expected = annihilate(&ops, (s, site));

                    match (got, expected) {
                        (None, None) => {}
                        (Some(b), Some((e, sign))) => {
                            assert_eq!(b.words, to_words(&cb, &e));
                            assert_eq!(b.sign, sign);
                        }
                        _ => panic!("applicability mismatch for c at {} {}", site, s),
                    }
                }
            }
        }
    }
}

#[test]
fn test_hopping_sign_matches_reordering() {
    let cb = CompositeBasis::hubbard(4, 2, 2).unwrap();

    for k in 0..cb.size() {
        let words = cb.words_of(k);
        let ops = to_operators(&cb, &words);

        for s in 0..2 {
            for i in 0..4 {
                for j in 0..4 {
                    if i == j {
                        continue;
                    }

                    // c†_i c_j, rightmost first
                    let expected = annihilate(&ops, (s, j))
                        .and_then(|(mid, s1)| create(&mid, (s, i)).map(|(e, s2)| (e, s1 * s2)));

                    let occupied_j = cb.occupation_at(&words, j, s, 0) == 1;
                    let occupied_i = cb.occupation_at(&words, i, s, 0) == 1;

                    match expected {
                        Some((e, sign)) => {
                            assert!(occupied_j && !occupied_i);
                            assert_eq!(cb.do_sign(&words, i, j, s), sign);

                            let mut bra = words.clone();
                            bra[s] ^= (1 << i) | (1 << j);
                            assert_eq!(bra, to_words(&cb, &e));
                        }
                        None => assert!(!occupied_j || occupied_i),
                    }
                }
            }
        }
    }
}

#[test]
fn test_spin_flip_matches_composition() {
    let cb = CompositeBasis::hubbard(3, 1, 2).unwrap();

    for k in 0..cb.size() {
        let words = cb.words_of(k);
        let ops = to_operators(&cb, &words);

        for site in 0..3 {
            // S+ = c†(up) c(down)
            let splus = OperatorDescriptor::new(OperatorKind::Splus, site, 0);
            let expected = annihilate(&ops, (1, site))
                .and_then(|(mid, s1)| create(&mid, (0, site)).map(|(e, s2)| (e, s1 * s2)));

            match (cb.operator_apply(&splus, &words).unwrap(), expected) {
                (None, None) => {}
                (Some(b), Some((e, sign))) => {
                    assert_eq!(b.words, to_words(&cb, &e));
                    assert_eq!(b.sign, sign);
                }
                _ => panic!("applicability mismatch for S+ at {}", site),
            }
        }
    }
}

#[test]
fn test_get_bra_index_lands_in_target_sector() {
    let cb = CompositeBasis::hubbard(4, 2, 1).unwrap();
    let desc = OperatorDescriptor::new(OperatorKind::C, 1, 0);

    let counts = cb.has_new_sector(&desc).unwrap().unwrap();
    let target = CompositeBasis::with_orbitals(4, 1, &counts).unwrap();

    let mut hits = 0;

    for k in 0..cb.size() {
        let words = cb.words_of(k);

        if let Some((index, sign)) = cb.get_bra_index(&target, &desc, &words).unwrap() {
            let bra = target.words_of(index);
            assert_eq!(bra[0], words[0] & !(1 << 1));
            assert_eq!(bra[1], words[1]);
            assert!(sign == 1 || sign == -1);
            hits += 1;
        }
    }

    // C(3,1) occupied states of the up species times 4 down states
    assert_eq!(hits, 3 * 4);
}

#[test]
fn test_multi_orbital_modes_are_site_major() {
    let cb = CompositeBasis::with_orbitals(2, 2, &[1, 1]).unwrap();

    assert_eq!(cb.n_modes(), 4);
    assert_eq!(cb.size(), 16);

    let desc = OperatorDescriptor::new(OperatorKind::Cdagger, 1, 0).with_orbital(1);
    let bra = cb.operator_apply(&desc, &[0b0001, 0b0001]).unwrap().unwrap();

    assert_eq!(bra.words, vec![0b1001, 0b0001]);
    assert_eq!(bra.sign, -1);

    let bad = OperatorDescriptor::new(OperatorKind::Cdagger, 1, 0).with_orbital(2);
    assert!(cb.operator_apply(&bad, &[0b0001, 0b0001]).is_err());
}
