use types::{Word, WORD_BITS};

#[inline]
pub fn bitmask(i: usize) -> Word {
    1 << i
}

#[inline]
pub fn count(w: Word) -> usize {
    w.count_ones() as usize
}

/// Word with bits `0..n` set.
#[inline]
pub fn low_mask(n: usize) -> Word {
    if n >= WORD_BITS {
        Word::MAX
    } else {
        (1 << n) - 1
    }
}

/// Mask of the positions strictly between `i` and `j`, in either order.
pub fn mask_between(i: usize, j: usize) -> Word {
    let (lo, hi) = if i < j { (i, j) } else { (j, i) };

    if hi <= lo + 1 {
        return 0;
    }

    low_mask(hi) & !low_mask(lo + 1)
}

#[inline]
pub fn parity_sign(n: usize) -> i32 {
    if n & 1 == 1 {
        -1
    } else {
        1
    }
}

/// (-1)^(set bits strictly between i and j).
#[inline]
pub fn sign_between(w: Word, i: usize, j: usize) -> i32 {
    parity_sign(count(w & mask_between(i, j)))
}

/// (-1)^(set bits strictly below i).
#[inline]
pub fn sign_below(w: Word, i: usize) -> i32 {
    parity_sign(count(w & low_mask(i)))
}

/// Next larger word with the same population (Gosper's hack).
///
/// `w` must be non-zero and must not be the largest word of its population
/// within the word width.
#[inline]
pub fn next_same_population(w: Word) -> Word {
    let c = w & w.wrapping_neg();
    let r = w.wrapping_add(c);

    (((r ^ w) >> 2) / c) | r
}

/// Binomial coefficient, `None` on overflow.
pub fn binomial(n: usize, k: usize) -> Option<usize> {
    if k > n {
        return Some(0);
    }

    let k = k.min(n - k);
    let mut acc: u128 = 1;

    for i in 0..k {
        // exact at every step: acc * (n - i) is divisible by (i + 1)
        acc = acc * (n - i) as u128 / (i + 1) as u128;
        if acc > usize::MAX as u128 {
            return None;
        }
    }

    Some(acc as usize)
}

/// Maps every occupied position `k` of `w` to `perm[k]`.
///
/// Returns the permuted word and the sign of reordering the permuted
/// creation operators back to ascending order.
pub fn permute_word(w: Word, perm: &[usize]) -> (Word, i32) {
    let mut targets = Vec::with_capacity(count(w));

    let mut bits = w;
    while bits != 0 {
        let k = bits.trailing_zeros() as usize;
        targets.push(perm[k]);
        bits &= bits - 1;
    }

    let mut inversions = 0;
    for a in 0..targets.len() {
        for b in (a + 1)..targets.len() {
            if targets[a] > targets[b] {
                inversions += 1;
            }
        }
    }

    let permuted = targets.iter().fold(0, |acc, &t| acc | bitmask(t));

    (permuted, parity_sign(inversions))
}
