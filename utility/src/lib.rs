use itertools::multizip;
use rand::{thread_rng, Rng};
use std::f64::consts;
use types::*;

pub fn add_and_zscale(inp: &[c64], out: &mut [c64], factor: c64) {
    assert_eq!(inp.len(), out.len());

    for (x, y) in multizip((inp.iter(), out.iter_mut())) {
        *y += *x * factor;
    }
}

/// <u|v>, conjugating the left vector.
pub fn zdot_product(u: &[c64], v: &[c64]) -> c64 {
    assert_eq!(u.len(), v.len());

    multizip((u.iter(), v.iter()))
        .map(|(x, y)| x.conj() * (*y))
        .sum()
}

pub fn make_normalized_rand_vector(v: &mut [c64]) {
    let mut rng = thread_rng();

    for y in v.iter_mut() {
        let t = rng.gen_range(-0.5f64, 0.5f64);
        let theta = t * 2.0 * consts::PI;

        let re = t * theta.cos();
        let im = t * theta.sin();

        *y = c64 { re, im };
    }

    normalize_vector_c64(v);
}

pub fn vec_norm(v: &[c64]) -> f64 {
    v.iter().map(|x| x.norm_sqr()).sum::<f64>().sqrt()
}

pub fn normalize_vector_c64(v: &mut [c64]) {
    let s = vec_norm(v);

    if s > 0.0 {
        v.iter_mut().for_each(|x| *x /= s);
    }
}

/// Largest absolute componentwise difference.
pub fn max_abs_diff(u: &[c64], v: &[c64]) -> f64 {
    assert_eq!(u.len(), v.len());

    multizip((u.iter(), v.iter()))
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}

pub fn argsort<T: PartialOrd>(v: &[T]) -> Vec<usize> {
    let mut idx = (0..v.len()).collect::<Vec<_>>();

    idx.sort_by(|&i, &j| v[i].partial_cmp(&v[j]).unwrap_or(std::cmp::Ordering::Equal));

    idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zdot_product_conjugates_left() {
        let u = vec![c64::new(0.0, 1.0), c64::new(1.0, 0.0)];
        let v = vec![c64::new(0.0, 1.0), c64::new(2.0, 0.0)];

        let d = zdot_product(&u, &v);
        assert_relative_eq!(d.re, 3.0);
        assert_relative_eq!(d.im, 0.0);
    }

    #[test]
    fn test_make_normalized_rand_vector() {
        let mut v = vec![c64::new(0.0, 0.0); 17];
        make_normalized_rand_vector(&mut v);

        assert_relative_eq!(vec_norm(&v), 1.0, epsilon = 1.0E-12);
    }

    #[test]
    fn test_argsort() {
        let v = vec![3.0, -1.0, 2.0];
        assert_eq!(argsort(&v), vec![1, 2, 0]);
    }

    #[test]
    fn test_add_and_zscale() {
        let inp = vec![c64::new(1.0, 0.0), c64::new(0.0, 1.0)];
        let mut out = vec![c64::new(1.0, 1.0); 2];

        add_and_zscale(&inp, &mut out, c64::new(0.0, 2.0));

        assert_eq!(out, vec![c64::new(1.0, 3.0), c64::new(-1.0, 1.0)]);
        assert_relative_eq!(max_abs_diff(&out, &out), 0.0);
    }
}
