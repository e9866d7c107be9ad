mod parameters;
pub use parameters::*;

mod hubbard;
pub use hubbard::*;

/// Every `(nup, ndown)` pair for `n_sites * orbitals` modes, vacuum included.
pub fn all_sectors(n_sites: usize, orbitals: usize) -> Vec<(usize, usize)> {
    let n_modes = n_sites * orbitals;
    let mut sectors = Vec::with_capacity((n_modes + 1) * (n_modes + 1));

    for nup in 0..=n_modes {
        for ndown in 0..=n_modes {
            sectors.push((nup, ndown));
        }
    }

    sectors
}
