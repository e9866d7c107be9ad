use ederror::{EdError, Result};

/// On-site parameters of the Hubbard model, one value per site.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelParameters {
    pub hubbard_u: Vec<f64>,
    pub potential_v: Vec<f64>,

    // empty unless the potential is time dependent
    pub potential_t: Vec<f64>,
    pub time_factor: f64,
}

impl ModelParameters {
    pub fn uniform(n_sites: usize, hubbard_u: f64, potential_v: f64) -> ModelParameters {
        ModelParameters {
            hubbard_u: vec![hubbard_u; n_sites],
            potential_v: vec![potential_v; n_sites],
            potential_t: Vec::new(),
            time_factor: 0.0,
        }
    }

    pub fn validate(&self, n_sites: usize) -> Result<()> {
        if self.hubbard_u.len() != n_sites {
            return Err(EdError::Configuration(format!(
                "hubbard_u has {} values for {} sites",
                self.hubbard_u.len(),
                n_sites
            )));
        }

        if self.potential_v.len() != n_sites {
            return Err(EdError::Configuration(format!(
                "potential_v has {} values for {} sites",
                self.potential_v.len(),
                n_sites
            )));
        }

        if !self.potential_t.is_empty() && self.potential_t.len() != n_sites {
            return Err(EdError::Configuration(format!(
                "potential_t has {} values for {} sites",
                self.potential_t.len(),
                n_sites
            )));
        }

        if self
            .hubbard_u
            .iter()
            .chain(self.potential_v.iter())
            .chain(self.potential_t.iter())
            .any(|x| !x.is_finite())
            || !self.time_factor.is_finite()
        {
            return Err(EdError::Configuration("model parameters must be finite".to_string()));
        }

        Ok(())
    }

    /// Static plus time-dependent potential at `site`.
    pub fn potential(&self, site: usize) -> f64 {
        let mut v = self.potential_v[site];

        if !self.potential_t.is_empty() {
            v += self.potential_t[site] * self.time_factor;
        }

        v
    }

    pub fn display(&self) {
        const OUT_WIDTH1: usize = 20;

        println!("   {:<width1$} = {:?}", "hubbard_u", self.hubbard_u, width1 = OUT_WIDTH1);
        println!("   {:<width1$} = {:?}", "potential_v", self.potential_v, width1 = OUT_WIDTH1);

        if !self.potential_t.is_empty() {
            println!("   {:<width1$} = {:?}", "potential_t", self.potential_t, width1 = OUT_WIDTH1);
            println!("   {:<width1$} = {:.6}", "time_factor", self.time_factor, width1 = OUT_WIDTH1);
        }
    }
}
