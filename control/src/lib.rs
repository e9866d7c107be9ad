use edconsts::*;
use ederror::{EdError, Result};

use std::{
    fs::File,
    io::{BufRead, BufReader},
    str::FromStr,
};

#[derive(Debug, Default, Clone)]
pub struct Control {
    geometry: String, // chain, ring, ladder
    n_sites: usize,
    orbitals: usize,
    hopping: f64,
    hopping_rung: f64,

    hubbard_u: Vec<f64>,
    potential_v: Vec<f64>,
    potential_t: Vec<f64>,
    time_factor: f64,

    nup: usize,
    ndown: usize,
    all_sectors: bool,

    symmetry: String, // default, translation, reflection
    print_matrix: bool,
    max_dense_dim: usize,
    n_eigs: usize,
    parallel_sectors: bool,
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse::<T>()
        .map_err(|_| EdError::Configuration(format!("cannot parse '{}' for key '{}'", value, key)))
}

fn parse_list(key: &str, value: &str) -> Result<Vec<f64>> {
    value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|x| !x.is_empty())
        .map(|x| parse_value::<f64>(key, x))
        .collect()
}

// one value for every site, or a single value broadcast to all sites
fn broadcast(key: &str, v: &[f64], n_sites: usize, allow_empty: bool) -> Result<Vec<f64>> {
    match v.len() {
        0 if allow_empty => Ok(Vec::new()),
        1 => Ok(vec![v[0]; n_sites]),
        n if n == n_sites => Ok(v.to_vec()),
        n => Err(EdError::Configuration(format!(
            "{} has {} values, expected 1 or {}",
            key, n, n_sites
        ))),
    }
}

impl Control {
    pub fn new() -> Control {
        Control::default()
    }

    pub fn get_geometry(&self) -> &str {
        &self.geometry
    }

    pub fn get_n_sites(&self) -> usize {
        self.n_sites
    }

    pub fn get_orbitals(&self) -> usize {
        self.orbitals
    }

    pub fn get_hopping(&self) -> f64 {
        self.hopping
    }

    pub fn get_hopping_rung(&self) -> f64 {
        self.hopping_rung
    }

    pub fn get_hubbard_u(&self) -> &[f64] {
        &self.hubbard_u
    }

    pub fn get_potential_v(&self) -> &[f64] {
        &self.potential_v
    }

    pub fn get_potential_t(&self) -> &[f64] {
        &self.potential_t
    }

    pub fn get_time_factor(&self) -> f64 {
        self.time_factor
    }

    pub fn get_nup(&self) -> usize {
        self.nup
    }

    pub fn get_ndown(&self) -> usize {
        self.ndown
    }

    pub fn is_all_sectors(&self) -> bool {
        self.all_sectors
    }

    pub fn get_symmetry(&self) -> &str {
        &self.symmetry
    }

    pub fn is_print_matrix(&self) -> bool {
        self.print_matrix
    }

    pub fn get_max_dense_dim(&self) -> usize {
        self.max_dense_dim
    }

    pub fn get_n_eigs(&self) -> usize {
        self.n_eigs
    }

    pub fn is_parallel_sectors(&self) -> bool {
        self.parallel_sectors
    }

    fn set_defaults(&mut self) {
        self.geometry = "chain".to_string();
        self.n_sites = 4;
        self.orbitals = 1;
        self.hopping = 1.0;
        self.hopping_rung = 1.0;

        self.hubbard_u = vec![0.0];
        self.potential_v = vec![0.0];
        self.potential_t = Vec::new();
        self.time_factor = 0.0;

        self.nup = 1;
        self.ndown = 1;
        self.all_sectors = false;

        self.symmetry = "default".to_string();
        self.print_matrix = false;
        self.max_dense_dim = DENSE_DIAG_MAX_DIM;
        self.n_eigs = 1;
        self.parallel_sectors = false;
    }

    pub fn read_file(&mut self, inpfile: &str) -> Result<()> {
        let lines = self.read_file_data_to_vec(inpfile)?;

        self.read_lines(&lines)
    }

    pub fn read_str(&mut self, text: &str) -> Result<()> {
        let lines: Vec<String> = text.lines().map(|x| x.to_string()).collect();

        self.read_lines(&lines)
    }

    fn read_lines(&mut self, lines: &[String]) -> Result<()> {
        self.set_defaults();

        for (iline, line) in lines.iter().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| {
                EdError::Configuration(format!("line {}: expected 'key = value', got '{}'", iline + 1, line))
            })?;

            let (key, value) = (key.trim(), value.trim());

            match key {
                "geometry" => {
                    self.geometry = value.to_string();
                }

                "n_sites" => {
                    self.n_sites = parse_value(key, value)?;
                }

                "orbitals" => {
                    self.orbitals = parse_value(key, value)?;
                }

                "hopping" => {
                    self.hopping = parse_value(key, value)?;
                }

                "hopping_rung" => {
                    self.hopping_rung = parse_value(key, value)?;
                }

                "hubbard_u" => {
                    self.hubbard_u = parse_list(key, value)?;
                }

                "potential_v" => {
                    self.potential_v = parse_list(key, value)?;
                }

                "potential_t" => {
                    self.potential_t = parse_list(key, value)?;
                }

                "time_factor" => {
                    self.time_factor = parse_value(key, value)?;
                }

                "nup" => {
                    self.nup = parse_value(key, value)?;
                }

                "ndown" => {
                    self.ndown = parse_value(key, value)?;
                }

                "all_sectors" => {
                    self.all_sectors = parse_value(key, value)?;
                }

                "symmetry" => {
                    self.symmetry = value.to_string();
                }

                "print_matrix" => {
                    self.print_matrix = parse_value(key, value)?;
                }

                "max_dense_dim" => {
                    self.max_dense_dim = parse_value(key, value)?;
                }

                "n_eigs" => {
                    self.n_eigs = parse_value(key, value)?;
                }

                "parallel_sectors" => {
                    self.parallel_sectors = parse_value(key, value)?;
                }

                other => {
                    return Err(EdError::Configuration(format!(
                        "line {}: unknown parameter '{}'",
                        iline + 1,
                        other
                    )));
                }
            }
        }

        self.validate()
    }

    fn validate(&mut self) -> Result<()> {
        if self.n_sites == 0 || self.orbitals == 0 {
            return Err(EdError::Configuration("n_sites and orbitals must be positive".to_string()));
        }

        if !matches!(self.geometry.as_str(), "chain" | "ring" | "ladder") {
            return Err(EdError::Configuration(format!("unknown geometry '{}'", self.geometry)));
        }

        if !matches!(self.symmetry.as_str(), "default" | "translation" | "reflection") {
            return Err(EdError::Configuration(format!("unknown symmetry '{}'", self.symmetry)));
        }

        self.hubbard_u = broadcast("hubbard_u", &self.hubbard_u, self.n_sites, false)?;
        self.potential_v = broadcast("potential_v", &self.potential_v, self.n_sites, false)?;
        self.potential_t = broadcast("potential_t", &self.potential_t, self.n_sites, true)?;

        let n_modes = self.n_sites * self.orbitals;

        if !self.all_sectors && (self.nup > n_modes || self.ndown > n_modes) {
            return Err(EdError::Configuration(format!(
                "nup = {} and ndown = {} cannot fit {} modes",
                self.nup, self.ndown, n_modes
            )));
        }

        if self.n_eigs == 0 {
            return Err(EdError::Configuration("n_eigs must be at least 1".to_string()));
        }

        Ok(())
    }

    pub fn read_file_data_to_vec(&self, inpfile: &str) -> Result<Vec<String>> {
        let file = File::open(inpfile).map_err(|e| EdError::Io {
            path: inpfile.to_string(),
            message: e.to_string(),
        })?;

        BufReader::new(file)
            .lines()
            .collect::<std::io::Result<Vec<String>>>()
            .map_err(|e| EdError::Io {
                path: inpfile.to_string(),
                message: e.to_string(),
            })
    }

    pub fn display(&self) {
        const OUT_WIDTH1: usize = 28;
        const OUT_WIDTH2: usize = 18;

        println!("   {:-^80}", " control parameters ");
        println!();

        println!("   {:<width1$} = {:>width2$}", "geometry", self.geometry, width1 = OUT_WIDTH1, width2 = OUT_WIDTH2);
        println!("   {:<width1$} = {:>width2$}", "n_sites", self.n_sites, width1 = OUT_WIDTH1, width2 = OUT_WIDTH2);
        println!("   {:<width1$} = {:>width2$}", "orbitals", self.orbitals, width1 = OUT_WIDTH1, width2 = OUT_WIDTH2);
        println!(
            "   {:<width1$} = {:>width2$.6}",
            "hopping",
            self.hopping,
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        if self.geometry == "ladder" {
            println!(
                "   {:<width1$} = {:>width2$.6}",
                "hopping_rung",
                self.hopping_rung,
                width1 = OUT_WIDTH1,
                width2 = OUT_WIDTH2
            );
        }

        println!("   {:<width1$} = {:?}", "hubbard_u", self.hubbard_u, width1 = OUT_WIDTH1);
        println!("   {:<width1$} = {:?}", "potential_v", self.potential_v, width1 = OUT_WIDTH1);

        if !self.potential_t.is_empty() {
            println!("   {:<width1$} = {:?}", "potential_t", self.potential_t, width1 = OUT_WIDTH1);
            println!(
                "   {:<width1$} = {:>width2$.6}",
                "time_factor",
                self.time_factor,
                width1 = OUT_WIDTH1,
                width2 = OUT_WIDTH2
            );
        }

        if self.all_sectors {
            println!("   {:<width1$} = {:>width2$}", "all_sectors", true, width1 = OUT_WIDTH1, width2 = OUT_WIDTH2);
        } else {
            println!("   {:<width1$} = {:>width2$}", "nup", self.nup, width1 = OUT_WIDTH1, width2 = OUT_WIDTH2);
            println!("   {:<width1$} = {:>width2$}", "ndown", self.ndown, width1 = OUT_WIDTH1, width2 = OUT_WIDTH2);
        }

        println!("   {:<width1$} = {:>width2$}", "symmetry", self.symmetry, width1 = OUT_WIDTH1, width2 = OUT_WIDTH2);
        println!(
            "   {:<width1$} = {:>width2$}",
            "print_matrix",
            self.print_matrix,
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );
        println!(
            "   {:<width1$} = {:>width2$}",
            "max_dense_dim",
            self.max_dense_dim,
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );
        println!("   {:<width1$} = {:>width2$}", "n_eigs", self.n_eigs, width1 = OUT_WIDTH1, width2 = OUT_WIDTH2);
        println!(
            "   {:<width1$} = {:>width2$}",
            "parallel_sectors",
            self.parallel_sectors,
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_broadcast() {
        let mut control = Control::new();
        control
            .read_str("# ring\n\ngeometry = ring\nn_sites = 3\nhubbard_u = 4.0\npotential_v = 0.1 0.2 0.3\n")
            .unwrap();

        assert_eq!(control.get_geometry(), "ring");
        assert_eq!(control.get_hubbard_u(), &[4.0, 4.0, 4.0]);
        assert_eq!(control.get_potential_v(), &[0.1, 0.2, 0.3]);
        assert!(control.get_potential_t().is_empty());
        assert_eq!(control.get_symmetry(), "default");
        assert_eq!(control.get_max_dense_dim(), DENSE_DIAG_MAX_DIM);
        assert_eq!((control.get_nup(), control.get_ndown()), (1, 1));
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut control = Control::new();

        assert!(matches!(control.read_str("ecut_wfc = 400"), Err(EdError::Configuration(_))));
        assert!(matches!(control.read_str("n_sites = four"), Err(EdError::Configuration(_))));
        assert!(matches!(control.read_str("n_sites 4"), Err(EdError::Configuration(_))));
        assert!(matches!(
            control.read_str("n_sites = 3\nhubbard_u = 1 2"),
            Err(EdError::Configuration(_))
        ));
        assert!(matches!(control.read_str("geometry = kagome"), Err(EdError::Configuration(_))));
        assert!(matches!(control.read_str("n_sites = 2\nnup = 3"), Err(EdError::Configuration(_))));
    }

    #[test]
    fn test_read_file() {
        let path = std::env::temp_dir().join(format!("ed-control-{}.ctrl", std::process::id()));
        std::fs::write(&path, "geometry = ladder\nn_sites = 6\nhopping_rung = 0.5\nall_sectors = true\n").unwrap();

        let mut control = Control::new();
        control.read_file(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(control.get_geometry(), "ladder");
        assert_eq!(control.get_hopping_rung(), 0.5);
        assert!(control.is_all_sectors());

        assert!(matches!(
            control.read_file("/nonexistent/in.ctrl"),
            Err(EdError::Io { .. })
        ));
    }
}
