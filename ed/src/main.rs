use control::Control;
use ederror::{EdError, Result};
use env_logger::Env;
use geometry::Geometry;
use log::{error, info, warn};
use model::{HubbardModel, ModelParameters};
use rayon::prelude::*;
use symmetry::SectorEigenpairs;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // start the timer-main

    let stopwatch_main = std::time::Instant::now();

    if let Err(e) = run("in.ctrl") {
        error!("{}", e);
        std::process::exit(1);
    }

    println!();
    println!(
        "   {:<width1$} = {:>width2$.3} s",
        "total_time",
        stopwatch_main.elapsed().as_secs_f64(),
        width1 = 28,
        width2 = 18
    );
}

fn run(inpfile: &str) -> Result<()> {
    // read in control parameters

    let mut control = Control::new();
    control.read_file(inpfile)?;

    control.display();

    // lattice and on-site parameters

    let geometry = geometry::new(
        control.get_geometry(),
        control.get_n_sites(),
        control.get_orbitals(),
        control.get_hopping(),
        control.get_hopping_rung(),
    )?;

    geometry.display();

    let params = ModelParameters {
        hubbard_u: control.get_hubbard_u().to_vec(),
        potential_v: control.get_potential_v().to_vec(),
        potential_t: control.get_potential_t().to_vec(),
        time_factor: control.get_time_factor(),
    };

    params.validate(control.get_n_sites())?;
    params.display();

    // particle-number sectors

    let sectors = if control.is_all_sectors() {
        model::all_sectors(control.get_n_sites(), control.get_orbitals())
    } else {
        vec![(control.get_nup(), control.get_ndown())]
    };

    info!("{} sector(s) to diagonalize", sectors.len());

    let results: Vec<Result<Vec<SectorEigenpairs>>> = if control.is_parallel_sectors() {
        sectors
            .par_iter()
            .map(|&qn| solve_sector(&control, geometry.as_ref(), &params, qn))
            .collect()
    } else {
        sectors
            .iter()
            .map(|&qn| solve_sector(&control, geometry.as_ref(), &params, qn))
            .collect()
    };

    let mut eigenpairs = Vec::new();
    for r in results.into_iter() {
        eigenpairs.extend(r?);
    }

    report(&eigenpairs);

    Ok(())
}

fn solve_sector(
    control: &Control,
    geometry: &dyn Geometry,
    params: &ModelParameters,
    (nup, ndown): (usize, usize),
) -> Result<Vec<SectorEigenpairs>> {
    let stopwatch = std::time::Instant::now();

    match diagonalize_sector(control, geometry, params, (nup, ndown)) {
        Ok(pairs) => {
            info!(
                "sector nup = {}, ndown = {} done in {:.3} s",
                nup,
                ndown,
                stopwatch.elapsed().as_secs_f64()
            );
            Ok(pairs)
        }

        // a sector beyond a size bound is skipped when scanning all sectors
        Err(e @ EdError::SizeLimit { .. }) if control.is_all_sectors() => {
            warn!("skipping sector nup = {}, ndown = {}: {}", nup, ndown, e);
            Ok(Vec::new())
        }

        Err(e) => Err(e),
    }
}

fn diagonalize_sector(
    control: &Control,
    geometry: &dyn Geometry,
    params: &ModelParameters,
    (nup, ndown): (usize, usize),
) -> Result<Vec<SectorEigenpairs>> {
    let model = HubbardModel::new(nup, ndown, params, geometry)?;

    info!("sector nup = {}, ndown = {}: basis size = {}", nup, ndown, model.size());

    let mut adapter = symmetry::new(control.get_symmetry(), &model, geometry, control.is_print_matrix())?;

    if !control.is_parallel_sectors() {
        adapter.display();
    }

    symmetry::diagonalize_blocks(
        adapter.as_mut(),
        (nup, ndown),
        control.get_max_dense_dim(),
        control.get_n_eigs(),
    )
}

fn report(eigenpairs: &[SectorEigenpairs]) {
    println!();
    println!("   {:-^80}", " sector eigenvalues ");
    println!();

    for pair in eigenpairs.iter() {
        pair.display();
    }

    let ground = eigenpairs
        .iter()
        .filter_map(|p| p.ground_state_energy().map(|e| (e, p.quantum_numbers, p.block)))
        .min_by(|a, b| a.0.total_cmp(&b.0));

    if let Some((e, (nup, ndown), block)) = ground {
        println!();
        println!(
            "   {:<width1$} = {:>width2$.12}",
            "ground_state_energy",
            e,
            width1 = 28,
            width2 = 18
        );
        println!(
            "   {:<width1$} = {:>width2$}",
            "ground_state_sector",
            format!("({}, {}) block {}", nup, ndown, block),
            width1 = 28,
            width2 = 18
        );
    }
}
