use std::fs::{self, create_dir_all};

use anyhow::ensure;
use clap::Parser;
use pairmc::cli::McConfig;
use pairmc::io::{
    clear_out_files, read_snapshot, write_geometry_png, write_properties, write_rdf_png,
    write_snapshot, XYZWriter,
};
use pairmc::mc::MonteCarlo;
use pairmc::stats::RunStats;
use pairmc::{mc_from_inputparams, run_mc, seeded_rng, InputParams, McCallback};

struct StdCallback {
    writer: XYZWriter,
    frames: usize,
}

impl McCallback for StdCallback {
    type CbResult = usize;

    // runs after every sample
    fn run(&mut self, mc: &MonteCarlo, sweep: usize, run_stats: &RunStats) -> anyhow::Result<()> {
        self.writer.write_xyz_frame(mc)?;
        self.frames += 1;

        let props = mc.properties();
        println!(
            "-----------------------------------------\nSweep {:?}",
            sweep + 1
        );
        println!("Energy: {:.4}", props.energies().last().copied().unwrap_or(0.0));
        println!("Acceptance ratio: {:.4}", run_stats.acceptance_ratio());
        if run_stats.num_overlaps() > 0 {
            println!("Overlaps: {}", run_stats.num_overlaps());
        }
        Ok(())
    }

    fn state(self) -> usize {
        self.frames
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Get commandline arguments
    let config = McConfig::parse();

    let ip: InputParams = if !config.input().is_empty() {
        let contents = fs::read_to_string(config.input())?;
        toml::from_str(&contents)?
    } else {
        InputParams::default()
    };
    ip.check()?;
    println!("Using seed = {:?}", ip.seed);

    // Generate the simulator
    let (mut mc, mut rng) = match config.resume() {
        Some(path) => {
            let snapshot = read_snapshot(path)?;
            ensure!(
                snapshot.particles.num_particles() == ip.num_particles,
                "snapshot holds {} particles, config expects {}",
                snapshot.particles.num_particles(),
                ip.num_particles
            );
            println!("Resuming from {}", path);
            (MonteCarlo::new(&ip, snapshot.particles)?, snapshot.rng)
        }
        None => {
            let mut rng = seeded_rng(&ip);
            (mc_from_inputparams(&ip, &mut rng)?, rng)
        }
    };

    // Init I/O
    println!("Writing output to {}", config.output_dir());
    create_dir_all(config.output_dir())?;
    clear_out_files(&config)?;

    // dump full config toml to output directory
    fs::write(config.toml(), toml::to_string(&ip)?)?;

    let mut writer = XYZWriter::new(&config.trajectory())?;

    // Check that initial conditions are reasonable
    ensure!(mc.well_formed(), "initial configuration has particles outside the box");
    println!("Initial configuration ok");

    // Run the simulation
    writer.write_xyz_frame(&mc)?;
    let callback = StdCallback { writer, frames: 1 };
    let (stats, frames) = run_mc(&mut mc, &ip, Some(callback), &mut rng)?;

    log::info!(
        "Finished: {} attempts, {} accepts, {} overlaps, {} errors, {} frames",
        stats.num_attempts(),
        stats.num_accepts(),
        stats.num_overlaps(),
        stats.num_errors(),
        frames.unwrap_or(0)
    );
    let props = mc.properties();
    println!("Average energy: {:.4}", props.average_energy());
    println!("Reduced pressure: {:.4}", props.reduced_pressure());

    // Write results to disc
    write_properties(props, &config)?;
    write_snapshot(&mc, &rng, &config.snapshot())?;
    write_geometry_png(&mc, &config.geometry())?;
    write_rdf_png(props, &config.rdf_plot())?;

    Ok(())
}
