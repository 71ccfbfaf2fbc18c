use anyhow::{ensure, Result};
use mc::MonteCarlo;
use num_traits::Zero;
use potentials::InteractionModel;
use quickcheck::{Arbitrary, Gen};
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use simbox::Boundary;
use stats::RunStats;

pub mod cli;
pub mod consts;
pub mod error;
pub mod interaction;
pub mod io;
pub mod mc;
pub mod particle;
pub mod position;
pub mod potentials;
pub mod properties;
pub mod simbox;
pub mod stats;

pub type Prng = rand_xoshiro::Xoshiro256PlusPlus;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct InputParams {
    pub seed: u64,
    pub num_particles: usize,
    pub num_sweeps: usize,
    pub sample_every: usize, // sweeps between property samples

    pub box_length: f64,
    pub boundary: Boundary,

    pub sigma: f64,
    pub reduced_density: f64,
    pub reduced_temperature: f64,

    pub rest_length: f64,
    pub spring_constant: f64,

    // 0 = hard disk only, 1 = LJ, 2 = WCA, 3 = WCA + spring
    pub interaction_model: u8,
    pub ref_affinity: f64,
    pub affinity_mult: f64, // applied when type labels differ

    pub hard_disk: bool, // overlap rejection on top of the continuous model
    pub particle_radius: f64,
    pub frac_antiparallel: f64,
    pub max_displacement: f64,
}

impl Default for InputParams {
    fn default() -> Self {
        let num_particles = 100;
        let box_length = 20.0;
        let sigma = 1.0;
        let reduced_density = num_particles as f64 * sigma * sigma / (box_length * box_length);

        Self {
            seed: 1337,
            num_particles,
            num_sweeps: 1000,
            sample_every: 10,

            box_length,
            boundary: Boundary::Periodic,

            sigma,
            reduced_density,
            reduced_temperature: 1.0,

            rest_length: 1.5,
            spring_constant: 2.0,

            interaction_model: 1,
            ref_affinity: 1.0,
            affinity_mult: 0.5,

            hard_disk: false,
            particle_radius: 0.5,
            frac_antiparallel: 0.5,
            max_displacement: 0.2,
        }
    }
}

impl InputParams {
    pub fn interaction_model(&self) -> Result<InteractionModel> {
        Ok(InteractionModel::try_from(self.interaction_model)?)
    }

    // well-formedness predicate for InputParams
    pub fn check(&self) -> Result<()> {
        let model = self.interaction_model()?;

        ensure!(
            self.num_particles <= consts::MAX_PARTICLES,
            "num_particles must be at most {}",
            consts::MAX_PARTICLES
        );
        ensure!(self.sample_every >= 1, "sample_every must be at least 1");
        ensure!(
            self.box_length.is_normal() && self.box_length > 0.0,
            "box_length must be positive"
        );
        ensure!(self.sigma.is_normal() && self.sigma > 0.0, "sigma must be positive");
        ensure!(
            self.reduced_temperature.is_normal() && self.reduced_temperature > 0.0,
            "reduced_temperature must be positive"
        );
        ensure!(
            self.reduced_density >= 0.0 && (self.reduced_density.is_normal() || self.reduced_density.is_zero()),
            "reduced_density must be non-negative"
        );
        ensure!(
            self.frac_antiparallel >= 0.0 && self.frac_antiparallel <= 1.0,
            "frac_antiparallel must be in [0, 1]"
        );
        ensure!(
            self.particle_radius >= 0.0 && self.particle_radius.is_finite(),
            "particle_radius must be non-negative"
        );
        ensure!(
            self.max_displacement > 0.0 && self.max_displacement < 0.5 * self.box_length,
            "max_displacement must be in (0, box_length / 2)"
        );

        // one image per neighbouring cell is only enough if the cutoff fits in half a box
        if self.boundary == Boundary::Periodic
            && matches!(model, InteractionModel::LennardJones | InteractionModel::Wca)
        {
            ensure!(
                self.box_length >= 2.0 * consts::LJ_TRUNCATION * self.sigma,
                "box_length must be at least {} sigma for a periodic box",
                2.0 * consts::LJ_TRUNCATION
            );
        }
        if model == InteractionModel::HardDisk {
            ensure!(
                self.particle_radius > 0.0,
                "the hard-disk model needs a positive particle_radius"
            );
        }
        Ok(())
    }
}

// for arbitrary trait
pub fn usize_in_range(g: &mut Gen, min: usize, max: usize) -> usize {
    if min == max {
        return max;
    }
    let x = usize::arbitrary(g);
    let r = x % (max - min) + min;
    assert!(r >= min && r < max);
    r
}

pub fn f64_in_range(g: &mut Gen, min: f64, max: f64) -> f64 {
    let mut r = f64::INFINITY;
    while !(r.is_normal() || r.is_zero()) || r < min || r >= max {
        let x = f64::arbitrary(g).abs();
        r = x % (max - min) + min;
    }
    r
}

// for testing
impl Arbitrary for InputParams {
    fn arbitrary(g: &mut Gen) -> Self {
        let num_particles = usize_in_range(g, 2, 64);
        let sigma = f64_in_range(g, 0.5, 1.5);
        let box_length = f64_in_range(g, 2.0 * consts::LJ_TRUNCATION * sigma, 40.0 * sigma);
        let reduced_density = num_particles as f64 * sigma * sigma / (box_length * box_length);
        let boundary = if bool::arbitrary(g) {
            Boundary::Periodic
        } else {
            Boundary::Rigid
        };

        Self {
            seed: u64::arbitrary(g),
            num_particles,
            num_sweeps: usize_in_range(g, 1, 5),
            sample_every: usize_in_range(g, 1, 3),

            box_length,
            boundary,

            sigma,
            reduced_density,
            reduced_temperature: f64_in_range(g, 0.2, 3.0),

            rest_length: f64_in_range(g, 1.0, 2.0),
            spring_constant: f64_in_range(g, 0.5, 10.0),

            interaction_model: usize_in_range(g, 0, 4) as u8,
            ref_affinity: f64_in_range(g, 0.1, 2.0),
            affinity_mult: f64_in_range(g, 0.0, 2.0),

            hard_disk: bool::arbitrary(g),
            particle_radius: f64_in_range(g, 0.1, 0.5) * sigma,
            frac_antiparallel: f64_in_range(g, 0.0, 1.0),
            max_displacement: f64_in_range(g, 0.01, 0.5),
        }
    }
}

pub fn mc_from_inputparams(ip: &InputParams, rng: &mut Prng) -> Result<MonteCarlo> {
    MonteCarlo::with_lattice(ip, rng)
}

pub fn seeded_rng(ip: &InputParams) -> Prng {
    Prng::seed_from_u64(ip.seed)
}

pub trait McCallback {
    type CbResult;
    fn run(&mut self, mc: &MonteCarlo, sweep: usize, run_stats: &RunStats) -> Result<()>;
    fn state(self) -> Self::CbResult;
}

/// Runs `ip.num_sweeps` sweeps, sampling properties every `ip.sample_every` sweeps
pub fn run_mc<C: McCallback>(
    mc: &mut MonteCarlo,
    ip: &InputParams,
    mut callback: Option<C>,
    rng: &mut Prng,
) -> Result<(RunStats, Option<C::CbResult>)> {
    let mut total_stats = RunStats::new();
    for sweep in 0..ip.num_sweeps {
        let run_stats = mc.sweep(rng);
        log::info!(
            "Sweep {}: accepted {}/{}",
            sweep,
            run_stats.num_accepts(),
            run_stats.num_attempts()
        );
        total_stats = total_stats + run_stats.clone();
        if (sweep + 1) % ip.sample_every == 0 {
            mc.sample_properties();
            if let Some(ref mut cb) = callback {
                cb.run(mc, sweep, &run_stats)?;
            }
        }
    }
    Ok((total_stats, callback.map(|cb| cb.state())))
}
