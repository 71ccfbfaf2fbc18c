use anyhow::{anyhow, Result};
use rand::Rng;

use crate::interaction::Interaction;
use crate::particle::{IsParticle, Particle, Particles};
use crate::position::{random_displacement, Position};
use crate::properties::Properties;
use crate::simbox::{Boundary, SimBox};
use crate::stats::RunStats;
use crate::{InputParams, Prng};

/// Metropolis criterion. Non-finite deltas (coincident particles) are always rejected.
pub fn metropolis_accepts(delta_energy: f64, reduced_temperature: f64, rng: &mut Prng) -> bool {
    if !delta_energy.is_finite() {
        return false;
    }
    if delta_energy <= 0.0 {
        return true;
    }
    rng.random::<f64>() < (-delta_energy / reduced_temperature).exp()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject,
    Overlap,
}

#[derive(Debug, Clone)]
pub struct MoveParams {
    max_displacement: f64,
    reduced_temperature: f64,
    hard_disk: bool,
}

impl MoveParams {
    pub fn new(max_displacement: f64, reduced_temperature: f64, hard_disk: bool) -> Self {
        Self {
            max_displacement,
            reduced_temperature,
            hard_disk,
        }
    }
}

pub struct MonteCarlo {
    particles: Particles,
    interaction: Interaction,
    properties: Properties,
    params: MoveParams,
}

impl MonteCarlo {
    pub fn new(ip: &InputParams, particles: Particles) -> Result<Self> {
        Self::assemble(ip, Interaction::new(ip)?, particles)
    }

    /// Starts from a square lattice filling the interaction's box
    pub fn with_lattice(ip: &InputParams, rng: &mut Prng) -> Result<Self> {
        let interaction = Interaction::new(ip)?;
        let particles = Particles::square_lattice(
            interaction.simbox(),
            ip.num_particles,
            ip.particle_radius,
            ip.frac_antiparallel,
            rng,
        );
        Self::assemble(ip, interaction, particles)
    }

    // the interaction owns the only box; the driver and the statistics read it from there
    fn assemble(ip: &InputParams, interaction: Interaction, particles: Particles) -> Result<Self> {
        let properties = Properties::new(ip, interaction.simbox())?;
        let params = MoveParams::new(ip.max_displacement, ip.reduced_temperature, ip.hard_disk);
        Ok(Self {
            particles,
            interaction,
            properties,
            params,
        })
    }

    pub fn particles(&self) -> &Particles {
        &self.particles
    }

    pub fn particle(&self, idx: usize) -> &Particle {
        self.particles.particle(idx)
    }

    pub fn simbox(&self) -> &SimBox {
        self.interaction.simbox()
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    fn checks_overlap(&self) -> bool {
        self.params.hard_disk || !self.interaction.has_continuous_potential()
    }

    /// Proposes a trial position for `idx`.
    /// Returns None if a rigid wall would be crossed.
    fn propose(&self, idx: usize, rng: &mut Prng) -> Option<Position> {
        let trial = self.particle(idx).pos() + random_displacement(rng, self.params.max_displacement);
        let simbox = self.simbox();
        match simbox.boundary() {
            Boundary::Periodic => Some(simbox.map_pos_into_box(trial)),
            Boundary::Rigid if simbox.pos_in_box(trial) => Some(trial),
            Boundary::Rigid => None,
        }
    }

    /// Decides on the trial position already stored for `idx`.
    /// Errors mean the move is rejected.
    pub fn evaluate_trial(&self, idx: usize, rng: &mut Prng) -> Result<Verdict> {
        let particles = self.particles.as_slice();
        if self.checks_overlap() && !self.interaction.hard_disk_accepted(particles, idx) {
            return Ok(Verdict::Overlap);
        }
        if !self.interaction.has_continuous_potential() {
            return Ok(Verdict::Accept);
        }

        let delta_energy = self.interaction.energy_delta(particles, idx)?;
        if !delta_energy.is_finite() {
            return Err(anyhow!("Non-finite energy delta {} for p{}", delta_energy, idx));
        }
        if metropolis_accepts(delta_energy, self.params.reduced_temperature, rng) {
            Ok(Verdict::Accept)
        } else {
            Ok(Verdict::Reject)
        }
    }

    pub fn step(&mut self, rng: &mut Prng, stats: &mut RunStats) {
        // 0. If there are no particles, just skip
        if self.particles.num_particles() == 0 {
            return;
        }
        stats.record_attempt();

        let idx = rng.random_range(0..self.particles.num_particles());
        let Some(trial) = self.propose(idx, rng) else {
            log::debug!("p{} would leave the box", idx);
            return;
        };
        self.try_move(idx, trial, rng, stats);
    }

    pub fn set_trial_pos(&mut self, idx: usize, trial: Position) {
        self.particles.set_trial_pos(idx, trial);
    }

    /// Sets `trial` for `idx`, then commits or discards it.
    /// The store is left with pos == trial_pos either way.
    pub fn try_move(&mut self, idx: usize, trial: Position, rng: &mut Prng, stats: &mut RunStats) {
        self.set_trial_pos(idx, trial);

        match self.evaluate_trial(idx, rng) {
            Ok(Verdict::Accept) => {
                self.particles.commit_trial(idx);
                stats.record_accept();
            }
            Ok(Verdict::Overlap) => {
                stats.record_overlap();
                self.particles.discard_trial(idx);
            }
            Ok(Verdict::Reject) => {
                self.particles.discard_trial(idx);
            }
            Err(e) => {
                log::debug!("Rejected move of p{}: {}", idx, e);
                stats.record_error();
                self.particles.discard_trial(idx);
            }
        }
    }

    /// One attempted move per particle
    pub fn sweep(&mut self, rng: &mut Prng) -> RunStats {
        let mut run_stats = RunStats::new();
        for _ in 0..self.particles.num_particles() {
            self.step(rng, &mut run_stats);
        }
        run_stats
    }

    pub fn sample_properties(&mut self) {
        let particles = self.particles.as_slice();
        if self.interaction.simbox().is_periodic() {
            self.properties.sample_periodic(particles);
        } else {
            self.properties.sample_non_periodic(particles);
        }
    }

    // meant to be used in debug_assert!
    pub fn well_formed(&self) -> bool {
        self.particles
            .iter()
            .all(|p| self.simbox().pos_in_box(p.pos()) && p.pos() == p.trial_pos())
    }
}
