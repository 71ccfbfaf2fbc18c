//! Energy deltas and overlap checks for a single proposed move.
//!
//! Every routine reads the store through `IsParticle` and never writes to it.
//! The trial position of the particle at `index` must already be set.

use crate::error::InteractionError;
use crate::particle::IsParticle;
use crate::potentials::{
    reduced_distance, Affinity, InteractionModel, PairPotential, Potential, Truncation,
};
use crate::simbox::SimBox;
use crate::InputParams;

#[derive(Clone, Debug)]
pub struct Interaction {
    sigma: f64,
    simbox: SimBox,
    affinity: Affinity,
    model: InteractionModel,
    truncation: Truncation,
    potential: Option<PairPotential>,
}

impl Interaction {
    /// Copies everything needed out of the configuration and derives the
    /// truncation values. There is no way to re-initialize afterwards.
    pub fn new(ip: &InputParams) -> Result<Self, InteractionError> {
        let model = InteractionModel::try_from(ip.interaction_model)?;
        let simbox = SimBox::new(ip.box_length, ip.boundary);
        let truncation = Truncation::new(model, simbox.box_length(), ip.reduced_density);
        let potential = PairPotential::new(model, &truncation, ip);
        log::info!(
            "Interaction model {:?}: truncation = {}, shift = {}, tail correction = {}",
            model,
            truncation.dist(),
            truncation.shift(),
            truncation.tail_correction()
        );
        Ok(Self {
            sigma: ip.sigma,
            simbox,
            affinity: Affinity::new(ip.ref_affinity, ip.affinity_mult),
            model,
            truncation,
            potential,
        })
    }

    /// The box that decides between periodic and non-periodic deltas
    pub fn simbox(&self) -> &SimBox {
        &self.simbox
    }

    pub fn model(&self) -> InteractionModel {
        self.model
    }

    pub fn truncation(&self) -> &Truncation {
        &self.truncation
    }

    pub fn affinity(&self) -> &Affinity {
        &self.affinity
    }

    pub fn potential(&self) -> Option<&PairPotential> {
        self.potential.as_ref()
    }

    pub fn has_continuous_potential(&self) -> bool {
        self.potential.is_some()
    }

    fn continuous_potential(&self) -> Result<&PairPotential, InteractionError> {
        self.potential
            .as_ref()
            .ok_or(InteractionError::NoContinuousPotential)
    }

    fn energy_within_cutoff(&self, potential: &PairPotential, r: f64, affinity: f64) -> f64 {
        if r < self.truncation.dist() {
            potential.energy(r, affinity)
        } else {
            0.0
        }
    }

    /// Picks the periodic or non-periodic delta from the box boundary
    pub fn energy_delta<P: IsParticle>(
        &self,
        particles: &[P],
        index: usize,
    ) -> Result<f64, InteractionError> {
        if self.simbox.is_periodic() {
            self.periodic_energy_delta(particles, index)
        } else {
            self.non_periodic_energy_delta(particles, index)
        }
    }

    /// Trial minus current energy of particle `index` against all others,
    /// plus the tail correction, with periodic boundaries.
    ///
    /// A pair whose direct distance is beyond the cutoff on either side is
    /// replaced by the 9 images of the other particle, and every image
    /// inside the cutoff adds its own contribution. This is not the
    /// minimum-image convention: two images inside the cutoff both count.
    pub fn periodic_energy_delta<P: IsParticle>(
        &self,
        particles: &[P],
        index: usize,
    ) -> Result<f64, InteractionError> {
        let potential = self.continuous_potential()?;
        let cutoff = self.truncation.dist();

        let moving = &particles[index];
        let curr_pos = moving.pos();
        let trial_pos = moving.trial_pos();

        let mut delta_energy = 0.0;
        for other in particles.iter().filter(|p| p.id() != moving.id()) {
            let a = self.affinity.between(moving.type_label(), other.type_label());
            let other_pos = other.pos();

            let dist_curr = reduced_distance(curr_pos, other_pos, self.sigma);
            let dist_trial = reduced_distance(trial_pos, other_pos, self.sigma);

            if dist_curr > cutoff || dist_trial > cutoff {
                for image in self.simbox.periodic_images(other_pos) {
                    let dist_curr = reduced_distance(curr_pos, image, self.sigma);
                    let dist_trial = reduced_distance(trial_pos, image, self.sigma);
                    let energy_curr = self.energy_within_cutoff(potential, dist_curr, a);
                    let energy_trial = self.energy_within_cutoff(potential, dist_trial, a);
                    delta_energy += energy_trial - energy_curr;
                }
            } else {
                let energy_curr = potential.energy(dist_curr, a);
                let energy_trial = potential.energy(dist_trial, a);
                delta_energy += energy_trial - energy_curr;
            }
        }

        Ok(delta_energy + self.truncation.tail_correction())
    }

    /// Trial minus current energy of particle `index` against all others.
    /// Pairs at or beyond the cutoff contribute nothing; no images, no tail correction.
    pub fn non_periodic_energy_delta<P: IsParticle>(
        &self,
        particles: &[P],
        index: usize,
    ) -> Result<f64, InteractionError> {
        let potential = self.continuous_potential()?;

        let moving = &particles[index];
        let curr_pos = moving.pos();
        let trial_pos = moving.trial_pos();

        let mut delta_energy = 0.0;
        for other in particles.iter().filter(|p| p.id() != moving.id()) {
            let a = self.affinity.between(moving.type_label(), other.type_label());
            let other_pos = other.pos();

            let dist_curr = reduced_distance(curr_pos, other_pos, self.sigma);
            let dist_trial = reduced_distance(trial_pos, other_pos, self.sigma);

            let energy_curr = self.energy_within_cutoff(potential, dist_curr, a);
            let energy_trial = self.energy_within_cutoff(potential, dist_trial, a);
            delta_energy += energy_trial - energy_curr;
        }

        Ok(delta_energy)
    }

    /// true if the trial position of `index` overlaps no other particle.
    /// Uses raw distances and the particles' radii, independent of the model.
    pub fn hard_disk_accepted<P: IsParticle>(&self, particles: &[P], index: usize) -> bool {
        let moving = &particles[index];
        let trial_pos = moving.trial_pos();

        !particles
            .iter()
            .filter(|p| p.id() != moving.id())
            .any(|other| (other.pos() - trial_pos).l2_norm() < moving.radius() + other.radius())
    }
}
