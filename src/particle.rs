use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::position::Position;
use crate::simbox::SimBox;
use crate::Prng;

pub type ParticleId = u16;
/// 0 = parallel, 1 = antiparallel
pub type TypeLabel = u8;

/// Read-only view of a particle, as seen by the interaction engine
pub trait IsParticle {
    fn id(&self) -> ParticleId;
    fn type_label(&self) -> TypeLabel;
    fn pos(&self) -> Position;
    fn trial_pos(&self) -> Position;
    fn radius(&self) -> f64;
}

// Clone is implemented to enable quickcheck
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    id: ParticleId,
    type_label: TypeLabel,
    pos: Position,
    trial_pos: Position,
    radius: f64,
}

impl IsParticle for Particle {
    fn id(&self) -> ParticleId {
        self.id
    }

    fn type_label(&self) -> TypeLabel {
        self.type_label
    }

    fn pos(&self) -> Position {
        self.pos
    }

    fn trial_pos(&self) -> Position {
        self.trial_pos
    }

    fn radius(&self) -> f64 {
        self.radius
    }
}

impl Particle {
    /// The trial position starts out equal to the current position
    pub fn new(id: ParticleId, type_label: TypeLabel, pos: Position, radius: f64) -> Self {
        Self {
            id,
            type_label,
            pos,
            trial_pos: pos,
            radius,
        }
    }

    pub fn set_trial_pos(&mut self, trial_pos: Position) {
        self.trial_pos = trial_pos;
    }

    pub fn commit_trial(&mut self) {
        self.pos = self.trial_pos;
    }

    pub fn discard_trial(&mut self) {
        self.trial_pos = self.pos;
    }
}

/// Collection of particles, indexed by position in the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particles {
    particles: Vec<Particle>,
}

impl Particles {
    pub fn new(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    /// Places `num_particles` on a square lattice centred in the box.
    /// Each particle is antiparallel with probability `frac_antiparallel`.
    pub fn square_lattice(
        simbox: &SimBox,
        num_particles: usize,
        radius: f64,
        frac_antiparallel: f64,
        rng: &mut Prng,
    ) -> Self {
        let per_side = (num_particles as f64).sqrt().ceil() as usize;
        let spacing = simbox.box_length() / per_side.max(1) as f64;

        let mut particles = Vec::with_capacity(num_particles);
        for idx in 0..num_particles {
            let col = idx % per_side;
            let row = idx / per_side;
            let x = simbox.min() + (col as f64 + 0.5) * spacing;
            let y = simbox.min() + (row as f64 + 0.5) * spacing;
            let type_label = if rng.random::<f64>() < frac_antiparallel {
                1
            } else {
                0
            };
            particles.push(Particle::new(
                idx as ParticleId,
                type_label,
                Position::new([x, y]),
                radius,
            ));
        }
        Self { particles }
    }

    pub fn particle(&self, idx: usize) -> &Particle {
        &self.particles[idx]
    }

    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn set_trial_pos(&mut self, idx: usize, trial_pos: Position) {
        self.particles[idx].set_trial_pos(trial_pos);
    }

    pub fn commit_trial(&mut self, idx: usize) {
        self.particles[idx].commit_trial();
    }

    pub fn discard_trial(&mut self, idx: usize) {
        self.particles[idx].discard_trial();
    }
}

impl<'a> IntoIterator for &'a Particles {
    type Item = &'a Particle;
    type IntoIter = std::slice::Iter<'a, Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter()
    }
}
