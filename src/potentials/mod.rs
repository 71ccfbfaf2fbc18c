//! Pair potentials in reduced units.
//!
//! Distances handed to these functions are already divided by sigma.
//! `PairPotential` is the continuous model picked once from the
//! interaction-model selector; the hard-disk-only model has none.

use std::f64::consts::PI;

use crate::consts::LJ_TRUNCATION;
use crate::error::InteractionError;
use crate::particle::TypeLabel;
use crate::position::Position;
use crate::InputParams;

pub mod lennard_jones;
pub mod spring;
pub mod wca;

use lennard_jones::LennardJones;
use spring::Spring;
use wca::Wca;

pub trait Potential {
    fn energy(&self, r: f64, affinity: f64) -> f64;

    /// -dU/dr
    fn force(&self, r: f64, affinity: f64) -> f64;
}

/// Euclidean distance between two points in units of sigma.
/// Coincident points give 0, which the potentials turn into inf/NaN.
pub fn reduced_distance(p0: Position, p1: Position, sigma: f64) -> f64 {
    (p1 - p0).l2_norm() / sigma
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionModel {
    HardDisk,
    LennardJones,
    Wca,
    WcaSpring,
}

impl TryFrom<u8> for InteractionModel {
    type Error = InteractionError;

    fn try_from(selector: u8) -> Result<Self, Self::Error> {
        match selector {
            0 => Ok(InteractionModel::HardDisk),
            1 => Ok(InteractionModel::LennardJones),
            2 => Ok(InteractionModel::Wca),
            3 => Ok(InteractionModel::WcaSpring),
            other => Err(InteractionError::UnknownModel(other)),
        }
    }
}

impl From<InteractionModel> for u8 {
    fn from(model: InteractionModel) -> Self {
        match model {
            InteractionModel::HardDisk => 0,
            InteractionModel::LennardJones => 1,
            InteractionModel::Wca => 2,
            InteractionModel::WcaSpring => 3,
        }
    }
}

/// Cutoff data derived once from the configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Truncation {
    dist: f64,
    shift: f64,
    tail_correction: f64,
}

impl Truncation {
    pub fn new(model: InteractionModel, box_length: f64, reduced_density: f64) -> Self {
        match model {
            // the spring has no natural range, so the cutoff follows the box
            InteractionModel::WcaSpring => Self {
                dist: 0.5 * box_length,
                shift: 0.0,
                tail_correction: 0.0,
            },
            InteractionModel::LennardJones => {
                let dist = LJ_TRUNCATION;
                let inv = 1.0 / dist;
                let shift = -(inv.powi(12) - inv.powi(6));
                let tail_correction = PI * reduced_density * (0.4 * inv.powi(10) - inv.powi(4));
                Self {
                    dist,
                    shift,
                    tail_correction,
                }
            }
            InteractionModel::HardDisk | InteractionModel::Wca => Self {
                dist: LJ_TRUNCATION,
                shift: 0.0,
                tail_correction: 0.0,
            },
        }
    }

    pub fn dist(&self) -> f64 {
        self.dist
    }

    pub fn shift(&self) -> f64 {
        self.shift
    }

    pub fn tail_correction(&self) -> f64 {
        self.tail_correction
    }
}

/// Binding affinity for like and unlike type labels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affinity {
    reference: f64,
    multiplier: f64,
}

impl Affinity {
    pub fn new(reference: f64, multiplier: f64) -> Self {
        Self {
            reference,
            multiplier,
        }
    }

    pub fn between(&self, t0: TypeLabel, t1: TypeLabel) -> f64 {
        if t0 == t1 {
            self.reference
        } else {
            self.reference * self.multiplier
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PairPotential {
    LennardJones(LennardJones),
    Wca(Wca),
    WcaSpring(Wca, Spring),
}

impl PairPotential {
    /// None for the hard-disk-only model
    pub fn new(model: InteractionModel, truncation: &Truncation, ip: &InputParams) -> Option<Self> {
        let wca = Wca::new(ip.sigma);
        match model {
            InteractionModel::HardDisk => None,
            InteractionModel::LennardJones => Some(PairPotential::LennardJones(LennardJones::new(
                ip.sigma,
                truncation.shift(),
            ))),
            InteractionModel::Wca => Some(PairPotential::Wca(wca)),
            InteractionModel::WcaSpring => Some(PairPotential::WcaSpring(
                wca,
                Spring::new(ip.reduced_temperature, ip.spring_constant, ip.rest_length),
            )),
        }
    }
}

impl Potential for PairPotential {
    fn energy(&self, r: f64, affinity: f64) -> f64 {
        match self {
            PairPotential::LennardJones(lj) => lj.energy(r, affinity),
            PairPotential::Wca(wca) => wca.energy(r, affinity),
            PairPotential::WcaSpring(wca, spring) => {
                wca.energy(r, affinity) + spring.energy(r, affinity)
            }
        }
    }

    fn force(&self, r: f64, affinity: f64) -> f64 {
        match self {
            PairPotential::LennardJones(lj) => lj.force(r, affinity),
            PairPotential::Wca(wca) => wca.force(r, affinity),
            PairPotential::WcaSpring(wca, spring) => {
                wca.force(r, affinity) + spring.force(r, affinity)
            }
        }
    }
}
