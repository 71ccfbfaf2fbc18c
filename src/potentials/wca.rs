use super::Potential;
use crate::consts::{WCA_CUTOFF, WCA_SHIFT};

/// Purely repulsive Lennard-Jones, cut at its minimum.
/// Works as a soft disk, so the binding affinity is ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct Wca {
    sigma: f64,
}

impl Wca {
    pub fn new(sigma: f64) -> Self {
        Self { sigma }
    }
}

impl Potential for Wca {
    fn energy(&self, r: f64, _affinity: f64) -> f64 {
        if r > WCA_CUTOFF {
            return 0.0;
        }
        let inv = 1.0 / r;
        4.0 * (inv.powi(12) - inv.powi(6) + WCA_SHIFT)
    }

    fn force(&self, r: f64, _affinity: f64) -> f64 {
        if r > WCA_CUTOFF {
            return 0.0;
        }
        let inv = 1.0 / r;
        24.0 / self.sigma * (2.0 * inv.powi(13) - inv.powi(7))
    }
}
