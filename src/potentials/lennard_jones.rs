use super::Potential;

/// Truncated and shifted 12-6 potential.
/// `shift` is chosen so the energy is exactly zero at the truncation distance.
#[derive(Clone, Debug, PartialEq)]
pub struct LennardJones {
    sigma: f64,
    shift: f64,
}

impl LennardJones {
    pub fn new(sigma: f64, shift: f64) -> Self {
        Self { sigma, shift }
    }
}

impl Potential for LennardJones {
    fn energy(&self, r: f64, affinity: f64) -> f64 {
        let inv = 1.0 / r;
        4.0 * affinity * (inv.powi(12) - inv.powi(6) + self.shift)
    }

    fn force(&self, r: f64, affinity: f64) -> f64 {
        let inv = 1.0 / r;
        24.0 * affinity / self.sigma * (2.0 * inv.powi(13) - inv.powi(7))
    }
}
