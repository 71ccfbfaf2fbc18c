use super::Potential;

/// Harmonic spring under a Gaussian envelope.
/// The energy rises near the rest length and decays again at large
/// extension, so a bond can break.
/// Scaled by the reduced temperature to stay in reduced form.
#[derive(Clone, Debug, PartialEq)]
pub struct Spring {
    reduced_temperature: f64,
    spring_constant: f64,
    rest_length: f64,
}

impl Spring {
    pub fn new(reduced_temperature: f64, spring_constant: f64, rest_length: f64) -> Self {
        Self {
            reduced_temperature,
            spring_constant,
            rest_length,
        }
    }

    fn half_k_sqd_extension(&self, r: f64) -> f64 {
        let ext = r - self.rest_length;
        0.5 * self.spring_constant * ext * ext
    }
}

impl Potential for Spring {
    fn energy(&self, r: f64, affinity: f64) -> f64 {
        let stretch = self.half_k_sqd_extension(r);
        affinity * self.reduced_temperature * stretch * (-stretch).exp()
    }

    fn force(&self, r: f64, affinity: f64) -> f64 {
        let stretch = self.half_k_sqd_extension(r);
        affinity
            * self.reduced_temperature
            * self.spring_constant
            * (r - self.rest_length)
            * (-stretch).exp()
            * (stretch - 1.0)
    }
}
