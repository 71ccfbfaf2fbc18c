//! Configuration-wide observables: energy and virial series, radial and
//! planar pair-density histograms for like and unlike pairs.
//!
//! Reuses the pair potentials, but walks the whole configuration instead of
//! a single moving particle.

use crate::consts::BINS_PER_SIGMA;
use crate::error::InteractionError;
use crate::particle::IsParticle;
use crate::position::PosDifference;
use crate::potentials::{
    reduced_distance, Affinity, InteractionModel, PairPotential, Potential, Truncation,
};
use crate::simbox::SimBox;
use crate::InputParams;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairClass {
    All,
    Parallel,     // equal type labels
    Antiparallel, // different type labels
}

impl PairClass {
    pub const EVERY: [PairClass; 3] = [PairClass::All, PairClass::Parallel, PairClass::Antiparallel];

    fn index(self) -> usize {
        match self {
            PairClass::All => 0,
            PairClass::Parallel => 1,
            PairClass::Antiparallel => 2,
        }
    }

    /// file name prefix
    pub fn prefix(self) -> &'static str {
        match self {
            PairClass::All => "",
            PairClass::Parallel => "par_",
            PairClass::Antiparallel => "antp_",
        }
    }
}

#[derive(Clone, Debug)]
pub struct DensityHistogram {
    radial: Vec<f64>,
    planar: Vec<Vec<f64>>,
}

impl DensityHistogram {
    fn new(radial_bins: usize, planar_cells: usize) -> Self {
        Self {
            radial: vec![0.0; radial_bins],
            planar: vec![vec![0.0; planar_cells]; planar_cells],
        }
    }

    pub fn radial(&self) -> &[f64] {
        &self.radial
    }

    pub fn planar(&self) -> &[Vec<f64>] {
        &self.planar
    }
}

pub struct Properties {
    sigma: f64,
    num_particles: usize,
    reduced_density: f64,
    reduced_temperature: f64,

    simbox: SimBox,
    affinity: Affinity,
    truncation: Truncation,
    potential: Option<PairPotential>,

    // reduced units
    bin_width: f64,
    // raw units
    cell_len: f64,

    energies: Vec<f64>,
    virials: Vec<f64>, // sum of r * F(r) per sample
    histograms: [DensityHistogram; 3],
}

impl Properties {
    pub fn new(ip: &InputParams, simbox: &SimBox) -> Result<Self, InteractionError> {
        let model = InteractionModel::try_from(ip.interaction_model)?;
        let truncation = Truncation::new(model, simbox.box_length(), ip.reduced_density);
        let potential = PairPotential::new(model, &truncation, ip);

        let bin_width = 1.0 / BINS_PER_SIGMA;
        let cell_len = ip.sigma / BINS_PER_SIGMA;
        let radial_bins = (0.5 * simbox.box_length() / ip.sigma / bin_width) as usize + 1;
        let planar_cells = (simbox.box_length() / cell_len) as usize + 1;
        log::debug!(
            "Properties: {} radial bins, {}x{} planar cells",
            radial_bins,
            planar_cells,
            planar_cells
        );

        Ok(Self {
            sigma: ip.sigma,
            num_particles: ip.num_particles,
            reduced_density: ip.reduced_density,
            reduced_temperature: ip.reduced_temperature,
            simbox: simbox.clone(),
            affinity: Affinity::new(ip.ref_affinity, ip.affinity_mult),
            truncation,
            potential,
            bin_width,
            cell_len,
            energies: Vec::new(),
            virials: Vec::new(),
            histograms: [
                DensityHistogram::new(radial_bins, planar_cells),
                DensityHistogram::new(radial_bins, planar_cells),
                DensityHistogram::new(radial_bins, planar_cells),
            ],
        })
    }

    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    pub fn cell_len(&self) -> f64 {
        self.cell_len
    }

    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    pub fn virials(&self) -> &[f64] {
        &self.virials
    }

    pub fn num_samples(&self) -> usize {
        self.energies.len()
    }

    pub fn histogram(&self, class: PairClass) -> &DensityHistogram {
        &self.histograms[class.index()]
    }

    fn bump(&mut self, class: PairClass, r: f64, disp: PosDifference) {
        let half_box = 0.5 * self.simbox.box_length();
        let hist = &mut self.histograms[class.index()];

        if r * self.sigma < half_box {
            // nearest bin
            let idx = (r / self.bin_width).round() as usize;
            if let Some(bin) = hist.radial.get_mut(idx) {
                *bin += 1.0;
            }
        }

        let limit = half_box - self.cell_len;
        if disp.x().abs() < limit && disp.y().abs() < limit {
            let ix = ((disp.x() + half_box) / self.cell_len).round() as usize;
            let iy = ((disp.y() + half_box) / self.cell_len).round() as usize;
            if let Some(cell) = hist.planar.get_mut(ix).and_then(|row| row.get_mut(iy)) {
                *cell += 1.0;
            }
        }
    }

    fn record_pair(&mut self, r: f64, disp: PosDifference, same_type: bool) {
        self.bump(PairClass::All, r, disp);
        if same_type {
            self.bump(PairClass::Parallel, r, disp);
        } else {
            self.bump(PairClass::Antiparallel, r, disp);
        }
    }

    fn pair_terms(&self, r: f64, affinity: f64) -> (f64, f64) {
        match &self.potential {
            Some(potential) => (
                potential.energy(r, affinity),
                r * potential.force(r, affinity),
            ),
            None => (0.0, 0.0),
        }
    }

    pub fn sample_non_periodic<P: IsParticle>(&mut self, particles: &[P]) {
        self.sample(particles, false)
    }

    pub fn sample_periodic<P: IsParticle>(&mut self, particles: &[P]) {
        self.sample(particles, true)
    }

    /// Histograms see every ordered pair, energy and virial every unordered pair once.
    /// In periodic mode a pair beyond the cutoff is replaced by the 8 neighbouring
    /// images of the second particle.
    fn sample<P: IsParticle>(&mut self, particles: &[P], periodic: bool) {
        let cutoff = self.truncation.dist();
        let mut energy = 0.0;
        let mut virial = 0.0;

        for (k, p0) in particles.iter().enumerate() {
            for (n, p1) in particles.iter().enumerate() {
                if p0.id() == p1.id() {
                    continue;
                }
                let same_type = p0.type_label() == p1.type_label();
                let a = self.affinity.between(p0.type_label(), p1.type_label());
                let r = reduced_distance(p0.pos(), p1.pos(), self.sigma);
                self.record_pair(r, p1.pos() - p0.pos(), same_type);

                if n <= k {
                    continue;
                }

                if periodic && r > cutoff {
                    for image in self.simbox.neighbor_images(p1.pos()) {
                        let r = reduced_distance(p0.pos(), image, self.sigma);
                        let disp = image - p0.pos();
                        // images are only visited from one side of the pair
                        self.record_pair(r, disp, same_type);
                        self.record_pair(r, -disp, same_type);
                        if r < cutoff {
                            let (e, v) = self.pair_terms(r, a);
                            energy += e;
                            virial += v;
                        }
                    }
                } else if r < cutoff {
                    let (e, v) = self.pair_terms(r, a);
                    energy += e;
                    virial += v;
                }
            }
        }

        self.energies.push(energy);
        self.virials.push(virial);
    }

    pub fn average_energy(&self) -> f64 {
        mean(&self.energies)
    }

    pub fn average_virial(&self) -> f64 {
        mean(&self.virials)
    }

    /// rho* (T* + <sum r F> / 2N)
    pub fn reduced_pressure(&self) -> f64 {
        if self.num_particles == 0 {
            return 0.0;
        }
        self.reduced_density
            * (self.reduced_temperature + self.average_virial() / (2.0 * self.num_particles as f64))
    }
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}
