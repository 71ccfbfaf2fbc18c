/// Changing consts in this file will change the physics of the simulation
/// please don't do that without rederiving the truncation values

/// 2^(1/6), where the Lennard-Jones potential has its minimum.
/// WCA is exactly zero past this reduced separation.
pub const WCA_CUTOFF: f64 = 1.122_462_048_309_373;
/// WCA shift that makes the truncated repulsion vanish at WCA_CUTOFF
pub const WCA_SHIFT: f64 = 0.25;
/// Reduced truncation distance for every model but WCA + spring
pub const LJ_TRUNCATION: f64 = 2.5;

/// Histogram resolution, in bins per sigma
pub const BINS_PER_SIGMA: f64 = 20.0;

pub const MAX_PARTICLES: usize = 10000;
