use crate::Prng;
use rand::Rng;
use xyzvec::XYVec;

pub type DimVec = XYVec<f64>;
pub type PosDifference = DimVec;
pub type Position = DimVec;

/// uniform displacement in [-max, max) along each axis
pub fn random_displacement(rng: &mut Prng, max: f64) -> PosDifference {
    let x: f64 = rng.random_range(-max..max);
    let y: f64 = rng.random_range(-max..max);
    DimVec::new([x, y])
}
