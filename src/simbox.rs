use serde::{Deserialize, Serialize};

use crate::position::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boundary {
    Periodic,
    Rigid,
}

fn map_into_range(p: f64, lower: f64, upper: f64) -> f64 {
    if p < lower {
        p + (upper - lower)
    } else if p >= upper {
        p - (upper - lower)
    } else {
        p
    }
}

/// Square box of side `box_length` centred on the origin
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimBox {
    box_length: f64,
    boundary: Boundary,
}

impl SimBox {
    pub fn new(box_length: f64, boundary: Boundary) -> Self {
        Self {
            box_length,
            boundary,
        }
    }

    pub fn box_length(&self) -> f64 {
        self.box_length
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    pub fn is_periodic(&self) -> bool {
        self.boundary == Boundary::Periodic
    }

    pub fn min(&self) -> f64 {
        -0.5 * self.box_length
    }

    pub fn max(&self) -> f64 {
        0.5 * self.box_length
    }

    pub fn pos_in_box(&self, pos: Position) -> bool {
        pos.x() >= self.min() && pos.x() < self.max() && pos.y() >= self.min() && pos.y() < self.max()
    }

    // only valid for positions less than one box length outside
    pub fn map_pos_into_box(&self, pos: Position) -> Position {
        let x = map_into_range(pos.x(), self.min(), self.max());
        let y = map_into_range(pos.y(), self.min(), self.max());
        Position::new([x, y])
    }

    /// The parent position followed by its 8 translations into the neighbouring cells
    pub fn periodic_images(&self, pos: Position) -> [Position; 9] {
        let l = self.box_length;
        [
            pos,
            pos.translate_by(0.0, l),
            pos.translate_by(0.0, -l),
            pos.translate_by(l, 0.0),
            pos.translate_by(l, l),
            pos.translate_by(l, -l),
            pos.translate_by(-l, 0.0),
            pos.translate_by(-l, l),
            pos.translate_by(-l, -l),
        ]
    }

    /// Same as periodic_images, without the parent
    pub fn neighbor_images(&self, pos: Position) -> [Position; 8] {
        let [_, rest @ ..] = self.periodic_images(pos);
        rest
    }
}
