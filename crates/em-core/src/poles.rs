//! Two-pole abstraction for every magnetic source.
//!
//! A compact source (bar magnet, coil, hanging magnet) has its poles at the
//! left and right midpoints of its box. An ambient source (Earth, U magnet)
//! represents a large dipole, so its poles sit just either side of the box's
//! vertical center line, S on the top edge and N on the bottom edge.
//!
//! Poles are always derived; nothing outside this module positions them.

use crate::geometry::{Bounds, Point, Size};
use serde::{Deserialize, Serialize};

/// The N and S pole positions of one source.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poles {
    pub pole_n: Point,
    pub pole_s: Point,
}

impl Poles {
    /// The same two points with N and S exchanged.
    pub fn swapped(self) -> Self {
        Self {
            pole_n: self.pole_s,
            pole_s: self.pole_n,
        }
    }
}

/// How a source's box maps onto its two poles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PoleLayout {
    /// Left/right midpoints of the box (bar magnets, coils).
    Axial,
    /// Top/bottom edges, `inset` pixels either side of the center line.
    Ambient { inset: f64 },
}

/// Axial pole rule: N on the right and S on the left unless `reversed`.
pub fn update_poles(position: Point, size: Size, reversed: bool) -> Poles {
    let bounds = Bounds::new(position, size);
    let poles = Poles {
        pole_n: bounds.right_mid(),
        pole_s: bounds.left_mid(),
    };
    if reversed { poles.swapped() } else { poles }
}

/// Ambient pole rule for Earth-like sources.
pub fn ambient_poles(position: Point, size: Size, inset: f64, reversed: bool) -> Poles {
    let mid_x = position.x + size.width / 2.0;
    let poles = Poles {
        pole_n: Point::new(mid_x - inset, position.y + size.height),
        pole_s: Point::new(mid_x + inset, position.y),
    };
    if reversed { poles.swapped() } else { poles }
}

impl PoleLayout {
    pub fn poles(&self, position: Point, size: Size, reversed: bool) -> Poles {
        match *self {
            PoleLayout::Axial => update_poles(position, size, reversed),
            PoleLayout::Ambient { inset } => ambient_poles(position, size, inset, reversed),
        }
    }
}

/// Capability: the element is a magnetic source with derived poles.
pub trait HasPoles {
    /// Current poles, or `None` for elements that are not magnetic.
    fn poles(&self) -> Option<Poles>;

    /// Recompute poles from position, pole box and polarity.
    /// Returns the fresh poles, or `None` for non-magnetic elements.
    fn refresh_poles(&mut self) -> Option<Poles>;
}
