//! Field-line geometry.
//!
//! A field is a fixed, ordered set of descriptors between a source's N and S
//! poles: symmetric elliptical arc pairs bowing above and below the pole
//! axis and, for compact sources, two open straight lines running off to the
//! far field. The descriptors are pure geometry; the editor decides how to
//! draw them.

use crate::config::PhysicsConfig;
use crate::geometry::Point;
use crate::poles::Poles;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Room for a full bar-magnet field without spilling to the heap.
pub type Field = SmallVec<[FieldDescriptor; 12]>;

/// One elliptical arc from N to S.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcLine {
    pub pole_n: Point,
    pub pole_s: Point,
    /// Magnitude sets how far the arc bulges; sign sets the side.
    pub vertical_offset: f64,
    pub rx: f64,
    pub ry: f64,
    pub large_arc: bool,
    pub sweep: bool,
}

impl ArcLine {
    pub fn between(poles: Poles, vertical_offset: f64, min_radius: f64, large_arc: bool) -> Self {
        Self {
            pole_n: poles.pole_n,
            pole_s: poles.pole_s,
            vertical_offset,
            rx: 2.0 * (poles.pole_n.x - poles.pole_s.x).abs(),
            ry: vertical_offset.abs().max(min_radius),
            large_arc,
            sweep: vertical_offset > 0.0,
        }
    }
}

/// An open field line entering N or leaving S.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StraightLine {
    pub from: Point,
    pub to: Point,
    /// Polarity of the source when the line was generated; flips the arrow.
    pub reversed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldDescriptor {
    Arc(ArcLine),
    Straight(StraightLine),
}

impl FieldDescriptor {
    pub fn is_arc(&self) -> bool {
        matches!(self, FieldDescriptor::Arc(_))
    }
}

/// Which family of field a source draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldStyle {
    /// Bar magnets and coils: tight arcs plus two open lines.
    Bar,
    /// Earth and U magnets: wide, shallow arcs only.
    Ambient,
}

impl FieldStyle {
    /// Offset of the innermost arc pair for a source of the given height.
    pub fn arc_offset_start(&self, height: f64) -> f64 {
        match self {
            FieldStyle::Bar => height + 10.0,
            FieldStyle::Ambient => height / 4.0,
        }
    }

    pub fn large_arc(&self) -> bool {
        matches!(self, FieldStyle::Bar)
    }
}

/// The two open lines of a compact source: far point → N and S → far point.
pub fn open_lines(poles: Poles, reversed: bool, length: f64) -> [FieldDescriptor; 2] {
    let (n_far, s_far) = if reversed {
        (-length, length)
    } else {
        (length, -length)
    };
    [
        FieldDescriptor::Straight(StraightLine {
            from: poles.pole_n.offset_x(n_far),
            to: poles.pole_n,
            reversed,
        }),
        FieldDescriptor::Straight(StraightLine {
            from: poles.pole_s,
            to: poles.pole_s.offset_x(s_far),
            reversed,
        }),
    ]
}

/// Lazily produce the field of a source, arcs first (`+o`, `-o` per pair).
pub fn field_lines(
    poles: Poles,
    reversed: bool,
    height: f64,
    style: FieldStyle,
    config: &PhysicsConfig,
) -> impl Iterator<Item = FieldDescriptor> {
    let start = style.arc_offset_start(height);
    let spacing = config.arc_spacing;
    let min_radius = config.arc_min_radius;
    let large_arc = style.large_arc();

    let arcs = (0..config.arc_count)
        .flat_map(move |i| {
            let offset = start + i as f64 * spacing;
            [offset, -offset]
        })
        .map(move |offset| {
            FieldDescriptor::Arc(ArcLine::between(poles, offset, min_radius, large_arc))
        });

    let open = match style {
        FieldStyle::Bar => Some(open_lines(poles, reversed, config.straight_length)),
        FieldStyle::Ambient => None,
    };

    arcs.chain(open.into_iter().flatten())
}

/// Collect the full field of a source.
pub fn generate_field(
    poles: Poles,
    reversed: bool,
    height: f64,
    style: FieldStyle,
    config: &PhysicsConfig,
) -> Field {
    field_lines(poles, reversed, height, style, config).collect()
}

/// Capability: the element can display a magnetic field.
pub trait FieldEmitter {
    fn field_style(&self) -> Option<FieldStyle>;

    /// Whether a show request would currently produce a field.
    fn can_show_field(&self) -> bool;

    /// The visible field, `None` while hidden.
    fn field(&self) -> Option<&[FieldDescriptor]>;

    /// Generate and keep the field. Returns `false` if the element cannot show one now.
    fn show_field(&mut self, config: &PhysicsConfig) -> bool;

    /// Drop the field. Returns `true` if one was visible.
    fn hide_field(&mut self) -> bool;

    /// Regenerate a visible field from the current poles. No-op while hidden.
    fn refresh_field(&mut self, config: &PhysicsConfig) -> bool;
}
