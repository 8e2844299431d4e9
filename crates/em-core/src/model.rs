//! Element model and diagram registry.
//!
//! Every element on the lab canvas is one plain `Element` value: position,
//! size and polarity shared by all kinds, plus the state that only its kind
//! owns (pendulum swing, needle angle, lamp state) carried in the
//! `ElementKind` variant. Capability traits (`HasPoles`, `Connectable`,
//! `FieldEmitter`) dispatch on that variant.
//!
//! The `Diagram` owns all elements of one editor session in a link graph:
//! nodes are elements, undirected edges are validated links. It replaces any
//! process-wide element list; every cross-element query goes through it.

use crate::config::PhysicsConfig;
use crate::compass::CompassState;
use crate::connect::{Connectable, ConnectionState, ConnectionValidated};
use crate::current::{LampPolarity, LampState};
use crate::field::{Field, FieldDescriptor, FieldEmitter, FieldStyle, generate_field};
use crate::geometry::{Bounds, Point, Size};
use crate::id::ElementId;
use crate::motion::SpeedTracker;
use crate::pendulum::{PendulumState, rest_x};
use crate::poles::{HasPoles, PoleLayout, Poles};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableUnGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ─── Element kinds ───────────────────────────────────────────────────────

/// Shape of a permanent magnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MagnetStyle {
    /// Straight bar; the only magnet that drives coils and the pendulum.
    Bar,
    /// Horseshoe magnet; top/bottom poles like the Earth.
    U,
    /// The Earth as one large dipole.
    Earth,
}

/// The element kinds of the lab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementKind {
    Magnet(MagnetStyle),
    Coil,
    Lamp(LampState),
    Compass(CompassState),
    HangingMagnet(PendulumState),
    Pivot,
    PowerSupply,
}

/// Magnet body drawn inside the hanging magnet's frame; its poles use this box.
pub const HANGING_MAGNET_BODY: Size = Size::new(220.0, 50.0);

impl ElementKind {
    /// Factory name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Magnet(MagnetStyle::Bar) => "bar_magnet",
            ElementKind::Magnet(MagnetStyle::U) => "u_magnet",
            ElementKind::Magnet(MagnetStyle::Earth) => "earth",
            ElementKind::Coil => "coil",
            ElementKind::Lamp(LampState {
                polarity: LampPolarity::Forward,
                ..
            }) => "led",
            ElementKind::Lamp(LampState {
                polarity: LampPolarity::Reverse,
                ..
            }) => "led_reverse",
            ElementKind::Compass(_) => "compass",
            ElementKind::HangingMagnet(_) => "hanging_magnet",
            ElementKind::Pivot => "pivot",
            ElementKind::PowerSupply => "power_supply",
        }
    }

    pub fn default_size(&self) -> Size {
        match self {
            ElementKind::Magnet(MagnetStyle::Bar) => Size::new(220.0, 50.0),
            ElementKind::Magnet(MagnetStyle::U) => Size::new(200.0, 150.0),
            ElementKind::Magnet(MagnetStyle::Earth) => Size::new(300.0, 300.0),
            ElementKind::Coil | ElementKind::Lamp(_) => Size::new(220.0, 50.0),
            ElementKind::Compass(_) => Size::new(60.0, 60.0),
            ElementKind::HangingMagnet(_) | ElementKind::PowerSupply => Size::new(300.0, 220.0),
            ElementKind::Pivot => Size::new(20.0, 20.0),
        }
    }

    /// Links needed before the element counts as connected; 0 = not connectable.
    pub fn terminals(&self) -> u32 {
        match self {
            ElementKind::Coil | ElementKind::Lamp(_) | ElementKind::PowerSupply => 2,
            ElementKind::HangingMagnet(_) | ElementKind::Pivot => 1,
            ElementKind::Magnet(_) | ElementKind::Compass(_) => 0,
        }
    }

    pub fn pole_layout(&self, config: &PhysicsConfig) -> Option<PoleLayout> {
        match self {
            ElementKind::Magnet(MagnetStyle::Bar)
            | ElementKind::Coil
            | ElementKind::HangingMagnet(_) => Some(PoleLayout::Axial),
            ElementKind::Magnet(MagnetStyle::U | MagnetStyle::Earth) => Some(PoleLayout::Ambient {
                inset: config.ambient_pole_inset,
            }),
            _ => None,
        }
    }

    pub fn field_style(&self) -> Option<FieldStyle> {
        match self {
            ElementKind::Magnet(MagnetStyle::Bar) | ElementKind::Coil => Some(FieldStyle::Bar),
            ElementKind::Magnet(MagnetStyle::U | MagnetStyle::Earth) => Some(FieldStyle::Ambient),
            _ => None,
        }
    }

    /// Whether moving this element induces current and swings the pendulum.
    pub fn is_driver(&self) -> bool {
        matches!(self, ElementKind::Magnet(MagnetStyle::Bar))
    }
}

// ─── Element ─────────────────────────────────────────────────────────────

/// One element on the canvas.
#[derive(Debug, Clone)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    /// Top-left anchor, owned by the editor.
    pub position: Point,
    pub size: Size,
    pub reversed: bool,
    /// Derived; refreshed through `HasPoles::refresh_poles`.
    poles: Option<Poles>,
    pole_layout: Option<PoleLayout>,
    pub connection: Option<ConnectionState>,
    /// Visible field; `None` while hidden.
    field: Option<Field>,
    pub motion: SpeedTracker,
}

impl Element {
    /// Build an element with its kind's default size and fresh poles.
    pub fn new(id: ElementId, kind: ElementKind, position: Point, config: &PhysicsConfig) -> Self {
        let terminals = kind.terminals();
        let mut element = Self {
            id,
            size: kind.default_size(),
            pole_layout: kind.pole_layout(config),
            connection: (terminals > 0).then(|| ConnectionState::new(terminals)),
            kind,
            position,
            reversed: false,
            poles: None,
            field: None,
            motion: SpeedTracker::new(),
        };
        element.refresh_poles();
        element
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.position, self.size)
    }

    /// The box the poles are derived from.
    pub fn pole_box(&self) -> Size {
        match self.kind {
            ElementKind::HangingMagnet(_) => HANGING_MAGNET_BODY,
            _ => self.size,
        }
    }

    /// Move the element and recompute its poles.
    pub fn set_position(&mut self, position: Point) -> Option<Poles> {
        self.position = position;
        self.refresh_poles()
    }

    /// Set polarity, recompute poles and regenerate a visible field.
    pub fn set_reversed(&mut self, reversed: bool, config: &PhysicsConfig) -> Option<Poles> {
        self.reversed = reversed;
        let poles = self.refresh_poles();
        self.refresh_field(config);
        poles
    }

    pub fn toggle_reversed(&mut self, config: &PhysicsConfig) -> Option<Poles> {
        self.set_reversed(!self.reversed, config)
    }

    /// Put a hanging magnet at rest under `pivot`. Returns the new position.
    pub fn snap_under(&mut self, pivot: Point) -> Option<Point> {
        let width = self.size.width;
        let ElementKind::HangingMagnet(state) = &mut self.kind else {
            return None;
        };
        let center = rest_x(pivot.x, width);
        state.reset(center);
        let position = Point::new(center, self.position.y);
        self.set_position(position);
        Some(position)
    }

    /// Swing a connected hanging magnet under `driver`. Returns the new position.
    pub fn swing(&mut self, pivot: Point, driver: Poles, config: &PhysicsConfig) -> Option<Point> {
        if !self.is_connected() {
            return None;
        }
        let own = self.poles?;
        let (position, width) = (self.position, self.size.width);
        let ElementKind::HangingMagnet(state) = &mut self.kind else {
            return None;
        };
        let next = state.step(position, width, own, pivot, driver, config);
        self.set_position(next);
        Some(next)
    }

    /// Turn a compass needle toward `target`. Returns the angle.
    pub fn point_to(&mut self, target: Point) -> Option<f64> {
        let center = self.bounds().center();
        match &mut self.kind {
            ElementKind::Compass(state) => Some(state.point_to(center, target)),
            _ => None,
        }
    }

    /// Zero a compass needle.
    pub fn reset_rotation(&mut self) -> bool {
        match &mut self.kind {
            ElementKind::Compass(state) => {
                state.reset();
                true
            }
            _ => false,
        }
    }

    /// Feed a broadcast current to a lamp. Returns the new lit state if it changed.
    pub fn apply_current(&mut self, current: f64) -> Option<bool> {
        let connected = self.is_connected();
        match &mut self.kind {
            ElementKind::Lamp(lamp) => lamp.apply_current(current, connected).then_some(lamp.lit),
            _ => None,
        }
    }

    pub fn is_lit(&self) -> bool {
        matches!(self.kind, ElementKind::Lamp(LampState { lit: true, .. }))
    }

    pub fn compass_angle(&self) -> Option<f64> {
        match self.kind {
            ElementKind::Compass(state) => Some(state.current_angle),
            _ => None,
        }
    }

    pub fn pendulum(&self) -> Option<&PendulumState> {
        match &self.kind {
            ElementKind::HangingMagnet(state) => Some(state),
            _ => None,
        }
    }
}

impl HasPoles for Element {
    fn poles(&self) -> Option<Poles> {
        self.poles
    }

    fn refresh_poles(&mut self) -> Option<Poles> {
        let layout = self.pole_layout?;
        let poles = layout.poles(self.position, self.pole_box(), self.reversed);
        self.poles = Some(poles);
        Some(poles)
    }
}

impl Connectable for Element {
    fn connection(&self) -> Option<&ConnectionState> {
        self.connection.as_ref()
    }

    fn on_link_validated(&mut self, link: &ConnectionValidated) -> bool {
        let id = self.id;
        self.connection
            .as_mut()
            .is_some_and(|state| state.on_link_validated(id, link))
    }
}

impl FieldEmitter for Element {
    fn field_style(&self) -> Option<FieldStyle> {
        self.kind.field_style()
    }

    fn can_show_field(&self) -> bool {
        match self.kind {
            // A coil only has a meaningful field in a closed circuit.
            ElementKind::Coil => self.is_connected(),
            _ => self.field_style().is_some(),
        }
    }

    fn field(&self) -> Option<&[FieldDescriptor]> {
        self.field.as_deref()
    }

    fn show_field(&mut self, config: &PhysicsConfig) -> bool {
        self.hide_field();
        if !self.can_show_field() {
            return false;
        }
        self.field = Some(Field::new());
        self.refresh_field(config)
    }

    fn hide_field(&mut self) -> bool {
        self.field.take().is_some()
    }

    fn refresh_field(&mut self, config: &PhysicsConfig) -> bool {
        if self.field.is_none() {
            return false;
        }
        let (Some(style), Some(poles)) = (self.field_style(), self.refresh_poles()) else {
            return false;
        };
        self.field = Some(generate_field(
            poles,
            self.reversed,
            self.size.height,
            style,
            config,
        ));
        true
    }
}

// ─── Diagram ─────────────────────────────────────────────────────────────

/// A validated link between two element ports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub source: ElementId,
    pub target: ElementId,
    pub source_port: Option<String>,
    pub target_port: Option<String>,
}

impl From<&ConnectionValidated> for Link {
    fn from(msg: &ConnectionValidated) -> Self {
        Self {
            source: msg.source_id,
            target: msg.target_id,
            source_port: msg.source_port.clone(),
            target_port: msg.target_port.clone(),
        }
    }
}

/// All elements of one session and the links between them.
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    /// Elements as nodes, validated links as undirected edges.
    pub graph: StableUnGraph<Element, Link>,

    /// Index from ElementId → NodeIndex for fast lookup.
    pub id_index: HashMap<ElementId, NodeIndex>,

    /// Ids in placement order; the graph reuses freed node slots.
    order: Vec<ElementId>,
}

impl Diagram {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element. An element with the same id is replaced and counts
    /// as placed last.
    pub fn add_element(&mut self, element: Element) -> NodeIndex {
        let id = element.id;
        self.remove_element(id);
        let idx = self.graph.add_node(element);
        self.id_index.insert(id, idx);
        self.order.push(id);
        idx
    }

    /// Remove an element together with its links.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        let idx = self.id_index.remove(&id)?;
        self.order.retain(|placed| *placed != id);
        self.graph.remove_node(idx)
    }

    pub fn index_of(&self, id: ElementId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.id_index.contains_key(&id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.index_of(id).map(|idx| &self.graph[idx])
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.index_of(id).map(|idx| &mut self.graph[idx])
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// All elements in placement order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.id_index.get(id).map(|idx| &self.graph[*idx]))
    }

    pub fn all_coils(&self) -> impl Iterator<Item = &Element> + '_ {
        self.elements()
            .filter(|e| matches!(e.kind, ElementKind::Coil))
    }

    pub fn all_lamps(&self) -> impl Iterator<Item = &Element> + '_ {
        self.elements()
            .filter(|e| matches!(e.kind, ElementKind::Lamp(_)))
    }

    pub fn all_hanging_magnets(&self) -> impl Iterator<Item = &Element> + '_ {
        self.elements()
            .filter(|e| matches!(e.kind, ElementKind::HangingMagnet(_)))
    }

    pub fn all_compasses(&self) -> impl Iterator<Item = &Element> + '_ {
        self.elements()
            .filter(|e| matches!(e.kind, ElementKind::Compass(_)))
    }

    pub fn all_earths(&self) -> impl Iterator<Item = &Element> + '_ {
        self.elements()
            .filter(|e| matches!(e.kind, ElementKind::Magnet(MagnetStyle::Earth)))
    }

    pub fn all_drivers(&self) -> impl Iterator<Item = &Element> + '_ {
        self.elements().filter(|e| e.kind.is_driver())
    }

    /// The pivot hanging magnets swing from: the first one placed.
    pub fn first_pivot(&self) -> Option<&Element> {
        self.elements()
            .find(|e| matches!(e.kind, ElementKind::Pivot))
    }

    /// Record a validated link. Links touching unknown elements, or an
    /// element and itself, are not recorded.
    pub fn record_link(&mut self, msg: &ConnectionValidated) -> bool {
        if msg.source_id == msg.target_id {
            return false;
        }
        let (Some(a), Some(b)) = (self.index_of(msg.source_id), self.index_of(msg.target_id))
        else {
            return false;
        };
        self.graph.add_edge(a, b, Link::from(msg));
        true
    }

    /// Remove one link between `a` and `b`. Connection latches are untouched.
    pub fn remove_link(&mut self, a: ElementId, b: ElementId) -> bool {
        let (Some(ia), Some(ib)) = (self.index_of(a), self.index_of(b)) else {
            return false;
        };
        match self.graph.find_edge(ia, ib) {
            Some(edge) => self.graph.remove_edge(edge).is_some(),
            None => false,
        }
    }

    /// Whether a link currently joins `a` and `b`.
    pub fn are_connected(&self, a: ElementId, b: ElementId) -> bool {
        match (self.index_of(a), self.index_of(b)) {
            (Some(ia), Some(ib)) => self.graph.find_edge(ia, ib).is_some(),
            _ => false,
        }
    }

    /// Number of links touching `id`.
    pub fn link_count(&self, id: ElementId) -> usize {
        self.index_of(id)
            .map(|idx| self.graph.edges(idx).count())
            .unwrap_or(0)
    }
}
