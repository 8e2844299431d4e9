//! Physics session: editor messages in, render deltas out.
//!
//! The session holds the authoritative diagram and runs every physics rule
//! synchronously inside [`Session::handle`]:
//!
//! - **Compute**: the message updates the addressed element (poles first),
//!   then every dependent element reads the fresh poles: lamps take the
//!   induced current, hanging magnets swing, compasses turn.
//!
//! - **Publish**: the collected deltas go out on the session bus in the
//!   order they were produced, and are also returned to the caller.
//!
//! Messages that name an element the diagram does not hold are logged and
//! dropped; they never fail the session. A validated link is the exception:
//! the endpoint the diagram does hold still counts it.

use crate::bus::{Bus, SubscriptionId};
use crate::events::{Inbound, PhysicsEvent};
use em_core::{
    ConnectionValidated, Connectable, CoreError, Diagram, Element, ElementFactory, ElementId,
    ElementKind, FieldEmitter, HasPoles, MagnetStyle, PhysicsConfig, Point, Poles, Result,
    compute_current,
};

/// One editor session's physics.
pub struct Session {
    /// All elements and links (single source of truth).
    pub diagram: Diagram,

    config: PhysicsConfig,
    factory: ElementFactory,
    bus: Bus<PhysicsEvent>,
}

impl Session {
    /// Create an empty session.
    ///
    /// # Errors
    /// `CoreError::InvalidConfig` if `config` fails validation.
    pub fn new(config: PhysicsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            diagram: Diagram::new(),
            factory: ElementFactory::new(config.clone()),
            config,
            bus: Bus::new(),
        })
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Listen to every event the session publishes.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&PhysicsEvent) + 'static,
    {
        self.bus.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Create an element by type name and add it to the diagram.
    ///
    /// # Errors
    /// `CoreError::UnknownElementType` for unknown type names.
    pub fn create_element(&mut self, element_type: &str, x: f64, y: f64) -> Result<ElementId> {
        let element = self.factory.create(element_type, x, y)?;
        Ok(self.add_element(element))
    }

    /// Create an element under a caller-chosen id.
    ///
    /// # Errors
    /// `CoreError::UnknownElementType` for unknown type names.
    pub fn create_element_with_id(
        &mut self,
        id: &str,
        element_type: &str,
        x: f64,
        y: f64,
    ) -> Result<ElementId> {
        let element = self.factory.create_with_id(id, element_type, x, y)?;
        Ok(self.add_element(element))
    }

    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = element.id;
        self.diagram.add_element(element);
        id
    }

    /// Current poles of an element; `None` for non-magnetic kinds.
    ///
    /// # Errors
    /// `CoreError::UnknownElement` if the diagram does not hold `id`.
    pub fn poles(&self, id: ElementId) -> Result<Option<Poles>> {
        self.diagram
            .get(id)
            .map(HasPoles::poles)
            .ok_or(CoreError::UnknownElement(id))
    }

    /// Process one editor message to completion, publish the resulting
    /// deltas on the bus and return them.
    pub fn handle(&mut self, message: Inbound) -> Vec<PhysicsEvent> {
        let events = self.compute(message);
        for event in &events {
            self.bus.publish(event);
        }
        events
    }

    fn compute(&mut self, message: Inbound) -> Vec<PhysicsEvent> {
        let mut out = Vec::new();
        match message {
            Inbound::PositionChanged {
                id,
                position,
                time_ms,
            } => self.position_changed(id, position, time_ms, &mut out),
            Inbound::DragStarted { id, time_ms } => {
                if let Some(element) = self.element_mut(id) {
                    let at = element.position;
                    element.motion.begin(at, time_ms);
                }
            }
            Inbound::DragEnded { id } => {
                if let Some(element) = self.element_mut(id) {
                    element.motion.end();
                }
            }
            Inbound::LinkValidated(link) => self.link_validated(&link, &mut out),
            Inbound::LinkRemoved {
                source_id,
                target_id,
            } => {
                if self.diagram.remove_link(source_id, target_id) {
                    log::debug!("link {source_id} - {target_id} removed");
                }
            }
            Inbound::PolarityReversed { id } => self.reverse(id, &mut out),
            Inbound::FieldVisibilityToggled { id } => self.toggle_field(id, &mut out),
            Inbound::ResetRotation { id } => {
                if let Some(element) = self.element_mut(id)
                    && element.reset_rotation()
                {
                    out.push(PhysicsEvent::RotationChanged { id, angle: 0.0 });
                }
            }
        }
        out
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        let element = self.diagram.get_mut(id);
        if element.is_none() {
            log::warn!("message for unknown element {id} ignored");
        }
        element
    }

    // ─── Position changes ────────────────────────────────────────────────

    fn position_changed(
        &mut self,
        id: ElementId,
        position: Point,
        time_ms: f64,
        out: &mut Vec<PhysicsEvent>,
    ) {
        let config = &self.config;
        let Some(element) = self.diagram.get_mut(id) else {
            log::warn!("message for unknown element {id} ignored");
            return;
        };

        let speed = element.motion.sample(position, time_ms);
        let poles = element.set_position(position);
        if let Some(poles) = poles {
            out.push(PhysicsEvent::poles(id, poles));
        }
        if element.refresh_field(config)
            && let Some(field) = element.field()
        {
            out.push(PhysicsEvent::field(id, field));
        }

        let kind = element.kind.clone();
        match kind {
            driver if driver.is_driver() => {
                if let Some(poles) = poles {
                    if let Some(speed) = speed {
                        self.broadcast_current(speed, poles, position, out);
                    }
                    self.swing_hanging_magnets(poles, out);
                }
            }
            ElementKind::Magnet(MagnetStyle::Earth) => {
                if let Some(poles) = poles {
                    self.point_compasses(poles.pole_n, out);
                }
            }
            ElementKind::Compass(_) => self.point_at_earths(id, out),
            _ => {}
        }
    }

    /// Drive the coil circuit: one signed current, fed to every lamp.
    fn broadcast_current(
        &mut self,
        speed: f64,
        poles: Poles,
        reference: Point,
        out: &mut Vec<PhysicsEvent>,
    ) {
        if self.diagram.all_coils().next().is_none() {
            return;
        }
        let current = compute_current(speed, poles.pole_n, poles.pole_s, reference);
        log::trace!("speed {speed:.2} px/s induces current {current:.2}");
        out.push(PhysicsEvent::CurrentChanged { current });

        let lamps: Vec<ElementId> = self.diagram.all_lamps().map(|e| e.id).collect();
        for id in lamps {
            if let Some(lit) = self
                .diagram
                .get_mut(id)
                .and_then(|lamp| lamp.apply_current(current))
            {
                out.push(PhysicsEvent::LampStateChanged { id, lit });
            }
        }
    }

    fn swing_hanging_magnets(&mut self, driver: Poles, out: &mut Vec<PhysicsEvent>) {
        let Some(pivot) = self.diagram.first_pivot().map(|p| p.position) else {
            return;
        };
        let hanging: Vec<ElementId> = self
            .diagram
            .all_hanging_magnets()
            .filter(|e| e.is_connected())
            .map(|e| e.id)
            .collect();

        for id in hanging {
            let Some(element) = self.diagram.get_mut(id) else {
                continue;
            };
            if let Some(position) = element.swing(pivot, driver, &self.config) {
                out.push(PhysicsEvent::PendulumPositionChanged { id, position });
                if let Some(poles) = element.poles() {
                    out.push(PhysicsEvent::poles(id, poles));
                }
            }
        }
    }

    /// Turn every compass toward `target`.
    fn point_compasses(&mut self, target: Point, out: &mut Vec<PhysicsEvent>) {
        let compasses: Vec<ElementId> = self.diagram.all_compasses().map(|e| e.id).collect();
        for id in compasses {
            if let Some(angle) = self
                .diagram
                .get_mut(id)
                .and_then(|compass| compass.point_to(target))
            {
                out.push(PhysicsEvent::RotationChanged { id, angle });
            }
        }
    }

    /// Turn one compass toward each Earth's north pole; the last Earth wins.
    fn point_at_earths(&mut self, id: ElementId, out: &mut Vec<PhysicsEvent>) {
        let targets: Vec<Point> = self
            .diagram
            .all_earths()
            .filter_map(|earth| earth.poles())
            .map(|poles| poles.pole_n)
            .collect();
        let Some(compass) = self.diagram.get_mut(id) else {
            return;
        };
        let angle = targets
            .into_iter()
            .filter_map(|target| compass.point_to(target))
            .last();
        if let Some(angle) = angle {
            out.push(PhysicsEvent::RotationChanged { id, angle });
        }
    }

    // ─── Links ───────────────────────────────────────────────────────────

    fn link_validated(&mut self, link: &ConnectionValidated, out: &mut Vec<PhysicsEvent>) {
        if !self.diagram.record_link(link) {
            log::debug!(
                "link {} - {} not added to the graph: self link or element outside the diagram",
                link.source_id,
                link.target_id
            );
        }

        // Every known endpoint counts the link, whatever sits at the other end.
        let mut endpoints = vec![link.source_id];
        if link.target_id != link.source_id {
            endpoints.push(link.target_id);
        }
        for id in endpoints {
            let latched = self
                .diagram
                .get_mut(id)
                .is_some_and(|element| element.on_link_validated(link));
            if latched {
                out.push(PhysicsEvent::ElementConnected { id });
                self.snap_to_pivot(id, out);
            }
        }
    }

    /// Settle a freshly connected hanging magnet under the pivot.
    fn snap_to_pivot(&mut self, id: ElementId, out: &mut Vec<PhysicsEvent>) {
        let Some(pivot) = self.diagram.first_pivot().map(|p| p.position) else {
            return;
        };
        let Some(element) = self.diagram.get_mut(id) else {
            return;
        };
        if let Some(position) = element.snap_under(pivot) {
            out.push(PhysicsEvent::PendulumPositionChanged { id, position });
            if let Some(poles) = element.poles() {
                out.push(PhysicsEvent::poles(id, poles));
            }
        }
    }

    // ─── Polarity and field visibility ───────────────────────────────────

    fn reverse(&mut self, id: ElementId, out: &mut Vec<PhysicsEvent>) {
        let config = &self.config;
        let Some(element) = self.diagram.get_mut(id) else {
            log::warn!("message for unknown element {id} ignored");
            return;
        };

        let kind = element.kind.clone();
        match kind {
            ElementKind::PowerSupply => {
                element.reversed = !element.reversed;
                let reversed = element.reversed;
                log::debug!("power supply {id} reversed={reversed}");
                let coils: Vec<ElementId> = self.diagram.all_coils().map(|e| e.id).collect();
                for coil in coils {
                    if let Some(element) = self.diagram.get_mut(coil) {
                        Self::set_polarity(element, reversed, config, out);
                    }
                }
            }
            ElementKind::Magnet(_) | ElementKind::Coil | ElementKind::HangingMagnet(_) => {
                let reversed = !element.reversed;
                log::debug!("{id} reversed={reversed}");
                let is_earth = matches!(kind, ElementKind::Magnet(MagnetStyle::Earth));
                let poles = Self::set_polarity(element, reversed, config, out);
                if is_earth && let Some(poles) = poles {
                    self.point_compasses(poles.pole_n, out);
                }
            }
            _ => log::debug!("{id} has no polarity to reverse"),
        }
    }

    fn set_polarity(
        element: &mut Element,
        reversed: bool,
        config: &PhysicsConfig,
        out: &mut Vec<PhysicsEvent>,
    ) -> Option<Poles> {
        let poles = element.set_reversed(reversed, config);
        if let Some(poles) = poles {
            out.push(PhysicsEvent::poles(element.id, poles));
        }
        if let Some(field) = element.field() {
            out.push(PhysicsEvent::field(element.id, field));
        }
        poles
    }

    fn toggle_field(&mut self, id: ElementId, out: &mut Vec<PhysicsEvent>) {
        let config = &self.config;
        let Some(element) = self.diagram.get_mut(id) else {
            log::warn!("message for unknown element {id} ignored");
            return;
        };

        if element.hide_field() {
            log::debug!("{id} field hidden");
            out.push(PhysicsEvent::field(id, &[]));
        } else if element.show_field(config) {
            log::debug!("{id} field shown");
            if let Some(field) = element.field() {
                out.push(PhysicsEvent::field(id, field));
            }
        } else {
            log::debug!("{id} cannot show a field now");
        }
    }
}

impl Default for Session {
    /// An empty session with the default constants, which always validate.
    fn default() -> Self {
        let config = PhysicsConfig::default();
        Self {
            diagram: Diagram::new(),
            factory: ElementFactory::new(config.clone()),
            config,
            bus: Bus::new(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("elements", &self.diagram.len())
            .field("config", &self.config)
            .field("bus", &self.bus)
            .finish()
    }
}
