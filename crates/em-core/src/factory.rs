//! Element construction by type name.

use crate::compass::CompassState;
use crate::config::PhysicsConfig;
use crate::current::{LampPolarity, LampState};
use crate::error::{CoreError, Result};
use crate::geometry::Point;
use crate::id::ElementId;
use crate::model::{Element, ElementKind, MagnetStyle};
use crate::pendulum::PendulumState;

/// Type names accepted by [`ElementFactory::create`].
pub const ELEMENT_TYPES: &[&str] = &[
    "bar_magnet",
    "u_magnet",
    "earth",
    "hanging_magnet",
    "compass",
    "coil",
    "power_supply",
    "led",
    "led_reverse",
    "pivot",
];

/// Builds elements with their default geometry.
#[derive(Debug, Clone, Default)]
pub struct ElementFactory {
    config: PhysicsConfig,
}

impl ElementFactory {
    pub fn new(config: PhysicsConfig) -> Self {
        Self { config }
    }

    /// Map a type name to its kind.
    ///
    /// # Errors
    /// `CoreError::UnknownElementType` for names outside [`ELEMENT_TYPES`].
    pub fn kind_for(element_type: &str) -> Result<ElementKind> {
        let kind = match element_type {
            "bar_magnet" => ElementKind::Magnet(MagnetStyle::Bar),
            "u_magnet" => ElementKind::Magnet(MagnetStyle::U),
            "earth" => ElementKind::Magnet(MagnetStyle::Earth),
            "hanging_magnet" => ElementKind::HangingMagnet(PendulumState::default()),
            "compass" => ElementKind::Compass(CompassState::default()),
            "coil" => ElementKind::Coil,
            "power_supply" => ElementKind::PowerSupply,
            "led" => ElementKind::Lamp(LampState::new(LampPolarity::Forward)),
            "led_reverse" => ElementKind::Lamp(LampState::new(LampPolarity::Reverse)),
            "pivot" => ElementKind::Pivot,
            other => return Err(CoreError::UnknownElementType(other.to_string())),
        };
        Ok(kind)
    }

    /// Create an element with a generated id at `(x, y)`.
    ///
    /// # Errors
    /// `CoreError::UnknownElementType` for unknown type names.
    pub fn create(&self, element_type: &str, x: f64, y: f64) -> Result<Element> {
        let kind = Self::kind_for(element_type)?;
        let id = ElementId::with_prefix(kind.name());
        Ok(self.build(id, kind, Point::new(x, y)))
    }

    /// Create an element under a caller-chosen id.
    ///
    /// # Errors
    /// `CoreError::UnknownElementType` for unknown type names.
    pub fn create_with_id(&self, id: &str, element_type: &str, x: f64, y: f64) -> Result<Element> {
        let kind = Self::kind_for(element_type)?;
        Ok(self.build(ElementId::intern(id), kind, Point::new(x, y)))
    }

    fn build(&self, id: ElementId, kind: ElementKind, position: Point) -> Element {
        log::debug!("create {} {id} at ({}, {})", kind.name(), position.x, position.y);
        Element::new(id, kind, position, &self.config)
    }
}
