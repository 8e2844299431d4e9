//! Messages in and out of a physics session.
//!
//! `Inbound` is what the diagram editor reports; `PhysicsEvent` is what the
//! session pushes back for rendering. Both serialise as JSON objects tagged
//! with `"type"` and camelCase fields.

use em_core::{ConnectionValidated, ElementId, FieldDescriptor, Point, Poles};
use serde::{Deserialize, Serialize};

/// A message from the diagram editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Inbound {
    /// The element's top-left anchor moved. `time_ms` is the editor's clock.
    PositionChanged {
        id: ElementId,
        position: Point,
        time_ms: f64,
    },
    DragStarted {
        id: ElementId,
        time_ms: f64,
    },
    DragEnded {
        id: ElementId,
    },
    /// A link between two ports passed the editor's validation.
    LinkValidated(ConnectionValidated),
    LinkRemoved {
        source_id: ElementId,
        target_id: ElementId,
    },
    PolarityReversed {
        id: ElementId,
    },
    FieldVisibilityToggled {
        id: ElementId,
    },
    ResetRotation {
        id: ElementId,
    },
}

/// A render delta produced by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PhysicsEvent {
    PolesUpdated {
        id: ElementId,
        pole_n: Point,
        pole_s: Point,
    },
    /// The full visible field; empty when the field was hidden.
    FieldDescriptorsChanged {
        id: ElementId,
        descriptors: Vec<FieldDescriptor>,
    },
    LampStateChanged {
        id: ElementId,
        lit: bool,
    },
    RotationChanged {
        id: ElementId,
        angle: f64,
    },
    PendulumPositionChanged {
        id: ElementId,
        position: Point,
    },
    /// Signed current broadcast to every lamp.
    CurrentChanged {
        current: f64,
    },
    ElementConnected {
        id: ElementId,
    },
}

impl PhysicsEvent {
    pub fn poles(id: ElementId, poles: Poles) -> Self {
        PhysicsEvent::PolesUpdated {
            id,
            pole_n: poles.pole_n,
            pole_s: poles.pole_s,
        }
    }

    pub fn field(id: ElementId, descriptors: &[FieldDescriptor]) -> Self {
        PhysicsEvent::FieldDescriptorsChanged {
            id,
            descriptors: descriptors.to_vec(),
        }
    }

    /// The element the event concerns; `None` for broadcasts.
    pub fn element_id(&self) -> Option<ElementId> {
        match self {
            PhysicsEvent::PolesUpdated { id, .. }
            | PhysicsEvent::FieldDescriptorsChanged { id, .. }
            | PhysicsEvent::LampStateChanged { id, .. }
            | PhysicsEvent::RotationChanged { id, .. }
            | PhysicsEvent::PendulumPositionChanged { id, .. }
            | PhysicsEvent::ElementConnected { id } => Some(*id),
            PhysicsEvent::CurrentChanged { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn inbound_reads_editor_json() {
        let msg: Inbound = serde_json::from_value(json!({
            "type": "positionChanged",
            "id": "magnet_a",
            "position": {"x": 10.0, "y": 20.0},
            "timeMs": 1500.0
        }))
        .unwrap();
        assert_eq!(
            msg,
            Inbound::PositionChanged {
                id: ElementId::intern("magnet_a"),
                position: Point::new(10.0, 20.0),
                time_ms: 1500.0,
            }
        );
    }

    #[test]
    fn link_message_carries_ports() {
        let msg: Inbound = serde_json::from_value(json!({
            "type": "linkValidated",
            "sourceId": "coil_a",
            "targetId": "led_a",
            "sourcePort": "right-port",
            "targetPort": "left-port"
        }))
        .unwrap();
        let Inbound::LinkValidated(link) = msg else {
            panic!("expected a link message");
        };
        assert_eq!(link.source_port.as_deref(), Some("right-port"));
        assert_eq!(link.target_id, ElementId::intern("led_a"));
    }

    #[test]
    fn events_serialise_tagged_camel_case() {
        let event = PhysicsEvent::poles(
            ElementId::intern("m_json"),
            Poles {
                pole_n: Point::new(220.0, 25.0),
                pole_s: Point::new(0.0, 25.0),
            },
        );
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "polesUpdated",
                "id": "m_json",
                "poleN": {"x": 220.0, "y": 25.0},
                "poleS": {"x": 0.0, "y": 25.0}
            })
        );
    }

    #[test]
    fn current_is_a_broadcast() {
        assert_eq!(PhysicsEvent::CurrentChanged { current: 3.0 }.element_id(), None);
        let id = ElementId::intern("lamp_evt");
        assert_eq!(
            PhysicsEvent::LampStateChanged { id, lit: true }.element_id(),
            Some(id)
        );
    }
}
