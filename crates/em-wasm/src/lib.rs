//! WASM bridge for EM Lab: exposes the physics session to the browser editor.
//!
//! Compiled via `wasm-pack build --target web`. The diagram editor reports
//! positions and links through [`EmLab`] and renders the JSON deltas it gets
//! back: an array of tagged `PhysicsEvent` objects.

use em_core::{ConnectionValidated, ELEMENT_TYPES, ElementId, PhysicsConfig, Point};
use em_editor::{Inbound, PhysicsEvent, Session};
use wasm_bindgen::prelude::*;

/// The main WASM-facing lab controller.
///
/// Holds one physics session. All interaction from the editor JS goes
/// through this struct.
#[wasm_bindgen]
pub struct EmLab {
    session: Session,
}

impl Default for EmLab {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl EmLab {
    /// Create an empty lab with default physics constants.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        // Set up panic hook for better error messages in console
        console_error_panic_hook_setup();

        Self {
            session: Session::default(),
        }
    }

    /// Start a fresh lab with constants from a JSON object; missing keys
    /// keep their defaults. Returns `{"ok":true}` or `{"ok":false,"error":"..."}`.
    pub fn configure(&mut self, config_json: &str) -> String {
        let config = match PhysicsConfig::from_json(config_json) {
            Ok(config) => config,
            Err(e) => return error_json(&e.to_string()),
        };
        match Session::new(config) {
            Ok(session) => {
                log::debug!("lab reconfigured: {:?}", session.config());
                self.session = session;
                r#"{"ok":true}"#.to_string()
            }
            Err(e) => error_json(&e.to_string()),
        }
    }

    /// Create an element at `(x, y)`.
    /// Returns `{"ok":true,"id":"coil_3"}` or `{"ok":false,"error":"..."}`.
    pub fn create_element(&mut self, element_type: &str, x: f64, y: f64) -> String {
        match self.session.create_element(element_type, x, y) {
            Ok(id) => serde_json::json!({ "ok": true, "id": id }).to_string(),
            Err(e) => error_json(&e.to_string()),
        }
    }

    /// Create an element under an id the editor already assigned.
    pub fn create_element_with_id(
        &mut self,
        id: &str,
        element_type: &str,
        x: f64,
        y: f64,
    ) -> String {
        match self.session.create_element_with_id(id, element_type, x, y) {
            Ok(id) => serde_json::json!({ "ok": true, "id": id }).to_string(),
            Err(e) => error_json(&e.to_string()),
        }
    }

    pub fn position_changed(&mut self, id: &str, x: f64, y: f64, time_ms: f64) -> String {
        self.dispatch(Inbound::PositionChanged {
            id: ElementId::intern(id),
            position: Point::new(x, y),
            time_ms,
        })
    }

    pub fn drag_started(&mut self, id: &str, time_ms: f64) -> String {
        self.dispatch(Inbound::DragStarted {
            id: ElementId::intern(id),
            time_ms,
        })
    }

    /// `drag_started` stamped with the browser clock.
    pub fn drag_started_now(&mut self, id: &str) -> String {
        self.drag_started(id, js_sys::Date::now())
    }

    /// `position_changed` stamped with the browser clock.
    pub fn position_changed_now(&mut self, id: &str, x: f64, y: f64) -> String {
        self.position_changed(id, x, y, js_sys::Date::now())
    }

    pub fn drag_ended(&mut self, id: &str) -> String {
        self.dispatch(Inbound::DragEnded {
            id: ElementId::intern(id),
        })
    }

    /// Report a link the editor accepted. Port names may be omitted.
    pub fn link_validated(
        &mut self,
        source_id: &str,
        target_id: &str,
        source_port: Option<String>,
        target_port: Option<String>,
    ) -> String {
        let mut link =
            ConnectionValidated::new(ElementId::intern(source_id), ElementId::intern(target_id));
        link.source_port = source_port;
        link.target_port = target_port;
        self.dispatch(Inbound::LinkValidated(link))
    }

    pub fn link_removed(&mut self, source_id: &str, target_id: &str) -> String {
        self.dispatch(Inbound::LinkRemoved {
            source_id: ElementId::intern(source_id),
            target_id: ElementId::intern(target_id),
        })
    }

    pub fn reverse_polarity(&mut self, id: &str) -> String {
        self.dispatch(Inbound::PolarityReversed {
            id: ElementId::intern(id),
        })
    }

    pub fn toggle_field(&mut self, id: &str) -> String {
        self.dispatch(Inbound::FieldVisibilityToggled {
            id: ElementId::intern(id),
        })
    }

    pub fn reset_rotation(&mut self, id: &str) -> String {
        self.dispatch(Inbound::ResetRotation {
            id: ElementId::intern(id),
        })
    }

    /// Handle any inbound message given as tagged JSON.
    /// Returns the event array, or `{"ok":false,"error":"..."}` if unreadable.
    pub fn handle_json(&mut self, message_json: &str) -> String {
        match serde_json::from_str::<Inbound>(message_json) {
            Ok(message) => self.dispatch(message),
            Err(e) => error_json(&format!("invalid message: {e}")),
        }
    }

    /// Current poles as `{"poleN":{..},"poleS":{..}}`.
    /// Returns `{}` for unknown or non-magnetic elements.
    pub fn poles(&self, id: &str) -> String {
        match self.session.poles(ElementId::intern(id)) {
            Ok(Some(poles)) => serde_json::to_string(&poles).unwrap_or_else(|_| "{}".to_string()),
            _ => "{}".to_string(),
        }
    }

    /// Element type names accepted by `create_element`, as a JSON array.
    pub fn element_types() -> String {
        serde_json::to_string(ELEMENT_TYPES).unwrap_or_else(|_| "[]".to_string())
    }
}

// ─── Private helpers ─────────────────────────────────────────────────────

impl EmLab {
    fn dispatch(&mut self, message: Inbound) -> String {
        log::trace!("inbound {message:?}");
        let events = self.session.handle(message);
        log::trace!("{} events out", events.len());
        events_json(&events)
    }
}

fn events_json(events: &[PhysicsEvent]) -> String {
    serde_json::to_string(events).unwrap_or_else(|_| "[]".to_string())
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "ok": false, "error": message }).to_string()
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("EM Lab WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
