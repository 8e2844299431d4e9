//! Connectivity latch.
//!
//! Each connectable element counts the validated links that touch it. Once
//! the count reaches the element's terminal count the element is connected
//! for the rest of the session. Removing a link never lowers the count.

use crate::id::ElementId;
use serde::{Deserialize, Serialize};

/// Payload of a validated link between two element ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionValidated {
    pub source_id: ElementId,
    pub target_id: ElementId,
    pub source_port: Option<String>,
    pub target_port: Option<String>,
}

impl ConnectionValidated {
    pub fn new(source_id: ElementId, target_id: ElementId) -> Self {
        Self {
            source_id,
            target_id,
            source_port: None,
            target_port: None,
        }
    }

    pub fn with_ports(mut self, source_port: &str, target_port: &str) -> Self {
        self.source_port = Some(source_port.to_string());
        self.target_port = Some(target_port.to_string());
        self
    }

    /// Whether `id` is one of the two endpoints.
    pub fn involves(&self, id: ElementId) -> bool {
        self.source_id == id || self.target_id == id
    }
}

/// Per-element link counter and one-way connected flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionState {
    pub connect_count: u32,
    pub is_connected: bool,
    /// Links needed before the latch closes (one per terminal).
    pub terminals: u32,
}

impl ConnectionState {
    pub fn new(terminals: u32) -> Self {
        Self {
            connect_count: 0,
            is_connected: false,
            terminals,
        }
    }

    /// Count one validated link for `element`.
    ///
    /// Returns `true` only on the call that closes the latch.
    pub fn on_link_validated(&mut self, element: ElementId, link: &ConnectionValidated) -> bool {
        if !link.involves(element) || self.terminals == 0 {
            return false;
        }
        self.connect_count += 1;
        if !self.is_connected && self.connect_count == self.terminals {
            self.is_connected = true;
            log::debug!(
                "{element} connected after {} validated links",
                self.connect_count
            );
            return true;
        }
        false
    }
}

/// Capability: the element has terminals that can be wired.
pub trait Connectable {
    fn connection(&self) -> Option<&ConnectionState>;

    fn is_connected(&self) -> bool {
        self.connection().is_some_and(|c| c.is_connected)
    }

    /// Feed a validated link. Returns `true` if this closed the latch.
    fn on_link_validated(&mut self, link: &ConnectionValidated) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_closes_on_second_link() {
        let coil = ElementId::intern("latch_coil");
        let supply = ElementId::intern("latch_supply");
        let mut state = ConnectionState::new(2);
        let link = ConnectionValidated::new(coil, supply);

        assert!(!state.on_link_validated(coil, &link));
        assert!(!state.is_connected);
        assert!(state.on_link_validated(coil, &link));
        assert!(state.is_connected);
    }

    #[test]
    fn latch_is_monotonic() {
        let lamp = ElementId::intern("mono_lamp");
        let other = ElementId::intern("mono_other");
        let mut state = ConnectionState::new(2);
        let link = ConnectionValidated::new(other, lamp);

        for _ in 0..2 {
            state.on_link_validated(lamp, &link);
        }
        for _ in 0..5 {
            assert!(!state.on_link_validated(lamp, &link));
            assert!(state.is_connected);
        }
        assert_eq!(state.connect_count, 7);
    }

    #[test]
    fn unrelated_links_are_ignored() {
        let lamp = ElementId::intern("ignored_lamp");
        let link = ConnectionValidated::new(
            ElementId::intern("ignored_a"),
            ElementId::intern("ignored_b"),
        );
        let mut state = ConnectionState::new(2);
        state.on_link_validated(lamp, &link);
        state.on_link_validated(lamp, &link);
        assert_eq!(state.connect_count, 0);
        assert!(!state.is_connected);
    }

    #[test]
    fn single_terminal_latches_immediately() {
        let magnet = ElementId::intern("single_magnet");
        let pivot = ElementId::intern("single_pivot");
        let mut state = ConnectionState::new(1);
        let link = ConnectionValidated::new(pivot, magnet).with_ports("pivot-port", "top-port");
        assert!(state.on_link_validated(magnet, &link));
        assert!(state.is_connected);
    }
}
