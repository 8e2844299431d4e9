//! Typed publish/subscribe bus.
//!
//! The physics session publishes every outbound event here so the host (the
//! WASM bridge, a test, a logger) can listen without the session knowing who
//! is listening. Handlers run synchronously, in subscription order.

use std::fmt;

/// Handle returned by [`Bus::subscribe`]; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<M> = Box<dyn FnMut(&M)>;

/// A bus carrying messages of one type `M`.
pub struct Bus<M> {
    handlers: Vec<(SubscriptionId, Handler<M>)>,
    next_id: u64,
}

impl<M> Default for Bus<M> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
            next_id: 1,
        }
    }
}

impl<M> fmt::Debug for Bus<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("handlers", &format!("{} handlers", self.handlers.len()))
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl<M> Bus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for every future message.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&M) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        log::debug!("bus subscriber {} registered", id.0);
        id
    }

    /// Remove a handler. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sub, _)| *sub != id);
        before != self.handlers.len()
    }

    /// Deliver `message` to every handler. Returns how many were reached.
    pub fn publish(&mut self, message: &M) -> usize {
        for (_, handler) in &mut self.handlers {
            handler(message);
        }
        self.handlers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}
