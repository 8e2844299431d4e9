pub mod bus;
pub mod events;
pub mod session;

pub use bus::{Bus, SubscriptionId};
pub use events::{Inbound, PhysicsEvent};
pub use session::Session;
