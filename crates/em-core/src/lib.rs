pub mod compass;
pub mod config;
pub mod connect;
pub mod current;
pub mod error;
pub mod factory;
pub mod field;
pub mod geometry;
pub mod id;
pub mod model;
pub mod motion;
pub mod pendulum;
pub mod poles;

pub use compass::{CompassState, bearing};
pub use config::{MAX_ARC_COUNT, PhysicsConfig};
pub use connect::{Connectable, ConnectionState, ConnectionValidated};
pub use current::{LampPolarity, LampState, compute_current};
pub use error::{CoreError, Result};
pub use factory::{ELEMENT_TYPES, ElementFactory};
pub use field::{ArcLine, Field, FieldDescriptor, FieldEmitter, FieldStyle, StraightLine, generate_field};
pub use geometry::{Bounds, Point, Size};
pub use id::ElementId;
pub use model::*;
pub use motion::SpeedTracker;
pub use pendulum::{PendulumState, net_force, rest_x};
pub use poles::{HasPoles, PoleLayout, Poles, ambient_poles, update_poles};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
