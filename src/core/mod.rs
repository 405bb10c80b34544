//! Core simulation module - configuration, clock, events and the tick driver.
//!
//! Everything else in the crate is a set of free functions over the
//! [`World`](crate::ecs::World); [`Simulation`] is what calls them in order.

mod clock;
mod config;
mod context;
mod error;
mod events;
mod plugin;
mod simulation;

pub use clock::FixedStepClock;
pub use config::{CollisionConfig, JumpPolicy, PhysicsConfig, SimConfig, TimingConfig};
pub use context::{DebugFlags, SimContext};
pub use error::ConfigError;
pub use events::*;
pub use plugin::{PlatformerPlugin, PlayerInput};
pub use simulation::Simulation;
