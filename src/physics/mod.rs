//! Movement: velocity integration, oscillators and tile collision.

mod collision;
mod components;
mod integrator;
mod pattern;

pub use collision::{resolve_body, resolve_collisions};
pub use components::*;
pub use integrator::{approach, integrate_velocities};
pub use pattern::drive_patterns;
