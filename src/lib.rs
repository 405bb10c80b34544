//! Platformer Core - the headless simulation behind a 2D action-platformer.
//!
//! Rendering, audio and level generation live elsewhere; this crate owns
//! the rules of the world and advances them on a fixed timestep.
//!
//! # Architecture
//!
//! The simulation is organized into modules, each handling one stage of a tick:
//!
//! - **Ecs**: Entity ids, component stores, bitmask queries
//! - **Level**: Tile geometry behind the `TileProvider` interface
//! - **Player**: Input, melee/projectile/wave attacks, pickups
//! - **Ai**: Perception and the enemy behavior state machine
//! - **Physics**: Velocity integration, oscillators, tile collision
//! - **Combat**: Hitboxes, damage, blocking, stun, buffs, projectiles
//! - **Enemies**: Data-driven enemy definitions and the spawn director
//! - **Core**: Configuration, the fixed-step clock, events and the tick driver
//!
//! Each tick runs input, AI, movement patterns, physics, collision, combat
//! and bookkeeping in that order; see [`core::Simulation::tick`].

pub mod ai;
pub mod combat;
pub mod core;
pub mod ecs;
pub mod enemies;
pub mod level;
pub mod physics;
pub mod player;

pub use crate::core::{PlatformerPlugin, PlayerInput, SimConfig, SimEvent, Simulation};
