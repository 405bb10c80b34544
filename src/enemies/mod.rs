//! Enemies module - enemy data, prefabs, and density-driven spawning.

pub mod data;
mod director;
mod prefabs;

pub use data::{EnemyDefinition, EnemyRegistry};
pub use director::{SpawnConfig, SpawnDirector};
pub use prefabs::spawn_enemy;
