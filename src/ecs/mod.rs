//! Entity/component store.
//!
//! Entities are bare ids with a presence bitmask; components are plain
//! structs kept in one dense store per kind. Queries are bitmask ANDs.

mod archetype;
mod entity;
mod mask;
mod storage;
mod world;

pub use archetype::Archetype;
pub use entity::EntityId;
pub use mask::{ComponentKind, ComponentMask};
pub use storage::ComponentStore;
pub use world::{Component, Components, EntityBuilder, World};
