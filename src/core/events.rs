//! Events produced by a simulation tick.
//!
//! Systems push `SimEvent`s into the tick's event buffer. The host drains
//! the buffer after stepping, and the plugin forwards each one as a bevy
//! event so observers never have to poll the world.

use bevy::math::DVec2;
use bevy::prelude::Event;

use crate::ecs::EntityId;
use crate::player::CollectibleKind;

/// One hitbox overlapping one hurtbox, before block and damage rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEvent {
    pub attacker: EntityId,
    pub victim: EntityId,
    pub damage: f64,
    /// Right-facing knockback; mirrored or made radial when applied.
    pub knockback: DVec2,
}

/// Sent when an entity takes damage.
#[derive(Debug, Clone, Copy, PartialEq, Event)]
pub struct DamageEvent {
    /// Entity receiving damage
    pub target: EntityId,
    /// Entity whose hitbox landed
    pub source: EntityId,
    /// Damage after block reduction
    pub amount: f64,
    pub blocked: bool,
}

/// Sent when an entity dies (health reaches 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Event)]
pub struct DeathEvent {
    /// Entity that died
    pub entity: EntityId,
    /// Entity that killed them (if any)
    pub killed_by: Option<EntityId>,
}

/// Everything a tick can report.
#[derive(Debug, Clone, Copy, PartialEq, Event)]
pub enum SimEvent {
    Damage(DamageEvent),
    Death(DeathEvent),
    Stunned {
        entity: EntityId,
    },
    /// A pickup was consumed (or used, for respawning pickups).
    Collected {
        collector: EntityId,
        item: EntityId,
        kind: CollectibleKind,
    },
    /// The player spent a full ability meter.
    AbilityActivated {
        entity: EntityId,
    },
    /// The spawn director placed a new enemy.
    Spawned {
        entity: EntityId,
    },
}
