//! Timed buffs from pickups.

use super::components::BuffState;
use crate::ecs::{ComponentKind, ComponentMask, EntityId, World};

/// Starts (or restarts) a buff, attaching `BuffState` if missing.
pub fn apply_buff(world: &mut World, id: EntityId, buff: BuffState) {
    let buff = BuffState {
        active: true,
        elapsed: 0.0,
        ..buff
    };
    if !world.insert(id, buff) {
        return;
    }
    if buff.invulnerable {
        if let Some(health) = world.get_mut::<super::components::Health>(id) {
            health.invulnerable = true;
        }
    }
}

/// Ages buffs; expiry resets the multipliers and lifts invulnerability.
pub fn update_buffs(world: &mut World, dt: f64) {
    for id in world.query(ComponentMask::from(ComponentKind::BuffState)) {
        let c = world.components_mut();
        let Some(buff) = c.buff.get_mut(id) else {
            continue;
        };
        if !buff.active {
            continue;
        }
        buff.elapsed += dt;
        if buff.elapsed >= buff.duration {
            *buff = BuffState::default();
            let flashing = c.iframe.get(id).is_some_and(|f| f.active);
            if let Some(health) = c.health.get_mut(id) {
                health.invulnerable = flashing;
            }
        } else if buff.invulnerable {
            if let Some(health) = c.health.get_mut(id) {
                health.invulnerable = true;
            }
        }
    }
}
