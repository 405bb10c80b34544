//! Collectible pickup on overlap with the player.

use bevy::log::debug;

use super::components::{AbilityMeter, Collectible, CollectibleKind};
use crate::combat::{apply_buff, BuffState, Health};
use crate::core::SimEvent;
use crate::ecs::{ComponentKind, ComponentMask, EntityId, World};
use crate::physics::{Aabb, CharacterState, Transform};

/// Buff granted by a timed pickup.
fn buff_for(kind: CollectibleKind) -> Option<BuffState> {
    match kind {
        CollectibleKind::Health | CollectibleKind::Energy => None,
        CollectibleKind::Haste => Some(BuffState {
            duration: 5.0,
            speed_multiplier: 1.3,
            attack_speed_multiplier: 0.85,
            ..BuffState::default()
        }),
        CollectibleKind::Fury => Some(BuffState {
            duration: 4.0,
            speed_multiplier: 1.0,
            attack_speed_multiplier: 0.7,
            ..BuffState::default()
        }),
    }
}

fn consume(world: &mut World, player: EntityId, item: &Collectible) {
    match item.kind {
        CollectibleKind::Health => {
            if let Some(health) = world.get_mut::<Health>(player) {
                health.heal(item.value);
            }
        }
        CollectibleKind::Energy => {
            if let Some(meter) = world.get_mut::<AbilityMeter>(player) {
                meter.charge(item.value);
            }
        }
        kind => {
            if let Some(buff) = buff_for(kind) {
                apply_buff(world, player, buff);
            }
        }
    }
}

/// Hands every pickup the living player overlaps to the player.
/// Non-respawning pickups are destroyed once used.
pub fn collect_pickups(world: &mut World, events: &mut Vec<SimEvent>) {
    let Some(player) = world.player() else {
        return;
    };
    if world.get::<CharacterState>(player).is_some_and(CharacterState::is_dead) {
        return;
    }
    let (Some(transform), Some(aabb)) = (world.get::<Transform>(player), world.get::<Aabb>(player)) else {
        return;
    };
    let reach = aabb.rect(transform);

    let required = ComponentMask::of(&[
        ComponentKind::Transform,
        ComponentKind::Aabb,
        ComponentKind::Collectible,
    ]);
    for item in world.query(required) {
        let c = world.components();
        let (Some(t), Some(a), Some(collectible)) =
            (c.transform.get(item), c.aabb.get(item), c.collectible.get(item).copied())
        else {
            continue;
        };
        if !a.rect(t).overlaps(&reach) {
            continue;
        }

        consume(world, player, &collectible);
        debug!("{} collected {:?} from {}", player, collectible.kind, item);
        events.push(SimEvent::Collected {
            collector: player,
            item,
            kind: collectible.kind,
        });
        if !collectible.respawns {
            world.destroy_entity(item);
        }
    }
}
