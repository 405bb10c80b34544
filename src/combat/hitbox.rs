//! Hitbox lifetime and hitbox-vs-hurtbox overlap detection.

use bevy::math::DVec2;

use super::components::{Hitbox, Hurtbox, TeamId};
use crate::core::HitEvent;
use crate::ecs::{ComponentKind, ComponentMask, EntityId, World};
use crate::physics::{Facing, Rect, Transform};

/// World-space rectangle of a hitbox, mirrored for left-facing owners.
pub fn hitbox_rect(transform: &Transform, hitbox: &Hitbox, facing: Facing) -> Rect {
    let offset_x = match facing {
        Facing::Right => hitbox.offset.x,
        Facing::Left => -hitbox.offset.x - hitbox.size.x,
    };
    Rect::new(
        transform.x + offset_x,
        transform.y + hitbox.offset.y,
        hitbox.size.x,
        hitbox.size.y,
    )
}

pub fn hurtbox_rect(transform: &Transform, hurtbox: &Hurtbox) -> Rect {
    Rect::new(
        transform.x + hurtbox.offset.x,
        transform.y + hurtbox.offset.y,
        hurtbox.size.x,
        hurtbox.size.y,
    )
}

/// A hurtbox that can currently take hits.
struct Target {
    id: EntityId,
    team: TeamId,
    rect: Rect,
}

fn vulnerable_targets(world: &World) -> Vec<Target> {
    let required = ComponentMask::of(&[
        ComponentKind::Transform,
        ComponentKind::Hurtbox,
        ComponentKind::Health,
        ComponentKind::Team,
    ]);
    let c = world.components();
    world
        .query(required)
        .into_iter()
        .filter_map(|id| {
            let hurtbox = c.hurtbox.get(id)?;
            let health = c.health.get(id)?;
            let shielded = c.iframe.get(id).is_some_and(|f| f.active);
            if !hurtbox.active || health.invulnerable || shielded {
                return None;
            }
            Some(Target {
                id,
                team: c.team.get(id)?.id,
                rect: hurtbox_rect(c.transform.get(id)?, hurtbox),
            })
        })
        .collect()
}

/// Ages active hitboxes and reports every new overlap with an opposing,
/// vulnerable hurtbox.
///
/// A `hit_once` hitbox records each victim and skips it for the rest of
/// the activation window.
pub fn detect_hits(world: &mut World, dt: f64) -> Vec<HitEvent> {
    let targets = vulnerable_targets(world);
    let required = ComponentMask::of(&[
        ComponentKind::Transform,
        ComponentKind::Hitbox,
        ComponentKind::Team,
    ]);
    let mut events = Vec::new();

    for id in world.query(required) {
        let c = world.components_mut();
        let (Some(hitbox), Some(transform), Some(team)) =
            (c.hitbox.get_mut(id), c.transform.get(id), c.team.get(id))
        else {
            continue;
        };
        if !hitbox.active {
            continue;
        }

        hitbox.elapsed += dt;
        if hitbox.elapsed >= hitbox.duration {
            hitbox.deactivate();
            continue;
        }

        let facing = c.character.get(id).map_or(Facing::Right, |s| s.facing);
        let rect = hitbox_rect(transform, hitbox, facing);

        for target in &targets {
            if target.id == id || target.team == team.id {
                continue;
            }
            if hitbox.hit_once && hitbox.hit_entities.contains(&target.id) {
                continue;
            }
            if !rect.overlaps(&target.rect) {
                continue;
            }
            if hitbox.hit_once {
                hitbox.hit_entities.insert(target.id);
            }
            events.push(HitEvent {
                attacker: id,
                victim: target.id,
                damage: hitbox.damage,
                knockback: DVec2::new(hitbox.knockback_x, hitbox.knockback_y),
            });
        }
    }
    events
}
