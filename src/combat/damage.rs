//! Damage application: blocking, knockback, iframes, stagger and death.

use bevy::log::{debug, info};
use bevy::math::DVec2;

use super::components::{Block, IFrame, Stun};
use crate::core::{DamageEvent, DeathEvent, HitEvent, SimEvent};
use crate::ecs::{ComponentKind, ComponentMask, World};
use crate::physics::{Action, Facing};

/// Blocked directional knockback keeps this share horizontally...
const BLOCKED_KNOCKBACK_X: f64 = 0.35;
/// ...and this share vertically.
const BLOCKED_KNOCKBACK_Y: f64 = 0.5;
/// Blocked radial knockback keeps this share.
const BLOCKED_KNOCKBACK_RADIAL: f64 = 0.3;
/// Default stagger when the victim has no `CombatStats`.
const DEFAULT_STAGGER: f64 = 0.25;

/// What one hit did to its victim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub final_damage: f64,
    pub blocked: bool,
    pub stunned: bool,
    pub killed: bool,
}

/// Whether `block` is ready and `attacker` sits inside its facing cone.
pub fn blocks_from(block: &Block, facing: Facing, victim: DVec2, attacker: DVec2) -> bool {
    if !block.active || block.cooldown_timer > 0.0 {
        return false;
    }
    let to_attacker = (attacker - victim).try_normalize().unwrap_or(DVec2::X * facing.sign());
    let dot = to_attacker.dot(DVec2::new(facing.sign(), 0.0)).clamp(-1.0, 1.0);
    dot.acos().to_degrees() <= block.angle * 0.5
}

/// Knockback velocity for a hit. Waves push radially away from their
/// center; everything else pushes left or right away from the attacker.
pub fn knockback_velocity(
    knockback: DVec2,
    attacker: DVec2,
    victim: DVec2,
    radial: bool,
    blocked: bool,
) -> DVec2 {
    if radial {
        let dir = (victim - attacker).try_normalize().unwrap_or(DVec2::X);
        let magnitude = knockback.x * if blocked { BLOCKED_KNOCKBACK_RADIAL } else { 1.0 };
        DVec2::new(
            dir.x * magnitude,
            dir.y * magnitude * 0.6 + knockback.y * 0.2,
        )
    } else {
        let dir = if victim.x < attacker.x { -1.0 } else { 1.0 };
        DVec2::new(
            knockback.x * dir * if blocked { BLOCKED_KNOCKBACK_X } else { 1.0 },
            knockback.y * if blocked { BLOCKED_KNOCKBACK_Y } else { 1.0 },
        )
    }
}

/// Applies one hit. Returns `None` when the victim cannot take damage.
pub fn apply_hit(world: &mut World, hit: &HitEvent) -> Option<DamageOutcome> {
    let radial = world.has(hit.attacker, ComponentKind::Wave);
    let c = world.components_mut();
    let victim_pos = c.transform.get(hit.victim)?.position();
    let attacker_pos = c
        .transform
        .get(hit.attacker)
        .map_or(victim_pos, |t| t.position());
    let facing = c.character.get(hit.victim).map_or(Facing::Right, |s| s.facing);

    let mut final_damage = hit.damage;
    let mut blocked = false;
    if let Some(block) = c.block.get_mut(hit.victim) {
        if blocks_from(block, facing, victim_pos, attacker_pos) {
            blocked = true;
            block.cooldown_timer = block.cooldown;
            final_damage = (hit.damage * (1.0 - block.reduction)).max(0.0);
        }
    }

    let health = c.health.get_mut(hit.victim)?;
    let was_alive = !health.is_dead();
    health.take_damage(final_damage);
    let remaining = health.current;

    if hit.knockback != DVec2::ZERO {
        if let Some(velocity) = c.velocity.get_mut(hit.victim) {
            let push = knockback_velocity(hit.knockback, attacker_pos, victim_pos, radial, blocked);
            velocity.vx = push.x;
            velocity.vy = push.y;
        }
    }

    if let Some(iframe) = c.iframe.get_mut(hit.victim) {
        iframe.active = true;
        iframe.elapsed = 0.0;
        iframe.flash_timer = 0.0;
        iframe.visible = true;
        if let Some(health) = c.health.get_mut(hit.victim) {
            health.invulnerable = true;
        }
    }

    let mut stunned = false;
    if let (Some(stun), Some(stats)) = (c.stun.get_mut(hit.victim), c.combat_stats.get(hit.victim)) {
        if remaining > 0.0 && final_damage >= stats.stagger_threshold {
            let duration = if stats.stagger_duration > 0.0 {
                stats.stagger_duration
            } else {
                DEFAULT_STAGGER
            };
            stun.apply(duration);
            stunned = true;
            debug!("{} staggered for {:.2}s", hit.victim, duration);
        }
    }

    let killed = was_alive && remaining <= 0.0;
    if killed {
        if let Some(state) = c.character.get_mut(hit.victim) {
            state.action = Action::Dead;
        }
        if let Some(hurtbox) = c.hurtbox.get_mut(hit.victim) {
            hurtbox.active = false;
        }
        if let Some(collider) = c.collider.get_mut(hit.victim) {
            collider.solid = false;
        }
        if let Some(hitbox) = c.hitbox.get_mut(hit.victim) {
            hitbox.deactivate();
        }
        info!("{} killed by {}", hit.victim, hit.attacker);
    }

    Some(DamageOutcome {
        final_damage,
        blocked,
        stunned,
        killed,
    })
}

/// Applies a tick's hits in order and records what happened.
pub fn apply_hits(world: &mut World, hits: &[HitEvent], events: &mut Vec<SimEvent>) {
    for hit in hits {
        let Some(outcome) = apply_hit(world, hit) else {
            continue;
        };
        debug!(
            "{} took {:.1} from {}{}",
            hit.victim,
            outcome.final_damage,
            hit.attacker,
            if outcome.blocked { " (blocked)" } else { "" }
        );
        events.push(SimEvent::Damage(DamageEvent {
            target: hit.victim,
            source: hit.attacker,
            amount: outcome.final_damage,
            blocked: outcome.blocked,
        }));
        if outcome.stunned {
            events.push(SimEvent::Stunned { entity: hit.victim });
        }
        if outcome.killed {
            events.push(SimEvent::Death(DeathEvent {
                entity: hit.victim,
                killed_by: Some(hit.attacker),
            }));
        }
    }
}

/// Ages iframes and flickers visibility; expiry lifts invulnerability
/// unless a buff still grants it.
pub fn update_iframes(world: &mut World, dt: f64) {
    for id in world.query(ComponentMask::from(ComponentKind::IFrame)) {
        let c = world.components_mut();
        let Some(iframe) = c.iframe.get_mut(id) else {
            continue;
        };
        if !iframe.active {
            continue;
        }
        iframe.elapsed += dt;
        if iframe.elapsed >= iframe.duration {
            end_iframe(iframe);
            let buffed = c.buff.get(id).is_some_and(|b| b.active && b.invulnerable);
            if let Some(health) = c.health.get_mut(id) {
                health.invulnerable = buffed;
            }
            continue;
        }
        iframe.flash_timer += dt;
        if iframe.flash_interval > 0.0 && iframe.flash_timer >= iframe.flash_interval {
            iframe.flash_timer = 0.0;
            iframe.visible = !iframe.visible;
        }
    }
}

fn end_iframe(iframe: &mut IFrame) {
    iframe.active = false;
    iframe.visible = true;
    iframe.flash_timer = 0.0;
}

/// Ticks stuns for entities the AI engine does not manage.
pub fn update_stuns(world: &mut World, dt: f64) {
    for id in world.query(ComponentMask::from(ComponentKind::Stun)) {
        if world.has(id, ComponentKind::AiState) {
            continue;
        }
        if let Some(stun) = world.get_mut::<Stun>(id) {
            if stun.stunned {
                stun.elapsed += dt;
                if stun.elapsed >= stun.duration {
                    stun.stunned = false;
                    stun.elapsed = 0.0;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{CombatStats, Health, Hurtbox, Wave};
    use crate::ecs::EntityId;
    use crate::physics::{CharacterState, Collider, Transform, Velocity};

    fn victim(world: &mut World) -> EntityId {
        world
            .spawn()
            .with(Transform::at(0.0, 0.0))
            .with(Velocity::default())
            .with(Health::new(100.0))
            .with(Hurtbox::default())
            .with(Collider::default())
            .with(CharacterState::facing(Facing::Right))
            .with(IFrame::default())
            .id()
    }

    fn hit(attacker: EntityId, victim: EntityId, damage: f64) -> HitEvent {
        HitEvent {
            attacker,
            victim,
            damage,
            knockback: DVec2::new(200.0, -100.0),
        }
    }

    #[test]
    fn cone_check_uses_facing() {
        let block = Block {
            active: true,
            angle: 90.0,
            ..Block::default()
        };
        let me = DVec2::ZERO;
        assert!(blocks_from(&block, Facing::Right, me, DVec2::new(10.0, 5.0)));
        assert!(!blocks_from(&block, Facing::Right, me, DVec2::new(-10.0, 0.0)));
        assert!(blocks_from(&block, Facing::Left, me, DVec2::new(-10.0, 0.0)));

        let cooling = Block {
            cooldown_timer: 0.2,
            ..block
        };
        assert!(!blocks_from(&cooling, Facing::Right, me, DVec2::new(10.0, 0.0)));
    }

    #[test]
    fn directional_knockback_pushes_away_and_softens_when_blocked() {
        let kb = DVec2::new(200.0, -100.0);
        let push = knockback_velocity(kb, DVec2::new(50.0, 0.0), DVec2::ZERO, false, false);
        assert_eq!(push, DVec2::new(-200.0, -100.0));

        let soft = knockback_velocity(kb, DVec2::new(-50.0, 0.0), DVec2::ZERO, false, true);
        assert!((soft - DVec2::new(70.0, -50.0)).length() < 1e-9);
    }

    #[test]
    fn radial_knockback_follows_the_center_line() {
        let kb = DVec2::new(100.0, -50.0);
        let push = knockback_velocity(kb, DVec2::ZERO, DVec2::new(0.0, 10.0), true, false);
        assert!(push.x.abs() < 1e-9);
        assert!((push.y - (60.0 - 10.0)).abs() < 1e-9);
    }

    #[test]
    fn hit_grants_iframes_and_knockback() {
        let mut world = World::new();
        let attacker = world.spawn().with(Transform::at(30.0, 0.0)).id();
        let v = victim(&mut world);

        let outcome = apply_hit(&mut world, &hit(attacker, v, 10.0)).unwrap();

        assert_eq!(outcome.final_damage, 10.0);
        assert!(!outcome.blocked);
        let health = world.get::<Health>(v).unwrap();
        assert_eq!(health.current, 90.0);
        assert!(health.invulnerable);
        assert!(world.get::<IFrame>(v).unwrap().active);
        assert_eq!(world.get::<Velocity>(v).unwrap().vx, -200.0);
    }

    #[test]
    fn wave_attackers_push_radially() {
        let mut world = World::new();
        let wave = world
            .spawn()
            .with(Transform::at(-40.0, 0.0))
            .with(Wave::default())
            .id();
        let v = victim(&mut world);

        apply_hit(&mut world, &hit(wave, v, 1.0)).unwrap();

        let vel = world.get::<Velocity>(v).unwrap();
        assert!((vel.vx - 200.0).abs() < 1e-9);
        assert!((vel.vy - (-20.0)).abs() < 1e-9);
    }

    #[test]
    fn heavy_hits_stagger_living_victims() {
        let mut world = World::new();
        let attacker = world.spawn().with(Transform::at(30.0, 0.0)).id();
        let v = victim(&mut world);
        world.insert(v, Stun::default());
        world.insert(v, CombatStats::default());

        let light = apply_hit(&mut world, &hit(attacker, v, 5.0)).unwrap();
        assert!(!light.stunned);

        let heavy = apply_hit(&mut world, &hit(attacker, v, 20.0)).unwrap();
        assert!(heavy.stunned);
        let stun = world.get::<Stun>(v).unwrap();
        assert!(stun.stunned);
        assert_eq!(stun.duration, CombatStats::default().stagger_duration);
    }

    #[test]
    fn lethal_hit_turns_the_victim_into_a_corpse() {
        let mut world = World::new();
        let attacker = world.spawn().with(Transform::at(30.0, 0.0)).id();
        let v = victim(&mut world);
        let mut events = Vec::new();

        apply_hits(&mut world, &[hit(attacker, v, 150.0)], &mut events);

        assert_eq!(world.get::<Health>(v).unwrap().current, 0.0);
        assert_eq!(world.get::<CharacterState>(v).unwrap().action, Action::Dead);
        assert!(!world.get::<Hurtbox>(v).unwrap().active);
        assert!(!world.get::<Collider>(v).unwrap().solid);
        assert!(events.iter().any(|e| matches!(e, SimEvent::Death(d) if d.entity == v)));
    }

    #[test]
    fn iframes_expire_and_flicker() {
        let mut world = World::new();
        let attacker = world.spawn().with(Transform::at(30.0, 0.0)).id();
        let v = victim(&mut world);
        apply_hit(&mut world, &hit(attacker, v, 1.0));

        update_iframes(&mut world, 0.11);
        assert!(!world.get::<IFrame>(v).unwrap().visible);

        update_iframes(&mut world, 0.5);
        let iframe = world.get::<IFrame>(v).unwrap();
        assert!(!iframe.active);
        assert!(iframe.visible);
        assert!(!world.get::<Health>(v).unwrap().invulnerable);
    }

    #[test]
    fn stuns_without_ai_wear_off() {
        let mut world = World::new();
        let id = world.spawn().with(Stun::default()).id();
        world.get_mut::<Stun>(id).unwrap().apply(0.1);

        update_stuns(&mut world, 0.05);
        assert!(world.get::<Stun>(id).unwrap().stunned);
        update_stuns(&mut world, 0.06);
        assert!(!world.get::<Stun>(id).unwrap().stunned);
    }
}
