//! Attack triggering and the phase state machine.

use bevy::log::debug;
use serde::{Deserialize, Serialize};

use super::components::{Attack, AttackPhase, BuffState};
use crate::ecs::{ComponentKind, ComponentMask, Components, EntityId, World};

/// Fallback active window when an attack has no duration.
const DEFAULT_ACTIVE_TIME: f64 = 0.2;
/// Fallback recovery when an attack has no recovery.
const DEFAULT_RECOVERY_TIME: f64 = 0.1;

/// Hitbox placement for a melee profile, for a right-facing attacker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitboxShape {
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
    pub hit_once: bool,
}

impl Default for HitboxShape {
    fn default() -> Self {
        Self {
            offset_x: 60.0,
            offset_y: 30.0,
            width: 70.0,
            height: 90.0,
            hit_once: true,
        }
    }
}

/// A named melee move: damage, timings and hitbox.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackProfile {
    pub damage: f64,
    pub knockback_x: f64,
    pub knockback_y: f64,
    pub cooldown: f64,
    pub windup: f64,
    pub duration: f64,
    pub recovery: f64,
    pub hitbox: HitboxShape,
}

impl Default for AttackProfile {
    fn default() -> Self {
        Self {
            damage: 18.0,
            knockback_x: 140.0,
            knockback_y: -60.0,
            cooldown: 0.1,
            windup: 0.03,
            duration: 0.05,
            recovery: 0.04,
            hitbox: HitboxShape::default(),
        }
    }
}

/// Attack-speed scaling from an active buff; below 1 is faster.
pub fn attack_speed_multiplier(c: &Components, id: EntityId) -> f64 {
    c.buff
        .get(id)
        .filter(|b| b.active)
        .map_or(1.0, |b: &BuffState| b.attack_speed_multiplier)
}

/// True when the entity has an `Attack` that is off cooldown and idle.
pub fn can_attack(world: &World, id: EntityId) -> bool {
    world.get::<Attack>(id).is_some_and(Attack::can_attack)
}

/// Starts the entity's configured attack, refreshed from its
/// `CombatStats` when it has them. Returns `false` when not ready.
pub fn trigger_attack(world: &mut World, id: EntityId) -> bool {
    if !can_attack(world, id) {
        return false;
    }
    let c = world.components_mut();
    if let (Some(attack), Some(stats)) = (c.attack.get_mut(id), c.combat_stats.get(id)) {
        attack.cooldown_max = stats.attack_cooldown;
        attack.damage = stats.damage;
        attack.knockback_x = stats.knockback_x;
        attack.knockback_y = stats.knockback_y;
        attack.range = stats.attack_range;
        attack.windup = stats.attack_windup;
        attack.duration = stats.attack_duration;
    }
    begin_attack(world, id)
}

/// Starts an attack using a melee profile's numbers and hitbox.
pub fn trigger_attack_with_profile(world: &mut World, id: EntityId, profile: &AttackProfile) -> bool {
    if !can_attack(world, id) {
        return false;
    }
    let c = world.components_mut();
    if let Some(attack) = c.attack.get_mut(id) {
        attack.cooldown_max = profile.cooldown;
        attack.damage = profile.damage;
        attack.knockback_x = profile.knockback_x;
        attack.knockback_y = profile.knockback_y;
        attack.windup = profile.windup;
        attack.duration = profile.duration;
        attack.recovery = profile.recovery;
    }
    if let Some(hitbox) = c.hitbox.get_mut(id) {
        let shape = &profile.hitbox;
        hitbox.offset.x = shape.offset_x;
        hitbox.offset.y = shape.offset_y;
        hitbox.size.x = shape.width;
        hitbox.size.y = shape.height;
        hitbox.hit_once = shape.hit_once;
    }
    begin_attack(world, id)
}

/// Consumes the attack cooldown without running the melee phases, for
/// moves that spawn their own damage carrier. Returns `false` when not ready.
pub fn spend_cooldown(world: &mut World, id: EntityId, cooldown: f64) -> bool {
    if !can_attack(world, id) {
        return false;
    }
    let c = world.components_mut();
    let mult = attack_speed_multiplier(c, id);
    match c.attack.get_mut(id) {
        Some(attack) => {
            attack.cooldown = cooldown * mult;
            true
        }
        None => false,
    }
}

fn begin_attack(world: &mut World, id: EntityId) -> bool {
    let c = world.components_mut();
    let mult = attack_speed_multiplier(c, id);
    let Some(attack) = c.attack.get_mut(id) else {
        return false;
    };
    attack.is_attacking = true;
    attack.phase = AttackPhase::Windup;
    attack.phase_timer = attack.windup * mult;
    attack.cooldown = attack.cooldown_max * mult;
    attack.speed_multiplier = mult;

    if let Some(hitbox) = c.hitbox.get_mut(id) {
        hitbox.damage = attack.damage;
        hitbox.knockback_x = attack.knockback_x;
        hitbox.knockback_y = attack.knockback_y;
    }
    debug!("{} attack started (damage {})", id, attack.damage);
    true
}

/// Advances attack phases by one step each; an expired timer moves the
/// attack to its next phase.
pub fn update_attack_phases(world: &mut World, dt: f64) {
    for id in world.query(ComponentMask::from(ComponentKind::Attack)) {
        let c = world.components_mut();
        let Some(attack) = c.attack.get_mut(id) else {
            continue;
        };
        if attack.phase == AttackPhase::Idle {
            attack.phase_timer = 0.0;
            continue;
        }

        attack.phase_timer -= dt;
        if attack.phase_timer > 0.0 {
            continue;
        }

        let mult = attack.speed_multiplier;
        match attack.phase {
            AttackPhase::Windup => {
                let active_time = if attack.duration > 0.0 {
                    attack.duration
                } else {
                    DEFAULT_ACTIVE_TIME
                };
                if let Some(hitbox) = c.hitbox.get_mut(id) {
                    hitbox.damage = attack.damage;
                    hitbox.knockback_x = attack.knockback_x;
                    hitbox.knockback_y = attack.knockback_y;
                    hitbox.activate(active_time * mult);
                }
                attack.phase = AttackPhase::Active;
                attack.phase_timer = active_time * mult;
            }
            AttackPhase::Active => {
                if let Some(hitbox) = c.hitbox.get_mut(id) {
                    hitbox.deactivate();
                }
                let recovery = if attack.recovery > 0.0 {
                    attack.recovery
                } else {
                    DEFAULT_RECOVERY_TIME
                };
                attack.phase = AttackPhase::Recovery;
                attack.phase_timer = recovery * mult;
            }
            AttackPhase::Recovery => {
                attack.phase = AttackPhase::Idle;
                attack.phase_timer = 0.0;
                attack.is_attacking = false;
            }
            AttackPhase::Idle => {}
        }
    }
}

/// Counts attack cooldowns down to zero.
pub fn tick_attack_cooldowns(world: &mut World, dt: f64) {
    for id in world.query(ComponentMask::from(ComponentKind::Attack)) {
        if let Some(attack) = world.get_mut::<Attack>(id) {
            attack.cooldown = (attack.cooldown - dt).max(0.0);
        }
    }
}
