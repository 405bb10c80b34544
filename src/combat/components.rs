//! Combat-related components.

use std::collections::HashSet;

use bevy::math::DVec2;
use serde::{Deserialize, Serialize};

use crate::ecs::EntityId;

/// Component for entities that can take damage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: f64,
    pub max: f64,
    /// Set while iframes or a buff make the entity immune.
    pub invulnerable: bool,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f64) -> Self {
        Self {
            current: max,
            max,
            invulnerable: false,
        }
    }

    /// Returns the damage actually taken; `current` never drops below zero.
    pub fn take_damage(&mut self, amount: f64) -> f64 {
        let actual = amount.max(0.0).min(self.current);
        self.current -= actual;
        actual
    }

    pub fn heal(&mut self, amount: f64) -> f64 {
        let actual = amount.max(0.0).min(self.max - self.current);
        self.current += actual;
        actual
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn fraction(&self) -> f64 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TeamId {
    Player,
    #[default]
    Enemy,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Team {
    pub id: TeamId,
}

impl Team {
    pub fn new(id: TeamId) -> Self {
        Self { id }
    }
}

/// Damage-dealing rectangle, offset from the owner's transform.
///
/// `offset.x` is given for a right-facing owner and mirrored when the
/// owner faces left.
#[derive(Debug, Clone, PartialEq)]
pub struct Hitbox {
    pub active: bool,
    pub damage: f64,
    pub knockback_x: f64,
    pub knockback_y: f64,
    /// When set, each victim is hit at most once per activation.
    pub hit_once: bool,
    pub hit_entities: HashSet<EntityId>,
    pub offset: DVec2,
    /// Width and height.
    pub size: DVec2,
    pub duration: f64,
    pub elapsed: f64,
}

impl Default for Hitbox {
    fn default() -> Self {
        Self {
            active: false,
            damage: 10.0,
            knockback_x: 0.0,
            knockback_y: 0.0,
            hit_once: true,
            hit_entities: HashSet::new(),
            offset: DVec2::ZERO,
            size: DVec2::new(32.0, 32.0),
            duration: 0.2,
            elapsed: 0.0,
        }
    }
}

impl Hitbox {
    /// Opens a fresh activation window.
    pub fn activate(&mut self, duration: f64) {
        self.active = true;
        self.duration = duration;
        self.elapsed = 0.0;
        self.hit_entities.clear();
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.elapsed = 0.0;
        self.hit_entities.clear();
    }
}

/// Damage-receiving rectangle, offset from the owner's transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hurtbox {
    pub active: bool,
    pub offset: DVec2,
    pub size: DVec2,
}

impl Default for Hurtbox {
    fn default() -> Self {
        Self {
            active: true,
            offset: DVec2::ZERO,
            size: DVec2::new(32.0, 32.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttackPhase {
    #[default]
    Idle,
    Windup,
    Active,
    Recovery,
}

/// Attack timing state machine: idle → windup → active → recovery → idle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attack {
    pub is_attacking: bool,
    pub phase: AttackPhase,
    pub phase_timer: f64,
    pub cooldown: f64,
    pub cooldown_max: f64,
    pub damage: f64,
    pub range: f64,
    pub knockback_x: f64,
    pub knockback_y: f64,
    pub windup: f64,
    pub recovery: f64,
    pub duration: f64,
    /// Multiplier captured when the attack started; scales later phases.
    pub speed_multiplier: f64,
}

impl Default for Attack {
    fn default() -> Self {
        Self {
            is_attacking: false,
            phase: AttackPhase::Idle,
            phase_timer: 0.0,
            cooldown: 0.0,
            cooldown_max: 0.5,
            damage: 10.0,
            range: 100.0,
            knockback_x: 160.0,
            knockback_y: -90.0,
            windup: 0.1,
            recovery: 0.1,
            duration: 0.2,
            speed_multiplier: 1.0,
        }
    }
}

impl Attack {
    /// Ready when off cooldown and not mid-swing.
    pub fn can_attack(&self) -> bool {
        self.cooldown <= 0.0 && !self.is_attacking
    }
}

/// Post-hit invulnerability window with a visibility flicker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IFrame {
    pub active: bool,
    pub duration: f64,
    pub elapsed: f64,
    pub flash_interval: f64,
    pub flash_timer: f64,
    pub visible: bool,
}

impl Default for IFrame {
    fn default() -> Self {
        Self {
            active: false,
            duration: 0.5,
            elapsed: 0.0,
            flash_interval: 0.1,
            flash_timer: 0.0,
            visible: true,
        }
    }
}

/// Directional guard that reduces incoming damage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub active: bool,
    /// Full cone width in degrees, centered on the facing direction.
    pub angle: f64,
    /// Fraction of damage removed by a successful block.
    pub reduction: f64,
    pub cooldown: f64,
    pub cooldown_timer: f64,
    /// How long a raised guard stays up.
    pub window: f64,
    pub window_timer: f64,
}

impl Default for Block {
    fn default() -> Self {
        Self {
            active: false,
            angle: 150.0,
            reduction: 0.5,
            cooldown: 1.2,
            cooldown_timer: 0.0,
            window: 0.6,
            window_timer: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stun {
    pub stunned: bool,
    pub duration: f64,
    pub elapsed: f64,
}

impl Stun {
    pub fn apply(&mut self, duration: f64) {
        self.stunned = true;
        self.duration = duration;
        self.elapsed = 0.0;
    }
}

/// Tuning shared by an entity's attacks, movement and stagger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatStats {
    pub move_speed: f64,
    pub run_speed: f64,
    pub attack_cooldown: f64,
    pub attack_windup: f64,
    pub attack_duration: f64,
    pub attack_range: f64,
    pub damage: f64,
    pub knockback_x: f64,
    pub knockback_y: f64,
    /// Hits at or above this damage stun.
    pub stagger_threshold: f64,
    pub stagger_duration: f64,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self {
            move_speed: 320.0,
            run_speed: 420.0,
            attack_cooldown: 0.9,
            attack_windup: 0.2,
            attack_duration: 0.18,
            attack_range: 110.0,
            damage: 14.0,
            knockback_x: 160.0,
            knockback_y: -90.0,
            stagger_threshold: 8.0,
            stagger_duration: 0.25,
        }
    }
}

/// Timed stat modifiers from pickups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuffState {
    pub active: bool,
    pub elapsed: f64,
    pub duration: f64,
    pub speed_multiplier: f64,
    /// Below 1 means faster attacks.
    pub attack_speed_multiplier: f64,
    pub invulnerable: bool,
}

impl Default for BuffState {
    fn default() -> Self {
        Self {
            active: false,
            elapsed: 0.0,
            duration: 0.0,
            speed_multiplier: 1.0,
            attack_speed_multiplier: 1.0,
            invulnerable: false,
        }
    }
}

/// Flying damage carrier with a limited lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub lifetime: f64,
    pub elapsed: f64,
    pub gravity: f64,
    pub owner: Option<EntityId>,
}

impl Default for Projectile {
    fn default() -> Self {
        Self {
            lifetime: 2.5,
            elapsed: 0.0,
            gravity: 0.0,
            owner: None,
        }
    }
}

/// Expanding ring whose hitbox grows with its radius. Knockback from a
/// wave pushes radially away from its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wave {
    pub radius: f64,
    pub max_radius: f64,
    pub growth_rate: f64,
}

impl Default for Wave {
    fn default() -> Self {
        Self {
            radius: 0.0,
            max_radius: 360.0,
            growth_rate: 750.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_clamps_to_bounds() {
        let mut health = Health::new(50.0);
        assert_eq!(health.take_damage(80.0), 50.0);
        assert_eq!(health.current, 0.0);
        assert!(health.is_dead());

        assert_eq!(health.heal(70.0), 50.0);
        assert_eq!(health.current, 50.0);
        assert_eq!(health.take_damage(-5.0), 0.0);
    }

    #[test]
    fn hitbox_activation_resets_hit_memory() {
        let mut hitbox = Hitbox::default();
        hitbox.hit_entities.insert(crate::ecs::World::new().create_entity());
        hitbox.elapsed = 0.1;

        hitbox.activate(0.3);
        assert!(hitbox.active);
        assert!(hitbox.hit_entities.is_empty());
        assert_eq!(hitbox.elapsed, 0.0);
        assert_eq!(hitbox.duration, 0.3);
    }
}
