//! Player-related components.

use serde::{Deserialize, Serialize};

/// Marker component for the player entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Player;

/// One tick's snapshot of the player's buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Input {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
    /// Light melee
    pub attack: bool,
    pub attack_heavy: bool,
    pub attack_projectile: bool,
    pub attack_up: bool,
    pub attack_spin: bool,
    pub attack_wave: bool,
    pub block: bool,
    pub ability: bool,
}

impl Input {
    /// -1, 0 or 1. Holding both directions cancels out.
    pub fn horizontal(&self) -> f64 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CollectibleKind {
    /// Restores `value` health.
    #[default]
    Health,
    /// Faster movement and attacks for a while.
    Haste,
    /// Much faster attacks for a while.
    Fury,
    /// Adds `value` charge to the ability meter.
    Energy,
}

/// Item picked up when the player's box overlaps it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Collectible {
    pub kind: CollectibleKind,
    pub value: f64,
    /// Respawning pickups stay in the world after use.
    pub respawns: bool,
}

impl Default for Collectible {
    fn default() -> Self {
        Self {
            kind: CollectibleKind::Health,
            value: 10.0,
            respawns: false,
        }
    }
}

/// Charge for the player's special ability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbilityMeter {
    pub current: f64,
    pub max: f64,
    /// Charge gained per second while the ability is idle.
    pub charge_rate: f64,
    /// Set once full; cleared when the ability fires.
    pub ready: bool,
    pub active: bool,
    pub elapsed: f64,
}

impl Default for AbilityMeter {
    fn default() -> Self {
        Self {
            current: 0.0,
            max: 100.0,
            charge_rate: 8.0,
            ready: false,
            active: false,
            elapsed: 0.0,
        }
    }
}

impl AbilityMeter {
    /// Adds charge, capped at `max`.
    pub fn charge(&mut self, amount: f64) {
        self.current = (self.current + amount.max(0.0)).min(self.max);
        if self.current >= self.max {
            self.ready = true;
        }
    }

    pub fn regenerate(&mut self, dt: f64) {
        if !self.active {
            self.charge(self.charge_rate * dt);
        }
    }
}
