//! AI-related components.

use std::f64::consts::PI;

use bevy::math::DVec2;
use serde::{Deserialize, Serialize};

use crate::ecs::EntityId;

/// Behavior state. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AiMode {
    #[default]
    Idle,
    Patrol,
    /// Walking to where the target was last seen.
    Investigate,
    Chase,
    Attack,
    Retreat,
    Stunned,
}

impl AiMode {
    pub fn label(self) -> &'static str {
        match self {
            AiMode::Idle => "idle",
            AiMode::Patrol => "patrol",
            AiMode::Investigate => "investigate",
            AiMode::Chase => "chase",
            AiMode::Attack => "attack",
            AiMode::Retreat => "retreat",
            AiMode::Stunned => "stunned",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AiState {
    pub mode: AiMode,
    pub target: Option<EntityId>,
    /// Seconds spent in the current mode.
    pub state_time: f64,
    pub last_seen: Option<DVec2>,
    /// Smoothed detection confidence, always within `[0, 1]`.
    pub alert_level: f64,
    /// Read by debug overlays.
    pub debug_label: &'static str,
}

impl AiState {
    /// Switches mode, restarting `state_time` only on an actual change.
    /// Returns whether the mode changed.
    pub fn set_mode(&mut self, mode: AiMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        self.state_time = 0.0;
        true
    }
}

/// Senses of an AI entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Perception {
    pub sight_range: f64,
    /// Detection radius that ignores the field of view.
    pub peripheral_range: f64,
    pub hearing_range: f64,
    /// Full field-of-view angle, in radians.
    pub fov: f64,
    /// Seconds of lost contact for alert to drain from 1 to 0.
    pub lose_sight_time: f64,
    /// Seconds of contact for alert to fill from 0 to 1.
    pub check_interval: f64,
    /// Seconds since the target was last perceived.
    #[serde(skip)]
    pub check_timer: f64,
}

impl Default for Perception {
    fn default() -> Self {
        Self {
            sight_range: 520.0,
            peripheral_range: 260.0,
            hearing_range: 220.0,
            fov: PI * 0.7,
            lose_sight_time: 1.5,
            check_interval: 0.2,
            check_timer: 0.0,
        }
    }
}

/// Tuning for the behavior state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorProfile {
    pub patrol_points: Vec<DVec2>,
    pub patrol_index: usize,
    /// Falls back to `CombatStats::attack_range`.
    pub attack_range: Option<f64>,
    /// Falls back to twice the attack range.
    pub chase_range: Option<f64>,
    /// Falls back to 1.3 times the chase range.
    pub disengage_range: Option<f64>,
    pub idle_duration: f64,
    /// Health fraction at or below which the entity flees its target.
    pub retreat_health_pct: f64,
    pub max_aggro_distance: f64,
    /// Hop toward targets standing above.
    pub jump_gap: bool,
    pub jump_cooldown: f64,
    pub jump_timer: f64,
}

impl Default for BehaviorProfile {
    fn default() -> Self {
        Self {
            patrol_points: Vec::new(),
            patrol_index: 0,
            attack_range: Some(110.0),
            chase_range: Some(560.0),
            disengage_range: None,
            idle_duration: 1.0,
            retreat_health_pct: 0.2,
            max_aggro_distance: f64::INFINITY,
            jump_gap: true,
            jump_cooldown: 0.6,
            jump_timer: 0.0,
        }
    }
}

/// What an AI entity wants this tick. Physics steers walkers from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Intent {
    /// -1 left, 0 none, 1 right.
    pub move_dir: i8,
    pub jump: bool,
    pub attack: bool,
}
