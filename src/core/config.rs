//! Simulation tuning loaded from RON.

use std::fs;
use std::path::Path;

use bevy::log::{error, info, warn};
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::enemies::SpawnConfig;
use crate::player::{AbilityProfile, AttackProfiles};

/// How the integrator treats the jump input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JumpPolicy {
    /// Any held jump input sets the jump velocity, airborne or not.
    Unrestricted,
    /// Jumps need ground contact, with coyote-time grace and a press buffer.
    #[default]
    RequireGrounded,
}

/// Movement tuning for the physics integrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f64,
    pub move_accel: f64,
    pub move_decel: f64,
    /// Run speed for steered bodies without their own `CombatStats`.
    pub max_run_speed: f64,
    /// Negative is up.
    pub jump_velocity: f64,
    pub coyote_time: f64,
    pub jump_buffer: f64,
    pub jump_policy: JumpPolicy,
    /// Speeds above this count as moving when deriving actions.
    pub moving_threshold: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 1800.0,
            move_accel: 1500.0,
            move_decel: 2000.0,
            max_run_speed: 180.0,
            jump_velocity: -520.0,
            coyote_time: 0.08,
            jump_buffer: 0.08,
            jump_policy: JumpPolicy::RequireGrounded,
            moving_threshold: 10.0,
        }
    }
}

/// Tile collision tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Tile size used when building levels from rows.
    pub tile_size: f64,
    /// Gap left between a snapped box and the surface it touches.
    pub epsilon: f64,
    /// Inset of wall samples from the box's top and bottom.
    pub wall_margin: f64,
    /// Inset of floor/ceiling samples from the box's sides.
    pub floor_inset: f64,
    /// How far below a resting box ground still counts.
    pub ground_reach: f64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            tile_size: 16.0,
            epsilon: 0.1,
            wall_margin: 10.0,
            floor_inset: 2.0,
            ground_reach: 1.0,
        }
    }
}

/// Fixed-step clock settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub fixed_dt: f64,
    /// Frame deltas above this are clamped before accumulating.
    pub max_frame_dt: f64,
    pub time_scale: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_frame_dt: 0.25,
            time_scale: 1.0,
        }
    }
}

/// Everything tunable about a simulation run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub physics: PhysicsConfig,
    pub collision: CollisionConfig,
    pub timing: TimingConfig,
    pub attacks: AttackProfiles,
    pub ability: AbilityProfile,
    /// Enemy density upkeep around the player. Off when absent.
    pub spawning: Option<SpawnConfig>,
}

impl SimConfig {
    /// Load from a RON file, falling back to defaults on any failure.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(config) => {
                info!("Loaded simulation config from {}", path.display());
                config
            }
            Err(e @ ConfigError::Read { .. }) => {
                warn!("{}. Using defaults.", e);
                Self::default()
            }
            Err(e) => {
                error!("{}. Using defaults.", e);
                Self::default()
            }
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;
        Self::parse(&contents, &path.display().to_string())
    }

    pub fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        Self::parse(contents, "<inline>")
    }

    fn parse(contents: &str, path: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(contents).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            details: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let timing = &self.timing;
        if !(timing.fixed_dt.is_finite() && timing.fixed_dt > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "timing.fixed_dt must be positive, got {}",
                timing.fixed_dt
            )));
        }
        if !(timing.max_frame_dt >= timing.fixed_dt) {
            return Err(ConfigError::Invalid(format!(
                "timing.max_frame_dt ({}) must be at least fixed_dt ({})",
                timing.max_frame_dt, timing.fixed_dt
            )));
        }
        if !(timing.time_scale.is_finite() && timing.time_scale >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "timing.time_scale must be non-negative, got {}",
                timing.time_scale
            )));
        }
        if !(self.collision.tile_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "collision.tile_size must be positive, got {}",
                self.collision.tile_size
            )));
        }
        if self.physics.move_accel < 0.0 || self.physics.move_decel < 0.0 {
            return Err(ConfigError::Invalid(
                "physics accelerations must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
