//! Enemy data loading from RON files.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use bevy::log::{error, info, warn};
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::ai::Perception;
use crate::combat::{CombatStats, HitboxShape, TeamId};
use crate::core::ConfigError;
use crate::physics::PatternKind;

/// Physics body settings for an enemy type.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct BodyConfig {
    pub gravity_scale: f64,
    pub friction_x: f64,
    pub max_speed_x: f64,
    pub max_speed_y: f64,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            gravity_scale: 1.0,
            friction_x: 0.8,
            max_speed_x: 400.0,
            max_speed_y: 1600.0,
        }
    }
}

/// Hurtbox placement relative to the enemy's box.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct HurtboxConfig {
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for HurtboxConfig {
    fn default() -> Self {
        Self {
            offset_x: 5.0,
            offset_y: 10.0,
            width: 70.0,
            height: 100.0,
        }
    }
}

/// Behavior tuning. Unset ranges fall back the same way the AI does.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BehaviorConfig {
    pub attack_range: Option<f64>,
    pub chase_range: Option<f64>,
    pub disengage_range: Option<f64>,
    pub idle_duration: f64,
    pub retreat_health_pct: f64,
    pub max_aggro_distance: Option<f64>,
    pub jump_gap: bool,
    pub jump_cooldown: f64,
    /// Patrol between `x - span` and `x + span` of the spawn point.
    pub patrol_span: Option<f64>,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            attack_range: Some(110.0),
            chase_range: Some(560.0),
            disengage_range: None,
            idle_duration: 1.0,
            retreat_health_pct: 0.2,
            max_aggro_distance: None,
            jump_gap: true,
            jump_cooldown: 0.6,
            patrol_span: None,
        }
    }
}

/// Oscillator settings for flyers and sentinels.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
pub struct PatternConfig {
    pub kind: PatternKind,
    pub speed: f64,
    pub range: f64,
}

/// Enemy definition loaded from RON file.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EnemyDefinition {
    pub name: String,
    pub team: TeamId,
    pub max_health: f64,
    pub width: f64,
    pub height: f64,
    pub body: BodyConfig,
    pub hurtbox: HurtboxConfig,
    /// Melee hitbox; neutral enemies get none.
    pub hitbox: HitboxShape,
    pub attack_recovery: f64,
    pub perception: Perception,
    pub behavior: BehaviorConfig,
    pub combat: CombatStats,
    pub pattern: Option<PatternConfig>,
}

impl Default for EnemyDefinition {
    fn default() -> Self {
        Self {
            name: "Enemy".to_string(),
            team: TeamId::Enemy,
            max_health: 50.0,
            width: 80.0,
            height: 120.0,
            body: BodyConfig::default(),
            hurtbox: HurtboxConfig::default(),
            hitbox: HitboxShape {
                offset_x: 50.0,
                offset_y: 30.0,
                width: 60.0,
                height: 80.0,
                hit_once: true,
            },
            attack_recovery: 0.1,
            perception: Perception::default(),
            behavior: BehaviorConfig::default(),
            combat: CombatStats::default(),
            pattern: None,
        }
    }
}

impl EnemyDefinition {
    /// Walker that paces around its spawn point.
    pub fn ground_patrol() -> Self {
        Self {
            name: "Ground Patrol".to_string(),
            behavior: BehaviorConfig {
                patrol_span: Some(60.0),
                ..BehaviorConfig::default()
            },
            ..Self::default()
        }
    }

    /// Gravity-free flyer sweeping left and right.
    pub fn flying_charger() -> Self {
        Self {
            name: "Flying Charger".to_string(),
            body: BodyConfig {
                gravity_scale: 0.0,
                friction_x: 0.1,
                max_speed_x: 500.0,
                max_speed_y: 500.0,
            },
            behavior: BehaviorConfig {
                attack_range: Some(140.0),
                chase_range: Some(640.0),
                idle_duration: 0.5,
                ..BehaviorConfig::default()
            },
            combat: CombatStats {
                attack_range: 140.0,
                attack_cooldown: 0.7,
                attack_windup: 0.12,
                damage: 12.0,
                ..CombatStats::default()
            },
            attack_recovery: 0.12,
            pattern: Some(PatternConfig {
                kind: PatternKind::Horizontal,
                speed: 220.0,
                range: 360.0,
            }),
            ..Self::default()
        }
    }

    /// Gravity-free guard bobbing up and down in place.
    pub fn vertical_sentinel() -> Self {
        Self {
            name: "Vertical Sentinel".to_string(),
            body: BodyConfig {
                gravity_scale: 0.0,
                friction_x: 1.0,
                max_speed_x: 0.0,
                max_speed_y: 300.0,
            },
            behavior: BehaviorConfig {
                attack_range: Some(120.0),
                chase_range: Some(0.0),
                ..BehaviorConfig::default()
            },
            combat: CombatStats {
                attack_range: 120.0,
                attack_cooldown: 1.0,
                damage: 10.0,
                ..CombatStats::default()
            },
            pattern: Some(PatternConfig {
                kind: PatternKind::Vertical,
                speed: 160.0,
                range: 200.0,
            }),
            ..Self::default()
        }
    }

    /// Neutral bystander that never attacks.
    pub fn friendly_npc() -> Self {
        Self {
            name: "Friendly NPC".to_string(),
            team: TeamId::Neutral,
            behavior: BehaviorConfig {
                attack_range: Some(0.0),
                chase_range: Some(0.0),
                ..BehaviorConfig::default()
            },
            combat: CombatStats {
                damage: 0.0,
                ..CombatStats::default()
            },
            ..Self::default()
        }
    }

    pub fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        ron::from_str(contents).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            details: e.to_string(),
        })
    }
}

/// Names of the built-in enemy types.
pub const GROUND_PATROL: &str = "ground_patrol";
pub const FLYING_CHARGER: &str = "flying_charger";
pub const VERTICAL_SENTINEL: &str = "vertical_sentinel";
pub const FRIENDLY_NPC: &str = "friendly_npc";

/// Resource holding all loaded enemy definitions.
#[derive(Resource, Default, Clone, Debug)]
pub struct EnemyRegistry {
    pub definitions: HashMap<String, EnemyDefinition>,
}

impl EnemyRegistry {
    /// Registry holding the four built-in enemy types.
    pub fn with_builtins() -> Self {
        let mut registry = Self::default();
        registry.insert(GROUND_PATROL, EnemyDefinition::ground_patrol());
        registry.insert(FLYING_CHARGER, EnemyDefinition::flying_charger());
        registry.insert(VERTICAL_SENTINEL, EnemyDefinition::vertical_sentinel());
        registry.insert(FRIENDLY_NPC, EnemyDefinition::friendly_npc());
        registry
    }

    /// Get an enemy definition by type name.
    pub fn get(&self, enemy_type: &str) -> Option<&EnemyDefinition> {
        self.definitions.get(enemy_type)
    }

    pub fn insert(&mut self, enemy_type: impl Into<String>, definition: EnemyDefinition) {
        self.definitions.insert(enemy_type.into(), definition);
    }

    /// Loads every `*.ron` file in `dir`, keyed by file stem. Files that
    /// fail to read or parse are logged and skipped. Returns how many
    /// definitions were loaded.
    pub fn load_from_dir(&mut self, dir: impl AsRef<Path>) -> usize {
        let dir = dir.as_ref();

        if !dir.exists() {
            warn!("Enemy definitions directory not found: {:?}", dir);
            return 0;
        }

        let Ok(entries) = fs::read_dir(dir) else {
            warn!("Failed to read enemy definitions directory");
            return 0;
        };

        let mut loaded = 0;
        for entry in entries.flatten() {
            let path = entry.path();

            if path.extension().is_some_and(|ext| ext == "ron") {
                let Some(enemy_type) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                let enemy_type = enemy_type.to_string();

                match fs::read_to_string(&path) {
                    Ok(contents) => match ron::from_str::<EnemyDefinition>(&contents) {
                        Ok(definition) => {
                            info!("Loaded enemy definition: {} ({})", definition.name, enemy_type);
                            self.definitions.insert(enemy_type, definition);
                            loaded += 1;
                        }
                        Err(e) => {
                            error!("Failed to parse enemy definition {:?}: {}", path, e);
                        }
                    },
                    Err(e) => {
                        error!("Failed to read enemy definition {:?}: {}", path, e);
                    }
                }
            }
        }

        info!("Loaded {} enemy definitions", loaded);
        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_definition_keeps_defaults() {
        let definition = EnemyDefinition::from_ron_str(
            r#"(
                name: "Brute",
                max_health: 120.0,
                combat: (damage: 30.0),
                pattern: Some((kind: Vertical, speed: 90.0, range: 100.0)),
            )"#,
        )
        .unwrap();

        assert_eq!(definition.name, "Brute");
        assert_eq!(definition.max_health, 120.0);
        assert_eq!(definition.combat.damage, 30.0);
        assert_eq!(definition.combat.attack_cooldown, 0.9);
        assert_eq!(definition.width, 80.0);
        assert_eq!(definition.pattern.map(|p| p.kind), Some(PatternKind::Vertical));
    }

    #[test]
    fn bad_ron_is_a_parse_error() {
        let err = EnemyDefinition::from_ron_str("(max_health: )").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_directory_loads_nothing() {
        let mut registry = EnemyRegistry::with_builtins();
        assert_eq!(registry.load_from_dir("does/not/exist"), 0);
        assert_eq!(registry.definitions.len(), 4);
        assert_eq!(registry.get(FRIENDLY_NPC).map(|d| d.team), Some(TeamId::Neutral));
    }
}
