//! Keeps enemy density up around the player.
//!
//! Ground walkers are topped up near the player's column; gravity-free
//! flyers and sentinels are kept per altitude band above the ground
//! (y < 0).

use bevy::log::debug;
use bevy::math::DVec2;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::data::{EnemyDefinition, EnemyRegistry, FLYING_CHARGER, GROUND_PATROL, VERTICAL_SENTINEL};
use super::prefabs::spawn_enemy;
use crate::core::SimEvent;
use crate::ecs::{ComponentKind, ComponentMask, EntityId, World};
use crate::level::TileProvider;
use crate::physics::{CharacterState, PhysicsBody, Transform};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Seconds between density checks.
    pub interval: f64,
    /// Horizontal reach within which enemies count as nearby.
    pub spawn_radius: f64,
    pub spawn_ahead_min: f64,
    pub spawn_ahead_max: f64,
    /// Nothing spawns horizontally closer than this to the player.
    pub safe_radius: f64,
    pub target_ground: usize,
    /// Height of one sky band.
    pub vertical_step: f64,
    pub air_per_band: usize,
    /// Bands above and below the player's band that are kept populated.
    pub band_lookahead: i64,
    pub max_air_per_check: usize,
    /// Rows scanned downward from y = 0 when looking for ground.
    pub ground_scan_rows: i64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval: 0.5,
            spawn_radius: 900.0,
            spawn_ahead_min: 280.0,
            spawn_ahead_max: 900.0,
            safe_radius: 180.0,
            target_ground: 5,
            vertical_step: 550.0,
            air_per_band: 3,
            band_lookahead: 1,
            max_air_per_check: 3,
            ground_scan_rows: 256,
        }
    }
}

fn rand_range(rng: &mut StdRng, min: f64, max: f64) -> f64 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// A living AI entity near the player.
struct Nearby {
    y: f64,
    airborne: bool,
}

pub struct SpawnDirector {
    config: SpawnConfig,
    timer: f64,
    ground: EnemyDefinition,
    flyer: EnemyDefinition,
    sentinel: EnemyDefinition,
}

impl SpawnDirector {
    /// Uses the registry's patrol, flyer and sentinel types, falling back
    /// to the built-ins for any that are missing.
    pub fn new(config: SpawnConfig, registry: &EnemyRegistry) -> Self {
        let pick = |name: &str, fallback: fn() -> EnemyDefinition| {
            registry.get(name).cloned().unwrap_or_else(fallback)
        };
        Self {
            config,
            timer: 0.0,
            ground: pick(GROUND_PATROL, EnemyDefinition::ground_patrol),
            flyer: pick(FLYING_CHARGER, EnemyDefinition::flying_charger),
            sentinel: pick(VERTICAL_SENTINEL, EnemyDefinition::vertical_sentinel),
        }
    }

    pub fn config(&self) -> &SpawnConfig {
        &self.config
    }

    pub fn update(
        &mut self,
        world: &mut World,
        tiles: &dyn TileProvider,
        rng: &mut StdRng,
        dt: f64,
        events: &mut Vec<SimEvent>,
    ) {
        self.timer += dt;
        if self.timer < self.config.interval {
            return;
        }
        self.timer = 0.0;

        let Some(player) = world.player() else {
            return;
        };
        let Some(player_pos) = world.get::<Transform>(player).map(Transform::position) else {
            return;
        };

        let nearby = self.nearby(world, player_pos);
        let ground_count = nearby.iter().filter(|n| !n.airborne).count();
        if ground_count < self.config.target_ground {
            if let Some(id) = self.spawn_ground(world, tiles, rng, player_pos) {
                events.push(SimEvent::Spawned { entity: id });
            }
        }
        for id in self.fill_air_bands(world, rng, player_pos, &nearby) {
            events.push(SimEvent::Spawned { entity: id });
        }
    }

    fn nearby(&self, world: &World, player_pos: DVec2) -> Vec<Nearby> {
        let required = ComponentMask::of(&[
            ComponentKind::Team,
            ComponentKind::AiState,
            ComponentKind::Transform,
        ]);
        let c = world.components();
        world
            .query(required)
            .into_iter()
            .filter(|id| !c.character.get(*id).is_some_and(CharacterState::is_dead))
            .filter_map(|id| {
                let t = c.transform.get(id)?;
                if (t.x - player_pos.x).abs() >= self.config.spawn_radius {
                    return None;
                }
                let airborne = c
                    .physics_body
                    .get(id)
                    .is_some_and(|b: &PhysicsBody| b.gravity_scale <= 0.0);
                Some(Nearby { y: t.y, airborne })
            })
            .collect()
    }

    /// Top of the first solid tile in the column at `x`, scanning down
    /// from y = 0.
    fn ground_top(&self, tiles: &dyn TileProvider, x: f64) -> Option<f64> {
        let size = tiles.tile_size();
        (0..self.config.ground_scan_rows)
            .map(|row| row as f64 * size)
            .find(|top| tiles.is_solid_at(x, top + size * 0.5))
    }

    fn spawn_ground(
        &self,
        world: &mut World,
        tiles: &dyn TileProvider,
        rng: &mut StdRng,
        player_pos: DVec2,
    ) -> Option<EntityId> {
        let side = if rng.gen_bool(0.2) { -1.0 } else { 1.0 };
        let ahead = rand_range(rng, self.config.spawn_ahead_min, self.config.spawn_ahead_max);
        let x = player_pos.x + ahead * side;
        if (x - player_pos.x).abs() < self.config.safe_radius {
            return None;
        }
        let y = self
            .ground_top(tiles, x)
            .map_or(player_pos.y, |top| top - self.ground.height);
        Some(spawn_enemy(world, &self.ground, DVec2::new(x, y)))
    }

    fn fill_air_bands(
        &self,
        world: &mut World,
        rng: &mut StdRng,
        player_pos: DVec2,
        nearby: &[Nearby],
    ) -> Vec<EntityId> {
        let step = self.config.vertical_step.max(1.0);
        let altitude = (-player_pos.y).max(0.0);
        let band = (altitude / step).floor() as i64;
        let mut spawned = Vec::new();

        for b in (band - self.config.band_lookahead)..=(band + self.config.band_lookahead) {
            if b < 0 {
                continue;
            }
            let band_min = -((b + 1) as f64) * step;
            let band_max = -(b as f64) * step;
            let present = nearby
                .iter()
                .filter(|n| n.airborne && n.y >= band_min && n.y <= band_max)
                .count();
            let band_center = -(b as f64 * step + step * 0.5);

            for _ in present..self.config.air_per_band {
                if spawned.len() >= self.config.max_air_per_check {
                    return spawned;
                }
                let id = if rng.gen_bool(0.5) {
                    let x = player_pos.x
                        + rand_range(rng, self.config.spawn_ahead_min, self.config.spawn_ahead_max);
                    let y = band_center + rand_range(rng, -80.0, 80.0);
                    self.spawn_air(world, &self.flyer, player_pos, DVec2::new(x, y))
                } else {
                    let side = if rng.gen_bool(0.5) { -1.0 } else { 1.0 };
                    let x = player_pos.x + rand_range(rng, 200.0, 600.0) * side;
                    let y = band_center + rand_range(rng, -60.0, 60.0);
                    self.spawn_air(world, &self.sentinel, player_pos, DVec2::new(x, y))
                };
                if let Some(id) = id {
                    spawned.push(id);
                }
            }
        }
        spawned
    }

    fn spawn_air(
        &self,
        world: &mut World,
        definition: &EnemyDefinition,
        player_pos: DVec2,
        at: DVec2,
    ) -> Option<EntityId> {
        if (at.x - player_pos.x).abs() < self.config.safe_radius {
            return None;
        }
        debug!("Spawning {} in sky band at y {:.0}", definition.name, at.y);
        Some(spawn_enemy(world, definition, at))
    }
}
