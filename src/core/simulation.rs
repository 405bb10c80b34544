//! The simulation driver: owns the world and runs the fixed tick order.

use bevy::log::info;
use bevy::math::DVec2;
use bevy::prelude::Resource;

use super::clock::FixedStepClock;
use super::config::SimConfig;
use super::context::SimContext;
use super::error::ConfigError;
use super::events::SimEvent;
use crate::ai::update_ai;
use crate::combat::{
    apply_hits, detect_hits, raise_guards, tick_attack_cooldowns, update_attack_phases,
    update_block_timers, update_buffs, update_iframes, update_projectiles, update_stuns,
    update_waves,
};
use crate::ecs::{EntityId, World};
use crate::enemies::{spawn_enemy, EnemyDefinition, EnemyRegistry, SpawnDirector};
use crate::level::TileProvider;
use crate::physics::{drive_patterns, integrate_velocities, resolve_collisions};
use crate::player::{
    apply_input, collect_pickups, spawn_player, update_abilities, update_player_attacks, Input,
    PlayerCombat,
};

/// One running game: world, level geometry, tuning and time.
///
/// Observers read through [`world`](Self::world); only ticks mutate.
#[derive(Resource)]
pub struct Simulation {
    config: SimConfig,
    world: World,
    tiles: Box<dyn TileProvider>,
    context: SimContext,
    clock: FixedStepClock,
    input: Input,
    player_combat: PlayerCombat,
    director: Option<SpawnDirector>,
    events: Vec<SimEvent>,
    tick_count: u64,
}

impl Simulation {
    /// Fails when `config` does not pass [`SimConfig::validate`].
    pub fn new(config: SimConfig, tiles: impl TileProvider + 'static) -> Result<Self, ConfigError> {
        Self::with_registry(config, tiles, &EnemyRegistry::with_builtins())
    }

    /// Like [`new`](Self::new), with the spawn director drawing enemy
    /// types from `registry`.
    pub fn with_registry(
        config: SimConfig,
        tiles: impl TileProvider + 'static,
        registry: &EnemyRegistry,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut context = SimContext::default();
        context.time_scale = config.timing.time_scale;
        let director = config
            .spawning
            .clone()
            .map(|spawning| SpawnDirector::new(spawning, registry));
        Ok(Self {
            clock: FixedStepClock::new(&config.timing),
            config,
            world: World::new(),
            tiles: Box::new(tiles),
            context,
            input: Input::default(),
            player_combat: PlayerCombat::default(),
            director,
            events: Vec::new(),
            tick_count: 0,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.context.reseed(seed);
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// For level setup and tests; systems own the world during ticks.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn tiles(&self) -> &dyn TileProvider {
        self.tiles.as_ref()
    }

    /// Swaps in new level geometry, e.g. after generating a ground or sky map.
    pub fn set_tiles(&mut self, tiles: impl TileProvider + 'static) {
        self.tiles = Box::new(tiles);
    }

    pub fn context(&self) -> &SimContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SimContext {
        &mut self.context
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Leftover fraction of a tick, for render interpolation.
    pub fn alpha(&self) -> f64 {
        self.clock.alpha()
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.clock.set_paused(paused);
    }

    /// While paused, lets exactly one tick run on the next advance.
    pub fn step_once(&mut self) {
        self.clock.step_once();
    }

    /// Button snapshot written into the player at the start of each tick.
    pub fn set_player_input(&mut self, input: Input) {
        self.input = input;
    }

    pub fn spawn_player(&mut self, position: DVec2) -> EntityId {
        spawn_player(&mut self.world, position, &self.config.physics)
    }

    pub fn spawn_enemy(&mut self, definition: &EnemyDefinition, position: DVec2) -> EntityId {
        spawn_enemy(&mut self.world, definition, position)
    }

    /// Feeds a frame's elapsed time to the clock and runs the ticks that
    /// fall due. Returns how many ran.
    pub fn advance(&mut self, frame_dt: f64) -> u32 {
        let ticks = self.clock.accumulate(frame_dt);
        for _ in 0..ticks {
            self.tick();
        }
        ticks
    }

    /// Runs one fixed tick regardless of the clock.
    pub fn tick(&mut self) {
        let dt = self.clock.fixed_dt() * self.context.time_scale.max(0.0);
        let world = &mut self.world;

        // Input
        apply_input(world, self.input);
        raise_guards(world);
        update_player_attacks(world, &self.config.attacks, &mut self.player_combat, dt);

        // AI, movement patterns, physics, collision
        update_ai(world, &self.context.debug, dt);
        drive_patterns(world);
        integrate_velocities(world, &self.config.physics, dt);
        resolve_collisions(world, self.tiles.as_ref(), &self.config.collision, dt);

        // Combat
        let hits = detect_hits(world, dt);
        apply_hits(world, &hits, &mut self.events);
        update_iframes(world, dt);
        update_block_timers(world, dt);
        tick_attack_cooldowns(world, dt);
        update_attack_phases(world, dt);
        update_stuns(world, dt);

        // Bookkeeping
        update_buffs(world, dt);
        update_projectiles(world, dt);
        update_waves(world, dt);
        collect_pickups(world, &mut self.events);
        update_abilities(world, &self.config.ability, dt, &mut self.events);
        if let Some(director) = self.director.as_mut() {
            director.update(
                world,
                self.tiles.as_ref(),
                &mut self.context.rng,
                dt,
                &mut self.events,
            );
        }

        self.tick_count += 1;
        if self.tick_count % 3600 == 0 {
            info!(
                "Tick {}: {} entities alive",
                self.tick_count,
                self.world.entity_count()
            );
        }
    }

    /// Takes the events produced since the last drain, in order.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}
