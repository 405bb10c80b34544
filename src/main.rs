//! Platformer Core - Headless demo
//!
//! Runs a small hand-built level with a scripted player for a few seconds
//! and logs what happens.
//!
//! Usage:
//! - `platformer-core` runs with built-in tuning
//! - `platformer-core path/to/sim.ron` loads tuning from a RON file

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use platformer_core::enemies::{data, EnemyRegistry};
use platformer_core::level::Level;
use platformer_core::player::Input;
use platformer_core::{PlatformerPlugin, PlayerInput, SimConfig, SimEvent, Simulation};

const DEMO_SECONDS: f64 = 8.0;

const LEVEL_ROWS: &[&str] = &[
    "                                                  ",
    " P                                                ",
    "                                                  ",
    "                                                  ",
    "                              E                   ",
    "                                                  ",
    "                                                  ",
    "                      ======                      ",
    "                                                  ",
    "                                                  ",
    "                                                  ",
    "                                                  ",
    "          ###                            ###      ",
    "          ###                            ###      ",
    "##################################################",
    "##################################################",
];

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => SimConfig::load(path),
        None => SimConfig::default(),
    };

    let level = match Level::from_rows(LEVEL_ROWS, config.collision.tile_size) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Demo level is invalid: {}", e);
            return;
        }
    };

    let mut registry = EnemyRegistry::with_builtins();
    registry.load_from_dir("assets/data/enemies");

    let Level {
        map,
        spawn,
        enemy_spawns,
    } = level;
    let mut simulation = match Simulation::with_registry(config, map, &registry) {
        Ok(simulation) => simulation.with_seed(7),
        Err(e) => {
            eprintln!("Cannot start: {}", e);
            return;
        }
    };
    simulation.spawn_player(spawn);
    if let Some(walker) = registry.get(data::GROUND_PATROL).cloned() {
        for position in enemy_spawns {
            simulation.spawn_enemy(&walker, position);
        }
    }

    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 60.0,
            ))),
        )
        .add_plugins(LogPlugin::default())
        .add_plugins(PlatformerPlugin)
        .insert_resource(simulation)
        .add_systems(Update, (script_input, log_events, stop_after_demo))
        .run();
}

/// Walks right, hops now and then, and swings when something is close.
fn script_input(time: Res<Time>, mut input: ResMut<PlayerInput>) {
    let t = time.elapsed_secs_f64();
    input.0 = Input {
        right: t > 0.5,
        jump: (t % 2.0) < 0.1,
        attack: (t % 0.5) < 0.05,
        block: (t % 3.0) > 2.8,
        ability: t > 4.0,
        ..Input::default()
    };
}

fn log_events(mut events: EventReader<SimEvent>) {
    for event in events.read() {
        match event {
            SimEvent::Damage(damage) => info!(
                "{} hit {} for {:.1}{}",
                damage.source,
                damage.target,
                damage.amount,
                if damage.blocked { " (blocked)" } else { "" }
            ),
            SimEvent::Death(death) => info!("{} died", death.entity),
            SimEvent::Stunned { entity } => info!("{} is stunned", entity),
            SimEvent::Collected { collector, kind, .. } => {
                info!("{} picked up {:?}", collector, kind)
            }
            SimEvent::AbilityActivated { entity } => info!("{} unleashed its ability", entity),
            SimEvent::Spawned { entity } => info!("Spawned {}", entity),
        }
    }
}

fn stop_after_demo(time: Res<Time>, simulation: Res<Simulation>, mut exit: EventWriter<AppExit>) {
    if time.elapsed_secs_f64() >= DEMO_SECONDS {
        info!(
            "Demo finished after {} ticks with {} entities",
            simulation.tick_count(),
            simulation.world().entity_count()
        );
        exit.send(AppExit::Success);
    }
}
