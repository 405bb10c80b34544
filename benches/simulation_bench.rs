//! Tick cost for worlds of increasing enemy count.

use bevy::math::DVec2;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use platformer_core::ai::update_ai;
use platformer_core::core::{CollisionConfig, DebugFlags, SimConfig};
use platformer_core::ecs::World;
use platformer_core::enemies::{spawn_enemy, EnemyDefinition};
use platformer_core::level::{TileInfo, TileMap};
use platformer_core::physics::resolve_collisions;
use platformer_core::player::spawn_player;
use platformer_core::Simulation;

const DT: f64 = 1.0 / 60.0;

fn floor_map() -> TileMap {
    let mut map = match TileMap::new(2048, 64, 16.0) {
        Ok(map) => map,
        Err(e) => panic!("bench map: {e}"),
    };
    map.fill_row(60, TileInfo::SOLID);
    map
}

fn make_simulation(n: usize) -> Simulation {
    let mut sim = match Simulation::new(SimConfig::default(), floor_map()) {
        Ok(sim) => sim.with_seed(1),
        Err(e) => panic!("bench config: {e}"),
    };
    sim.spawn_player(DVec2::new(400.0, 800.0));
    let walker = EnemyDefinition::ground_patrol();
    let flyer = EnemyDefinition::flying_charger();
    for i in 0..n {
        let x = 100.0 + i as f64 * 60.0;
        if i % 4 == 0 {
            sim.spawn_enemy(&flyer, DVec2::new(x, 500.0));
        } else {
            sim.spawn_enemy(&walker, DVec2::new(x, 800.0));
        }
    }
    sim
}

fn make_world(n: usize) -> World {
    let mut world = World::new();
    spawn_player(&mut world, DVec2::new(400.0, 800.0), &Default::default());
    let walker = EnemyDefinition::ground_patrol();
    for i in 0..n {
        spawn_enemy(&mut world, &walker, DVec2::new(100.0 + i as f64 * 60.0, 800.0));
    }
    world
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_tick");
    for &n in &[10usize, 100, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut sim = make_simulation(n);
            b.iter(|| {
                sim.tick();
                black_box(sim.tick_count());
            });
        });
    }
    group.finish();
}

fn bench_collision(c: &mut Criterion) {
    let mut group = c.benchmark_group("tile_collision");
    let map = floor_map();
    let config = CollisionConfig::default();
    for &n in &[100usize, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut world = make_world(n);
            b.iter(|| resolve_collisions(&mut world, &map, &config, DT));
        });
    }
    group.finish();
}

fn bench_ai(c: &mut Criterion) {
    let mut group = c.benchmark_group("ai_update");
    let flags = DebugFlags::default();
    for &n in &[100usize, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut world = make_world(n);
            b.iter(|| update_ai(&mut world, &flags, DT));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tick, bench_collision, bench_ai);
criterion_main!(benches);
