//! Randomized checks of invariants that must hold for any input.
//!
//! Each test draws its cases from a fixed seed so failures reproduce.

use std::collections::HashMap;

use bevy::math::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use platformer_core::ai::{sense, AiState, Perception, Sighting};
use platformer_core::combat::{detect_hits, Health, Hitbox, Hurtbox, Team, TeamId};
use platformer_core::core::{CollisionConfig, PhysicsConfig};
use platformer_core::ecs::World;
use platformer_core::level::{EmptyTiles, TileInfo, TileMap};
use platformer_core::physics::{
    integrate_velocities, resolve_body, resolve_collisions, Aabb, CharacterState, Facing,
    PhysicsBody, Transform, Velocity,
};

const DT: f64 = 1.0 / 60.0;

#[test]
fn free_fall_speed_rises_to_the_cap_and_stays_there() {
    let mut rng = StdRng::seed_from_u64(11);
    let physics = PhysicsConfig::default();
    let collision = CollisionConfig::default();

    for _ in 0..20 {
        let max_speed_y = rng.gen_range(50.0..1500.0);
        let mut world = World::new();
        let id = world
            .spawn()
            .with(Transform::at(0.0, 0.0))
            .with(Velocity::default())
            .with(PhysicsBody {
                max_speed_y,
                ..PhysicsBody::default()
            })
            .id();

        let mut previous = 0.0;
        for _ in 0..200 {
            let dt = rng.gen_range(0.001..0.05);
            integrate_velocities(&mut world, &physics, dt);
            resolve_collisions(&mut world, &EmptyTiles::default(), &collision, dt);

            let vy = world.get::<Velocity>(id).unwrap().vy;
            assert!(vy >= previous, "vy fell from {previous} to {vy}");
            assert!(vy <= max_speed_y, "vy {vy} exceeds cap {max_speed_y}");
            previous = vy;
        }
        assert_eq!(previous, max_speed_y);
    }
}

#[test]
fn settled_bodies_stay_put() {
    let mut rng = StdRng::seed_from_u64(23);
    let mut map = TileMap::new(20, 12, 20.0).unwrap();
    map.fill_row(10, TileInfo::SOLID);
    let config = CollisionConfig::default();
    let aabb = Aabb::sized(16.0, 24.0);

    for _ in 0..50 {
        let mut transform = Transform::at(rng.gen_range(0.0..380.0), rng.gen_range(0.0..170.0));
        let mut velocity = Velocity::default();
        for _ in 0..120 {
            velocity.vy += 1800.0 * DT;
            resolve_body(&map, &config, &mut transform, &mut velocity, &aabb, DT);
        }
        let settled = transform;

        for _ in 0..10 {
            velocity.vy += 1800.0 * DT;
            let contacts = resolve_body(&map, &config, &mut transform, &mut velocity, &aabb, DT);
            assert!(contacts.on_ground);
            assert_eq!(transform, settled);
        }
    }
}

#[test]
fn one_way_platforms_pass_upward_and_catch_downward() {
    let mut rng = StdRng::seed_from_u64(37);
    // Platform top at y = 100.
    let mut map = TileMap::new(20, 12, 20.0).unwrap();
    map.fill_row(5, TileInfo::ONE_WAY);
    let config = CollisionConfig::default();
    let aabb = Aabb::sized(16.0, 24.0);

    for _ in 0..50 {
        let x = rng.gen_range(0.0..380.0);

        let mut transform = Transform::at(x, 150.0);
        let mut velocity = Velocity {
            vx: 0.0,
            vy: -rng.gen_range(200.0..1200.0),
        };
        while transform.y > 0.0 {
            let before = transform.y;
            let contacts = resolve_body(&map, &config, &mut transform, &mut velocity, &aabb, DT);
            assert!(!contacts.hit_ceil);
            assert!(transform.y < before);
        }

        let mut transform = Transform::at(x, rng.gen_range(20.0..75.0));
        let mut velocity = Velocity {
            vx: 0.0,
            vy: rng.gen_range(50.0..1500.0),
        };
        let mut landed = false;
        for _ in 0..120 {
            if resolve_body(&map, &config, &mut transform, &mut velocity, &aabb, DT).on_ground {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert_eq!(transform.y, 100.0 - 24.0 - config.epsilon);
    }
}

#[test]
fn alert_level_stays_in_unit_range() {
    let mut rng = StdRng::seed_from_u64(41);
    let mut world = World::new();
    let target = world.create_entity();

    for _ in 0..20 {
        let mut ai = AiState::default();
        let mut perception = Perception::default();
        for _ in 0..200 {
            let sighting = rng.gen_bool(0.6).then(|| Sighting {
                entity: target,
                position: DVec2::new(rng.gen_range(-1000.0..1000.0), rng.gen_range(-300.0..300.0)),
            });
            let facing = if rng.gen_bool(0.5) {
                Facing::Left
            } else {
                Facing::Right
            };
            let dt = rng.gen_range(-0.1..2.0);

            sense(
                &mut ai,
                &mut perception,
                DVec2::ZERO,
                facing,
                f64::INFINITY,
                sighting,
                dt,
            );
            assert!((0.0..=1.0).contains(&ai.alert_level), "alert {}", ai.alert_level);
        }
    }
}

#[test]
fn hit_once_hitboxes_never_repeat_a_victim() {
    let mut rng = StdRng::seed_from_u64(53);

    for _ in 0..20 {
        let mut world = World::new();
        for _ in 0..4 {
            let mut hitbox = Hitbox {
                offset: DVec2::new(rng.gen_range(-40.0..40.0), rng.gen_range(-40.0..40.0)),
                size: DVec2::new(rng.gen_range(20.0..120.0), rng.gen_range(20.0..120.0)),
                ..Hitbox::default()
            };
            hitbox.activate(rng.gen_range(0.1..1.0));
            world
                .spawn()
                .with(Transform::at(rng.gen_range(0.0..200.0), rng.gen_range(0.0..200.0)))
                .with(Team::new(TeamId::Player))
                .with(CharacterState::default())
                .with(hitbox);
        }
        for _ in 0..6 {
            world
                .spawn()
                .with(Transform::at(rng.gen_range(0.0..200.0), rng.gen_range(0.0..200.0)))
                .with(Team::new(TeamId::Enemy))
                .with(Health::new(1000.0))
                .with(Hurtbox::default());
        }

        let mut counts = HashMap::new();
        for _ in 0..90 {
            for hit in detect_hits(&mut world, DT) {
                *counts.entry((hit.attacker, hit.victim)).or_insert(0) += 1;
            }
        }
        assert!(counts.values().all(|&n| n == 1), "repeated hits: {counts:?}");
    }
}
