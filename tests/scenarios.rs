//! End-to-end checks of the collision, AI and combat resolvers.

use bevy::math::DVec2;

use platformer_core::ai::{update_ai, AiMode, AiState, BehaviorProfile, Intent, Perception};
use platformer_core::combat::{
    apply_hit, apply_hits, detect_hits, tick_attack_cooldowns, trigger_attack_with_profile,
    update_attack_phases, Attack, AttackProfile, Block, Health, Hitbox, Hurtbox, Team, TeamId,
};
use platformer_core::core::{CollisionConfig, DebugFlags, HitEvent, SimEvent};
use platformer_core::ecs::World;
use platformer_core::level::{TileInfo, TileMap};
use platformer_core::physics::{resolve_body, Aabb, CharacterState, Facing, Transform, Velocity};
use platformer_core::player::Player;

const DT: f64 = 1.0 / 60.0;

#[test]
fn falling_body_lands_on_the_tile_below() {
    let mut map = TileMap::new(20, 12, 20.0).unwrap();
    map.fill_row(10, TileInfo::SOLID);
    let config = CollisionConfig::default();

    let aabb = Aabb::sized(16.0, 24.0);
    let mut transform = Transform::at(40.0, 200.0 - 24.0 - 1.0);
    let mut velocity = Velocity { vx: 0.0, vy: 100.0 };

    let contacts = resolve_body(&map, &config, &mut transform, &mut velocity, &aabb, DT);

    assert_eq!(transform.y, 200.0 - 24.0 - config.epsilon);
    assert_eq!(velocity.vy, 0.0);
    assert!(contacts.on_ground);
}

#[test]
fn ai_chases_then_gives_up_on_a_distant_target() {
    let mut world = World::new();
    let player = world
        .spawn()
        .with(Player)
        .with(Transform::at(300.0, 0.0))
        .with(Health::new(100.0))
        .id();
    world.set_player(player);
    let enemy = world
        .spawn()
        .with(Transform::at(0.0, 0.0))
        .with(CharacterState::facing(Facing::Right))
        .with(AiState::default())
        .with(Perception {
            sight_range: 450.0,
            ..Perception::default()
        })
        .with(BehaviorProfile {
            disengage_range: Some(700.0),
            ..BehaviorProfile::default()
        })
        .with(Intent::default())
        .with(Attack::default())
        .id();
    let flags = DebugFlags::default();

    update_ai(&mut world, &flags, DT);
    assert!(world.get::<AiState>(enemy).unwrap().alert_level > 0.0);

    for _ in 0..20 {
        update_ai(&mut world, &flags, DT);
    }
    assert_eq!(world.get::<AiState>(enemy).unwrap().mode, AiMode::Chase);

    world.get_mut::<Transform>(player).unwrap().x = 900.0;
    update_ai(&mut world, &flags, DT);

    let ai = world.get::<AiState>(enemy).unwrap();
    assert_eq!(ai.mode, AiMode::Idle);
    assert_eq!(ai.target, None);
}

#[test]
fn retrigger_inside_cooldown_is_refused_and_hits_once() {
    let mut world = World::new();
    let attacker = world
        .spawn()
        .with(Transform::at(0.0, 0.0))
        .with(CharacterState::facing(Facing::Right))
        .with(Team::new(TeamId::Player))
        .with(Attack::default())
        .with(Hitbox::default())
        .id();
    let victim = world
        .spawn()
        .with(Transform::at(80.0, 0.0))
        .with(Team::new(TeamId::Enemy))
        .with(Health::new(100.0))
        .with(Hurtbox::default())
        .id();
    let profile = AttackProfile {
        cooldown: 0.1,
        ..AttackProfile::default()
    };

    assert!(trigger_attack_with_profile(&mut world, attacker, &profile));

    let mut events = Vec::new();
    let step = |world: &mut World, events: &mut Vec<SimEvent>| {
        let hits = detect_hits(world, DT);
        apply_hits(world, &hits, events);
        tick_attack_cooldowns(world, DT);
        update_attack_phases(world, DT);
    };

    for _ in 0..3 {
        step(&mut world, &mut events);
    }
    assert!(world.get::<Attack>(attacker).unwrap().cooldown > 0.0);
    assert!(!trigger_attack_with_profile(&mut world, attacker, &profile));

    for _ in 0..9 {
        step(&mut world, &mut events);
    }
    let damage_events = events
        .iter()
        .filter(|e| matches!(e, SimEvent::Damage(d) if d.target == victim))
        .count();
    assert_eq!(damage_events, 1);
}

#[test]
fn raised_block_cuts_damage_from_the_front() {
    let mut world = World::new();
    let attacker = world.spawn().with(Transform::at(50.0, 0.0)).id();
    let victim = world
        .spawn()
        .with(Transform::at(0.0, 0.0))
        .with(CharacterState::facing(Facing::Right))
        .with(Health::new(100.0))
        .with(Block {
            active: true,
            reduction: 0.6,
            ..Block::default()
        })
        .id();

    let outcome = apply_hit(
        &mut world,
        &HitEvent {
            attacker,
            victim,
            damage: 50.0,
            knockback: DVec2::ZERO,
        },
    )
    .unwrap();

    assert!(outcome.blocked);
    assert!((outcome.final_damage - 20.0).abs() < 1e-9);
    assert!((world.get::<Health>(victim).unwrap().current - 80.0).abs() < 1e-9);
}
