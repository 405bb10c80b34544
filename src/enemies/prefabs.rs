//! Enemy prefabs built from definitions.

use bevy::log::debug;
use bevy::math::DVec2;

use super::data::EnemyDefinition;
use crate::ai::{AiState, BehaviorProfile, Intent};
use crate::combat::{Attack, Block, Health, Hitbox, Hurtbox, IFrame, Stun, Team, TeamId};
use crate::ecs::{EntityId, World};
use crate::physics::{
    Aabb, CharacterState, Collider, ColliderGroup, Contacts, Facing, MovementPattern, PhysicsBody,
    Transform, Velocity,
};

fn attack_for(definition: &EnemyDefinition) -> Attack {
    let stats = &definition.combat;
    Attack {
        cooldown_max: stats.attack_cooldown,
        damage: stats.damage,
        range: stats.attack_range,
        knockback_x: stats.knockback_x,
        knockback_y: stats.knockback_y,
        windup: stats.attack_windup,
        duration: stats.attack_duration,
        recovery: definition.attack_recovery,
        ..Attack::default()
    }
}

fn hitbox_for(definition: &EnemyDefinition) -> Hitbox {
    let shape = &definition.hitbox;
    Hitbox {
        damage: definition.combat.damage,
        knockback_x: definition.combat.knockback_x,
        knockback_y: definition.combat.knockback_y,
        hit_once: shape.hit_once,
        offset: DVec2::new(shape.offset_x, shape.offset_y),
        size: DVec2::new(shape.width, shape.height),
        duration: definition.combat.attack_duration,
        ..Hitbox::default()
    }
}

fn behavior_for(definition: &EnemyDefinition, position: DVec2) -> BehaviorProfile {
    let config = &definition.behavior;
    let patrol_points = config.patrol_span.map_or_else(Vec::new, |span| {
        vec![
            DVec2::new(position.x - span, position.y),
            DVec2::new(position.x + span, position.y),
        ]
    });
    BehaviorProfile {
        patrol_points,
        patrol_index: 0,
        attack_range: config.attack_range,
        chase_range: config.chase_range,
        disengage_range: config.disengage_range,
        idle_duration: config.idle_duration,
        retreat_health_pct: config.retreat_health_pct,
        max_aggro_distance: config.max_aggro_distance.unwrap_or(f64::INFINITY),
        jump_gap: config.jump_gap,
        jump_cooldown: config.jump_cooldown,
        jump_timer: 0.0,
    }
}

/// Spawns an AI-driven enemy (or neutral NPC) with its top-left at
/// `position`, initially facing left.
pub fn spawn_enemy(world: &mut World, definition: &EnemyDefinition, position: DVec2) -> EntityId {
    let group = match definition.team {
        TeamId::Neutral => ColliderGroup::Neutral,
        TeamId::Player => ColliderGroup::Player,
        TeamId::Enemy => ColliderGroup::Enemy,
    };
    let armed = definition.team != TeamId::Neutral;
    let body = definition.body;

    let enemy = world
        .spawn()
        // Movement
        .with(Transform::at(position.x, position.y))
        .with(Velocity::default())
        .with(Aabb::sized(definition.width, definition.height))
        .with(Collider::group(group))
        .with(PhysicsBody {
            gravity_scale: body.gravity_scale,
            friction_x: body.friction_x,
            max_speed_x: body.max_speed_x,
            max_speed_y: body.max_speed_y,
        })
        .with(Contacts::default())
        .with(CharacterState::facing(Facing::Left))
        .with_opt(definition.pattern.map(|p| MovementPattern {
            kind: p.kind,
            speed: p.speed,
            range: p.range,
            ..MovementPattern::default()
        }))
        // Combat
        .with(Health::new(definition.max_health))
        .with(Team::new(definition.team))
        .with(Hurtbox {
            active: true,
            offset: DVec2::new(definition.hurtbox.offset_x, definition.hurtbox.offset_y),
            size: DVec2::new(definition.hurtbox.width, definition.hurtbox.height),
        })
        .with(IFrame::default())
        .with_opt(armed.then(|| attack_for(definition)))
        .with_opt(armed.then(|| hitbox_for(definition)))
        .with(definition.combat)
        .with(Block::default())
        .with(Stun::default())
        // AI
        .with(AiState::default())
        .with(definition.perception)
        .with(behavior_for(definition, position))
        .with(Intent::default())
        .id();

    debug!(
        "Spawned {} {} at ({:.0}, {:.0})",
        definition.name, enemy, position.x, position.y
    );
    enemy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Archetype, ComponentKind};

    #[test]
    fn ground_patrol_walks_between_its_patrol_points() {
        let mut world = World::new();
        let id = spawn_enemy(&mut world, &EnemyDefinition::ground_patrol(), DVec2::new(500.0, 80.0));

        assert_eq!(world.archetype(id), Some(Archetype::Walker));
        let behavior = world.get::<BehaviorProfile>(id).unwrap();
        assert_eq!(
            behavior.patrol_points,
            vec![DVec2::new(440.0, 80.0), DVec2::new(560.0, 80.0)]
        );
        assert_eq!(world.get::<Hitbox>(id).unwrap().size, DVec2::new(60.0, 80.0));
    }

    #[test]
    fn flyers_oscillate_and_npcs_are_unarmed() {
        let mut world = World::new();
        let flyer = spawn_enemy(&mut world, &EnemyDefinition::flying_charger(), DVec2::ZERO);
        assert_eq!(world.archetype(flyer), Some(Archetype::Oscillator));
        assert_eq!(world.get::<PhysicsBody>(flyer).unwrap().gravity_scale, 0.0);
        assert_eq!(world.get::<Attack>(flyer).unwrap().recovery, 0.12);

        let npc = spawn_enemy(&mut world, &EnemyDefinition::friendly_npc(), DVec2::ZERO);
        assert!(!world.has(npc, ComponentKind::Attack));
        assert!(!world.has(npc, ComponentKind::Hitbox));
        assert_eq!(world.get::<Team>(npc).unwrap().id, TeamId::Neutral);
    }
}
