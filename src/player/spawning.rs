//! Player prefab.

use bevy::log::info;
use bevy::math::DVec2;

use super::components::{AbilityMeter, Input, Player};
use crate::combat::{Attack, Block, Health, Hitbox, Hurtbox, IFrame, Stun, Team, TeamId};
use crate::core::PhysicsConfig;
use crate::ecs::{EntityId, World};
use crate::physics::{
    Aabb, CharacterState, Collider, ColliderGroup, Contacts, PhysicsBody, Transform, Velocity,
};

pub const PLAYER_WIDTH: f64 = 64.0;
pub const PLAYER_HEIGHT: f64 = 96.0;
pub const PLAYER_MAX_HEALTH: f64 = 100.0;
/// Fall speed cap.
const PLAYER_MAX_FALL_SPEED: f64 = 1000.0;
/// Headroom over the run speed so speed buffs are not clamped away.
const PLAYER_SPEED_HEADROOM: f64 = 1.5;

/// Spawns the player at `position` and registers it with the world.
pub fn spawn_player(world: &mut World, position: DVec2, physics: &PhysicsConfig) -> EntityId {
    let player = world
        .spawn()
        .with(Player)
        .with(Input::default())
        // Movement
        .with(Transform::at(position.x, position.y))
        .with(Velocity::default())
        .with(Aabb::sized(PLAYER_WIDTH, PLAYER_HEIGHT))
        .with(PhysicsBody {
            gravity_scale: 1.0,
            friction_x: 0.0,
            max_speed_x: physics.max_run_speed * PLAYER_SPEED_HEADROOM,
            max_speed_y: PLAYER_MAX_FALL_SPEED,
        })
        .with(Collider::group(ColliderGroup::Player))
        .with(Contacts::default())
        .with(CharacterState::default())
        // Combat
        .with(Health::new(PLAYER_MAX_HEALTH))
        .with(Team::new(TeamId::Player))
        .with(Hurtbox {
            active: true,
            offset: DVec2::new(8.0, 8.0),
            size: DVec2::new(PLAYER_WIDTH - 16.0, PLAYER_HEIGHT - 8.0),
        })
        .with(Hitbox::default())
        .with(Attack::default())
        .with(IFrame {
            duration: 0.8,
            ..IFrame::default()
        })
        .with(Block::default())
        .with(Stun::default())
        .with(AbilityMeter::default())
        .id();

    world.set_player(player);
    info!("Spawned player {} at ({:.0}, {:.0})", player, position.x, position.y);
    player
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Archetype;

    #[test]
    fn player_prefab_is_registered_and_steerable() {
        let mut world = World::new();
        let player = spawn_player(&mut world, DVec2::new(32.0, 64.0), &PhysicsConfig::default());

        assert_eq!(world.player(), Some(player));
        assert_eq!(world.archetype(player), Some(Archetype::Player));
        assert_eq!(world.get::<Transform>(player).unwrap().position(), DVec2::new(32.0, 64.0));
        assert!(world.get::<Hurtbox>(player).unwrap().active);
    }
}
