//! Projectiles and expanding waves: spawning and per-tick upkeep.
//!
//! Both carry an always-on `Hitbox` and no `Hurtbox`. Projectiles have no
//! `Collider`, so the collision pass moves them as free bodies and they
//! pass through tiles.

use bevy::log::trace;
use bevy::math::DVec2;

use super::components::{Hitbox, Projectile, Team, TeamId, Wave};
use crate::ecs::{ComponentKind, ComponentMask, EntityId, World};
use crate::physics::{Aabb, Transform, Velocity};

/// Everything needed to launch one projectile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpawn {
    pub position: DVec2,
    pub velocity: DVec2,
    pub size: DVec2,
    pub damage: f64,
    pub knockback: DVec2,
    pub lifetime: f64,
    pub gravity: f64,
    pub team: TeamId,
    pub owner: Option<EntityId>,
}

pub fn spawn_projectile(world: &mut World, spawn: ProjectileSpawn) -> EntityId {
    let mut hitbox = Hitbox {
        damage: spawn.damage,
        knockback_x: spawn.knockback.x,
        knockback_y: spawn.knockback.y,
        hit_once: true,
        size: spawn.size,
        ..Hitbox::default()
    };
    hitbox.activate(spawn.lifetime);

    world
        .spawn()
        .with(Transform::at(spawn.position.x, spawn.position.y))
        .with(Velocity {
            vx: spawn.velocity.x,
            vy: spawn.velocity.y,
        })
        .with(Aabb::sized(spawn.size.x, spawn.size.y))
        .with(Team::new(spawn.team))
        .with(hitbox)
        .with(Projectile {
            lifetime: spawn.lifetime,
            elapsed: 0.0,
            gravity: spawn.gravity,
            owner: spawn.owner,
        })
        .id()
}

/// Applies projectile gravity and removes projectiles past their lifetime.
pub fn update_projectiles(world: &mut World, dt: f64) {
    let required = ComponentMask::of(&[ComponentKind::Velocity, ComponentKind::Projectile]);
    let mut expired = Vec::new();

    for id in world.query(required) {
        let c = world.components_mut();
        let (Some(projectile), Some(velocity)) = (c.projectile.get_mut(id), c.velocity.get_mut(id))
        else {
            continue;
        };
        velocity.vy += projectile.gravity * dt;
        projectile.elapsed += dt;
        if projectile.elapsed >= projectile.lifetime {
            expired.push(id);
        }
    }

    for id in expired {
        trace!("{} projectile expired", id);
        world.destroy_entity(id);
    }
}

/// Everything needed to start one wave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveSpawn {
    pub center: DVec2,
    pub damage: f64,
    pub knockback: DVec2,
    pub max_radius: f64,
    pub growth_rate: f64,
    pub team: TeamId,
}

pub fn spawn_wave(world: &mut World, spawn: WaveSpawn) -> EntityId {
    let mut hitbox = Hitbox {
        damage: spawn.damage,
        knockback_x: spawn.knockback.x,
        knockback_y: spawn.knockback.y,
        hit_once: true,
        size: DVec2::ZERO,
        ..Hitbox::default()
    };
    hitbox.activate(f64::INFINITY);

    world
        .spawn()
        .with(Transform::at(spawn.center.x, spawn.center.y))
        .with(Team::new(spawn.team))
        .with(hitbox)
        .with(Wave {
            radius: 0.0,
            max_radius: spawn.max_radius,
            growth_rate: spawn.growth_rate,
        })
        .id()
}

/// Grows each wave and fits its hitbox to the ring. A wave is removed
/// once its radius reaches the maximum.
pub fn update_waves(world: &mut World, dt: f64) {
    let required = ComponentMask::of(&[ComponentKind::Wave, ComponentKind::Hitbox]);
    let mut finished = Vec::new();

    for id in world.query(required) {
        let c = world.components_mut();
        let (Some(wave), Some(hitbox)) = (c.wave.get_mut(id), c.hitbox.get_mut(id)) else {
            continue;
        };
        wave.radius += wave.growth_rate * dt;
        let radius = wave.radius.min(wave.max_radius);
        hitbox.offset = DVec2::splat(-radius);
        hitbox.size = DVec2::splat(radius * 2.0);
        hitbox.active = true;

        if wave.radius >= wave.max_radius {
            finished.push(id);
        }
    }

    for id in finished {
        world.destroy_entity(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 60.0;

    fn bolt(gravity: f64) -> ProjectileSpawn {
        ProjectileSpawn {
            position: DVec2::new(10.0, 20.0),
            velocity: DVec2::new(620.0, 0.0),
            size: DVec2::new(24.0, 12.0),
            damage: 14.0,
            knockback: DVec2::new(120.0, -60.0),
            lifetime: 0.1,
            gravity,
            team: TeamId::Player,
            owner: None,
        }
    }

    #[test]
    fn projectiles_fall_and_expire() {
        let mut world = World::new();
        let id = spawn_projectile(&mut world, bolt(600.0));
        assert!(world.get::<Hitbox>(id).unwrap().active);
        assert!(!world.has(id, ComponentKind::Hurtbox));

        update_projectiles(&mut world, DT);
        assert!((world.get::<Velocity>(id).unwrap().vy - 10.0).abs() < 1e-9);

        for _ in 0..6 {
            update_projectiles(&mut world, DT);
        }
        assert!(!world.is_alive(id));
    }

    #[test]
    fn waves_grow_a_centered_hitbox_until_max_radius() {
        let mut world = World::new();
        let id = spawn_wave(
            &mut world,
            WaveSpawn {
                center: DVec2::new(100.0, 100.0),
                damage: 12.0,
                knockback: DVec2::new(450.0, -150.0),
                max_radius: 25.0,
                growth_rate: 600.0,
                team: TeamId::Player,
            },
        );

        update_waves(&mut world, DT);
        let hitbox = world.get::<Hitbox>(id).unwrap();
        assert!((hitbox.size.x - 20.0).abs() < 1e-9);
        assert!((hitbox.offset.x + 10.0).abs() < 1e-9);

        update_waves(&mut world, DT);
        assert!(world.is_alive(id));
        update_waves(&mut world, DT);
        assert!(!world.is_alive(id));
    }
}
