//! Velocity integration: gravity, steering, jumping and speed limits.
//!
//! Only velocities change here. Positions are committed by the collision
//! resolver, which needs the tentative move before it lands.

use super::components::{Action, CharacterState, Contacts, Facing, Velocity};
use crate::combat::BuffState;
use crate::core::{JumpPolicy, PhysicsConfig};
use crate::ecs::{Archetype, ComponentKind, ComponentMask, Components, EntityId, World};

/// Horizontal direction and jump request for one steered body.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Steering {
    dir: f64,
    jump: bool,
}

/// Moves `current` toward `target` by at most `max_delta`, never past it.
pub fn approach(current: f64, target: f64, max_delta: f64) -> f64 {
    if current < target {
        (current + max_delta).min(target)
    } else {
        (current - max_delta).max(target)
    }
}

fn clamp_abs(value: f64, limit: f64) -> f64 {
    value.max(-limit).min(limit)
}

/// Steering for players (from `Input`) and walkers (from `Intent`).
/// Stunned and dead bodies steer to a stop.
fn steering(c: &Components, id: EntityId, archetype: Archetype) -> Steering {
    let stunned = c.stun.get(id).is_some_and(|s| s.stunned);
    let dead = c.character.get(id).is_some_and(CharacterState::is_dead);
    if stunned || dead {
        return Steering::default();
    }
    match archetype {
        Archetype::Player => c.input.get(id).map_or_else(Steering::default, |input| Steering {
            dir: input.horizontal(),
            jump: input.jump,
        }),
        Archetype::Walker => c.intent.get(id).map_or_else(Steering::default, |intent| Steering {
            dir: f64::from(intent.move_dir),
            jump: intent.jump,
        }),
        _ => Steering::default(),
    }
}

fn speed_multiplier(buff: Option<&BuffState>) -> f64 {
    buff.filter(|b| b.active).map_or(1.0, |b| b.speed_multiplier)
}

/// Runs one integration step over every `Transform + Velocity + PhysicsBody`.
pub fn integrate_velocities(world: &mut World, config: &PhysicsConfig, dt: f64) {
    let required = ComponentMask::of(&[
        ComponentKind::Transform,
        ComponentKind::Velocity,
        ComponentKind::PhysicsBody,
    ]);

    for id in world.query(required) {
        let Some(archetype) = world.archetype(id) else {
            continue;
        };
        let c = world.components_mut();
        let Some(body) = c.physics_body.get(id).copied() else {
            continue;
        };
        let control = archetype.is_steered().then(|| steering(c, id, archetype));
        let move_speed = c
            .combat_stats
            .get(id)
            .map_or(config.max_run_speed, |stats| stats.move_speed)
            * speed_multiplier(c.buff.get(id));
        let on_ground = c.contacts.get(id).is_some_and(|k| k.on_ground);

        let Some(vel) = c.velocity.get_mut(id) else {
            continue;
        };
        let mut character = c.character.get_mut(id);

        vel.vy += config.gravity * body.gravity_scale * dt;

        match control {
            Some(control) => {
                let target = control.dir * move_speed;
                let rate = if target != 0.0 {
                    config.move_accel
                } else {
                    config.move_decel
                };
                vel.vx = approach(vel.vx, target, rate * dt);
                apply_jump(config, control.jump, on_ground, character.as_deref_mut(), vel, dt);
            }
            None if body.friction_x > 0.0 && on_ground => {
                vel.vx = approach(vel.vx, 0.0, body.friction_x * dt);
            }
            None => {}
        }

        vel.vx = clamp_abs(vel.vx, body.max_speed_x);
        vel.vy = clamp_abs(vel.vy, body.max_speed_y);
        debug_assert!(
            vel.vx.is_finite() && vel.vy.is_finite(),
            "non-finite velocity on {id}: {vel:?}"
        );

        if let Some(state) = character {
            if let Some(facing) = control.and_then(|s| Facing::from_sign(s.dir)) {
                if !state.is_dead() {
                    state.facing = facing;
                }
            }
            update_action(state, vel, c.contacts.get(id), config.moving_threshold);
        }
    }
}

fn apply_jump(
    config: &PhysicsConfig,
    jump: bool,
    on_ground: bool,
    character: Option<&mut CharacterState>,
    vel: &mut Velocity,
    dt: f64,
) {
    match config.jump_policy {
        JumpPolicy::Unrestricted => {
            if jump {
                vel.vy = config.jump_velocity;
            }
        }
        JumpPolicy::RequireGrounded => {
            let Some(state) = character else {
                if jump && on_ground {
                    vel.vy = config.jump_velocity;
                }
                return;
            };

            if on_ground {
                state.air_time = 0.0;
                state.jumped = false;
            } else {
                state.air_time += dt;
            }

            let pressed = jump && !state.jump_held;
            state.jump_held = jump;
            state.jump_buffer = (state.jump_buffer - dt).max(0.0);
            if pressed {
                state.jump_buffer = config.jump_buffer;
            }

            let wants = pressed || state.jump_buffer > 0.0;
            let can = !state.jumped && (on_ground || state.air_time <= config.coyote_time);
            if wants && can {
                vel.vy = config.jump_velocity;
                state.jumped = true;
                state.jump_buffer = 0.0;
            }
        }
    }
}

fn update_action(
    state: &mut CharacterState,
    vel: &Velocity,
    contacts: Option<&Contacts>,
    threshold: f64,
) {
    if state.is_dead() {
        return;
    }
    let on_ground = contacts.is_some_and(|k| k.on_ground);
    state.action = if !on_ground && vel.vy.abs() > threshold {
        if vel.vy < 0.0 {
            Action::Jump
        } else {
            Action::Fall
        }
    } else if vel.vx.abs() > threshold {
        Action::Run
    } else {
        Action::Idle
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Intent;
    use crate::physics::{PhysicsBody, Transform};
    use crate::player::{Input, Player};

    const DT: f64 = 1.0 / 60.0;

    fn player(world: &mut World, input: Input, on_ground: bool) -> EntityId {
        world
            .spawn()
            .with(Player)
            .with(Transform::default())
            .with(Velocity::default())
            .with(PhysicsBody {
                max_speed_x: 400.0,
                max_speed_y: 900.0,
                ..PhysicsBody::default()
            })
            .with(input)
            .with(CharacterState::default())
            .with(Contacts {
                on_ground,
                ..Contacts::default()
            })
            .id()
    }

    #[test]
    fn approach_never_overshoots() {
        assert_eq!(approach(0.0, 10.0, 3.0), 3.0);
        assert_eq!(approach(9.0, 10.0, 3.0), 10.0);
        assert_eq!(approach(-1.0, 0.0, 5.0), 0.0);
        assert_eq!(approach(5.0, -5.0, 4.0), 1.0);
    }

    #[test]
    fn acceleration_and_deceleration_are_asymmetric() {
        let config = PhysicsConfig::default();
        let mut world = World::new();
        let id = player(
            &mut world,
            Input {
                right: true,
                ..Input::default()
            },
            true,
        );

        integrate_velocities(&mut world, &config, DT);
        let vx = world.get::<Velocity>(id).unwrap().vx;
        assert!((vx - config.move_accel * DT).abs() < 1e-9);

        world.get_mut::<Input>(id).unwrap().right = false;
        integrate_velocities(&mut world, &config, DT);
        assert_eq!(world.get::<Velocity>(id).unwrap().vx, 0.0);
    }

    #[test]
    fn grounded_policy_blocks_air_jumps_after_coyote_time() {
        let config = PhysicsConfig::default();
        let mut world = World::new();
        let id = player(&mut world, Input::default(), false);

        // Airborne well past the coyote window.
        for _ in 0..10 {
            integrate_velocities(&mut world, &config, DT);
        }
        world.get_mut::<Input>(id).unwrap().jump = true;
        integrate_velocities(&mut world, &config, DT);

        assert!(world.get::<Velocity>(id).unwrap().vy > 0.0);
    }

    #[test]
    fn grounded_policy_jumps_once_per_press() {
        let config = PhysicsConfig::default();
        let mut world = World::new();
        let id = player(
            &mut world,
            Input {
                jump: true,
                ..Input::default()
            },
            true,
        );

        integrate_velocities(&mut world, &config, DT);
        assert_eq!(world.get::<Velocity>(id).unwrap().vy, config.jump_velocity);

        // Still "grounded" from stale contacts, but the held press is spent.
        world.get_mut::<Contacts>(id).unwrap().on_ground = false;
        integrate_velocities(&mut world, &config, DT);
        assert!(world.get::<Velocity>(id).unwrap().vy > config.jump_velocity);
    }

    #[test]
    fn unrestricted_policy_jumps_in_midair() {
        let config = PhysicsConfig {
            jump_policy: JumpPolicy::Unrestricted,
            ..PhysicsConfig::default()
        };
        let mut world = World::new();
        let id = player(
            &mut world,
            Input {
                jump: true,
                ..Input::default()
            },
            false,
        );
        for _ in 0..20 {
            integrate_velocities(&mut world, &config, DT);
        }
        assert_eq!(world.get::<Velocity>(id).unwrap().vy, config.jump_velocity);
    }

    #[test]
    fn walkers_steer_from_intent_and_face_their_move() {
        let config = PhysicsConfig::default();
        let mut world = World::new();
        let id = world
            .spawn()
            .with(crate::ai::AiState::default())
            .with(Transform::default())
            .with(Velocity::default())
            .with(PhysicsBody::default())
            .with(CharacterState::default())
            .with(Intent {
                move_dir: -1,
                ..Intent::default()
            })
            .id();

        integrate_velocities(&mut world, &config, DT);

        assert!(world.get::<Velocity>(id).unwrap().vx < 0.0);
        assert_eq!(world.get::<CharacterState>(id).unwrap().facing, Facing::Left);
    }

    #[test]
    fn speed_limits_clamp_both_axes() {
        let config = PhysicsConfig::default();
        let mut world = World::new();
        let body = PhysicsBody {
            max_speed_x: 50.0,
            max_speed_y: 60.0,
            ..PhysicsBody::default()
        };
        let id = world
            .spawn()
            .with(Transform::default())
            .with(Velocity { vx: -500.0, vy: 0.0 })
            .with(body)
            .id();

        for _ in 0..30 {
            integrate_velocities(&mut world, &config, DT);
        }
        let vel = world.get::<Velocity>(id).unwrap();
        assert_eq!(vel.vx, -50.0);
        assert_eq!(vel.vy, 60.0);
    }
}
