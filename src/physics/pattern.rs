//! Oscillating movement for flyers and sentinels.

use bevy::math::DVec2;

use super::components::{CharacterState, Facing, MovementPattern, PatternKind};
use crate::ecs::{ComponentKind, ComponentMask, World};

/// Drives velocity for every `Transform + Velocity + MovementPattern`.
///
/// Stunned or dead entities hold still on their pattern axis.
pub fn drive_patterns(world: &mut World) {
    let required = ComponentMask::of(&[
        ComponentKind::Transform,
        ComponentKind::Velocity,
        ComponentKind::MovementPattern,
    ]);

    for id in world.query(required) {
        let c = world.components_mut();
        let (Some(pattern), Some(transform), Some(velocity)) = (
            c.movement_pattern.get_mut(id),
            c.transform.get(id),
            c.velocity.get_mut(id),
        ) else {
            continue;
        };
        let halted = c.stun.get(id).is_some_and(|s| s.stunned)
            || c.character.get(id).is_some_and(CharacterState::is_dead);

        let origin = *pattern
            .origin
            .get_or_insert(DVec2::new(transform.x, transform.y));
        let half = pattern.range * 0.5;

        match pattern.kind {
            PatternKind::Horizontal => {
                if transform.x <= origin.x - half {
                    pattern.direction = 1.0;
                }
                if transform.x >= origin.x + half {
                    pattern.direction = -1.0;
                }
                velocity.vx = if halted {
                    0.0
                } else {
                    pattern.speed * pattern.direction
                };
                if let Some(state) = c.character.get_mut(id) {
                    if let Some(facing) = Facing::from_sign(pattern.direction) {
                        if !halted {
                            state.facing = facing;
                        }
                    }
                }
            }
            PatternKind::Vertical => {
                if transform.y <= origin.y - half {
                    pattern.direction = 1.0;
                }
                if transform.y >= origin.y + half {
                    pattern.direction = -1.0;
                }
                velocity.vy = if halted {
                    0.0
                } else {
                    pattern.speed * pattern.direction
                };
            }
        }
    }
}
