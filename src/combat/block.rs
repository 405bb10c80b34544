//! Guard windows raised from input, and block timers.

use crate::ecs::{ComponentKind, ComponentMask, World};

/// Fallback guard window when a `Block` has none configured.
const DEFAULT_WINDOW: f64 = 0.6;

/// Raises a guard for every input-driven entity holding block while the
/// guard is down and off cooldown.
///
/// Raising does not spend the cooldown; a successful block does.
pub fn raise_guards(world: &mut World) {
    let required = ComponentMask::of(&[ComponentKind::Input, ComponentKind::Block]);
    for id in world.query(required) {
        let c = world.components_mut();
        let (Some(input), Some(block)) = (c.input.get(id), c.block.get_mut(id)) else {
            continue;
        };
        if input.block && !block.active && block.cooldown_timer <= 0.0 {
            block.active = true;
            block.window_timer = if block.window > 0.0 {
                block.window
            } else {
                DEFAULT_WINDOW
            };
        }
    }
}

/// Counts block cooldowns down and lowers guards whose window ran out.
pub fn update_block_timers(world: &mut World, dt: f64) {
    for id in world.query(ComponentMask::from(ComponentKind::Block)) {
        let Some(block) = world.get_mut::<crate::combat::Block>(id) else {
            continue;
        };
        block.cooldown_timer = (block.cooldown_timer - dt).max(0.0);
        if block.active {
            block.window_timer = (block.window_timer - dt).max(0.0);
            if block.window_timer <= 0.0 {
                block.active = false;
            }
        }
    }
}
