//! Input adapter: writes the host's button snapshot into the player.

use bevy::log::trace;

use super::components::Input;
use crate::ecs::World;

/// Copies `snapshot` into the player's `Input`. Returns `false` when there
/// is no live player to receive it.
pub fn apply_input(world: &mut World, snapshot: Input) -> bool {
    let Some(player) = world.player() else {
        trace!("input dropped: no player");
        return false;
    };
    match world.get_mut::<Input>(player) {
        Some(input) => {
            *input = snapshot;
            true
        }
        None => false,
    }
}
