//! Player module - input, attacks, pickups, the special ability and the player prefab.

mod ability;
mod attack;
mod components;
mod input;
mod pickups;
mod spawning;

pub use ability::{update_abilities, AbilityProfile};
pub use attack::{
    fire_projectile, release_wave, update_player_attacks, AttackProfiles, PlayerCombat,
    ProjectileProfile, WaveProfile,
};
pub use components::*;
pub use input::apply_input;
pub use pickups::collect_pickups;
pub use spawning::{spawn_player, PLAYER_HEIGHT, PLAYER_MAX_HEALTH, PLAYER_WIDTH};
