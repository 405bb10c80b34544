//! Combat: attack phases, hit detection, damage, guards, buffs and
//! damage carriers.

mod attack;
mod block;
mod buffs;
mod components;
mod damage;
mod hitbox;
mod projectile;

pub use attack::{
    attack_speed_multiplier, can_attack, spend_cooldown, tick_attack_cooldowns, trigger_attack,
    trigger_attack_with_profile, update_attack_phases, AttackProfile, HitboxShape,
};
pub use block::{raise_guards, update_block_timers};
pub use buffs::{apply_buff, update_buffs};
pub use components::*;
pub use damage::{
    apply_hit, apply_hits, blocks_from, knockback_velocity, update_iframes, update_stuns,
    DamageOutcome,
};
pub use hitbox::{detect_hits, hitbox_rect, hurtbox_rect};
pub use projectile::{
    spawn_projectile, spawn_wave, update_projectiles, update_waves, ProjectileSpawn, WaveSpawn,
};
