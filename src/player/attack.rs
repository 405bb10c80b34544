//! Player attack dispatch: one profile per attack button, fired on the
//! press edge.

use bevy::log::debug;
use bevy::math::DVec2;
use serde::{Deserialize, Serialize};

use super::components::Input;
use crate::combat::{
    can_attack, spawn_projectile, spawn_wave, spend_cooldown, trigger_attack_with_profile,
    AttackProfile, HitboxShape, ProjectileSpawn, Stun, Team, TeamId, WaveSpawn,
};
use crate::ecs::{EntityId, World};
use crate::physics::{Aabb, CharacterState, Facing, Transform};

/// Ranged shot fired from the player's front.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileProfile {
    pub damage: f64,
    pub knockback_x: f64,
    pub knockback_y: f64,
    pub cooldown: f64,
    pub speed: f64,
    /// Spawn offset for a right-facing shooter; `x` is mirrored.
    pub offset_x: f64,
    pub offset_y: f64,
    pub lifetime: f64,
    pub width: f64,
    pub height: f64,
    pub gravity: f64,
}

impl Default for ProjectileProfile {
    fn default() -> Self {
        Self {
            damage: 14.0,
            knockback_x: 120.0,
            knockback_y: -60.0,
            cooldown: 0.1,
            speed: 620.0,
            offset_x: 60.0,
            offset_y: 60.0,
            lifetime: 2.5,
            width: 24.0,
            height: 12.0,
            gravity: 0.0,
        }
    }
}

/// Burst of expanding rings centered on the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveProfile {
    pub damage: f64,
    pub knockback_x: f64,
    pub knockback_y: f64,
    pub max_radius: f64,
    pub growth_rate: f64,
    /// Rings per burst.
    pub pulses: u32,
    /// Seconds between rings.
    pub interval: f64,
}

impl Default for WaveProfile {
    fn default() -> Self {
        Self {
            damage: 12.0,
            knockback_x: 450.0,
            knockback_y: -150.0,
            max_radius: 360.0,
            growth_rate: 750.0,
            pulses: 12,
            interval: 0.07,
        }
    }
}

/// Every player move, loadable from the `attacks` table of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackProfiles {
    pub light: AttackProfile,
    pub heavy: AttackProfile,
    pub upward: AttackProfile,
    pub spin: AttackProfile,
    pub projectile: ProjectileProfile,
    pub wave: WaveProfile,
}

impl Default for AttackProfiles {
    fn default() -> Self {
        Self {
            light: AttackProfile::default(),
            heavy: AttackProfile {
                damage: 35.0,
                knockback_x: 260.0,
                knockback_y: -140.0,
                cooldown: 0.12,
                windup: 0.05,
                duration: 0.06,
                recovery: 0.06,
                hitbox: HitboxShape {
                    offset_x: 70.0,
                    offset_y: 20.0,
                    width: 90.0,
                    height: 120.0,
                    hit_once: true,
                },
            },
            upward: AttackProfile {
                damage: 22.0,
                knockback_x: 80.0,
                knockback_y: -220.0,
                cooldown: 0.1,
                windup: 0.04,
                duration: 0.06,
                recovery: 0.05,
                hitbox: HitboxShape {
                    offset_x: 10.0,
                    offset_y: -40.0,
                    width: 80.0,
                    height: 140.0,
                    hit_once: true,
                },
            },
            spin: AttackProfile {
                damage: 16.0,
                knockback_x: 120.0,
                knockback_y: -80.0,
                cooldown: 0.1,
                windup: 0.04,
                duration: 0.08,
                recovery: 0.06,
                hitbox: HitboxShape {
                    offset_x: -30.0,
                    offset_y: -20.0,
                    width: 140.0,
                    height: 140.0,
                    hit_once: false,
                },
            },
            projectile: ProjectileProfile::default(),
            wave: WaveProfile::default(),
        }
    }
}

/// A wave burst in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
struct WaveEmitter {
    timer: f64,
    pulses_left: u32,
}

/// Per-player attack memory kept between ticks.
#[derive(Debug, Clone, Default)]
pub struct PlayerCombat {
    previous: Input,
    emitter: Option<WaveEmitter>,
}

impl PlayerCombat {
    pub fn is_emitting(&self) -> bool {
        self.emitter.is_some()
    }
}

fn team_of(world: &World, id: EntityId) -> TeamId {
    world.get::<Team>(id).map_or(TeamId::Player, |t| t.id)
}

fn box_center(world: &World, id: EntityId) -> Option<DVec2> {
    let transform = world.get::<Transform>(id)?;
    Some(match world.get::<Aabb>(id) {
        Some(aabb) => aabb.rect(transform).center(),
        None => transform.position(),
    })
}

/// Fires a projectile from the shooter's front, spending its attack
/// cooldown. Returns the projectile, or `None` when not ready.
pub fn fire_projectile(world: &mut World, shooter: EntityId, profile: &ProjectileProfile) -> Option<EntityId> {
    let origin = world.get::<Transform>(shooter)?.position();
    if !can_attack(world, shooter) {
        return None;
    }
    let facing = world
        .get::<CharacterState>(shooter)
        .map_or(Facing::Right, |s| s.facing);
    let team = team_of(world, shooter);
    spend_cooldown(world, shooter, profile.cooldown);

    let projectile = spawn_projectile(
        world,
        ProjectileSpawn {
            position: DVec2::new(origin.x + profile.offset_x * facing.sign(), origin.y + profile.offset_y),
            velocity: DVec2::new(profile.speed * facing.sign(), 0.0),
            size: DVec2::new(profile.width, profile.height),
            damage: profile.damage,
            knockback: DVec2::new(profile.knockback_x, profile.knockback_y),
            lifetime: profile.lifetime,
            gravity: profile.gravity,
            team,
            owner: Some(shooter),
        },
    );
    Some(projectile)
}

/// Spawns one ring centered on the emitter's box.
pub fn release_wave(world: &mut World, emitter: EntityId, profile: &WaveProfile) -> Option<EntityId> {
    let center = box_center(world, emitter)?;
    let team = team_of(world, emitter);
    Some(spawn_wave(
        world,
        WaveSpawn {
            center,
            damage: profile.damage,
            knockback: DVec2::new(profile.knockback_x, profile.knockback_y),
            max_radius: profile.max_radius,
            growth_rate: profile.growth_rate,
            team,
        },
    ))
}

/// Starts the move bound to each freshly pressed attack button and keeps
/// any wave burst pulsing. Dead or stunned players start nothing new.
pub fn update_player_attacks(world: &mut World, profiles: &AttackProfiles, state: &mut PlayerCombat, dt: f64) {
    let Some(player) = world.player() else {
        *state = PlayerCombat::default();
        return;
    };
    let Some(input) = world.get::<Input>(player).copied() else {
        return;
    };
    let previous = std::mem::replace(&mut state.previous, input);

    let dead = world.get::<CharacterState>(player).is_some_and(CharacterState::is_dead);
    if dead {
        state.emitter = None;
        return;
    }
    let stunned = world.get::<Stun>(player).is_some_and(|s| s.stunned);

    if !stunned {
        let melee = [
            (input.attack, previous.attack, &profiles.light, "light"),
            (input.attack_heavy, previous.attack_heavy, &profiles.heavy, "heavy"),
            (input.attack_up, previous.attack_up, &profiles.upward, "upward"),
            (input.attack_spin, previous.attack_spin, &profiles.spin, "spin"),
        ];
        for (now, before, profile, name) in melee {
            if now && !before && trigger_attack_with_profile(world, player, profile) {
                debug!("{} performed {} attack", player, name);
            }
        }
        if input.attack_projectile && !previous.attack_projectile {
            if let Some(shot) = fire_projectile(world, player, &profiles.projectile) {
                debug!("{} fired projectile {}", player, shot);
            }
        }
        if input.attack_wave && !previous.attack_wave && state.emitter.is_none() {
            state.emitter = Some(WaveEmitter {
                timer: 0.0,
                pulses_left: profiles.wave.pulses,
            });
        }
    }

    pulse_waves(world, player, &profiles.wave, state, dt);
}

fn pulse_waves(world: &mut World, player: EntityId, profile: &WaveProfile, state: &mut PlayerCombat, dt: f64) {
    let Some(emitter) = state.emitter.as_mut() else {
        return;
    };
    emitter.timer -= dt;
    while emitter.timer <= 0.0 && emitter.pulses_left > 0 {
        emitter.timer += profile.interval.max(0.0);
        emitter.pulses_left -= 1;
        release_wave(world, player, profile);
    }
    if emitter.pulses_left == 0 {
        state.emitter = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{Attack, AttackPhase, Hitbox, Projectile, Wave};
    use crate::ecs::ComponentKind;
    use crate::player::Player;

    const DT: f64 = 1.0 / 60.0;

    fn player(world: &mut World) -> EntityId {
        let id = world
            .spawn()
            .with(Player)
            .with(Input::default())
            .with(Transform::at(100.0, 100.0))
            .with(Aabb::sized(40.0, 60.0))
            .with(CharacterState::facing(Facing::Left))
            .with(Team::new(TeamId::Player))
            .with(Attack::default())
            .with(Hitbox::default())
            .id();
        world.set_player(id);
        id
    }

    fn press(world: &mut World, id: EntityId, f: impl FnOnce(&mut Input)) {
        let input = world.get_mut::<Input>(id).unwrap();
        *input = Input::default();
        f(input);
    }

    #[test]
    fn melee_fires_on_the_press_edge_only() {
        let mut world = World::new();
        let id = player(&mut world);
        let profiles = AttackProfiles::default();
        let mut state = PlayerCombat::default();

        press(&mut world, id, |i| i.attack_heavy = true);
        update_player_attacks(&mut world, &profiles, &mut state, DT);
        let attack = *world.get::<Attack>(id).unwrap();
        assert_eq!(attack.phase, AttackPhase::Windup);
        assert_eq!(attack.damage, profiles.heavy.damage);

        // Held through recovery and cooldown: no second swing.
        world.insert(id, Attack::default());
        update_player_attacks(&mut world, &profiles, &mut state, DT);
        assert_eq!(world.get::<Attack>(id).unwrap().phase, AttackPhase::Idle);
    }

    #[test]
    fn projectiles_leave_from_the_facing_side() {
        let mut world = World::new();
        let id = player(&mut world);
        let profiles = AttackProfiles::default();

        let shot = fire_projectile(&mut world, id, &profiles.projectile).unwrap();
        let transform = world.get::<Transform>(shot).unwrap();
        assert_eq!(transform.x, 40.0);
        assert_eq!(world.get::<crate::physics::Velocity>(shot).unwrap().vx, -620.0);
        assert_eq!(world.get::<Projectile>(shot).unwrap().owner, Some(id));
        assert!(!world.get::<Attack>(id).unwrap().can_attack());
        assert!(fire_projectile(&mut world, id, &profiles.projectile).is_none());
    }

    #[test]
    fn wave_burst_pulses_then_stops() {
        let mut world = World::new();
        let id = player(&mut world);
        let profiles = AttackProfiles {
            wave: WaveProfile {
                pulses: 3,
                interval: 0.05,
                ..WaveProfile::default()
            },
            ..AttackProfiles::default()
        };
        let mut state = PlayerCombat::default();

        press(&mut world, id, |i| i.attack_wave = true);
        update_player_attacks(&mut world, &profiles, &mut state, DT);
        assert!(state.is_emitting());

        for _ in 0..12 {
            update_player_attacks(&mut world, &profiles, &mut state, DT);
        }
        assert!(!state.is_emitting());
        let waves = world.query_kinds(&[ComponentKind::Wave]);
        assert_eq!(waves.len(), 3);
        let center = world.get::<Transform>(waves[0]).unwrap();
        assert_eq!((center.x, center.y), (120.0, 130.0));
        assert_eq!(world.get::<Wave>(waves[0]).unwrap().radius, 0.0);
    }
}
