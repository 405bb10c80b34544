//! The player's charged special ability.

use bevy::log::info;
use serde::{Deserialize, Serialize};

use super::components::{AbilityMeter, Input};
use crate::combat::{apply_buff, BuffState};
use crate::core::SimEvent;
use crate::ecs::World;
use crate::physics::CharacterState;

/// What a full meter buys: a timed buff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityProfile {
    pub duration: f64,
    pub speed_multiplier: f64,
    /// Below 1 means faster attacks.
    pub attack_speed_multiplier: f64,
    pub invulnerable: bool,
}

impl Default for AbilityProfile {
    fn default() -> Self {
        Self {
            duration: 6.0,
            speed_multiplier: 1.4,
            attack_speed_multiplier: 0.6,
            invulnerable: true,
        }
    }
}

impl AbilityProfile {
    fn buff(&self) -> BuffState {
        BuffState {
            duration: self.duration,
            speed_multiplier: self.speed_multiplier,
            attack_speed_multiplier: self.attack_speed_multiplier,
            invulnerable: self.invulnerable,
            ..BuffState::default()
        }
    }
}

/// Recharges the player's meter and fires the ability while `ability` is
/// held on a full meter. Firing empties the meter; it stays empty until
/// the ability runs out.
pub fn update_abilities(
    world: &mut World,
    profile: &AbilityProfile,
    dt: f64,
    events: &mut Vec<SimEvent>,
) {
    let Some(player) = world.player() else {
        return;
    };
    let dead = world
        .get::<CharacterState>(player)
        .is_some_and(CharacterState::is_dead);
    let c = world.components_mut();
    let (Some(input), Some(meter)) = (c.input.get(player).copied(), c.ability.get_mut(player))
    else {
        return;
    };

    meter.regenerate(dt);
    if meter.active {
        meter.elapsed += dt;
        if meter.elapsed >= profile.duration {
            meter.active = false;
            meter.elapsed = 0.0;
        }
        return;
    }
    if !fires(&input, meter, dead) {
        return;
    }

    meter.current = 0.0;
    meter.ready = false;
    meter.active = true;
    meter.elapsed = 0.0;
    apply_buff(world, player, profile.buff());
    info!("{} activated ability for {:.1}s", player, profile.duration);
    events.push(SimEvent::AbilityActivated { entity: player });
}

fn fires(input: &Input, meter: &AbilityMeter, dead: bool) -> bool {
    input.ability && meter.ready && !dead
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{trigger_attack, Attack, Health};
    use crate::ecs::EntityId;
    use crate::player::Player;

    const DT: f64 = 0.25;

    fn world_with_player(meter: AbilityMeter) -> (World, EntityId) {
        let mut world = World::new();
        let player = world
            .spawn()
            .with(Player)
            .with(Input::default())
            .with(Health::new(100.0))
            .with(Attack::default())
            .with(meter)
            .id();
        world.set_player(player);
        (world, player)
    }

    fn press(world: &mut World, player: EntityId, held: bool) {
        if let Some(input) = world.get_mut::<Input>(player) {
            input.ability = held;
        }
    }

    #[test]
    fn meter_recharges_until_ready() {
        let (mut world, player) = world_with_player(AbilityMeter {
            max: 4.0,
            charge_rate: 4.0,
            ..AbilityMeter::default()
        });
        let profile = AbilityProfile::default();
        let mut events = Vec::new();

        for _ in 0..3 {
            update_abilities(&mut world, &profile, DT, &mut events);
        }
        let meter = world.get::<AbilityMeter>(player).unwrap();
        assert_eq!(meter.current, 3.0);
        assert!(!meter.ready);

        for _ in 0..3 {
            update_abilities(&mut world, &profile, DT, &mut events);
        }
        let meter = world.get::<AbilityMeter>(player).unwrap();
        assert_eq!(meter.current, 4.0);
        assert!(meter.ready);
        assert!(events.is_empty());
    }

    #[test]
    fn firing_empties_the_meter_and_buffs_the_player() {
        let (mut world, player) = world_with_player(AbilityMeter {
            current: 100.0,
            ready: true,
            ..AbilityMeter::default()
        });
        let profile = AbilityProfile {
            duration: 1.0,
            ..AbilityProfile::default()
        };
        let mut events = Vec::new();

        update_abilities(&mut world, &profile, DT, &mut events);
        assert!(!world.get::<AbilityMeter>(player).unwrap().active);

        press(&mut world, player, true);
        update_abilities(&mut world, &profile, DT, &mut events);
        let meter = world.get::<AbilityMeter>(player).unwrap();
        assert!(meter.active);
        assert!(!meter.ready);
        assert_eq!(meter.current, 0.0);
        assert_eq!(events, vec![SimEvent::AbilityActivated { entity: player }]);

        let buff = world.get::<BuffState>(player).unwrap();
        assert!(buff.active);
        assert_eq!(buff.attack_speed_multiplier, profile.attack_speed_multiplier);
        assert!(world.get::<Health>(player).unwrap().invulnerable);

        // No charge while active, and no refire on a held button.
        for _ in 0..3 {
            update_abilities(&mut world, &profile, DT, &mut events);
        }
        assert_eq!(world.get::<AbilityMeter>(player).unwrap().current, 0.0);
        assert_eq!(events.len(), 1);

        update_abilities(&mut world, &profile, DT, &mut events);
        assert!(!world.get::<AbilityMeter>(player).unwrap().active);
    }

    #[test]
    fn active_ability_speeds_up_attacks() {
        let (mut world, player) = world_with_player(AbilityMeter {
            current: 100.0,
            ready: true,
            ..AbilityMeter::default()
        });
        let profile = AbilityProfile::default();
        press(&mut world, player, true);
        update_abilities(&mut world, &profile, DT, &mut Vec::new());

        assert!(trigger_attack(&mut world, player));
        let attack = world.get::<Attack>(player).unwrap();
        let base = Attack::default();
        assert!((attack.phase_timer - base.windup * profile.attack_speed_multiplier).abs() < 1e-12);
        assert!((attack.cooldown - base.cooldown_max * profile.attack_speed_multiplier).abs() < 1e-12);
    }

    #[test]
    fn dead_players_cannot_fire() {
        let (mut world, player) = world_with_player(AbilityMeter {
            current: 100.0,
            ready: true,
            ..AbilityMeter::default()
        });
        world.insert(
            player,
            CharacterState {
                action: crate::physics::Action::Dead,
                ..CharacterState::default()
            },
        );
        press(&mut world, player, true);
        update_abilities(&mut world, &AbilityProfile::default(), DT, &mut Vec::new());
        assert!(!world.get::<AbilityMeter>(player).unwrap().active);
    }
}
