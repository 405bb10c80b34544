//! Bevy integration: steps the [`Simulation`] resource once per frame.

use bevy::prelude::*;

use super::events::{DamageEvent, DeathEvent, SimEvent};
use super::simulation::Simulation;
use crate::player::Input;

/// Button snapshot the host writes each frame; forwarded to the player.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput(pub Input);

/// Registers the simulation's events and the per-frame step system.
///
/// The host inserts the [`Simulation`] resource itself, since only it
/// knows the level geometry. Until then the step system does nothing.
pub struct PlatformerPlugin;

impl Plugin for PlatformerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SimEvent>()
            .add_event::<DamageEvent>()
            .add_event::<DeathEvent>()
            .init_resource::<PlayerInput>()
            .add_systems(Update, step_simulation);
    }
}

fn step_simulation(
    time: Res<Time>,
    input: Res<PlayerInput>,
    simulation: Option<ResMut<Simulation>>,
    mut sim_events: EventWriter<SimEvent>,
    mut damage_events: EventWriter<DamageEvent>,
    mut death_events: EventWriter<DeathEvent>,
) {
    let Some(mut simulation) = simulation else {
        return;
    };
    simulation.set_player_input(input.0);
    simulation.advance(time.delta_secs_f64());

    for event in simulation.drain_events() {
        match event {
            SimEvent::Damage(damage) => {
                damage_events.send(damage);
            }
            SimEvent::Death(death) => {
                death_events.send(death);
            }
            _ => {}
        }
        sim_events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::core::SimConfig;
    use crate::level::EmptyTiles;

    #[test]
    fn frames_drive_fixed_ticks() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .add_plugins(PlatformerPlugin)
            .insert_resource(Simulation::new(SimConfig::default(), EmptyTiles::default()).unwrap());

        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(40));
        app.update();

        assert_eq!(app.world().resource::<Simulation>().tick_count(), 2);
    }

    #[test]
    fn missing_simulation_is_skipped() {
        let mut app = App::new();
        app.init_resource::<Time>().add_plugins(PlatformerPlugin);
        app.update();
        assert!(app.world().get_resource::<Simulation>().is_none());
    }
}
