//! Sight checks and alert smoothing.

use bevy::math::DVec2;

use super::components::{AiState, Perception};
use crate::ecs::EntityId;
use crate::physics::Facing;

/// Something an AI can perceive this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting {
    pub entity: EntityId,
    pub position: DVec2,
}

/// Whether `observer` facing `facing` perceives a target at `target`.
///
/// Inside the field of view the sight range applies; anywhere around the
/// observer the peripheral range does. Both are capped by `max_aggro`.
pub fn detects(
    perception: &Perception,
    observer: DVec2,
    facing: Facing,
    target: DVec2,
    max_aggro: f64,
) -> bool {
    let delta = target - observer;
    let mut dist = delta.length();
    if dist == 0.0 {
        dist = 1.0;
    }
    if dist > max_aggro {
        return false;
    }
    let dir = delta / dist;
    let cos = (dir.x * facing.sign()).clamp(-1.0, 1.0);
    let angle = cos.acos();

    let in_view = dist <= perception.sight_range && angle <= perception.fov * 0.5;
    let in_periphery = dist <= perception.peripheral_range;
    in_view || in_periphery
}

/// Updates target memory and alert level for one AI entity.
///
/// Alert fills at `dt / check_interval` while the target is perceived and
/// drains at `dt / lose_sight_time` otherwise. The target is only dropped
/// once alert is fully drained. With nothing to perceive, alert drains at
/// `dt` and the target is dropped at once.
pub fn sense(
    ai: &mut AiState,
    perception: &mut Perception,
    observer: DVec2,
    facing: Facing,
    max_aggro: f64,
    sighting: Option<Sighting>,
    dt: f64,
) {
    let dt = dt.max(0.0);
    perception.check_timer += dt;

    let Some(sighting) = sighting else {
        ai.alert_level = (ai.alert_level - dt).clamp(0.0, 1.0);
        ai.target = None;
        return;
    };

    if detects(perception, observer, facing, sighting.position, max_aggro) {
        let rate = dt / perception.check_interval.max(0.001);
        ai.alert_level = (ai.alert_level + rate).clamp(0.0, 1.0);
        ai.target = Some(sighting.entity);
        ai.last_seen = Some(sighting.position);
        perception.check_timer = 0.0;
    } else {
        let rate = dt / perception.lose_sight_time.max(0.001);
        ai.alert_level = (ai.alert_level - rate).clamp(0.0, 1.0);
        if ai.alert_level == 0.0 {
            ai.target = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::World;

    const DT: f64 = 1.0 / 60.0;

    fn target() -> Sighting {
        let mut world = World::new();
        Sighting {
            entity: world.create_entity(),
            position: DVec2::ZERO,
        }
    }

    #[test]
    fn field_of_view_only_matters_beyond_the_periphery() {
        let perception = Perception::default();
        let observer = DVec2::ZERO;

        assert!(detects(&perception, observer, Facing::Right, DVec2::new(400.0, 0.0), f64::INFINITY));
        assert!(!detects(&perception, observer, Facing::Left, DVec2::new(400.0, 0.0), f64::INFINITY));
        assert!(detects(&perception, observer, Facing::Left, DVec2::new(200.0, 0.0), f64::INFINITY));
        assert!(!detects(&perception, observer, Facing::Right, DVec2::new(200.0, 0.0), 150.0));
        assert!(detects(&perception, observer, Facing::Left, observer, f64::INFINITY));
    }

    #[test]
    fn target_survives_until_alert_drains() {
        let mut ai = AiState::default();
        let mut perception = Perception {
            check_interval: 0.1,
            lose_sight_time: 0.1,
            ..Perception::default()
        };
        let mut seen = target();
        seen.position = DVec2::new(100.0, 0.0);

        for _ in 0..3 {
            sense(&mut ai, &mut perception, DVec2::ZERO, Facing::Right, f64::INFINITY, Some(seen), DT);
        }
        assert!(ai.alert_level > 0.0);
        assert_eq!(ai.target, Some(seen.entity));
        assert_eq!(perception.check_timer, 0.0);

        seen.position = DVec2::new(5000.0, 0.0);
        sense(&mut ai, &mut perception, DVec2::ZERO, Facing::Right, f64::INFINITY, Some(seen), DT);
        assert!(ai.alert_level > 0.0);
        assert_eq!(ai.target, Some(seen.entity));

        for _ in 0..10 {
            sense(&mut ai, &mut perception, DVec2::ZERO, Facing::Right, f64::INFINITY, Some(seen), DT);
        }
        assert_eq!(ai.alert_level, 0.0);
        assert_eq!(ai.target, None);
        assert_eq!(ai.last_seen, Some(DVec2::new(100.0, 0.0)));
    }

    #[test]
    fn alert_stays_bounded_for_any_dt() {
        let mut ai = AiState::default();
        let mut perception = Perception {
            check_interval: 0.0,
            lose_sight_time: 0.0,
            ..Perception::default()
        };
        let mut seen = target();
        let steps = [1e-6, 10.0, -3.0, 1e9, 0.0, DT];
        for (i, dt) in steps.iter().enumerate() {
            seen.position = if i % 2 == 0 {
                DVec2::new(50.0, 0.0)
            } else {
                DVec2::new(1e6, 0.0)
            };
            sense(&mut ai, &mut perception, DVec2::ZERO, Facing::Right, f64::INFINITY, Some(seen), *dt);
            assert!((0.0..=1.0).contains(&ai.alert_level), "alert {}", ai.alert_level);
        }
        sense(&mut ai, &mut perception, DVec2::ZERO, Facing::Right, f64::INFINITY, None, 5.0);
        assert_eq!(ai.alert_level, 0.0);
        assert_eq!(ai.target, None);
    }
}
