//! Behavior state machine: picks a mode each tick and turns it into an
//! `Intent` for physics and an attack request for combat.

use bevy::log::debug;
use bevy::math::DVec2;

use super::components::{AiMode, AiState, BehaviorProfile, Intent};
use super::perception::{sense, Sighting};
use crate::combat::{can_attack, trigger_attack, CombatStats};
use crate::core::DebugFlags;
use crate::ecs::{ComponentKind, ComponentMask, EntityId, World};
use crate::physics::{CharacterState, Facing};

/// Distance at which a patrol point counts as reached.
const ARRIVE_DISTANCE: f64 = 8.0;
/// Distance at which a last-seen position counts as investigated.
const INVESTIGATE_DISTANCE: f64 = 12.0;
/// Alert needed before a remembered target drives chase or attack.
const ENGAGE_ALERT: f64 = 0.2;
/// How far above the AI a target must stand to trigger a gap jump.
const JUMP_HEIGHT_GAP: f64 = 12.0;

/// Resolved engagement distances for one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Ranges {
    attack: f64,
    chase: f64,
    disengage: f64,
}

impl Ranges {
    fn resolve(behavior: &BehaviorProfile, stats: Option<&CombatStats>) -> Self {
        let attack = behavior
            .attack_range
            .or(stats.map(|s| s.attack_range))
            .unwrap_or_else(|| CombatStats::default().attack_range);
        let chase = behavior.chase_range.unwrap_or(attack * 2.0);
        let disengage = behavior.disengage_range.unwrap_or(chase * 1.3);
        Self {
            attack,
            chase,
            disengage,
        }
    }
}

/// Everything the state machine reads about one entity this tick.
#[derive(Debug, Clone, Copy)]
struct Situation {
    position: DVec2,
    /// Position of the current target, if it is still perceivable.
    target: Option<DVec2>,
    /// Distance to the target, else to the last-seen point, else infinite.
    distance: f64,
    ranges: Ranges,
    low_health: bool,
    blocked_by_wall: bool,
    has_patrol: bool,
}

/// Side effects of the chosen action that touch other components.
#[derive(Debug, Clone, Copy, Default)]
struct Directive {
    face: Option<Facing>,
    attack: bool,
}

fn sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// The player, if present and alive.
fn player_sighting(world: &World) -> Option<Sighting> {
    let player = world.player()?;
    let c = world.components();
    let transform = c.transform.get(player)?;
    let dead = c.health.get(player).is_some_and(|h| h.is_dead())
        || c.character.get(player).is_some_and(CharacterState::is_dead);
    if dead {
        return None;
    }
    Some(Sighting {
        entity: player,
        position: transform.position(),
    })
}

/// Runs perception and behavior for every AI entity.
pub fn update_ai(world: &mut World, debug_flags: &DebugFlags, dt: f64) {
    let required = ComponentMask::of(&[
        ComponentKind::AiState,
        ComponentKind::Perception,
        ComponentKind::BehaviorProfile,
        ComponentKind::Transform,
        ComponentKind::Intent,
    ]);
    let sighting = player_sighting(world);

    for id in world.query(required) {
        let before = world.get::<AiState>(id).map(|ai| ai.mode);
        if think(world, id, sighting, dt) {
            trigger_attack(world, id);
        }
        if debug_flags.trace_ai {
            let after = world.get::<AiState>(id).map(|ai| ai.mode);
            if let (Some(before), Some(after)) = (before, after) {
                if before != after {
                    debug!("{} ai {} -> {}", id, before.label(), after.label());
                }
            }
        }
    }
}

/// One entity's tick. Returns whether it requested an attack.
fn think(world: &mut World, id: EntityId, sighting: Option<Sighting>, dt: f64) -> bool {
    let oscillator = world.has(id, ComponentKind::MovementPattern);
    let ready = can_attack(world, id);
    let c = world.components_mut();
    let (Some(ai), Some(perception), Some(behavior), Some(transform), Some(intent)) = (
        c.ai_state.get_mut(id),
        c.perception.get_mut(id),
        c.behavior.get_mut(id),
        c.transform.get(id),
        c.intent.get_mut(id),
    ) else {
        return false;
    };

    *intent = Intent::default();
    ai.state_time += dt;

    if c.character.get(id).is_some_and(CharacterState::is_dead) {
        ai.target = None;
        ai.debug_label = "dead";
        return false;
    }

    if let Some(stun) = c.stun.get_mut(id).filter(|s| s.stunned) {
        stun.elapsed += dt;
        ai.mode = AiMode::Stunned;
        ai.debug_label = AiMode::Stunned.label();
        if stun.elapsed < stun.duration {
            return false;
        }
        stun.stunned = false;
        stun.elapsed = 0.0;
        ai.state_time = 0.0;
        ai.mode = AiMode::Idle;
    }

    let facing = c.character.get(id).map_or(Facing::Right, |s| s.facing);
    let position = transform.position();
    sense(
        ai,
        perception,
        position,
        facing,
        behavior.max_aggro_distance,
        sighting,
        dt,
    );

    let target = sighting
        .filter(|s| ai.target == Some(s.entity))
        .map(|s| s.position);
    let distance = target
        .or(ai.last_seen)
        .map_or(f64::INFINITY, |p| p.distance(position));
    let low_health = c
        .health
        .get(id)
        .is_some_and(|h| h.max > 0.0 && h.fraction() <= behavior.retreat_health_pct);
    let contacts = c.contacts.get(id).copied().unwrap_or_default();

    let situation = Situation {
        position,
        target,
        distance,
        ranges: Ranges::resolve(behavior, c.combat_stats.get(id)),
        low_health,
        blocked_by_wall: contacts.hit_wall && contacts.on_ground,
        has_patrol: !behavior.patrol_points.is_empty(),
    };

    select_mode(ai, &situation);
    behavior.jump_timer = (behavior.jump_timer - dt).max(0.0);
    let directive = act(ai, behavior, intent, &situation, ready);

    if oscillator {
        intent.move_dir = 0;
        intent.jump = false;
    }
    if let Some(state) = c.character.get_mut(id) {
        if let Some(face) = directive.face {
            state.facing = face;
        }
        if !oscillator {
            if let Some(face) = Facing::from_sign(f64::from(intent.move_dir)) {
                state.facing = face;
            }
        }
    }
    directive.attack
}

/// Top-down mode priority: stun is handled by the caller, then retreat,
/// then target-driven modes, then investigate. With nothing to pursue an
/// entity with a route resumes patrolling; one without idles.
fn select_mode(ai: &mut AiState, situation: &Situation) {
    let ranges = situation.ranges;
    let has_target = situation.target.is_some();

    if ai.mode == AiMode::Stunned {
        return;
    }
    if situation.low_health && has_target {
        ai.set_mode(AiMode::Retreat);
    } else if has_target && ai.alert_level > ENGAGE_ALERT {
        if situation.distance > ranges.disengage {
            ai.target = None;
            ai.last_seen = None;
            ai.set_mode(AiMode::Idle);
        } else if situation.distance <= ranges.attack * 0.9 {
            ai.set_mode(AiMode::Attack);
        } else {
            ai.set_mode(AiMode::Chase);
        }
    } else if ai.last_seen.is_some() && situation.distance < ranges.chase {
        ai.set_mode(AiMode::Investigate);
    } else if situation.has_patrol {
        if ai.mode != AiMode::Patrol && ai.mode != AiMode::Idle {
            ai.set_mode(AiMode::Patrol);
        }
    } else {
        ai.set_mode(AiMode::Idle);
    }
}

fn act(
    ai: &mut AiState,
    behavior: &mut BehaviorProfile,
    intent: &mut Intent,
    situation: &Situation,
    ready: bool,
) -> Directive {
    let mut directive = Directive::default();
    let position = situation.position;
    let ranges = situation.ranges;
    let distance = situation.distance;

    match ai.mode {
        AiMode::Idle => {
            if !behavior.patrol_points.is_empty() && ai.state_time > behavior.idle_duration {
                ai.set_mode(AiMode::Patrol);
            }
        }
        AiMode::Patrol => {
            let count = behavior.patrol_points.len();
            if count == 0 {
                ai.set_mode(AiMode::Idle);
            } else {
                let point = behavior.patrol_points[behavior.patrol_index % count];
                let dx = point.x - position.x;
                intent.move_dir = sign(dx);
                if dx.abs() < ARRIVE_DISTANCE {
                    intent.move_dir = 0;
                    behavior.patrol_index = (behavior.patrol_index + 1) % count;
                    ai.set_mode(AiMode::Idle);
                }
            }
        }
        AiMode::Investigate => match ai.last_seen {
            Some(spot) => {
                intent.move_dir = sign(spot.x - position.x);
                if distance < INVESTIGATE_DISTANCE {
                    intent.move_dir = 0;
                    ai.last_seen = None;
                    ai.set_mode(AiMode::Idle);
                }
            }
            None => {
                ai.set_mode(AiMode::Idle);
            }
        },
        AiMode::Chase => match situation.target {
            Some(target) => {
                intent.move_dir = sign(target.x - position.x);
                let target_above = target.y + JUMP_HEIGHT_GAP < position.y;
                let wants_jump = (behavior.jump_gap && target_above) || situation.blocked_by_wall;
                if wants_jump && behavior.jump_timer == 0.0 {
                    intent.jump = true;
                    behavior.jump_timer = behavior.jump_cooldown;
                }
                if distance <= ranges.attack * 0.9 {
                    ai.set_mode(AiMode::Attack);
                }
            }
            None => {
                ai.set_mode(AiMode::Investigate);
            }
        },
        AiMode::Attack => match situation.target {
            Some(target) => {
                directive.face = Some(if target.x >= position.x {
                    Facing::Right
                } else {
                    Facing::Left
                });
                if ready && distance <= ranges.attack * 1.05 {
                    intent.attack = true;
                    directive.attack = true;
                } else if distance > ranges.attack * 1.2 {
                    ai.set_mode(AiMode::Chase);
                }
            }
            None => {
                ai.set_mode(AiMode::Idle);
            }
        },
        AiMode::Retreat => match situation.target {
            Some(target) => {
                intent.move_dir = sign(position.x - target.x);
                if distance > ranges.chase * 1.2 {
                    ai.set_mode(AiMode::Idle);
                }
            }
            None => {
                ai.set_mode(AiMode::Idle);
            }
        },
        AiMode::Stunned => {}
    }

    ai.debug_label = ai.mode.label();
    directive
}
