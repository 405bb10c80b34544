//! Tile collision: per-axis position integration and resolution.
//!
//! X is always resolved before Y. Contact flags are rewritten for every
//! collider on each pass and are the only record of ground, wall and
//! ceiling contact.

use super::components::{Aabb, Contacts, Transform, Velocity};
use crate::core::CollisionConfig;
use crate::ecs::{ComponentKind, ComponentMask, World};
use crate::level::{tile_coord, TileProvider};

/// Upper bound on tile rows swept per axis per tick.
const MAX_SWEEP_ROWS: i64 = 64;

/// Resolves every `Transform + Velocity + Aabb + Collider` against the
/// tiles, then moves collider-less bodies freely.
pub fn resolve_collisions(
    world: &mut World,
    tiles: &dyn TileProvider,
    config: &CollisionConfig,
    dt: f64,
) {
    let required = ComponentMask::of(&[
        ComponentKind::Transform,
        ComponentKind::Velocity,
        ComponentKind::Aabb,
        ComponentKind::Collider,
    ]);

    for id in world.query(required) {
        let c = world.components_mut();
        let Some(aabb) = c.aabb.get(id).copied() else {
            continue;
        };
        let (Some(transform), Some(velocity)) =
            (c.transform.get_mut(id), c.velocity.get_mut(id))
        else {
            continue;
        };

        let contacts = resolve_body(tiles, config, transform, velocity, &aabb, dt);
        if let Some(flags) = c.contacts.get_mut(id) {
            *flags = contacts;
        }
    }

    integrate_free_bodies(world, dt);
}

/// Moves and resolves one body; returns this tick's contact flags.
pub fn resolve_body(
    tiles: &dyn TileProvider,
    config: &CollisionConfig,
    transform: &mut Transform,
    velocity: &mut Velocity,
    aabb: &Aabb,
    dt: f64,
) -> Contacts {
    let mut contacts = Contacts::default();
    contacts.hit_wall = resolve_x(tiles, config, transform, velocity, aabb, dt);

    if velocity.vy > 0.0 {
        contacts.on_ground = resolve_down(tiles, config, transform, velocity, aabb, dt);
    } else if velocity.vy < 0.0 {
        contacts.hit_ceil = resolve_up(tiles, config, transform, velocity, aabb, dt);
    } else {
        contacts.on_ground = check_ground(tiles, config, transform, aabb);
    }
    contacts
}

fn resolve_x(
    tiles: &dyn TileProvider,
    config: &CollisionConfig,
    transform: &mut Transform,
    velocity: &mut Velocity,
    aabb: &Aabb,
    dt: f64,
) -> bool {
    if velocity.vx == 0.0 {
        return false;
    }
    let next_x = transform.x + velocity.vx * dt;
    let left = next_x + aabb.ox;
    let edge = if velocity.vx > 0.0 { left + aabb.w } else { left };

    let top = transform.y + aabb.oy;
    let margin = config.wall_margin.min(aabb.h * 0.25);
    let samples = [top + margin, top + aabb.h * 0.5, top + aabb.h - margin];

    if samples.iter().any(|&y| tiles.is_blocking_at(edge, y)) {
        velocity.vx = 0.0;
        true
    } else {
        transform.x = next_x;
        false
    }
}

/// X positions sampled along the footprint when checking floors and ceilings.
fn footprint(transform: &Transform, aabb: &Aabb, inset: f64, step: f64) -> Vec<f64> {
    let from = transform.x + aabb.ox + inset;
    let to = transform.x + aabb.ox + aabb.w - inset;
    if !(to > from) || !(step > 0.0) {
        return vec![transform.x + aabb.ox + aabb.w * 0.5];
    }
    let mut xs = Vec::new();
    let mut x = from;
    while x < to && xs.len() < MAX_SWEEP_ROWS as usize {
        xs.push(x);
        x += step;
    }
    xs.push(to);
    xs
}

/// One-way tiles only catch bodies whose previous bottom edge was at or
/// above the platform top.
fn lands_on(tile_one_way: bool, prev_bottom: f64, tile_top: f64, epsilon: f64) -> bool {
    !tile_one_way || prev_bottom <= tile_top + epsilon
}

fn resolve_down(
    tiles: &dyn TileProvider,
    config: &CollisionConfig,
    transform: &mut Transform,
    velocity: &mut Velocity,
    aabb: &Aabb,
    dt: f64,
) -> bool {
    let size = tiles.tile_size();
    let dy = velocity.vy * dt;
    let prev_bottom = transform.y + aabb.oy + aabb.h;
    let next_bottom = prev_bottom + dy;
    let xs = footprint(transform, aabb, config.floor_inset, size);

    let first = tile_coord(prev_bottom, size);
    let reach = tile_coord(next_bottom, size);
    let last = reach.min(first + MAX_SWEEP_ROWS);
    for row in first..=last {
        let tile_top = row as f64 * size;
        let sample_y = tile_top + size * 0.5;
        let hit = xs.iter().any(|&x| {
            tiles
                .tile_info_at(x, sample_y)
                .is_some_and(|tile| {
                    tile.solid && lands_on(tile.one_way, prev_bottom, tile_top, config.epsilon)
                })
        });
        if hit {
            transform.y = tile_top - aabb.h - aabb.oy - config.epsilon;
            velocity.vy = 0.0;
            return true;
        }
    }

    // A capped sweep stops above the first unscanned row.
    transform.y += if reach > last {
        (last + 1) as f64 * size - config.epsilon - prev_bottom
    } else {
        dy
    };
    false
}

fn resolve_up(
    tiles: &dyn TileProvider,
    config: &CollisionConfig,
    transform: &mut Transform,
    velocity: &mut Velocity,
    aabb: &Aabb,
    dt: f64,
) -> bool {
    let size = tiles.tile_size();
    let dy = velocity.vy * dt;
    let prev_top = transform.y + aabb.oy;
    let next_top = prev_top + dy;
    let xs = footprint(transform, aabb, config.floor_inset, size);

    let first = tile_coord(prev_top, size);
    let reach = tile_coord(next_top, size);
    let last = reach.max(first - MAX_SWEEP_ROWS);
    for row in (last..=first).rev() {
        let sample_y = (row as f64 + 0.5) * size;
        if xs.iter().any(|&x| tiles.is_blocking_at(x, sample_y)) {
            let tile_bottom = (row + 1) as f64 * size;
            transform.y = tile_bottom - aabb.oy + config.epsilon;
            velocity.vy = 0.0;
            return true;
        }
    }

    transform.y += if reach < last {
        last as f64 * size + config.epsilon - prev_top
    } else {
        dy
    };
    false
}

/// Resting bodies do no velocity-driven check, so look just below them.
fn check_ground(
    tiles: &dyn TileProvider,
    config: &CollisionConfig,
    transform: &Transform,
    aabb: &Aabb,
) -> bool {
    let size = tiles.tile_size();
    let bottom = transform.y + aabb.oy + aabb.h;
    let below = bottom + config.ground_reach;
    let tile_top = tile_coord(below, size) as f64 * size;

    footprint(transform, aabb, config.floor_inset, size)
        .into_iter()
        .any(|x| {
            tiles
                .tile_info_at(x, below)
                .is_some_and(|tile| {
                    tile.solid && lands_on(tile.one_way, bottom, tile_top, config.epsilon)
                })
        })
}

/// Bodies without a collider (projectiles, debris) move unobstructed.
fn integrate_free_bodies(world: &mut World, dt: f64) {
    let movers = ComponentMask::of(&[ComponentKind::Transform, ComponentKind::Velocity]);
    for id in world.query(movers) {
        if world.has(id, ComponentKind::Collider) {
            continue;
        }
        let c = world.components_mut();
        if let (Some(transform), Some(velocity)) = (c.transform.get_mut(id), c.velocity.get(id)) {
            transform.x += velocity.vx * dt;
            transform.y += velocity.vy * dt;
        }
    }
}
