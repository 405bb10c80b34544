//! Movement and collision components.

use bevy::math::DVec2;
use serde::{Deserialize, Serialize};

/// World position of the entity's anchor (top-left of an unshifted box).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    /// Draw order for observers; ignored by the simulation.
    pub z: f64,
}

impl Transform {
    pub fn at(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
}

/// Collision box, offset from the entity's transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub w: f64,
    pub h: f64,
    pub ox: f64,
    pub oy: f64,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::sized(16.0, 16.0)
    }
}

impl Aabb {
    pub fn sized(w: f64, h: f64) -> Self {
        Self {
            w,
            h,
            ox: 0.0,
            oy: 0.0,
        }
    }

    /// World-space rectangle for a box anchored at `transform`.
    pub fn rect(&self, transform: &Transform) -> Rect {
        Rect::new(transform.x + self.ox, transform.y + self.oy, self.w, self.h)
    }
}

/// Axis-aligned rectangle in world space; `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            left: x,
            top: y,
            right: x + w,
            bottom: y + h,
        }
    }

    /// Touching edges count as overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right < other.left
            || self.left > other.right
            || self.bottom < other.top
            || self.top > other.bottom)
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new((self.left + self.right) * 0.5, (self.top + self.bottom) * 0.5)
    }
}

/// How gravity and speed limits apply to an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsBody {
    pub gravity_scale: f64,
    pub friction_x: f64,
    pub max_speed_x: f64,
    pub max_speed_y: f64,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            gravity_scale: 1.0,
            friction_x: 0.0,
            max_speed_x: f64::INFINITY,
            max_speed_y: f64::INFINITY,
        }
    }
}

/// Collision category, for observers and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColliderGroup {
    #[default]
    World,
    Player,
    Enemy,
    Neutral,
    Pickup,
    Box,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    /// Whether the entity blocks other bodies. Tile collision applies either way.
    pub solid: bool,
    pub one_way: bool,
    pub group: ColliderGroup,
}

impl Default for Collider {
    fn default() -> Self {
        Self {
            solid: true,
            one_way: false,
            group: ColliderGroup::World,
        }
    }
}

impl Collider {
    pub fn group(group: ColliderGroup) -> Self {
        Self {
            group,
            ..Self::default()
        }
    }
}

/// Per-tick contact flags published by the collision resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Contacts {
    pub on_ground: bool,
    pub hit_wall: bool,
    pub hit_ceil: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    Idle,
    Run,
    Jump,
    Fall,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f64 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// `None` for zero (keep the current facing).
    pub fn from_sign(value: f64) -> Option<Self> {
        if value > 0.0 {
            Some(Facing::Right)
        } else if value < 0.0 {
            Some(Facing::Left)
        } else {
            None
        }
    }
}

/// Derived animation state plus the bookkeeping the jump rules need.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CharacterState {
    pub action: Action,
    pub facing: Facing,
    /// Seconds since the entity last stood on ground.
    pub air_time: f64,
    /// Seconds a buffered jump press stays valid.
    pub jump_buffer: f64,
    /// Jump input as seen last tick, for edge detection.
    pub jump_held: bool,
    /// Set once a jump leaves the ground; cleared on landing.
    pub jumped: bool,
}

impl CharacterState {
    pub fn facing(facing: Facing) -> Self {
        Self {
            facing,
            ..Self::default()
        }
    }

    pub fn is_dead(&self) -> bool {
        self.action == Action::Dead
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PatternKind {
    #[default]
    Horizontal,
    Vertical,
}

/// Oscillates an entity back and forth around its starting point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementPattern {
    pub kind: PatternKind,
    pub speed: f64,
    /// Total travel; the entity turns at `origin ± range / 2`.
    pub range: f64,
    /// Captured from the transform on the first tick.
    pub origin: Option<DVec2>,
    /// +1 or -1.
    pub direction: f64,
}

impl Default for MovementPattern {
    fn default() -> Self {
        Self {
            kind: PatternKind::Horizontal,
            speed: 100.0,
            range: 200.0,
            origin: None,
            direction: 1.0,
        }
    }
}
