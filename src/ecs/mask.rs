//! Component kinds and the bitmask used to match entities against queries.

use std::ops::{BitAnd, BitOr};

/// Every component kind the simulation knows about.
///
/// The set is closed: each kind owns one bit in a [`ComponentMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ComponentKind {
    Transform,
    Velocity,
    Aabb,
    PhysicsBody,
    Collider,
    CharacterState,
    Contacts,
    Input,
    Intent,
    Player,
    Health,
    Team,
    Hitbox,
    Hurtbox,
    Attack,
    IFrame,
    Block,
    Stun,
    CombatStats,
    BuffState,
    AiState,
    Perception,
    BehaviorProfile,
    MovementPattern,
    Projectile,
    Wave,
    Collectible,
    AbilityMeter,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 28] = [
        ComponentKind::Transform,
        ComponentKind::Velocity,
        ComponentKind::Aabb,
        ComponentKind::PhysicsBody,
        ComponentKind::Collider,
        ComponentKind::CharacterState,
        ComponentKind::Contacts,
        ComponentKind::Input,
        ComponentKind::Intent,
        ComponentKind::Player,
        ComponentKind::Health,
        ComponentKind::Team,
        ComponentKind::Hitbox,
        ComponentKind::Hurtbox,
        ComponentKind::Attack,
        ComponentKind::IFrame,
        ComponentKind::Block,
        ComponentKind::Stun,
        ComponentKind::CombatStats,
        ComponentKind::BuffState,
        ComponentKind::AiState,
        ComponentKind::Perception,
        ComponentKind::BehaviorProfile,
        ComponentKind::MovementPattern,
        ComponentKind::Projectile,
        ComponentKind::Wave,
        ComponentKind::Collectible,
        ComponentKind::AbilityMeter,
    ];

    #[inline]
    pub fn bit(self) -> u32 {
        1 << (self as u8)
    }
}

/// Set of component kinds, one bit per [`ComponentKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ComponentMask(u32);

impl ComponentMask {
    pub const EMPTY: ComponentMask = ComponentMask(0);

    pub fn of(kinds: &[ComponentKind]) -> Self {
        kinds.iter().fold(Self::EMPTY, |mask, kind| mask.with(*kind))
    }

    #[must_use]
    pub fn with(self, kind: ComponentKind) -> Self {
        Self(self.0 | kind.bit())
    }

    pub fn insert(&mut self, kind: ComponentKind) {
        self.0 |= kind.bit();
    }

    pub fn remove(&mut self, kind: ComponentKind) {
        self.0 &= !kind.bit();
    }

    #[inline]
    pub fn contains(&self, kind: ComponentKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// True when every bit of `other` is also set here.
    #[inline]
    pub fn contains_all(&self, other: ComponentMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn kinds(self) -> impl Iterator<Item = ComponentKind> {
        ComponentKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

impl BitOr for ComponentMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<ComponentKind> for ComponentMask {
    type Output = Self;

    fn bitor(self, rhs: ComponentKind) -> Self {
        self.with(rhs)
    }
}

impl BitAnd for ComponentMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl From<ComponentKind> for ComponentMask {
    fn from(kind: ComponentKind) -> Self {
        Self::EMPTY.with(kind)
    }
}
