//! Archetype tags derived from an entity's component mask.

use super::mask::{ComponentKind, ComponentMask};

/// Coarse behavioral class of an entity.
///
/// Systems branch on this instead of probing for individual optional
/// components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archetype {
    /// Driven by the human input adapter.
    Player,
    /// AI-controlled and moved by the physics integrator.
    Walker,
    /// AI-controlled, with velocity driven by a movement pattern.
    Oscillator,
    /// Projectiles and expanding waves.
    Projectile,
    Pickup,
    /// Anything else: static props, scenery, test bodies.
    Prop,
}

impl Archetype {
    pub fn classify(mask: ComponentMask) -> Self {
        if mask.contains(ComponentKind::Player) {
            Archetype::Player
        } else if mask.contains(ComponentKind::AiState) {
            if mask.contains(ComponentKind::MovementPattern) {
                Archetype::Oscillator
            } else {
                Archetype::Walker
            }
        } else if mask.contains(ComponentKind::Projectile) || mask.contains(ComponentKind::Wave) {
            Archetype::Projectile
        } else if mask.contains(ComponentKind::Collectible) {
            Archetype::Pickup
        } else {
            Archetype::Prop
        }
    }

    /// Whether the physics integrator steers this entity horizontally.
    pub fn is_steered(self) -> bool {
        matches!(self, Archetype::Player | Archetype::Walker)
    }
}
