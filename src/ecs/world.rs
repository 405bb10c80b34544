//! The entity/component store.

use std::collections::BTreeMap;

use bevy::log::debug;

use super::archetype::Archetype;
use super::entity::{EntityAllocator, EntityId};
use super::mask::{ComponentKind, ComponentMask};
use super::storage::ComponentStore;
use crate::ai::{AiState, BehaviorProfile, Intent, Perception};
use crate::combat::{
    Attack, Block, BuffState, CombatStats, Health, Hitbox, Hurtbox, IFrame, Projectile, Stun,
    Team, Wave,
};
use crate::physics::{
    Aabb, CharacterState, Collider, Contacts, MovementPattern, PhysicsBody, Transform, Velocity,
};
use crate::player::{AbilityMeter, Collectible, Input, Player};

/// A plain data type that can be attached to an entity.
///
/// Implemented for every component by the `component_storage!` table below;
/// each type maps to exactly one [`ComponentKind`] and one store.
pub trait Component: Sized + 'static {
    const KIND: ComponentKind;

    fn store(components: &Components) -> &ComponentStore<Self>;
    fn store_mut(components: &mut Components) -> &mut ComponentStore<Self>;
}

macro_rules! component_storage {
    ($($field:ident: $ty:ty => $kind:ident),* $(,)?) => {
        /// One typed store per component kind.
        ///
        /// Fields are public so systems can borrow several stores mutably
        /// at once. Presence can only change through [`World`].
        #[derive(Default)]
        pub struct Components {
            $(pub $field: ComponentStore<$ty>,)*
        }

        impl Components {
            fn remove_kind(&mut self, id: EntityId, kind: ComponentKind) -> bool {
                match kind {
                    $(ComponentKind::$kind => self.$field.remove(id).is_some(),)*
                }
            }
        }

        $(
            impl Component for $ty {
                const KIND: ComponentKind = ComponentKind::$kind;

                fn store(components: &Components) -> &ComponentStore<Self> {
                    &components.$field
                }

                fn store_mut(components: &mut Components) -> &mut ComponentStore<Self> {
                    &mut components.$field
                }
            }
        )*
    };
}

component_storage! {
    transform: Transform => Transform,
    velocity: Velocity => Velocity,
    aabb: Aabb => Aabb,
    physics_body: PhysicsBody => PhysicsBody,
    collider: Collider => Collider,
    character: CharacterState => CharacterState,
    contacts: Contacts => Contacts,
    input: Input => Input,
    intent: Intent => Intent,
    player: Player => Player,
    health: Health => Health,
    team: Team => Team,
    hitbox: Hitbox => Hitbox,
    hurtbox: Hurtbox => Hurtbox,
    attack: Attack => Attack,
    iframe: IFrame => IFrame,
    block: Block => Block,
    stun: Stun => Stun,
    combat_stats: CombatStats => CombatStats,
    buff: BuffState => BuffState,
    ai_state: AiState => AiState,
    perception: Perception => Perception,
    behavior: BehaviorProfile => BehaviorProfile,
    movement_pattern: MovementPattern => MovementPattern,
    projectile: Projectile => Projectile,
    wave: Wave => Wave,
    collectible: Collectible => Collectible,
    ability: AbilityMeter => AbilityMeter,
}

/// Owns every entity and component in the simulation.
///
/// Each live entity has a presence mask kept in lockstep with the typed
/// stores: a bit is set exactly when the matching store holds a value.
/// Entities are kept ordered by id, which is creation order, so queries
/// iterate in a stable order within and across ticks.
#[derive(Default)]
pub struct World {
    allocator: EntityAllocator,
    masks: BTreeMap<EntityId, ComponentMask>,
    components: Components,
    player: Option<EntityId>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_entity(&mut self) -> EntityId {
        let id = self.allocator.allocate();
        self.masks.insert(id, ComponentMask::EMPTY);
        id
    }

    /// Starts a builder that attaches components to a fresh entity.
    pub fn spawn(&mut self) -> EntityBuilder<'_> {
        let id = self.create_entity();
        EntityBuilder { world: self, id }
    }

    /// Removes the entity from every store and forgets its mask.
    ///
    /// Returns `false` for ids that are not alive.
    pub fn destroy_entity(&mut self, id: EntityId) -> bool {
        let Some(mask) = self.masks.remove(&id) else {
            debug!("destroy_entity on stale handle {}", id);
            return false;
        };
        for kind in mask.kinds() {
            self.components.remove_kind(id, kind);
        }
        if self.player == Some(id) {
            self.player = None;
        }
        true
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.masks.contains_key(&id)
    }

    pub fn entity_count(&self) -> usize {
        self.masks.len()
    }

    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.masks.keys().copied()
    }

    /// Attaches (or replaces) a component. A no-op on stale handles.
    pub fn insert<T: Component>(&mut self, id: EntityId, value: T) -> bool {
        let Some(mask) = self.masks.get_mut(&id) else {
            debug!("insert {:?} on stale handle {}", T::KIND, id);
            return false;
        };
        mask.insert(T::KIND);
        T::store_mut(&mut self.components).insert(id, value);
        true
    }

    /// Attaches the component's default schema.
    pub fn insert_default<T: Component + Default>(&mut self, id: EntityId) -> bool {
        self.insert(id, T::default())
    }

    pub fn remove<T: Component>(&mut self, id: EntityId) -> Option<T> {
        let mask = self.masks.get_mut(&id)?;
        mask.remove(T::KIND);
        T::store_mut(&mut self.components).remove(id)
    }

    /// Kind-keyed removal for callers that only hold a [`ComponentKind`].
    pub fn remove_kind(&mut self, id: EntityId, kind: ComponentKind) -> bool {
        let Some(mask) = self.masks.get_mut(&id) else {
            return false;
        };
        mask.remove(kind);
        self.components.remove_kind(id, kind)
    }

    pub fn get<T: Component>(&self, id: EntityId) -> Option<&T> {
        T::store(&self.components).get(id)
    }

    pub fn get_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        T::store_mut(&mut self.components).get_mut(id)
    }

    pub fn has(&self, id: EntityId, kind: ComponentKind) -> bool {
        self.masks.get(&id).is_some_and(|mask| mask.contains(kind))
    }

    pub fn contains<T: Component>(&self, id: EntityId) -> bool {
        self.has(id, T::KIND)
    }

    pub fn mask(&self, id: EntityId) -> Option<ComponentMask> {
        self.masks.get(&id).copied()
    }

    pub fn archetype(&self, id: EntityId) -> Option<Archetype> {
        self.mask(id).map(Archetype::classify)
    }

    /// Every live entity whose mask contains all bits of `required`.
    pub fn query(&self, required: ComponentMask) -> Vec<EntityId> {
        self.masks
            .iter()
            .filter(|(_, mask)| mask.contains_all(required))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn query_kinds(&self, kinds: &[ComponentKind]) -> Vec<EntityId> {
        self.query(ComponentMask::of(kinds))
    }

    pub fn components(&self) -> &Components {
        &self.components
    }

    /// Mutable access to all stores at once, for systems that need
    /// disjoint borrows of several component types.
    pub fn components_mut(&mut self) -> &mut Components {
        &mut self.components
    }

    /// The player-controlled entity, if one is registered and alive.
    pub fn player(&self) -> Option<EntityId> {
        self.player.filter(|id| self.is_alive(*id))
    }

    pub fn set_player(&mut self, id: EntityId) {
        if self.is_alive(id) {
            self.player = Some(id);
        }
    }
}

/// Chained component attachment for prefabs.
pub struct EntityBuilder<'w> {
    world: &'w mut World,
    id: EntityId,
}

impl EntityBuilder<'_> {
    pub fn with<T: Component>(self, value: T) -> Self {
        self.world.insert(self.id, value);
        self
    }

    pub fn with_opt<T: Component>(self, value: Option<T>) -> Self {
        match value {
            Some(value) => self.with(value),
            None => self,
        }
    }

    pub fn id(self) -> EntityId {
        self.id
    }
}
