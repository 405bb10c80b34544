//! Dense per-kind component storage.

use std::collections::HashMap;

use super::entity::EntityId;

/// Packed storage for one component type.
///
/// Values live in a dense vector; removal swaps the last element into
/// the hole so iteration never walks gaps.
#[derive(Debug)]
pub struct ComponentStore<T> {
    dense: Vec<T>,
    owners: Vec<EntityId>,
    slots: HashMap<EntityId, usize>,
}

impl<T> Default for ComponentStore<T> {
    fn default() -> Self {
        Self {
            dense: Vec::new(),
            owners: Vec::new(),
            slots: HashMap::new(),
        }
    }
}

impl<T> ComponentStore<T> {
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.slots.get(&id).map(|&slot| &self.dense[slot])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.slots.get(&id).map(|&slot| &mut self.dense[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.owners.iter().copied().zip(self.dense.iter())
    }

    /// Inserts or replaces; returns the previous value.
    pub(super) fn insert(&mut self, id: EntityId, value: T) -> Option<T> {
        if let Some(&slot) = self.slots.get(&id) {
            return Some(std::mem::replace(&mut self.dense[slot], value));
        }
        self.slots.insert(id, self.dense.len());
        self.dense.push(value);
        self.owners.push(id);
        None
    }

    pub(super) fn remove(&mut self, id: EntityId) -> Option<T> {
        let slot = self.slots.remove(&id)?;
        let value = self.dense.swap_remove(slot);
        self.owners.swap_remove(slot);
        if let Some(&moved) = self.owners.get(slot) {
            self.slots.insert(moved, slot);
        }
        Some(value)
    }
}
