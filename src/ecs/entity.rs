//! Entity identifiers.

use std::fmt;

/// Opaque handle to an entity in a [`World`](super::World).
///
/// Ids are handed out monotonically and never reused, so a handle held
/// past its entity's destruction simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Raw numeric value, mostly useful for logging.
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out fresh entity ids.
#[derive(Debug)]
pub(crate) struct EntityAllocator {
    next: u32,
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityAllocator {
    pub(crate) fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.wrapping_add(1).max(1);
        id
    }
}
