//! Entity identification.
//!
//! Every board object (card, slot, the game-mode entity) has a unique
//! `EntityId`. IDs are handed out sequentially by the `Registry` and are
//! never reused during a session, so they double as stable indices into
//! the component stores.
//!
//! ```
//! use patience::core::{EntityId, Registry};
//!
//! let mut registry = Registry::new();
//! let slot = registry.create_entity("Column 0");
//! let card = registry.create_entity("Five of Clubs");
//!
//! assert_eq!(slot, EntityId(0));
//! assert_eq!(card.index(), 1);
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for any board entity.
///
/// Relationships between entities (a card's current slot, a site's paired
/// monster bay) are stored as `EntityId` values, never as owning pointers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index into dense component storage.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_and_index() {
        let id = EntityId(7);
        assert_eq!(id.raw(), 7);
        assert_eq!(id.index(), 7);
    }

    #[test]
    fn test_ordering_follows_allocation() {
        assert!(EntityId(1) < EntityId(2));
        let mut ids = vec![EntityId(3), EntityId(0), EntityId(2)];
        ids.sort();
        assert_eq!(ids, vec![EntityId(0), EntityId(2), EntityId(3)]);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", EntityId(42)), "Entity(42)");
    }

    #[test]
    fn test_serialization() {
        let id = EntityId(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
