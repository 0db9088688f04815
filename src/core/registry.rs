//! Component registry: entities and their typed components.
//!
//! The registry is the ECS collaborator the placement engine runs on. Each
//! component type lives in its own dense store (`Vec<Option<T>>` indexed by
//! `EntityId`), and the stores are keyed by `TypeId`. Components are plain
//! data structs; systems borrow them one at a time through `get`/`get_mut`.
//!
//! Iteration order (`entities_with`) is ascending entity id, i.e. creation
//! order. Every "first match wins" rule in the engine relies on it.
//!
//! ```
//! use patience::core::Registry;
//!
//! #[derive(Debug, PartialEq)]
//! struct Health(u32);
//!
//! let mut registry = Registry::new();
//! let goblin = registry.create_entity("Goblin");
//! registry.add(goblin, Health(7));
//!
//! assert!(registry.has::<Health>(goblin));
//! assert_eq!(registry.get::<Health>(goblin).unwrap(), &Health(7));
//! assert_eq!(registry.first_entity::<Health>(), Some(goblin));
//! ```

use std::any::{type_name, Any, TypeId};

use rustc_hash::FxHashMap;

use super::entity::EntityId;
use super::error::{PatienceError, PatienceResult};

/// Entity and component storage.
#[derive(Default)]
pub struct Registry {
    /// Debug names, one per allocated entity.
    names: Vec<String>,

    /// One `Vec<Option<T>>` per component type.
    stores: FxHashMap<TypeId, Box<dyn Any>>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity with a debug name.
    pub fn create_entity(&mut self, name: impl Into<String>) -> EntityId {
        let id = EntityId(self.names.len() as u32);
        self.names.push(name.into());
        id
    }

    /// Number of allocated entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.names.len()
    }

    /// Debug name given at creation.
    #[must_use]
    pub fn name(&self, entity: EntityId) -> Option<&str> {
        self.names.get(entity.index()).map(String::as_str)
    }

    /// Attach a component, replacing any previous one of the same type.
    ///
    /// # Panics
    ///
    /// Panics if `entity` was not allocated by this registry.
    pub fn add<T: 'static>(&mut self, entity: EntityId, component: T) -> &mut T {
        assert!(
            entity.index() < self.names.len(),
            "{entity} was not created by this registry"
        );

        let store = self
            .stores
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Vec::<Option<T>>::new()));
        let store = match store.downcast_mut::<Vec<Option<T>>>() {
            Some(store) => store,
            None => unreachable!("component store keyed by the wrong TypeId"),
        };

        if store.len() <= entity.index() {
            store.resize_with(entity.index() + 1, || None);
        }
        store[entity.index()].insert(component)
    }

    /// Check whether an entity carries a component.
    #[must_use]
    pub fn has<T: 'static>(&self, entity: EntityId) -> bool {
        self.try_get::<T>(entity).is_some()
    }

    /// Borrow a component, or `None` if absent.
    #[must_use]
    pub fn try_get<T: 'static>(&self, entity: EntityId) -> Option<&T> {
        self.store::<T>()?.get(entity.index())?.as_ref()
    }

    /// Mutably borrow a component, or `None` if absent.
    pub fn try_get_mut<T: 'static>(&mut self, entity: EntityId) -> Option<&mut T> {
        self.store_mut::<T>()?.get_mut(entity.index())?.as_mut()
    }

    /// Borrow a component that must be present.
    pub fn get<T: 'static>(&self, entity: EntityId) -> PatienceResult<&T> {
        self.try_get::<T>(entity)
            .ok_or_else(|| invalid_access::<T>(entity))
    }

    /// Mutably borrow a component that must be present.
    pub fn get_mut<T: 'static>(&mut self, entity: EntityId) -> PatienceResult<&mut T> {
        self.try_get_mut::<T>(entity)
            .ok_or_else(|| invalid_access::<T>(entity))
    }

    /// Detach a component, returning it.
    pub fn remove<T: 'static>(&mut self, entity: EntityId) -> Option<T> {
        self.store_mut::<T>()?.get_mut(entity.index())?.take()
    }

    /// All entities carrying `T`, in creation order.
    #[must_use]
    pub fn entities_with<T: 'static>(&self) -> Vec<EntityId> {
        self.store::<T>().map_or_else(Vec::new, |store| {
            store
                .iter()
                .enumerate()
                .filter(|(_, slot)| slot.is_some())
                .map(|(i, _)| EntityId(i as u32))
                .collect()
        })
    }

    /// The first entity carrying `T`, if any.
    #[must_use]
    pub fn first_entity<T: 'static>(&self) -> Option<EntityId> {
        self.store::<T>()?
            .iter()
            .position(Option::is_some)
            .map(|i| EntityId(i as u32))
    }

    fn store<T: 'static>(&self) -> Option<&Vec<Option<T>>> {
        self.stores.get(&TypeId::of::<T>())?.downcast_ref()
    }

    fn store_mut<T: 'static>(&mut self) -> Option<&mut Vec<Option<T>>> {
        self.stores.get_mut(&TypeId::of::<T>())?.downcast_mut()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("entities", &self.names.len())
            .field("component_types", &self.stores.len())
            .finish()
    }
}

fn invalid_access<T>(entity: EntityId) -> PatienceError {
    let full = type_name::<T>();
    let component = full.rsplit("::").next().unwrap_or(full);
    PatienceError::InvalidAccess { entity, component }
}
