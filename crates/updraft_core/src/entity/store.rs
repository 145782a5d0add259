//! Generational entity arena

use slotmap::SlotMap;

use crate::entity::{Category, Entity, EntityHandle, EntityId, Variant};

/// Arena holding every live entity allocation, active or pooled
#[derive(Debug, Default)]
pub struct EntityStore {
    entities: SlotMap<EntityId, Entity>,
}

impl EntityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, entity: Entity) -> EntityId {
        self.entities.insert(entity)
    }

    /// Permanently remove an entity allocation
    ///
    /// Free-lists are not touched; a pooled id removed here becomes an
    /// invalid handle that the pool discards on its next pop or audit.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(id)
    }

    /// Whether the allocation still exists
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Get an entity by id, active or pooled
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Get a mutable entity by id, active or pooled
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Current handle of an active entity
    pub fn handle(&self, id: EntityId) -> Option<EntityHandle> {
        self.entities
            .get(id)
            .filter(|entity| entity.is_active())
            .map(|entity| EntityHandle {
                id,
                generation: entity.generation(),
            })
    }

    /// Resolve a handle; `None` if the entity is gone, pooled or reused since
    pub fn resolve(&self, handle: EntityHandle) -> Option<&Entity> {
        self.entities
            .get(handle.id)
            .filter(|entity| entity.is_active() && entity.generation() == handle.generation)
    }

    /// Mutable variant of [`EntityStore::resolve`]
    pub fn resolve_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        self.entities
            .get_mut(handle.id)
            .filter(|entity| entity.is_active() && entity.generation() == handle.generation)
    }

    /// Total number of allocations
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the store holds no allocations
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate over all allocations
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter()
    }

    /// Iterate mutably over all allocations
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Entity)> {
        self.entities.iter_mut()
    }

    /// Iterate over active entities
    pub fn iter_active(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter().filter(|(_, entity)| entity.is_active())
    }

    /// Ids of all active entities
    pub fn active_ids(&self) -> Vec<EntityId> {
        self.iter_active().map(|(id, _)| id).collect()
    }

    /// Number of active entities
    pub fn active_count(&self) -> usize {
        self.iter_active().count()
    }

    /// Number of active entities in a category
    pub fn active_in(&self, category: Category) -> usize {
        self.iter_active()
            .filter(|(_, entity)| entity.category() == category)
            .count()
    }

    /// Number of active entities showing a variant
    pub fn active_of(&self, variant: Variant) -> usize {
        self.iter_active()
            .filter(|(_, entity)| entity.variant() == variant)
            .count()
    }
}
