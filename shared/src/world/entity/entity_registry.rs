use std::collections::HashMap;

use crate::types::NetEntityId;

/// Answers whether a network id currently maps to a live entity.
///
/// Passed to members while they read so that entity references can report ids
/// that cannot be resolved yet.
pub trait EntityLookup {
    fn is_registered(&self, id: NetEntityId) -> bool;
}

/// Resolves network ids to the application's entities
pub trait EntityRegistry<E>: EntityLookup {
    fn get(&self, id: NetEntityId) -> Option<&E>;
}

/// [`EntityRegistry`] backed by a `HashMap`
#[derive(Debug, Clone)]
pub struct EntityMap<E> {
    entities: HashMap<NetEntityId, E>,
}

impl<E> EntityMap<E> {
    pub fn new() -> Self {
        Self {
            entities: HashMap::new(),
        }
    }

    /// Returns the entity previously registered under `id`
    pub fn insert(&mut self, id: NetEntityId, entity: E) -> Option<E> {
        self.entities.insert(id, entity)
    }

    pub fn remove(&mut self, id: NetEntityId) -> Option<E> {
        self.entities.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl<E> Default for EntityMap<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EntityLookup for EntityMap<E> {
    fn is_registered(&self, id: NetEntityId) -> bool {
        self.entities.contains_key(&id)
    }
}

impl<E> EntityRegistry<E> for EntityMap<E> {
    fn get(&self, id: NetEntityId) -> Option<&E> {
        self.entities.get(&id)
    }
}

/// Lookup for streams that carry no entity references
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEntities;

impl EntityLookup for NoEntities {
    fn is_registered(&self, _id: NetEntityId) -> bool {
        false
    }
}
