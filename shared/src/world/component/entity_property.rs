use log::debug;
use tidal_serde::{ByteReader, ByteWrite};

use crate::{
    types::{MemberSettings, NetEntityId, SerializeMode},
    world::{
        component::{
            error::{MemberError, PropertyError},
            property::{Property, PropertyHook},
            replicate::ReplicaMember,
        },
        entity::entity_registry::{EntityLookup, EntityRegistry},
    },
};

/// A replicated reference to another networked entity.
///
/// Only the network id travels on the wire. The referenced entity is resolved
/// on demand against an [`EntityRegistry`], it may legitimately be unknown for a
/// while on the receiving side if its spawn hasn't arrived yet.
#[derive(Debug)]
pub struct EntityProperty {
    inner: Property<Option<NetEntityId>>,
}

impl EntityProperty {
    pub fn new() -> Self {
        Self::with_settings(MemberSettings::default())
    }

    pub fn with_settings(settings: MemberSettings) -> Self {
        Self {
            inner: Property::with_settings(None, settings),
        }
    }

    pub fn owner_only() -> Self {
        Self::with_settings(MemberSettings::owner_only())
    }

    /// The referenced network id, if any
    pub fn id(&self) -> Option<NetEntityId> {
        *self.inner.get()
    }

    /// Resolve the reference through `registry`
    pub fn get<'r, E>(&self, registry: &'r dyn EntityRegistry<E>) -> Option<&'r E> {
        self.id().and_then(|id| registry.get(id))
    }

    /// # Panics
    ///
    /// Panics if the EntityProperty is read-only on this side.
    pub fn set(&mut self, id: NetEntityId) {
        self.try_set(id)
            .expect("set called on a read-only EntityProperty")
    }

    pub fn try_set(&mut self, id: NetEntityId) -> Result<(), PropertyError> {
        self.set_optional(Some(id))
    }

    /// # Panics
    ///
    /// Panics if the EntityProperty is read-only on this side.
    pub fn clear(&mut self) {
        self.try_clear()
            .expect("clear called on a read-only EntityProperty")
    }

    pub fn try_clear(&mut self) -> Result<(), PropertyError> {
        self.set_optional(None)
    }

    pub fn set_hook(&mut self, hook: PropertyHook<Option<NetEntityId>>) {
        self.inner.set_hook(hook);
    }

    fn set_optional(&mut self, id: Option<NetEntityId>) -> Result<(), PropertyError> {
        match self.inner.try_set(id) {
            Ok(_) => Ok(()),
            Err(PropertyError::StateViolation { operation, .. }) => {
                Err(PropertyError::StateViolation {
                    member_type: "EntityProperty",
                    operation,
                })
            }
            Err(error) => Err(error),
        }
    }
}

impl ReplicaMember for EntityProperty {
    fn settings(&self) -> MemberSettings {
        self.inner.settings()
    }

    fn is_dirty(&self) -> bool {
        self.inner.is_dirty()
    }

    fn mark_dirty(&mut self) {
        self.inner.mark_dirty();
    }

    fn clear_dirty(&mut self) {
        self.inner.clear_dirty();
    }

    fn change_mark(&self) -> u64 {
        self.inner.change_mark()
    }

    fn confirm_changes(&mut self, mark: u64) {
        self.inner.confirm_changes(mark);
    }

    fn is_read_only(&self) -> bool {
        self.inner.is_read_only()
    }

    fn set_read_only(&mut self, read_only: bool) {
        self.inner.set_read_only(read_only);
    }

    fn write(&self, mode: SerializeMode, writer: &mut dyn ByteWrite) -> Result<(), MemberError> {
        self.inner.write(mode, writer)
    }

    fn read(
        &mut self,
        mode: SerializeMode,
        reader: &mut ByteReader,
        entities: &dyn EntityLookup,
    ) -> Result<(), MemberError> {
        self.inner.read(mode, reader, entities)?;

        if let Some(id) = self.id() {
            if !entities.is_registered(id) {
                debug!(
                    "EntityProperty references entity {} which is not registered yet",
                    id
                );
            }
        }

        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "EntityProperty"
    }
}

impl Default for EntityProperty {
    fn default() -> Self {
        Self::new()
    }
}
