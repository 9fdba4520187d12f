use tidal_serde::{ByteReader, ByteWrite};

use crate::{
    types::{MemberSettings, SerializeMode},
    world::{component::error::MemberError, entity::entity_registry::EntityLookup},
};

/// One replicated member of an entity: a scalar property or a collection.
///
/// Members own their dirty state. The entity serializer polls
/// [`ReplicaMember::is_dirty`] on every flush and takes a
/// [`ReplicaMember::change_mark`] of each member it wrote. Once the flush is
/// confirmed it hands the mark back through
/// [`ReplicaMember::confirm_changes`], so changes made in between stay dirty.
pub trait ReplicaMember {
    /// Direction and visibility, fixed at construction
    fn settings(&self) -> MemberSettings;

    fn is_dirty(&self) -> bool;
    fn mark_dirty(&mut self);
    /// Forgets every pending change
    fn clear_dirty(&mut self);

    /// Opaque marker of the changes recorded so far
    fn change_mark(&self) -> u64;
    /// Forgets the changes covered by `mark`, later ones stay pending
    fn confirm_changes(&mut self, mark: u64);

    fn is_read_only(&self) -> bool;
    /// Set by the owning entity according to which side it lives on
    fn set_read_only(&mut self, read_only: bool);

    /// Writes the member's payload. In [`SerializeMode::Delta`] collections
    /// write their change log, in [`SerializeMode::Full`] their contents.
    fn write(&self, mode: SerializeMode, writer: &mut dyn ByteWrite) -> Result<(), MemberError>;

    /// Applies a payload produced by `write` on the other side
    fn read(
        &mut self,
        mode: SerializeMode,
        reader: &mut ByteReader,
        entities: &dyn EntityLookup,
    ) -> Result<(), MemberError>;

    /// Short name used in logs
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A replicated component: an ordered, fixed list of members.
///
/// The order must never change after construction, member `i` is bit `i` of
/// the dirty mask on both sides.
pub trait Replicate {
    fn members(&self) -> Vec<&dyn ReplicaMember>;
    fn members_mut(&mut self) -> Vec<&mut dyn ReplicaMember>;

    fn member_count(&self) -> usize {
        self.members().len()
    }

    fn is_dirty(&self) -> bool {
        self.members().iter().any(|member| member.is_dirty())
    }
}
