use log::{error, warn};

use tidal_serde::{ByteReader, ByteWrite};

use crate::{
    types::{HostType, NetEntityId, SerializeMode},
    world::{
        component::{
            diff_mask::MAX_MEMBERS,
            replicate::Replicate,
        },
        entity::{entity_registry::EntityLookup, error::EntityError},
        host::entity_writer::{EntityFlush, EntityWriteReport, EntityWriter, VisibilityFilter},
        remote::entity_reader::{EntityReadReport, EntityReader},
    },
};

/// One networked object as seen from one side of the connection.
///
/// On construction every member is flagged read-only unless this side
/// originates its sync direction.
pub struct ReplicatedEntity<R: Replicate> {
    id: NetEntityId,
    host_type: HostType,
    replica: R,
    // (member index, change mark) of every member written by the last
    // unconfirmed delta flush
    pending: Vec<(usize, u64)>,
}

impl<R: Replicate> ReplicatedEntity<R> {
    /// Entities with more than 64 members are accepted, only the first 64 are
    /// replicated and the overflow is logged on every flush.
    /// Consider using `try_new` to reject them instead.
    pub fn new(id: NetEntityId, host_type: HostType, replica: R) -> Self {
        let count = replica.member_count();
        if count > MAX_MEMBERS {
            error!(
                "Entity {} declares {} members, at most {} can be replicated",
                id, count, MAX_MEMBERS
            );
        }

        let mut entity = Self {
            id,
            host_type,
            replica,
            pending: Vec::new(),
        };
        entity.apply_ownership();
        entity
    }

    pub fn try_new(id: NetEntityId, host_type: HostType, replica: R) -> Result<Self, EntityError> {
        let count = replica.member_count();
        if count > MAX_MEMBERS {
            return Err(EntityError::TooManyMembers {
                entity_id: id,
                count,
                max: MAX_MEMBERS,
            });
        }
        Ok(Self::new(id, host_type, replica))
    }

    fn apply_ownership(&mut self) {
        let host_type = self.host_type;
        for member in self.replica.members_mut() {
            let direction = member.settings().direction;
            member.set_read_only(!host_type.can_write(direction));
        }
    }

    pub fn id(&self) -> NetEntityId {
        self.id
    }

    pub fn host_type(&self) -> HostType {
        self.host_type
    }

    pub fn replica(&self) -> &R {
        &self.replica
    }

    pub fn replica_mut(&mut self) -> &mut R {
        &mut self.replica
    }

    pub fn is_dirty(&self) -> bool {
        self.replica.is_dirty()
    }

    /// Builds the owner and observers streams for this side's outgoing
    /// direction.
    ///
    /// A Delta flush becomes pending until [`confirm_flush`](Self::confirm_flush).
    /// A Full flush is meant for receivers that just started observing and
    /// leaves dirty state and change logs untouched.
    pub fn flush(&mut self, mode: SerializeMode) -> EntityFlush {
        let members = self.replica.members();
        let flush = EntityWriter::write_flush(&members, self.host_type.outgoing(), mode, self.id);

        if mode == SerializeMode::Delta {
            self.pending = flush
                .written_mask()
                .iter()
                .filter_map(|index| {
                    members
                        .get(index)
                        .map(|member| (index, member.change_mark()))
                })
                .collect();
        }

        flush
    }

    /// Writes a single stream for `filter` without touching pending state
    pub fn write_stream(
        &self,
        writer: &mut dyn ByteWrite,
        filter: VisibilityFilter,
        mode: SerializeMode,
    ) -> EntityWriteReport {
        let members = self.replica.members();
        EntityWriter::write_members(
            writer,
            &members,
            filter,
            self.host_type.outgoing(),
            mode,
            self.id,
        )
    }

    /// Confirms the changes carried by the last Delta flush. Changes made
    /// after that flush was built stay pending. Returns how many members were
    /// confirmed.
    pub fn confirm_flush(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let mut members = self.replica.members_mut();

        let mut confirmed = 0;
        for (index, mark) in pending {
            if let Some(member) = members.get_mut(index) {
                member.confirm_changes(mark);
                confirmed += 1;
            }
        }
        confirmed
    }

    /// Applies a stream received from the other side
    pub fn read(
        &mut self,
        bytes: &[u8],
        mode: SerializeMode,
        entities: &dyn EntityLookup,
    ) -> Result<EntityReadReport, EntityError> {
        let mut reader = ByteReader::new(bytes);
        let mut members = self.replica.members_mut();
        let report = EntityReader::read_members(
            &mut reader,
            &mut members,
            mode,
            self.host_type.incoming(),
            entities,
            self.id,
        )?;

        if !reader.is_empty() {
            warn!(
                "Entity {} stream has {} trailing byte(s)",
                self.id,
                reader.remaining()
            );
        }

        Ok(report)
    }
}
