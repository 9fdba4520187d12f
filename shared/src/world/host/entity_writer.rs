use log::{debug, error, warn};

use tidal_serde::{write_var_usize, ByteWrite, ByteWriter};

use crate::{
    types::{NetEntityId, SerializeMode, SyncDirection, Visibility},
    world::{
        component::{
            diff_mask::{DiffMask, MAX_MEMBERS},
            replicate::ReplicaMember,
        },
        isolate::isolate,
    },
};

/// Which connection a stream is built for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisibilityFilter {
    /// The owning connection, sees every member
    Owner,
    /// Every other observer, sees only [`Visibility::AllObservers`] members
    Observers,
}

impl VisibilityFilter {
    pub fn admits(self, visibility: Visibility) -> bool {
        match self {
            VisibilityFilter::Owner => true,
            VisibilityFilter::Observers => visibility == Visibility::AllObservers,
        }
    }
}

/// A member whose serialize or deserialize call failed. Its frame was emitted
/// empty (writing) or skipped (reading).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberFailure {
    pub index: usize,
    pub type_name: &'static str,
    pub reason: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntityWriteReport {
    /// Members present in the stream, failed ones included
    pub mask: DiffMask,
    pub failures: Vec<MemberFailure>,
    /// Members past [`MAX_MEMBERS`], never written
    pub skipped_members: usize,
}

impl EntityWriteReport {
    /// Members that were present and written successfully
    pub fn written_mask(&self) -> DiffMask {
        let mut mask = self.mask;
        for failure in &self.failures {
            mask.set_bit(failure.index, false);
        }
        mask
    }
}

/// Both streams of one flush
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntityFlush {
    pub owner: Vec<u8>,
    pub observers: Vec<u8>,
    pub owner_mask: DiffMask,
    pub observers_mask: DiffMask,
    pub failures: Vec<MemberFailure>,
    pub skipped_members: usize,
}

impl EntityFlush {
    /// Members that were written successfully to at least one stream
    pub fn written_mask(&self) -> DiffMask {
        let mut mask = self.owner_mask;
        mask.or(&self.observers_mask);
        for failure in &self.failures {
            mask.set_bit(failure.index, false);
        }
        mask
    }

    pub fn is_empty(&self) -> bool {
        self.owner_mask.is_clear() && self.observers_mask.is_clear()
    }
}

/// Builds an entity's replication streams: a varint dirty mask followed by one
/// `[varint length][payload]` frame per member present, in member order.
pub struct EntityWriter;

impl EntityWriter {
    /// Writes a single stream for the connections selected by `filter`.
    ///
    /// Members are included when their direction matches `direction`, their
    /// visibility passes `filter` and they are dirty or `mode` is Full.
    /// Failing members are reported, never propagated.
    pub fn write_members(
        writer: &mut dyn ByteWrite,
        members: &[&dyn ReplicaMember],
        filter: VisibilityFilter,
        direction: SyncDirection,
        mode: SerializeMode,
        entity_id: NetEntityId,
    ) -> EntityWriteReport {
        let mut report = EntityWriteReport {
            skipped_members: Self::check_member_count(members.len(), entity_id),
            ..Default::default()
        };
        let mut frames = ByteWriter::new();
        let mut scratch = ByteWriter::new();

        for (index, member) in members.iter().take(MAX_MEMBERS).enumerate() {
            if !Self::should_write(*member, direction, mode) {
                continue;
            }
            if !filter.admits(member.settings().visibility) {
                continue;
            }

            report.mask.set_bit(index, true);
            if let Err(failure) =
                Self::write_member(&mut scratch, *member, mode, entity_id, index)
            {
                report.failures.push(failure);
            }
            Self::write_frame(&mut frames, &scratch);
        }

        report.mask.ser(writer);
        writer.write_bytes(frames.as_slice());

        report
    }

    /// Writes the owner stream and the observers stream of one flush.
    /// Each member is serialized once and its frame is shared by both streams.
    pub fn write_flush(
        members: &[&dyn ReplicaMember],
        direction: SyncDirection,
        mode: SerializeMode,
        entity_id: NetEntityId,
    ) -> EntityFlush {
        let mut flush = EntityFlush {
            skipped_members: Self::check_member_count(members.len(), entity_id),
            ..Default::default()
        };
        let mut owner_frames = ByteWriter::new();
        let mut observer_frames = ByteWriter::new();
        let mut scratch = ByteWriter::new();

        for (index, member) in members.iter().take(MAX_MEMBERS).enumerate() {
            if !Self::should_write(*member, direction, mode) {
                continue;
            }

            if let Err(failure) =
                Self::write_member(&mut scratch, *member, mode, entity_id, index)
            {
                flush.failures.push(failure);
            }

            flush.owner_mask.set_bit(index, true);
            Self::write_frame(&mut owner_frames, &scratch);

            if VisibilityFilter::Observers.admits(member.settings().visibility) {
                flush.observers_mask.set_bit(index, true);
                Self::write_frame(&mut observer_frames, &scratch);
            }
        }

        flush.owner = Self::finish_stream(&flush.owner_mask, &owner_frames);
        flush.observers = Self::finish_stream(&flush.observers_mask, &observer_frames);

        flush
    }

    fn check_member_count(count: usize, entity_id: NetEntityId) -> usize {
        if count <= MAX_MEMBERS {
            return 0;
        }
        let skipped = count - MAX_MEMBERS;
        error!(
            "Entity {} declares {} members, only the first {} are replicated ({} skipped)",
            entity_id, count, MAX_MEMBERS, skipped
        );
        skipped
    }

    fn should_write(
        member: &dyn ReplicaMember,
        direction: SyncDirection,
        mode: SerializeMode,
    ) -> bool {
        member.settings().direction == direction
            && (mode == SerializeMode::Full || member.is_dirty())
    }

    /// Serializes one member into `scratch`, which is left empty on failure
    fn write_member(
        scratch: &mut ByteWriter,
        member: &dyn ReplicaMember,
        mode: SerializeMode,
        entity_id: NetEntityId,
        index: usize,
    ) -> Result<(), MemberFailure> {
        scratch.clear();

        let result = isolate(|| member.write(mode, scratch));

        if result.is_ok() && scratch.is_empty() {
            debug!(
                "Entity {} member {} ({}) wrote an empty payload, receivers will skip it",
                entity_id,
                index,
                member.type_name()
            );
        }

        result.map_err(|reason| {
            scratch.clear();
            warn!(
                "Entity {} member {} ({}) failed to serialize, emitting an empty frame: {}",
                entity_id,
                index,
                member.type_name(),
                reason
            );
            MemberFailure {
                index,
                type_name: member.type_name(),
                reason,
            }
        })
    }

    fn write_frame(frames: &mut ByteWriter, payload: &ByteWriter) {
        write_var_usize(frames, payload.position());
        frames.write_bytes(payload.as_slice());
    }

    fn finish_stream(mask: &DiffMask, frames: &ByteWriter) -> Vec<u8> {
        let mut stream = ByteWriter::with_capacity(frames.position() + 10);
        mask.ser(&mut stream);
        stream.write_bytes(frames.as_slice());
        stream.to_bytes()
    }
}
