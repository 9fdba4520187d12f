use log::warn;

use tidal_serde::{read_var_usize, ByteReader};

use crate::{
    types::{NetEntityId, SerializeMode, SyncDirection},
    world::{
        component::{diff_mask::DiffMask, replicate::ReplicaMember},
        entity::{entity_registry::EntityLookup, error::EntityError},
        host::entity_writer::MemberFailure,
        isolate::isolate,
    },
};

/// A member that read a different number of bytes than its frame holds.
/// The stream is still realigned on the frame boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LengthMismatch {
    pub index: usize,
    pub expected: usize,
    pub consumed: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntityReadReport {
    pub mask: DiffMask,
    /// Members whose frame was applied without error
    pub applied: Vec<usize>,
    /// Members whose frame was empty: the sender failed to write them, or
    /// they wrote nothing
    pub skipped: Vec<usize>,
    pub failures: Vec<MemberFailure>,
    pub mismatches: Vec<LengthMismatch>,
}

/// Applies a stream produced by
/// [`EntityWriter`](crate::world::host::entity_writer::EntityWriter).
pub struct EntityReader;

impl EntityReader {
    /// Reads the mask and hands every frame to its member.
    ///
    /// After each frame the reader is positioned on the frame boundary,
    /// whatever the member consumed. Only a malformed mask or frame header is an
    /// error, member failures land in the report.
    pub fn read_members(
        reader: &mut ByteReader,
        members: &mut [&mut dyn ReplicaMember],
        mode: SerializeMode,
        direction: SyncDirection,
        entities: &dyn EntityLookup,
        entity_id: NetEntityId,
    ) -> Result<EntityReadReport, EntityError> {
        let malformed = |source| EntityError::MalformedStream { entity_id, source };

        let mask = DiffMask::de(reader).map_err(malformed)?;
        let mut report = EntityReadReport {
            mask,
            ..Default::default()
        };

        for index in mask.iter() {
            let length = read_var_usize(reader).map_err(malformed)?;
            let remaining = reader.remaining();
            if length > remaining {
                return Err(EntityError::FrameOverrun {
                    entity_id,
                    index,
                    length,
                    remaining,
                });
            }
            let payload = reader.read_bytes(length).map_err(malformed)?;

            if length == 0 {
                report.skipped.push(index);
                continue;
            }

            let Some(member) = members.get_mut(index) else {
                Self::report_failure(
                    &mut report,
                    entity_id,
                    index,
                    "unknown",
                    format!("no member at index {}", index),
                );
                continue;
            };
            let member = &mut **member;

            if member.settings().direction != direction {
                let type_name = member.type_name();
                Self::report_failure(
                    &mut report,
                    entity_id,
                    index,
                    type_name,
                    format!("member is not synced {:?}", direction),
                );
                continue;
            }

            let mut frame = ByteReader::new(payload);
            let result = isolate(|| member.read(mode, &mut frame, entities));

            match result {
                Ok(()) => {
                    let consumed = frame.position();
                    if consumed != length {
                        warn!(
                            "Entity {} member {} ({}) consumed {} byte(s) of a {} byte frame",
                            entity_id,
                            index,
                            member.type_name(),
                            consumed,
                            length
                        );
                        report.mismatches.push(LengthMismatch {
                            index,
                            expected: length,
                            consumed,
                        });
                    }
                    report.applied.push(index);
                }
                Err(reason) => {
                    let type_name = member.type_name();
                    Self::report_failure(&mut report, entity_id, index, type_name, reason);
                }
            }
        }

        Ok(report)
    }

    fn report_failure(
        report: &mut EntityReadReport,
        entity_id: NetEntityId,
        index: usize,
        type_name: &'static str,
        reason: String,
    ) {
        warn!(
            "Entity {} member {} ({}) failed to deserialize, skipping its frame: {}",
            entity_id, index, type_name, reason
        );
        report.failures.push(MemberFailure {
            index,
            type_name,
            reason,
        });
    }
}
