use thiserror::Error;

use tidal_serde::SerdeErr;

use crate::types::NetEntityId;

/// Errors raised while building or applying an entity's replication stream.
///
/// Failures inside a single member never show up here, see
/// [`MemberFailure`](crate::world::host::entity_writer::MemberFailure).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// An entity declared more members than a dirty mask can address
    #[error("Entity {entity_id} declares {count} members, at most {max} can be replicated")]
    TooManyMembers {
        entity_id: NetEntityId,
        count: usize,
        max: usize,
    },

    /// The mask or a frame length prefix couldn't be decoded
    #[error("Entity {entity_id} stream malformed: {source}")]
    MalformedStream {
        entity_id: NetEntityId,
        source: SerdeErr,
    },

    /// A frame length prefix points past the end of the stream
    #[error("Entity {entity_id} member {index} frame of {length} byte(s) overruns the stream ({remaining} byte(s) left)")]
    FrameOverrun {
        entity_id: NetEntityId,
        index: usize,
        length: usize,
        remaining: usize,
    },
}
