//! # Tidal Shared
//! State replication for networked entities: change tracking, masked
//! per-member serialization, compression codecs and snapshot interpolation.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use tidal_serde::{
    ByteCounter, ByteReader, ByteWrite, ByteWriter, Scaled, ScalingError, Serde, SerdeErr,
    VarInt, VarUint,
};

mod backends;
mod types;

pub mod compression;
pub mod snapshot;
pub mod world;

pub use backends::{Clock, ManualClock, SystemClock};
pub use snapshot::{
    interpolation::{
        catchup, compute, dynamic_adjustment, CatchupSettings, InterpolationClock,
        InterpolationStats, SnapshotInterpolator,
    },
    interpolation_config::InterpolationConfig,
    moving_average::ExponentialMovingAverage,
    snapshot::{Interpolate, Snapshot, TimedSnapshot, TransformSnapshot},
    snapshot_buffer::{InsertOutcome, RejectReason, SnapshotBuffer},
};
pub use types::{
    HostType, MemberSettings, NetEntityId, SerializeMode, SyncDirection, Visibility,
};
pub use world::{
    component::{
        diff_mask::{DiffMask, MAX_MEMBERS},
        entity_property::EntityProperty,
        error::{MemberError, PropertyError},
        property::{Property, PropertyHook},
        property_list::{ListOp, PropertyList},
        property_map::{MapOp, PropertyMap},
        replicate::{ReplicaMember, Replicate},
    },
    entity::{
        entity_registry::{EntityLookup, EntityMap, EntityRegistry, NoEntities},
        error::EntityError,
        replicated_entity::ReplicatedEntity,
    },
    host::entity_writer::{
        EntityFlush, EntityWriteReport, EntityWriter, MemberFailure, VisibilityFilter,
    },
    remote::entity_reader::{EntityReadReport, EntityReader, LengthMismatch},
};
