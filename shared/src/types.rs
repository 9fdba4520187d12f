/// Stable numeric id of a replicated entity, shared by every peer
pub type NetEntityId = u32;

/// Which side of the connection this process plays for an entity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostType {
    /// Owns the truth for the entity and originates its changes
    Authority,
    /// Receives the entity's state
    Observer,
}

impl HostType {
    pub fn invert(self) -> Self {
        match self {
            HostType::Authority => HostType::Observer,
            HostType::Observer => HostType::Authority,
        }
    }

    /// Direction of the stream this side produces
    pub fn outgoing(self) -> SyncDirection {
        match self {
            HostType::Authority => SyncDirection::AuthorityToObservers,
            HostType::Observer => SyncDirection::ObserversToAuthority,
        }
    }

    /// Direction of the stream this side consumes
    pub fn incoming(self) -> SyncDirection {
        self.invert().outgoing()
    }

    /// Whether members synced in `direction` may be mutated locally
    pub fn can_write(self, direction: SyncDirection) -> bool {
        self.outgoing() == direction
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SyncDirection {
    #[default]
    AuthorityToObservers,
    ObserversToAuthority,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Sent to every observer
    #[default]
    AllObservers,
    /// Sent only to the owning connection
    OwnerOnly,
}

/// Per-member replication settings, fixed when the member is constructed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct MemberSettings {
    pub direction: SyncDirection,
    pub visibility: Visibility,
}

impl MemberSettings {
    pub fn new(direction: SyncDirection, visibility: Visibility) -> Self {
        Self {
            direction,
            visibility,
        }
    }

    pub fn owner_only() -> Self {
        Self::new(SyncDirection::AuthorityToObservers, Visibility::OwnerOnly)
    }

    pub fn observer_to_authority() -> Self {
        Self::new(SyncDirection::ObserversToAuthority, Visibility::AllObservers)
    }
}

/// Whether a stream carries every member or only what changed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SerializeMode {
    /// Complete state, for receivers that just started observing
    Full,
    /// Only dirty members, collections replay their change log
    Delta,
}
