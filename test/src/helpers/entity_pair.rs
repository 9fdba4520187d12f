use tidal_shared::{
    EntityFlush, EntityLookup, EntityReadReport, HostType, NetEntityId, ReplicatedEntity,
    Replicate, SerializeMode,
};

pub const ENTITY_ID: NetEntityId = 1;

/// Installs the test logger once, later calls are no-ops
pub fn init_logger() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

/// The same entity on both sides of a connection
pub struct EntityPair<R: Replicate> {
    pub authority: ReplicatedEntity<R>,
    pub observer: ReplicatedEntity<R>,
}

impl<R: Replicate> EntityPair<R> {
    pub fn new(authority: R, observer: R) -> Self {
        Self {
            authority: ReplicatedEntity::new(ENTITY_ID, HostType::Authority, authority),
            observer: ReplicatedEntity::new(ENTITY_ID, HostType::Observer, observer),
        }
    }

    /// Flushes the authority and applies its observers stream on the observer
    pub fn send_to_observer(
        &mut self,
        mode: SerializeMode,
        entities: &dyn EntityLookup,
    ) -> (EntityFlush, EntityReadReport) {
        let flush = self.authority.flush(mode);
        let report = self
            .observer
            .read(&flush.observers, mode, entities)
            .expect("observers stream should be well formed");
        (flush, report)
    }

    /// Flushes the authority and applies its owner stream on the observer
    pub fn send_to_owner(
        &mut self,
        mode: SerializeMode,
        entities: &dyn EntityLookup,
    ) -> (EntityFlush, EntityReadReport) {
        let flush = self.authority.flush(mode);
        let report = self
            .observer
            .read(&flush.owner, mode, entities)
            .expect("owner stream should be well formed");
        (flush, report)
    }

    /// Flushes the observer and applies its owner stream on the authority
    pub fn send_to_authority(
        &mut self,
        mode: SerializeMode,
        entities: &dyn EntityLookup,
    ) -> (EntityFlush, EntityReadReport) {
        let flush = self.observer.flush(mode);
        let report = self
            .authority
            .read(&flush.owner, mode, entities)
            .expect("owner stream should be well formed");
        (flush, report)
    }
}
