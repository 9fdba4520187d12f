/// Per-member failure isolation in the entity serializer: a member that fails
/// or panics must never corrupt the frames of the other members

use tidal_shared::{
    ByteReader, ByteWriter, EntityError, EntityReader, EntityWriter, HostType, NoEntities,
    Property, ReplicaMember, ReplicatedEntity, SerializeMode, SyncDirection, VisibilityFilter,
};
use tidal_test::{
    assert_member_applied, assert_member_failed,
    test_protocol::{BROKEN, HEALTH, INVENTORY, NAME},
    init_logger, EntityPair, Fault, FaultyMember, Player, ENTITY_ID, FAULTY_PAYLOAD,
};

#[test]
fn failing_write_leaves_other_members_intact() {
    init_logger();
    let mut pair = EntityPair::new(Player::with_fault(Fault::WriteError), Player::new());

    {
        let player = pair.authority.replica_mut();
        player.health.set(42);
        player.name.set("ada".to_string());
        player.inventory.push(7);
    }

    let (flush, report) = pair.send_to_observer(SerializeMode::Delta, &NoEntities);

    assert_member_failed!(flush, BROKEN);
    assert_eq!(flush.failures.len(), 1);
    assert!(flush.observers_mask.bit(BROKEN));

    assert_member_applied!(report, HEALTH);
    assert_member_applied!(report, NAME);
    assert_member_applied!(report, INVENTORY);
    assert!(!report.applied.contains(&BROKEN));
    assert_eq!(report.skipped, vec![BROKEN]);
    assert!(report.failures.is_empty());

    let player = pair.observer.replica();
    assert_eq!(*player.health, 42);
    assert_eq!(player.name.as_str(), "ada");
    assert_eq!(player.inventory.as_slice(), &[7]);
    assert!(player.broken.received.is_empty());
}

#[test]
fn panicking_write_is_contained() {
    init_logger();
    let mut pair = EntityPair::new(Player::with_fault(Fault::WritePanic), Player::new());
    pair.authority.replica_mut().health.set(5);

    let (flush, report) = pair.send_to_owner(SerializeMode::Full, &NoEntities);

    assert_member_failed!(flush, BROKEN);
    assert!(flush.failures[0].reason.contains("scripted write panic"));
    assert_member_applied!(report, HEALTH);
    assert_eq!(*pair.observer.replica().health, 5);
}

#[test]
fn failed_member_frame_is_empty() {
    let faulty = FaultyMember::new(Fault::WriteError);
    let value = Property::new(0x0102u32);

    let mut writer = ByteWriter::new();
    let report = EntityWriter::write_members(
        &mut writer,
        &[&faulty as &dyn ReplicaMember, &value],
        VisibilityFilter::Owner,
        SyncDirection::AuthorityToObservers,
        SerializeMode::Full,
        ENTITY_ID,
    );
    let bytes = writer.to_bytes();

    assert_eq!(report.mask.bits(), 0b11);
    assert_eq!(report.written_mask().bits(), 0b10);

    // mask, empty frame, then the value's frame: length 2, varint 0x0102
    assert_eq!(bytes, vec![0b11, 0, 2, 0x82, 0x02]);
}

#[test]
fn failed_member_stays_pending() {
    init_logger();
    let mut entity = ReplicatedEntity::new(
        ENTITY_ID,
        HostType::Authority,
        Player::with_fault(Fault::WriteError),
    );
    entity.replica_mut().health.set(1);

    entity.flush(SerializeMode::Delta);

    assert_eq!(entity.confirm_flush(), 1);
    assert!(!entity.replica().health.is_dirty());
    assert_eq!(entity.replica().broken.clear_count, 0);
}

#[test]
fn empty_payload_is_reported_as_skipped() {
    let empty = Property::new(());
    let value = Property::new(4u8);

    let mut writer = ByteWriter::new();
    EntityWriter::write_members(
        &mut writer,
        &[&empty as &dyn ReplicaMember, &value],
        VisibilityFilter::Owner,
        SyncDirection::AuthorityToObservers,
        SerializeMode::Full,
        ENTITY_ID,
    );
    let bytes = writer.to_bytes();

    let mut empty_target = Property::new(());
    let mut value_target = Property::new(0u8);
    let mut reader = ByteReader::new(&bytes);
    let report = EntityReader::read_members(
        &mut reader,
        &mut [&mut empty_target as &mut dyn ReplicaMember, &mut value_target],
        SerializeMode::Full,
        SyncDirection::AuthorityToObservers,
        &NoEntities,
        ENTITY_ID,
    )
    .unwrap();

    assert_eq!(report.skipped, vec![0]);
    assert_eq!(report.applied, vec![1]);
    assert!(report.failures.is_empty());
    assert_eq!(*value_target, 4);
}

#[test]
fn failing_read_is_skipped() {
    init_logger();
    let mut pair = EntityPair::new(Player::new(), Player::with_fault(Fault::ReadError));
    pair.authority.replica_mut().health.set(3);
    pair.authority.replica_mut().name.set("bo".to_string());

    let (flush, report) = pair.send_to_owner(SerializeMode::Full, &NoEntities);

    assert!(flush.failures.is_empty());
    assert_member_failed!(report, BROKEN);
    assert_member_applied!(report, HEALTH);
    assert_member_applied!(report, NAME);
    assert_eq!(*pair.observer.replica().health, 3);
    assert_eq!(pair.observer.replica().name.as_str(), "bo");
}

#[test]
fn panicking_read_is_contained() {
    init_logger();
    let mut pair = EntityPair::new(Player::new(), Player::with_fault(Fault::ReadPanic));
    pair.authority.replica_mut().health.set(9);

    let (_, report) = pair.send_to_owner(SerializeMode::Full, &NoEntities);

    assert_member_failed!(report, BROKEN);
    assert!(report.failures[0].reason.contains("scripted read panic"));
    assert_eq!(*pair.observer.replica().health, 9);
}

#[test]
fn short_read_realigns_on_frame_boundary() {
    init_logger();
    let faulty = FaultyMember::new(Fault::None);
    let value = Property::new(77u16);

    let mut writer = ByteWriter::new();
    EntityWriter::write_members(
        &mut writer,
        &[&faulty as &dyn ReplicaMember, &value],
        VisibilityFilter::Owner,
        SyncDirection::AuthorityToObservers,
        SerializeMode::Full,
        ENTITY_ID,
    );
    let bytes = writer.to_bytes();

    let mut short_reader = FaultyMember::new(Fault::ShortRead);
    let mut target = Property::new(0u16);
    let mut reader = ByteReader::new(&bytes);
    let report = EntityReader::read_members(
        &mut reader,
        &mut [&mut short_reader as &mut dyn ReplicaMember, &mut target],
        SerializeMode::Full,
        SyncDirection::AuthorityToObservers,
        &NoEntities,
        ENTITY_ID,
    )
    .unwrap();

    assert_eq!(report.mismatches.len(), 1);
    assert_eq!(report.mismatches[0].expected, FAULTY_PAYLOAD.len());
    assert_eq!(report.mismatches[0].consumed, 1);
    assert_eq!(report.applied, vec![0, 1]);
    assert_eq!(*target, 77);
    assert!(reader.is_empty());
}

#[test]
fn truncated_stream_is_an_error() {
    let mut target = Property::new(0u32);
    let bytes = [0b1, 5, 1, 2];
    let mut reader = ByteReader::new(&bytes);

    let result = EntityReader::read_members(
        &mut reader,
        &mut [&mut target as &mut dyn ReplicaMember],
        SerializeMode::Full,
        SyncDirection::AuthorityToObservers,
        &NoEntities,
        ENTITY_ID,
    );

    assert_eq!(
        result,
        Err(EntityError::FrameOverrun {
            entity_id: ENTITY_ID,
            index: 0,
            length: 5,
            remaining: 2,
        })
    );
    assert_eq!(*target, 0);
}

#[test]
fn unknown_member_index_is_reported() {
    init_logger();
    let mut target = Property::new(0u8);
    // bits 0 and 3, member 3 doesn't exist on this side
    let bytes = [0b1001, 1, 4, 1, 9];
    let mut reader = ByteReader::new(&bytes);

    let report = EntityReader::read_members(
        &mut reader,
        &mut [&mut target as &mut dyn ReplicaMember],
        SerializeMode::Full,
        SyncDirection::AuthorityToObservers,
        &NoEntities,
        ENTITY_ID,
    )
    .unwrap();

    assert_member_applied!(report, 0);
    assert_member_failed!(report, 3);
    assert_eq!(*target, 4);
}
