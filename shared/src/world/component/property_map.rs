use std::{
    collections::{btree_map, BTreeMap},
    fmt,
};

use tidal_serde::{read_var_usize, write_var_usize, ByteReader, ByteWrite, Serde};

use crate::{
    types::{MemberSettings, SerializeMode},
    world::{
        component::{
            error::{MemberError, PropertyError},
            change_log::ChangeLog,
            replicate::ReplicaMember,
            tracker::Tracker,
        },
        entity::entity_registry::EntityLookup,
    },
};

/// One recorded mutation of a [`PropertyMap`]
#[derive(Debug, Clone, PartialEq)]
pub enum MapOp<K, V> {
    /// A key that was not present
    Add(K, V),
    /// A new value for a key that was present
    Set(K, V),
    Remove(K),
    Clear,
}

const ADD: u8 = 0;
const SET: u8 = 1;
const REMOVE: u8 = 2;
const CLEAR: u8 = 3;

impl<K: Serde, V: Serde> MapOp<K, V> {
    pub fn write(&self, writer: &mut dyn ByteWrite) {
        match self {
            MapOp::Add(key, value) => {
                ADD.ser(writer);
                key.ser(writer);
                value.ser(writer);
            }
            MapOp::Set(key, value) => {
                SET.ser(writer);
                key.ser(writer);
                value.ser(writer);
            }
            MapOp::Remove(key) => {
                REMOVE.ser(writer);
                key.ser(writer);
            }
            MapOp::Clear => {
                CLEAR.ser(writer);
            }
        }
    }

    pub fn read(reader: &mut ByteReader) -> Result<Self, MemberError> {
        let op = match u8::de(reader)? {
            ADD => MapOp::Add(K::de(reader)?, V::de(reader)?),
            SET => MapOp::Set(K::de(reader)?, V::de(reader)?),
            REMOVE => MapOp::Remove(K::de(reader)?),
            CLEAR => MapOp::Clear,
            tag => return Err(PropertyError::UnknownOperation { tag }.into()),
        };
        Ok(op)
    }
}

/// A replicated keyed container, iterated in key order.
///
/// Shares the change log semantics of
/// [`PropertyList`](crate::world::component::property_list::PropertyList).
pub struct PropertyMap<K: Serde + Ord, V: Serde> {
    entries: BTreeMap<K, V>,
    changes: ChangeLog<MapOp<K, V>>,
    tracker: Tracker,
    on_change: Option<Box<dyn FnMut(&MapOp<K, V>)>>,
}

impl<K: Serde + Ord, V: Serde> PropertyMap<K, V> {
    pub fn new() -> Self {
        Self::with_settings(MemberSettings::default())
    }

    pub fn with_settings(settings: MemberSettings) -> Self {
        Self {
            entries: BTreeMap::new(),
            changes: ChangeLog::new(),
            tracker: Tracker::new(settings),
            on_change: None,
        }
    }

    pub fn owner_only() -> Self {
        Self::with_settings(MemberSettings::owner_only())
    }

    pub fn from_observer() -> Self {
        Self::with_settings(MemberSettings::observer_to_authority())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, K, V> {
        self.entries.iter()
    }

    pub fn pending_changes(&self) -> &[MapOp<K, V>] {
        self.changes.ops()
    }

    /// Called with every operation applied from the network
    pub fn set_on_change(&mut self, on_change: impl FnMut(&MapOp<K, V>) + 'static) {
        self.on_change = Some(Box::new(on_change));
    }

    pub fn set_on_dirty(&mut self, on_dirty: impl FnMut() + 'static) {
        self.tracker.set_on_dirty(Box::new(on_dirty));
    }

    /// Insert or replace, returning the previous value
    ///
    /// # Panics
    ///
    /// Panics if the PropertyMap is read-only on this side.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.try_insert(key, value)
            .expect("insert called on a read-only PropertyMap")
    }

    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, PropertyError> {
        self.tracker.check_writable("PropertyMap", "insert")?;
        let previous = self.entries.get(&key).cloned();
        let op = if previous.is_some() {
            MapOp::Set(key, value)
        } else {
            MapOp::Add(key, value)
        };
        self.local_change(op)?;
        Ok(previous)
    }

    pub fn remove(&mut self, key: &K) -> V {
        match self.try_remove(key) {
            Ok(value) => value,
            Err(error) => panic!("PropertyMap remove failed: {}", error),
        }
    }

    pub fn try_remove(&mut self, key: &K) -> Result<V, PropertyError> {
        self.tracker.check_writable("PropertyMap", "remove")?;
        let value = self
            .entries
            .get(key)
            .cloned()
            .ok_or(PropertyError::KeyNotFound {
                operation: "remove",
            })?;
        self.local_change(MapOp::Remove(key.clone()))?;
        Ok(value)
    }

    pub fn clear(&mut self) {
        self.try_clear()
            .expect("clear called on a read-only PropertyMap")
    }

    pub fn try_clear(&mut self) -> Result<(), PropertyError> {
        self.tracker.check_writable("PropertyMap", "clear")?;
        self.local_change(MapOp::Clear)
    }

    fn local_change(&mut self, op: MapOp<K, V>) -> Result<(), PropertyError> {
        self.apply(&op)?;
        self.changes.push(op);
        self.tracker.mark_dirty();
        Ok(())
    }

    fn apply(&mut self, op: &MapOp<K, V>) -> Result<(), PropertyError> {
        match op {
            MapOp::Add(key, value) => {
                self.entries.insert(key.clone(), value.clone());
            }
            MapOp::Set(key, value) => {
                let Some(slot) = self.entries.get_mut(key) else {
                    return Err(PropertyError::KeyNotFound { operation: "set" });
                };
                *slot = value.clone();
            }
            MapOp::Remove(key) => {
                if self.entries.remove(key).is_none() {
                    return Err(PropertyError::KeyNotFound {
                        operation: "remove",
                    });
                }
            }
            MapOp::Clear => self.entries.clear(),
        }
        Ok(())
    }

    fn apply_received(&mut self, op: MapOp<K, V>) -> Result<(), MemberError> {
        let previous = self.tracker.begin_applying();
        let result = self.apply(&op);
        if result.is_ok() {
            if let Some(on_change) = &mut self.on_change {
                on_change(&op);
            }
        }
        self.tracker.end_applying(previous);
        result.map_err(MemberError::from)
    }
}

impl<K: Serde + Ord, V: Serde> ReplicaMember for PropertyMap<K, V> {
    fn settings(&self) -> MemberSettings {
        self.tracker.settings()
    }

    fn is_dirty(&self) -> bool {
        self.tracker.is_dirty()
    }

    fn mark_dirty(&mut self) {
        self.tracker.mark_dirty();
    }

    fn clear_dirty(&mut self) {
        self.changes.clear();
        self.tracker.clear_dirty();
    }

    fn change_mark(&self) -> u64 {
        self.changes.end()
    }

    fn confirm_changes(&mut self, mark: u64) {
        self.changes.confirm(mark);
        if self.changes.is_empty() {
            self.tracker.clear_dirty();
        }
    }

    fn is_read_only(&self) -> bool {
        self.tracker.is_read_only()
    }

    fn set_read_only(&mut self, read_only: bool) {
        self.tracker.set_read_only(read_only);
    }

    fn write(&self, mode: SerializeMode, writer: &mut dyn ByteWrite) -> Result<(), MemberError> {
        match mode {
            SerializeMode::Full => {
                self.changes.write_full_header(writer);
                write_var_usize(writer, self.entries.len());
                for (key, value) in &self.entries {
                    key.ser(writer);
                    value.ser(writer);
                }
            }
            SerializeMode::Delta => {
                self.changes.write_delta(writer, |op, writer| op.write(writer));
            }
        }
        Ok(())
    }

    fn read(
        &mut self,
        mode: SerializeMode,
        reader: &mut ByteReader,
        _entities: &dyn EntityLookup,
    ) -> Result<(), MemberError> {
        match mode {
            SerializeMode::Full => {
                let received = self.changes.read_full_header(reader)?;
                let count = read_var_usize(reader)?;
                let mut entries = Vec::with_capacity(count.min(reader.remaining()));
                for _ in 0..count {
                    entries.push((K::de(reader)?, V::de(reader)?));
                }

                self.apply_received(MapOp::Clear)?;
                for (key, value) in entries {
                    self.apply_received(MapOp::Add(key, value))?;
                }
                self.changes.set_received(received);
            }
            SerializeMode::Delta => {
                let header = self.changes.read_delta_header(reader)?;
                for offset in 0..header.count {
                    let op = MapOp::read(reader)?;
                    let sequence = header.base + offset as u64;
                    // already part of a full state received earlier
                    if self.changes.is_received(sequence) {
                        continue;
                    }
                    self.apply_received(op)?;
                    self.changes.set_received(sequence + 1);
                }
            }
        }
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "PropertyMap"
    }
}

impl<K: Serde + Ord, V: Serde> Default for PropertyMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Serde + Ord + fmt::Debug, V: Serde + fmt::Debug> fmt::Debug for PropertyMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMap")
            .field("entries", &self.entries)
            .field("changes", &self.changes.ops())
            .field("tracker", &self.tracker)
            .finish()
    }
}
