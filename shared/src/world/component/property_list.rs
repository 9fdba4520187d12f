use std::{fmt, ops::Index};

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

/// One recorded mutation of a [`PropertyList`]
#[derive(Debug, Clone, PartialEq)]
pub enum ListOp<T> {
    Add(T),
    Insert(usize, T),
    Set(usize, T),
    Remove(usize),
    Clear,
}

const ADD: u8 = 0;
const INSERT: u8 = 1;
const SET: u8 = 2;
const REMOVE: u8 = 3;
const CLEAR: u8 = 4;

impl<T: Serde> ListOp<T> {
    pub fn write(&self, writer: &mut dyn ByteWrite) {
        match self {
            ListOp::Add(value) => {
                ADD.ser(writer);
                value.ser(writer);
            }
            ListOp::Insert(index, value) => {
                INSERT.ser(writer);
                write_var_usize(writer, *index);
                value.ser(writer);
            }
            ListOp::Set(index, value) => {
                SET.ser(writer);
                write_var_usize(writer, *index);
                value.ser(writer);
            }
            ListOp::Remove(index) => {
                REMOVE.ser(writer);
                write_var_usize(writer, *index);
            }
            ListOp::Clear => {
                CLEAR.ser(writer);
            }
        }
    }

    pub fn read(reader: &mut ByteReader) -> Result<Self, MemberError> {
        let tag = u8::de(reader)?;
        let op = match tag {
            ADD => ListOp::Add(T::de(reader)?),
            INSERT => {
                let index = read_var_usize(reader)?;
                ListOp::Insert(index, T::de(reader)?)
            }
            SET => {
                let index = read_var_usize(reader)?;
                ListOp::Set(index, T::de(reader)?)
            }
            REMOVE => ListOp::Remove(read_var_usize(reader)?),
            CLEAR => ListOp::Clear,
            tag => return Err(PropertyError::UnknownOperation { tag }.into()),
        };
        Ok(op)
    }
}

/// A replicated ordered list.
///
/// Every local mutation appends to the change log, whether or not anybody is
/// observing the entity. Ops leave the log only once a flush that carried them
/// is confirmed ([`ReplicaMember::confirm_changes`]).
///
/// Delta serialization replays the log in order, full serialization writes the
/// current contents along with how far into the log they reach, so a later
/// delta doesn't apply the same ops twice.
pub struct PropertyList<T: Serde> {
    items: Vec<T>,
    changes: ChangeLog<ListOp<T>>,
    tracker: Tracker,
    on_change: Option<Box<dyn FnMut(&ListOp<T>)>>,
}

impl<T: Serde> PropertyList<T> {
    pub fn new() -> Self {
        Self::with_settings(MemberSettings::default())
    }

    pub fn with_settings(settings: MemberSettings) -> Self {
        Self {
            items: Vec::new(),
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

    // Read access

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Operations recorded since the last confirmed flush
    pub fn pending_changes(&self) -> &[ListOp<T>] {
        self.changes.ops()
    }

    /// Called with every operation applied from the network
    pub fn set_on_change(&mut self, on_change: impl FnMut(&ListOp<T>) + 'static) {
        self.on_change = Some(Box::new(on_change));
    }

    pub fn set_on_dirty(&mut self, on_dirty: impl FnMut() + 'static) {
        self.tracker.set_on_dirty(Box::new(on_dirty));
    }

    // Mutation

    pub fn push(&mut self, value: T) {
        self.try_push(value)
            .expect("push called on a read-only PropertyList")
    }

    pub fn try_push(&mut self, value: T) -> Result<(), PropertyError> {
        self.tracker.check_writable("PropertyList", "push")?;
        self.local_change(ListOp::Add(value))
    }

    pub fn insert(&mut self, index: usize, value: T) {
        if let Err(error) = self.try_insert(index, value) {
            panic!("PropertyList insert failed: {}", error);
        }
    }

    pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), PropertyError> {
        self.tracker.check_writable("PropertyList", "insert")?;
        self.local_change(ListOp::Insert(index, value))
    }

    pub fn set(&mut self, index: usize, value: T) {
        if let Err(error) = self.try_set(index, value) {
            panic!("PropertyList set failed: {}", error);
        }
    }

    pub fn try_set(&mut self, index: usize, value: T) -> Result<(), PropertyError> {
        self.tracker.check_writable("PropertyList", "set")?;
        self.local_change(ListOp::Set(index, value))
    }

    pub fn remove(&mut self, index: usize) -> T {
        match self.try_remove(index) {
            Ok(value) => value,
            Err(error) => panic!("PropertyList remove failed: {}", error),
        }
    }

    pub fn try_remove(&mut self, index: usize) -> Result<T, PropertyError> {
        self.tracker.check_writable("PropertyList", "remove")?;
        let value = self
            .items
            .get(index)
            .cloned()
            .ok_or(PropertyError::IndexOutOfBounds {
                index,
                length: self.items.len(),
            })?;
        self.local_change(ListOp::Remove(index))?;
        Ok(value)
    }

    pub fn clear(&mut self) {
        self.try_clear()
            .expect("clear called on a read-only PropertyList")
    }

    pub fn try_clear(&mut self) -> Result<(), PropertyError> {
        self.tracker.check_writable("PropertyList", "clear")?;
        self.local_change(ListOp::Clear)
    }

    fn local_change(&mut self, op: ListOp<T>) -> Result<(), PropertyError> {
        self.apply(&op)?;
        self.changes.push(op);
        self.tracker.mark_dirty();
        Ok(())
    }

    fn apply(&mut self, op: &ListOp<T>) -> Result<(), PropertyError> {
        let length = self.items.len();
        match op {
            ListOp::Add(value) => self.items.push(value.clone()),
            ListOp::Insert(index, value) => {
                if *index > length {
                    return Err(PropertyError::IndexOutOfBounds {
                        index: *index,
                        length,
                    });
                }
                self.items.insert(*index, value.clone());
            }
            ListOp::Set(index, value) => {
                let Some(slot) = self.items.get_mut(*index) else {
                    return Err(PropertyError::IndexOutOfBounds {
                        index: *index,
                        length,
                    });
                };
                *slot = value.clone();
            }
            ListOp::Remove(index) => {
                if *index >= length {
                    return Err(PropertyError::IndexOutOfBounds {
                        index: *index,
                        length,
                    });
                }
                self.items.remove(*index);
            }
            ListOp::Clear => self.items.clear(),
        }
        Ok(())
    }

    fn apply_received(&mut self, op: ListOp<T>) -> Result<(), MemberError> {
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

impl<T: Serde> ReplicaMember for PropertyList<T> {
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
                write_var_usize(writer, self.items.len());
                for item in &self.items {
                    item.ser(writer);
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
                let mut items = Vec::with_capacity(count.min(reader.remaining()));
                for _ in 0..count {
                    items.push(T::de(reader)?);
                }

                // a full state arrives as a reset followed by the contents
                self.apply_received(ListOp::Clear)?;
                for item in items {
                    self.apply_received(ListOp::Add(item))?;
                }
                self.changes.set_received(received);
            }
            SerializeMode::Delta => {
                let header = self.changes.read_delta_header(reader)?;
                for offset in 0..header.count {
                    let op = ListOp::read(reader)?;
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
        "PropertyList"
    }
}

impl<T: Serde> Default for PropertyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serde> Index<usize> for PropertyList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl<T: Serde + fmt::Debug> fmt::Debug for PropertyList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyList")
            .field("items", &self.items)
            .field("changes", &self.changes.ops())
            .field("tracker", &self.tracker)
            .finish()
    }
}
