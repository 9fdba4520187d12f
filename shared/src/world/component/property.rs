use std::{fmt, ops::Deref};

use log::warn;
use tidal_serde::{ByteReader, ByteWrite, Serde};

use crate::{
    types::{MemberSettings, SerializeMode},
    world::{
        component::{
            error::{MemberError, PropertyError},
            replicate::ReplicaMember,
            tracker::Tracker,
        },
        entity::entity_registry::EntityLookup,
    },
};

/// Change callback attached to a [`Property`].
///
/// The signature is chosen once, at registration time.
pub enum PropertyHook<T> {
    /// Receives the new value
    New(Box<dyn FnMut(&T)>),
    /// Receives the old and the new value
    OldNew(Box<dyn FnMut(&T, &T)>),
    /// Receives the old and the new value, and whether the change came from a
    /// full (initial) serialization
    OldNewInitial(Box<dyn FnMut(&T, &T, bool)>),
}

impl<T> PropertyHook<T> {
    pub fn new(hook: impl FnMut(&T) + 'static) -> Self {
        Self::New(Box::new(hook))
    }

    pub fn old_new(hook: impl FnMut(&T, &T) + 'static) -> Self {
        Self::OldNew(Box::new(hook))
    }

    pub fn old_new_initial(hook: impl FnMut(&T, &T, bool) + 'static) -> Self {
        Self::OldNewInitial(Box::new(hook))
    }

    fn call(&mut self, old: &T, new: &T, initial: bool) {
        match self {
            PropertyHook::New(hook) => hook(new),
            PropertyHook::OldNew(hook) => hook(old, new),
            PropertyHook::OldNewInitial(hook) => hook(old, new, initial),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            PropertyHook::New(_) => "New",
            PropertyHook::OldNew(_) => "OldNew",
            PropertyHook::OldNewInitial(_) => "OldNewInitial",
        }
    }
}

/// A single replicated value with dirty tracking.
///
/// Assigning a value equal to the current one is a no-op: nothing is marked
/// dirty and no callback fires.
pub struct Property<T: Serde> {
    inner: T,
    tracker: Tracker,
    hook: Option<PropertyHook<T>>,
}

impl<T: Serde> Property<T> {
    /// Create a new Property synced from the authority to all observers
    pub fn new(value: T) -> Self {
        Self::with_settings(value, MemberSettings::default())
    }

    pub fn with_settings(value: T, settings: MemberSettings) -> Self {
        Self {
            inner: value,
            tracker: Tracker::new(settings),
            hook: None,
        }
    }

    /// Create a new Property only sent to the owning connection
    pub fn owner_only(value: T) -> Self {
        Self::with_settings(value, MemberSettings::owner_only())
    }

    /// Create a new Property written by the observer and sent to the authority
    pub fn from_observer(value: T) -> Self {
        Self::with_settings(value, MemberSettings::observer_to_authority())
    }

    pub fn get(&self) -> &T {
        &self.inner
    }

    /// Assign a new value, returns whether the stored value changed
    ///
    /// # Panics
    ///
    /// Panics if the Property is read-only on this side.
    /// Consider using `try_set` for non-panicking error handling.
    pub fn set(&mut self, value: T) -> bool {
        self.try_set(value)
            .expect("set called on a read-only Property")
    }

    /// Try to assign a new value.
    ///
    /// Returns whether the stored value changed, or a state violation if the
    /// Property is read-only on this side.
    pub fn try_set(&mut self, value: T) -> Result<bool, PropertyError> {
        self.tracker.check_writable("Property", "be set")?;
        Ok(self.assign(value, false))
    }

    /// # Panics
    ///
    /// Panics if the Property is read-only on this side.
    pub fn modify(&mut self, edit: impl FnOnce(&mut T)) -> bool {
        self.try_modify(edit)
            .expect("modify called on a read-only Property")
    }

    /// Edit the value in place through a closure. The edit goes through the
    /// same equality check as `try_set`.
    pub fn try_modify(&mut self, edit: impl FnOnce(&mut T)) -> Result<bool, PropertyError> {
        self.tracker.check_writable("Property", "be modified")?;
        let mut value = self.inner.clone();
        edit(&mut value);
        Ok(self.assign(value, false))
    }

    /// Register the change callback, replacing any previous one
    pub fn set_hook(&mut self, hook: PropertyHook<T>) {
        if let Some(previous) = &self.hook {
            warn!(
                "Replacing {} hook on Property with {} hook",
                previous.name(),
                hook.name()
            );
        }
        self.hook = Some(hook);
    }

    /// Register a notification fired whenever a local assignment marks the
    /// Property dirty
    pub fn set_on_dirty(&mut self, on_dirty: impl FnMut() + 'static) {
        self.tracker.set_on_dirty(Box::new(on_dirty));
    }

    pub fn settings(&self) -> MemberSettings {
        self.tracker.settings()
    }

    fn assign(&mut self, value: T, initial: bool) -> bool {
        if self.inner == value {
            return false;
        }

        let old = std::mem::replace(&mut self.inner, value);
        self.tracker.mark_dirty();
        self.fire_hook(&old, initial);
        true
    }

    fn fire_hook(&mut self, old: &T, initial: bool) {
        if let Some(hook) = &mut self.hook {
            hook.call(old, &self.inner, initial);
        }
    }
}

impl<T: Serde> ReplicaMember for Property<T> {
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
        self.tracker.clear_dirty();
    }

    fn change_mark(&self) -> u64 {
        self.tracker.generation()
    }

    fn confirm_changes(&mut self, mark: u64) {
        self.tracker.confirm(mark);
    }

    fn is_read_only(&self) -> bool {
        self.tracker.is_read_only()
    }

    fn set_read_only(&mut self, read_only: bool) {
        self.tracker.set_read_only(read_only);
    }

    fn write(&self, _mode: SerializeMode, writer: &mut dyn ByteWrite) -> Result<(), MemberError> {
        self.inner.ser(writer);
        Ok(())
    }

    fn read(
        &mut self,
        mode: SerializeMode,
        reader: &mut ByteReader,
        _entities: &dyn EntityLookup,
    ) -> Result<(), MemberError> {
        let value = T::de(reader)?;

        // received values are never echoed back as local changes
        let previous = self.tracker.begin_applying();
        self.assign(value, mode == SerializeMode::Full);
        self.tracker.end_applying(previous);

        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "Property"
    }
}

// It could be argued that Property here is a type of smart-pointer,
// but honestly this is mainly for the convenience of type coercion
impl<T: Serde> Deref for Property<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: Serde + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.inner)
            .field("tracker", &self.tracker)
            .finish()
    }
}
