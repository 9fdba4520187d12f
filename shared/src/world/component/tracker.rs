use std::fmt;

use crate::{types::MemberSettings, world::component::error::PropertyError};

/// Dirty / read-only bookkeeping common to every tracked member
pub(crate) struct Tracker {
    settings: MemberSettings,
    dirty: bool,
    // bumped by every local change
    generation: u64,
    read_only: bool,
    // set while a received change is applied
    applying: bool,
    on_dirty: Option<Box<dyn FnMut()>>,
}

impl Tracker {
    pub fn new(settings: MemberSettings) -> Self {
        Self {
            settings,
            dirty: false,
            generation: 0,
            read_only: false,
            applying: false,
            on_dirty: None,
        }
    }

    pub fn settings(&self) -> MemberSettings {
        self.settings
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the member dirty and notifies, unless a change is being applied
    pub fn mark_dirty(&mut self) {
        if self.applying {
            return;
        }
        self.dirty = true;
        self.generation += 1;
        if let Some(on_dirty) = &mut self.on_dirty {
            on_dirty();
        }
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Clears the dirty flag unless the member changed after `generation`
    pub fn confirm(&mut self, generation: u64) {
        if self.generation == generation {
            self.dirty = false;
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Returns the previous value so nested calls restore it
    pub fn begin_applying(&mut self) -> bool {
        std::mem::replace(&mut self.applying, true)
    }

    pub fn end_applying(&mut self, previous: bool) {
        self.applying = previous;
    }

    pub fn set_on_dirty(&mut self, on_dirty: Box<dyn FnMut()>) {
        self.on_dirty = Some(on_dirty);
    }

    pub fn check_writable(
        &self,
        member_type: &'static str,
        operation: &'static str,
    ) -> Result<(), PropertyError> {
        if self.read_only {
            return Err(PropertyError::StateViolation {
                member_type,
                operation,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("settings", &self.settings)
            .field("dirty", &self.dirty)
            .field("generation", &self.generation)
            .field("read_only", &self.read_only)
            .finish()
    }
}
