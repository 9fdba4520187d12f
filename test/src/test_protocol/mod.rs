/// Replicated components used across the integration tests

use tidal_shared::{
    EntityProperty, Property, PropertyList, PropertyMap, ReplicaMember, Replicate,
};

use crate::helpers::faulty_member::{Fault, FaultyMember};

pub const HEALTH: usize = 0;
pub const NAME: usize = 1;
pub const INVENTORY: usize = 2;
pub const SECRET: usize = 3;
pub const INPUT: usize = 4;
pub const TARGET: usize = 5;
pub const STATS: usize = 6;
pub const BROKEN: usize = 7;

/// A component with one member of every kind, plus a member whose failures
/// can be scripted
pub struct Player {
    pub health: Property<u32>,
    pub name: Property<String>,
    pub inventory: PropertyList<u16>,
    /// Only visible to the owning connection
    pub secret: Property<u64>,
    /// Written by the observer
    pub input: Property<i32>,
    pub target: EntityProperty,
    pub stats: PropertyMap<String, i64>,
    pub broken: FaultyMember,
}

impl Player {
    pub fn new() -> Self {
        Self::with_fault(Fault::None)
    }

    pub fn with_fault(fault: Fault) -> Self {
        Self {
            health: Property::new(100),
            name: Property::new(String::new()),
            inventory: PropertyList::new(),
            secret: Property::owner_only(0),
            input: Property::from_observer(0),
            target: EntityProperty::new(),
            stats: PropertyMap::new(),
            broken: FaultyMember::new(fault),
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Replicate for Player {
    fn members(&self) -> Vec<&dyn ReplicaMember> {
        vec![
            &self.health as &dyn ReplicaMember,
            &self.name,
            &self.inventory,
            &self.secret,
            &self.input,
            &self.target,
            &self.stats,
            &self.broken,
        ]
    }

    fn members_mut(&mut self) -> Vec<&mut dyn ReplicaMember> {
        vec![
            &mut self.health as &mut dyn ReplicaMember,
            &mut self.name,
            &mut self.inventory,
            &mut self.secret,
            &mut self.input,
            &mut self.target,
            &mut self.stats,
            &mut self.broken,
        ]
    }
}

/// A component with more members than a dirty mask can address
pub struct Wide {
    pub values: Vec<Property<u8>>,
}

impl Wide {
    pub fn new(count: usize) -> Self {
        Self {
            values: (0..count).map(|index| Property::new(index as u8)).collect(),
        }
    }
}

impl Replicate for Wide {
    fn members(&self) -> Vec<&dyn ReplicaMember> {
        self.values
            .iter()
            .map(|value| value as &dyn ReplicaMember)
            .collect()
    }

    fn members_mut(&mut self) -> Vec<&mut dyn ReplicaMember> {
        self.values
            .iter_mut()
            .map(|value| value as &mut dyn ReplicaMember)
            .collect()
    }
}
