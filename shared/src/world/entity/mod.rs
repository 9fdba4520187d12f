pub mod entity_registry;
pub mod error;
pub mod replicated_entity;
