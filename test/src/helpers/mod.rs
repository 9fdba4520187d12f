pub mod assertions;
pub mod entity_pair;
pub mod faulty_member;

pub use entity_pair::{init_logger, EntityPair, ENTITY_ID};
pub use faulty_member::{Fault, FaultyMember, FAULTY_PAYLOAD};
