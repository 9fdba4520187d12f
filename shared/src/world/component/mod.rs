pub mod diff_mask;
pub mod entity_property;
pub mod error;
pub mod property;
pub mod property_list;
pub mod property_map;
pub mod replicate;

mod change_log;
mod tracker;
