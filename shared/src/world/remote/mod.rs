pub mod entity_reader;
