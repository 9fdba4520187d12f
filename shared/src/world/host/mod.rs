pub mod entity_writer;
