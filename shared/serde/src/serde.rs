use crate::{
    byte_reader::ByteReader,
    byte_writer::{ByteCounter, ByteWrite},
    error::SerdeErr,
};

/// A type that can be written to and read from a byte stream
pub trait Serde: Sized + Clone + PartialEq {
    /// Encodes the value into the writer
    fn ser(&self, writer: &mut dyn ByteWrite);

    /// Parses a value from the reader
    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr>;

    /// Number of bytes `ser` would produce
    fn byte_length(&self) -> usize {
        let mut counter = ByteCounter::new();
        self.ser(&mut counter);
        counter.count()
    }
}
