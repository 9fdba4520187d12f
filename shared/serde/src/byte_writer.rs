/// Sink for serialized bytes.
///
/// Implemented by [`ByteWriter`], which stores the bytes, and by
/// [`ByteCounter`], which only measures how many would be written.
pub trait ByteWrite {
    fn write_byte(&mut self, byte: u8);
    fn write_bytes(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.write_byte(*byte);
        }
    }
    fn is_counter(&self) -> bool;
}

/// A growable byte buffer.
///
/// Frames written by the entity serializer can be arbitrarily large, so unlike
/// a packet writer this never caps its size.
#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    buffer: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(64),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far
    pub fn position(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Drops everything written after `position`
    pub fn truncate(&mut self, position: usize) {
        self.buffer.truncate(position);
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn to_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

impl ByteWrite for ByteWriter {
    fn write_byte(&mut self, byte: u8) {
        self.buffer.push(byte);
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    fn is_counter(&self) -> bool {
        false
    }
}

/// Counts bytes without storing them
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteCounter {
    count: usize,
}

impl ByteCounter {
    pub fn new() -> Self {
        Self { count: 0 }
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl ByteWrite for ByteCounter {
    fn write_byte(&mut self, _byte: u8) {
        self.count += 1;
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.count += bytes.len();
    }

    fn is_counter(&self) -> bool {
        true
    }
}
