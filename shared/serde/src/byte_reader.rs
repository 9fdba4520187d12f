use crate::error::SerdeErr;

/// Cursor over an incoming byte buffer
#[derive(Debug, Clone)]
pub struct ByteReader<'b> {
    buffer: &'b [u8],
    position: usize,
}

impl<'b> ByteReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves the cursor to an absolute position. Positions past the end of
    /// the buffer are rejected, the end itself is allowed.
    pub fn set_position(&mut self, position: usize) -> Result<(), SerdeErr> {
        if position > self.buffer.len() {
            return Err(SerdeErr::InvalidSeek {
                position,
                length: self.buffer.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let Some(byte) = self.buffer.get(self.position) else {
            return Err(SerdeErr::Eof {
                position: self.position,
                needed: 1,
            });
        };
        self.position += 1;
        Ok(*byte)
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'b [u8], SerdeErr> {
        if count > self.remaining() {
            return Err(SerdeErr::Eof {
                position: self.position,
                needed: count - self.remaining(),
            });
        }
        let start = self.position;
        self.position += count;
        Ok(&self.buffer[start..self.position])
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], SerdeErr> {
        let mut output = [0u8; N];
        output.copy_from_slice(self.read_bytes(N)?);
        Ok(output)
    }
}
