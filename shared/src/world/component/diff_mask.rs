use tidal_serde::{read_var_uint, write_var_uint, ByteReader, ByteWrite, SerdeErr};

/// Upper bound on replicated members per entity, one bit each
pub const MAX_MEMBERS: usize = 64;

/// Bitset of members present in a frame, bit `i` for member `i`.
/// Serialized as a single varint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DiffMask {
    bits: u64,
}

impl DiffMask {
    pub fn new() -> Self {
        Self { bits: 0 }
    }

    pub fn from_bits(bits: u64) -> Self {
        Self { bits }
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn bit(&self, index: usize) -> bool {
        index < MAX_MEMBERS && self.bits & (1 << index) != 0
    }

    /// Indices past `MAX_MEMBERS` are ignored and reported as `false`
    pub fn set_bit(&mut self, index: usize, value: bool) -> bool {
        if index >= MAX_MEMBERS {
            return false;
        }
        if value {
            self.bits |= 1 << index;
        } else {
            self.bits &= !(1 << index);
        }
        true
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    pub fn is_clear(&self) -> bool {
        self.bits == 0
    }

    pub fn or(&mut self, other: &DiffMask) {
        self.bits |= other.bits;
    }

    pub fn count(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Set indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..MAX_MEMBERS).filter(move |index| self.bit(*index))
    }

    pub fn ser(&self, writer: &mut dyn ByteWrite) {
        write_var_uint(writer, self.bits);
    }

    pub fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self::from_bits(read_var_uint(reader)?))
    }
}
