use crate::{byte_reader::ByteReader, byte_writer::ByteWrite, error::SerdeErr, serde::Serde};

/// A u64 never needs more than 10 groups of 7 bits
pub const MAX_VAR_UINT_BYTES: usize = 10;

/// Maps signed values onto unsigned ones so that small magnitudes stay small:
/// 0 -> 0, -1 -> 1, 1 -> 2, -2 -> 3, ...
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

pub fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Writes `value` little-endian, 7 payload bits per byte, high bit set on every
/// byte except the last
pub fn write_var_uint(writer: &mut dyn ByteWrite, mut value: u64) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            writer.write_byte(byte);
            return;
        }
        writer.write_byte(byte | 0x80);
    }
}

pub fn read_var_uint(reader: &mut ByteReader) -> Result<u64, SerdeErr> {
    let start = reader.position();
    let mut output: u64 = 0;
    let mut shift: u32 = 0;

    loop {
        let byte = reader.read_byte()?;

        // the tenth byte may only carry the single remaining bit
        if shift == 63 && byte > 1 {
            return Err(SerdeErr::VarintOverflow { position: start });
        }

        output |= ((byte & 0x7F) as u64) << shift;

        if byte & 0x80 == 0 {
            return Ok(output);
        }

        shift += 7;
    }
}

pub fn write_var_int(writer: &mut dyn ByteWrite, value: i64) {
    write_var_uint(writer, zigzag_encode(value));
}

pub fn read_var_int(reader: &mut ByteReader) -> Result<i64, SerdeErr> {
    Ok(zigzag_decode(read_var_uint(reader)?))
}

/// Reads a varint used as a length or index
pub fn read_var_usize(reader: &mut ByteReader) -> Result<usize, SerdeErr> {
    let value = read_var_uint(reader)?;
    usize::try_from(value).map_err(|_| SerdeErr::IntegerOutOfRange {
        value: i128::from(value),
        type_name: "usize",
    })
}

pub fn write_var_usize(writer: &mut dyn ByteWrite, value: usize) {
    write_var_uint(writer, value as u64);
}

/// Number of bytes `write_var_uint` emits for `value`
pub fn var_uint_size(value: u64) -> usize {
    if value == 0 {
        return 1;
    }
    let significant_bits = 64 - value.leading_zeros() as usize;
    (significant_bits + 6) / 7
}

/// Unsigned integer serialized as a varint
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
pub struct VarUint(pub u64);

/// Signed integer serialized as a zig-zag varint
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
pub struct VarInt(pub i64);

impl Serde for VarUint {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        write_var_uint(writer, self.0);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self(read_var_uint(reader)?))
    }

    fn byte_length(&self) -> usize {
        var_uint_size(self.0)
    }
}

impl Serde for VarInt {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        write_var_int(writer, self.0);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self(read_var_int(reader)?))
    }

    fn byte_length(&self) -> usize {
        var_uint_size(zigzag_encode(self.0))
    }
}

impl From<u64> for VarUint {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<i64> for VarInt {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

// Tests
