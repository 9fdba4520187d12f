use glam::{Quat, Vec3};

use crate::{
    byte_reader::ByteReader,
    byte_writer::ByteWrite,
    error::SerdeErr,
    integer::{
        read_var_int, read_var_uint, read_var_usize, var_uint_size, write_var_int, write_var_uint,
    },
    serde::Serde,
};

// Unit

impl Serde for () {
    fn ser(&self, _writer: &mut dyn ByteWrite) {}

    fn de(_reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(())
    }
}

// Bool

impl Serde for bool {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(u8::from(*self));
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        match reader.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(SerdeErr::InvalidBool { value }),
        }
    }

    fn byte_length(&self) -> usize {
        1
    }
}

// Single bytes are written raw, a varint would only grow them

impl Serde for u8 {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(*self);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        reader.read_byte()
    }

    fn byte_length(&self) -> usize {
        1
    }
}

impl Serde for i8 {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(self.to_le_bytes()[0]);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(i8::from_le_bytes([reader.read_byte()?]))
    }

    fn byte_length(&self) -> usize {
        1
    }
}

// Wider integers are varints

macro_rules! impl_serde_unsigned {
    ($impl_type:ty) => {
        impl Serde for $impl_type {
            fn ser(&self, writer: &mut dyn ByteWrite) {
                write_var_uint(writer, u64::from(*self));
            }

            fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
                let value = read_var_uint(reader)?;
                <$impl_type>::try_from(value).map_err(|_| SerdeErr::IntegerOutOfRange {
                    value: i128::from(value),
                    type_name: stringify!($impl_type),
                })
            }

            fn byte_length(&self) -> usize {
                var_uint_size(u64::from(*self))
            }
        }
    };
}

macro_rules! impl_serde_signed {
    ($impl_type:ty) => {
        impl Serde for $impl_type {
            fn ser(&self, writer: &mut dyn ByteWrite) {
                write_var_int(writer, i64::from(*self));
            }

            fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
                let value = read_var_int(reader)?;
                <$impl_type>::try_from(value).map_err(|_| SerdeErr::IntegerOutOfRange {
                    value: i128::from(value),
                    type_name: stringify!($impl_type),
                })
            }
        }
    };
}

impl_serde_unsigned!(u16);
impl_serde_unsigned!(u32);
impl_serde_unsigned!(u64);
impl_serde_signed!(i16);
impl_serde_signed!(i32);
impl_serde_signed!(i64);

// Floats

impl Serde for f32 {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_bytes(&self.to_le_bytes());
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(f32::from_le_bytes(reader.read_array::<4>()?))
    }

    fn byte_length(&self) -> usize {
        4
    }
}

impl Serde for f64 {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_bytes(&self.to_le_bytes());
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(f64::from_le_bytes(reader.read_array::<8>()?))
    }

    fn byte_length(&self) -> usize {
        8
    }
}

// Containers

impl Serde for String {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        write_var_uint(writer, self.len() as u64);
        writer.write_bytes(self.as_bytes());
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let length = read_var_usize(reader)?;
        let bytes = reader.read_bytes(length)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| SerdeErr::InvalidUtf8)
    }
}

impl<T: Serde> Serde for Option<T> {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        match self {
            Some(value) => {
                true.ser(writer);
                value.ser(writer);
            }
            None => false.ser(writer),
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        if bool::de(reader)? {
            Ok(Some(T::de(reader)?))
        } else {
            Ok(None)
        }
    }
}

impl<T: Serde> Serde for Vec<T> {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        write_var_uint(writer, self.len() as u64);
        for item in self {
            item.ser(writer);
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let length = read_var_usize(reader)?;
        // every item takes at least one byte, don't trust the prefix beyond that
        let mut output = Vec::with_capacity(length.min(reader.remaining()));
        for _ in 0..length {
            output.push(T::de(reader)?);
        }
        Ok(output)
    }
}

impl<A: Serde, B: Serde> Serde for (A, B) {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.0.ser(writer);
        self.1.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok((A::de(reader)?, B::de(reader)?))
    }
}

// Math types

impl Serde for Vec3 {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.x.ser(writer);
        self.y.ser(writer);
        self.z.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Vec3::new(f32::de(reader)?, f32::de(reader)?, f32::de(reader)?))
    }

    fn byte_length(&self) -> usize {
        12
    }
}

/// Full precision quaternion. Use the smallest-three compression in
/// `tidal-shared` for rotations that are sent every tick.
impl Serde for Quat {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.x.ser(writer);
        self.y.ser(writer);
        self.z.ser(writer);
        self.w.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Quat::from_xyzw(
            f32::de(reader)?,
            f32::de(reader)?,
            f32::de(reader)?,
            f32::de(reader)?,
        ))
    }

    fn byte_length(&self) -> usize {
        16
    }
}
