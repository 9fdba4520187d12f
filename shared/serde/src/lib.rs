//! # Tidal Serde
//! Byte-level serialization primitives shared by every tidal crate.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod byte_reader;
mod byte_writer;
mod error;
mod impls;
mod integer;
mod number;
mod serde;

pub use byte_reader::ByteReader;
pub use byte_writer::{ByteCounter, ByteWrite, ByteWriter};
pub use error::SerdeErr;
pub use integer::{
    read_var_int, read_var_uint, read_var_usize, var_uint_size, write_var_int, write_var_uint,
    write_var_usize, zigzag_decode, zigzag_encode, VarInt, VarUint, MAX_VAR_UINT_BYTES,
};
pub use number::{
    scale_from_i32, scale_from_i64, scale_i64_to_vec3, scale_to_i32, scale_to_i64,
    scale_vec3_to_i64, Scaled, ScalingError,
};
pub use serde::Serde;
