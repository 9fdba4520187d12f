//! Stateless transforms that shrink values before they hit the wire.
//!
//! Variable-length integers and fixed-point scaling live in `tidal-serde` and
//! are re-exported here so every codec is reachable from one place.

mod delta;
mod error;
mod quaternion;

pub use delta::{compress_delta, compress_var_delta, decompress_delta, decompress_var_delta};
pub use error::{DeltaError, QuaternionError};
pub use quaternion::{
    compress_quaternion, decompress_quaternion, try_compress_quaternion, CompressedQuat,
    QUATERNION_BITS_PER_COMPONENT, QUATERNION_RANGE,
};
pub use tidal_serde::{
    read_var_int, read_var_uint, scale_from_i32, scale_from_i64, scale_i64_to_vec3,
    scale_to_i32, scale_to_i64, scale_vec3_to_i64, write_var_int, write_var_uint, Scaled,
    ScalingError,
};
