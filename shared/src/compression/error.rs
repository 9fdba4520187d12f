use thiserror::Error;

use tidal_serde::SerdeErr;

/// Errors that can occur while delta-compressing byte blocks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeltaError {
    /// The value and its baseline must be the same size
    #[error("Delta block length mismatch: value has {value} byte(s), baseline has {baseline}")]
    LengthMismatch { value: usize, baseline: usize },

    /// The compressed block could not be read
    #[error("Malformed delta block: {0}")]
    Serde(#[from] SerdeErr),
}

/// Rotations that cannot be packed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuaternionError {
    /// A component is NaN or infinite
    #[error("Cannot compress a quaternion with non-finite components")]
    NonFinite,

    /// All components are (close to) zero, there is no rotation to normalize
    #[error("Cannot compress a zero-length quaternion")]
    ZeroLength,
}
