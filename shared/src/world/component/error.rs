use thiserror::Error;

use tidal_serde::SerdeErr;

/// Errors raised by tracked members (properties and collections)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// Attempted to mutate a member on the side that doesn't own it
    #[error("State violation: {member_type} is read-only on this side and should never {operation}")]
    StateViolation {
        member_type: &'static str,
        operation: &'static str,
    },

    /// A list operation referenced an index outside of the list
    #[error("Index {index} out of bounds for list of length {length}")]
    IndexOutOfBounds { index: usize, length: usize },

    /// A map operation referenced a key that isn't present
    #[error("Key not present in map, cannot {operation}")]
    KeyNotFound { operation: &'static str },

    /// A change log entry had an unknown operation tag
    #[error("Unknown collection operation tag {tag}")]
    UnknownOperation { tag: u8 },
}

/// Errors returned by a member's own serialize / deserialize calls.
///
/// The entity serializer contains these: they are logged and the frame is
/// skipped, other members are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemberError {
    #[error("Member payload malformed: {0}")]
    Serde(#[from] SerdeErr),

    #[error(transparent)]
    Property(#[from] PropertyError),

    /// Failure raised by user-defined member logic
    #[error("Member failed: {reason}")]
    Custom { reason: String },
}

impl MemberError {
    pub fn custom(reason: impl Into<String>) -> Self {
        Self::Custom {
            reason: reason.into(),
        }
    }
}
