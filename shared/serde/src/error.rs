use thiserror::Error;

/// Errors raised while decoding values from a byte stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The stream ended before the value could be read
    #[error("Unexpected end of stream at byte {position}: needed {needed} more byte(s)")]
    Eof { position: usize, needed: usize },

    /// A variable-length integer did not terminate within 64 bits
    #[error("Variable-length integer starting at byte {position} overflows 64 bits")]
    VarintOverflow { position: usize },

    /// A decoded integer does not fit the requested type
    #[error("Decoded value {value} does not fit in {type_name}")]
    IntegerOutOfRange { value: i128, type_name: &'static str },

    /// A bool was encoded with a byte other than 0 or 1
    #[error("Invalid bool byte {value}")]
    InvalidBool { value: u8 },

    /// A string payload was not valid UTF-8
    #[error("String payload is not valid UTF-8")]
    InvalidUtf8,

    /// A reader was asked to jump outside of its buffer
    #[error("Cannot seek to byte {position}, buffer is only {length} byte(s) long")]
    InvalidSeek { position: usize, length: usize },
}
