use thiserror::Error;

use crate::FieldEncoding;

/// Errors returned by the primitive field codec.
///
/// # Examples
/// ```
/// use frutool_core::field::FieldError;
///
/// let err = FieldError::FieldTooLong { length: 64 };
/// assert!(err.to_string().contains("field too long"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("truncated field data: need {needed} bytes, got {actual}")]
    TruncatedData { needed: usize, actual: usize },
    #[error("field too long: {length} bytes (max 63)")]
    FieldTooLong { length: usize },
    #[error("unsupported encoding: {encoding} fields can be decoded but not encoded")]
    UnsupportedEncoding { encoding: FieldEncoding },
    #[error("invalid hex value: {value:?}")]
    InvalidHex { value: String },
    #[error("invalid BCD-plus symbol: {symbol:?}")]
    InvalidBcdPlusSymbol { symbol: char },
    #[error("invalid BCD-plus nibble: 0x{nibble:x}")]
    InvalidBcdPlusNibble { nibble: u8 },
    #[error("BCD-plus value must have an even number of symbols, got {length}")]
    OddBcdPlusLength { length: usize },
    #[error("character {character:?} is outside Latin-1")]
    UnencodableText { character: char },
    #[error("one-byte text fields collide with the end-of-fields marker 0xC1")]
    ReservedTypeLength,
}
