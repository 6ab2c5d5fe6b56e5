use thiserror::Error;

use crate::field::FieldError;

/// Errors returned by chassis, board and product area codecs.
///
/// # Examples
/// ```
/// use frutool_core::AreaError;
/// use frutool_core::field::FieldError;
///
/// let err = AreaError::Field {
///     position: 1,
///     name: "serial_number",
///     error: FieldError::FieldTooLong { length: 70 },
/// };
/// assert!(err.to_string().contains("serial_number"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AreaError {
    #[error("area too short: need {needed} bytes, got {actual}")]
    TruncatedData { needed: usize, actual: usize },
    #[error("field {position} ({name}): {error}")]
    Field {
        position: usize,
        name: &'static str,
        error: FieldError,
    },
    #[error("area too long: {length} bytes (max {max})")]
    TooLong { length: usize, max: usize },
    #[error("manufacture date/time 0x{value:x} does not fit in 24 bits")]
    DateTimeOutOfRange { value: u32 },
}
