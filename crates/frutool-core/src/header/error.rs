use thiserror::Error;

use crate::AreaKind;

/// Errors returned by common header parsing and offset assembly.
///
/// # Examples
/// ```
/// use frutool_core::{AreaKind, HeaderError};
///
/// let err = HeaderError::MisalignedArea { area: AreaKind::Board, position: 20 };
/// assert!(err.to_string().contains("not aligned"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("image too short: need {needed} bytes, got {actual}")]
    TruncatedData { needed: usize, actual: usize },
    #[error("header checksum mismatch: stored 0x{stored:02x}, expected 0x{expected:02x}")]
    ChecksumMismatch { stored: u8, expected: u8 },
    #[error("{area} area starts at byte {position}, not aligned to 8-byte blocks")]
    MisalignedArea { area: AreaKind, position: usize },
    #[error("{area} area declares zero length")]
    EmptyArea { area: AreaKind },
    #[error("{area} area at byte {start} overlaps data ending at byte {previous_end}")]
    OverlappingArea {
        area: AreaKind,
        start: usize,
        previous_end: usize,
    },
    #[error("{area} area ends at byte {end}, past the end of a {actual}-byte image")]
    AreaOutOfBounds {
        area: AreaKind,
        end: usize,
        actual: usize,
    },
    #[error("{area} area starts at byte {position}, beyond the 8-bit block offset range")]
    OffsetOverflow { area: AreaKind, position: usize },
}
