use thiserror::Error;

/// Errors returned by the MultiRecord area codec.
///
/// # Examples
/// ```
/// use frutool_core::MultiRecordError;
///
/// let err = MultiRecordError::MissingEndOfList { records: 2 };
/// assert!(err.to_string().contains("end-of-list"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MultiRecordError {
    #[error("record {index} truncated: need {needed} bytes, got {actual}")]
    TruncatedData {
        index: usize,
        needed: usize,
        actual: usize,
    },
    #[error("no end-of-list flag after {records} records")]
    MissingEndOfList { records: usize },
    #[error("multirecord area has no records")]
    Empty,
    #[error("record {index} payload is {length} bytes (max 255)")]
    PayloadTooLong { index: usize, length: usize },
    #[error("record {index} format version {version} does not fit in 4 bits")]
    FormatVersionTooLarge { index: usize, version: u8 },
}
