//! Zero-sum checksums shared by the header, the info areas and MultiRecord
//! sub-records.

/// Return the byte that makes `bytes` plus itself sum to zero modulo 256.
///
/// # Examples
/// ```
/// use frutool_core::checksum::checksum;
///
/// assert_eq!(checksum(&[0x01, 0x00, 0x01]), 0xFE);
/// assert_eq!(checksum(&[]), 0x00);
/// ```
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes
        .iter()
        .fold(0u8, |sum, byte| sum.wrapping_add(*byte))
        .wrapping_neg()
}

/// Check a block whose last byte is its checksum.
///
/// # Examples
/// ```
/// use frutool_core::checksum::verify_checksum;
///
/// assert!(verify_checksum(&[0x01, 0x00, 0x01, 0xFE]));
/// assert!(!verify_checksum(&[0x01, 0x00, 0x01, 0xFF]));
/// ```
pub fn verify_checksum(bytes_including_checksum: &[u8]) -> bool {
    bytes_including_checksum
        .iter()
        .fold(0u8, |sum, byte| sum.wrapping_add(*byte))
        == 0
}

/// Split a block into its data and trailing checksum, returning the stored
/// and expected values when they differ.
pub(crate) fn checksum_mismatch(bytes_including_checksum: &[u8]) -> Option<(u8, u8)> {
    let (stored, data) = bytes_including_checksum.split_last()?;
    let expected = checksum(data);
    if *stored == expected {
        None
    } else {
        Some((*stored, expected))
    }
}
