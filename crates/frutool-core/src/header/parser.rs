use std::ops::Range;

use tracing::{debug, warn};

use super::error::HeaderError;
use super::layout;
use super::{AreaTable, CommonHeader, OffsetTable};
use crate::AreaKind;
use crate::checksum::checksum_mismatch;

/// Read and verify the 8-byte common header.
///
/// The checksum is checked before anything else: a corrupt header makes
/// every offset unreliable.
pub fn parse_common_header(bytes: &[u8]) -> Result<CommonHeader, HeaderError> {
    let header = bytes
        .get(..layout::HEADER_LEN)
        .ok_or(HeaderError::TruncatedData {
            needed: layout::HEADER_LEN,
            actual: bytes.len(),
        })?;
    if let Some((stored, expected)) = checksum_mismatch(header) {
        return Err(HeaderError::ChecksumMismatch { stored, expected });
    }

    let mut offsets = OffsetTable {
        internal_use: header[layout::INTERNAL_USE_OFFSET],
        ..OffsetTable::default()
    };
    for kind in AreaKind::ALL {
        offsets[kind] = header[layout::offset_byte(kind)];
    }

    Ok(CommonHeader {
        format_version: header[layout::FORMAT_VERSION_OFFSET] & layout::FORMAT_VERSION_MASK,
        offsets,
    })
}

/// Resolve each present area to its byte range in `bytes`.
///
/// Info areas end where their length byte says; the MultiRecord area runs
/// to the end of the image. Present areas must appear in `AreaKind::ALL`
/// order without overlapping.
pub fn locate_areas(
    bytes: &[u8],
    header: &CommonHeader,
) -> Result<AreaTable<Range<usize>>, HeaderError> {
    if header.offsets.internal_use != 0 {
        warn!(
            offset = header.offsets.internal_use,
            "internal use area is not supported; skipping"
        );
    }

    let mut spans = AreaTable::new();
    let mut previous_end = layout::HEADER_LEN;
    for kind in AreaKind::ALL {
        let blocks = header.offsets[kind] as usize;
        if blocks == 0 {
            continue;
        }

        let start = blocks * layout::BLOCK_SIZE;
        if start < previous_end {
            return Err(HeaderError::OverlappingArea {
                area: kind,
                start,
                previous_end,
            });
        }

        let end = match kind {
            AreaKind::MultiRecord => bytes.len(),
            _ => {
                let length = bytes
                    .get(start + 1)
                    .copied()
                    .ok_or(HeaderError::AreaOutOfBounds {
                        area: kind,
                        end: start + 2,
                        actual: bytes.len(),
                    })?;
                if length == 0 {
                    return Err(HeaderError::EmptyArea { area: kind });
                }
                start + length as usize * layout::BLOCK_SIZE
            }
        };
        if start >= bytes.len() || end > bytes.len() {
            return Err(HeaderError::AreaOutOfBounds {
                area: kind,
                end: end.max(start + 1),
                actual: bytes.len(),
            });
        }

        debug!(area = %kind, start, end, "located area");
        spans[kind] = Some(start..end);
        previous_end = end;
    }

    Ok(spans)
}

#[cfg(test)]
mod tests {
    use super::{locate_areas, parse_common_header};
    use crate::AreaKind;
    use crate::header::{HeaderError, OffsetTable, writer::build_header};

    fn image_with(offsets: OffsetTable, len: usize) -> Vec<u8> {
        let mut image = vec![0u8; len];
        image[..8].copy_from_slice(&build_header(1, &offsets));
        image
    }

    #[test]
    fn parse_header_reads_offsets() {
        let mut offsets = OffsetTable::default();
        offsets[AreaKind::Board] = 1;
        offsets[AreaKind::Product] = 3;
        let image = image_with(offsets, 8);

        let header = parse_common_header(&image).unwrap();
        assert_eq!(header.format_version, 1);
        assert_eq!(header.offsets[AreaKind::Chassis], 0);
        assert_eq!(header.offsets[AreaKind::Board], 1);
        assert_eq!(header.offsets[AreaKind::Product], 3);
    }

    #[test]
    fn parse_header_rejects_bad_checksum() {
        let image = [0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let err = parse_common_header(&image).unwrap_err();
        assert_eq!(
            err,
            HeaderError::ChecksumMismatch {
                stored: 0x00,
                expected: 0xFF
            }
        );
    }

    #[test]
    fn parse_header_short_image() {
        let err = parse_common_header(&[0x01, 0x00]).unwrap_err();
        assert!(matches!(err, HeaderError::TruncatedData { needed: 8, actual: 2 }));
    }

    #[test]
    fn locate_uses_area_length_byte() {
        let mut offsets = OffsetTable::default();
        offsets[AreaKind::Chassis] = 1;
        offsets[AreaKind::MultiRecord] = 3;
        let mut image = image_with(offsets, 40);
        image[9] = 2;

        let header = parse_common_header(&image).unwrap();
        let spans = locate_areas(&image, &header).unwrap();
        assert_eq!(spans[AreaKind::Chassis], Some(8..24));
        assert_eq!(spans[AreaKind::Board], None);
        assert_eq!(spans[AreaKind::MultiRecord], Some(24..40));
    }

    #[test]
    fn locate_rejects_overlap() {
        let mut offsets = OffsetTable::default();
        offsets[AreaKind::Chassis] = 1;
        offsets[AreaKind::Board] = 2;
        let mut image = image_with(offsets, 40);
        image[9] = 2;
        image[17] = 1;

        let header = parse_common_header(&image).unwrap();
        let err = locate_areas(&image, &header).unwrap_err();
        assert_eq!(
            err,
            HeaderError::OverlappingArea {
                area: AreaKind::Board,
                start: 16,
                previous_end: 24
            }
        );
    }

    #[test]
    fn locate_rejects_decreasing_offsets() {
        let mut offsets = OffsetTable::default();
        offsets[AreaKind::Board] = 3;
        offsets[AreaKind::Product] = 1;
        let mut image = image_with(offsets, 40);
        image[9] = 1;
        image[25] = 1;

        let header = parse_common_header(&image).unwrap();
        let err = locate_areas(&image, &header).unwrap_err();
        assert!(matches!(
            err,
            HeaderError::OverlappingArea {
                area: AreaKind::Product,
                ..
            }
        ));
    }

    #[test]
    fn locate_rejects_zero_length_and_out_of_bounds() {
        let mut offsets = OffsetTable::default();
        offsets[AreaKind::Product] = 1;
        let image = image_with(offsets, 16);
        let header = parse_common_header(&image).unwrap();
        let err = locate_areas(&image, &header).unwrap_err();
        assert_eq!(
            err,
            HeaderError::EmptyArea {
                area: AreaKind::Product
            }
        );

        let mut image = image_with(offsets, 16);
        image[9] = 4;
        let err = locate_areas(&image, &header).unwrap_err();
        assert_eq!(
            err,
            HeaderError::AreaOutOfBounds {
                area: AreaKind::Product,
                end: 40,
                actual: 16
            }
        );
    }
}
