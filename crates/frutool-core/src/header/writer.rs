use super::error::HeaderError;
use super::layout;
use super::{AreaTable, OffsetTable};
use crate::AreaKind;
use crate::checksum::checksum;

/// Build the 8-byte common header for the given offsets.
pub fn build_header(format_version: u8, offsets: &OffsetTable) -> [u8; layout::HEADER_LEN] {
    let mut header = [0u8; layout::HEADER_LEN];
    header[layout::FORMAT_VERSION_OFFSET] = format_version & layout::FORMAT_VERSION_MASK;
    header[layout::INTERNAL_USE_OFFSET] = offsets.internal_use;
    for kind in AreaKind::ALL {
        header[layout::offset_byte(kind)] = offsets[kind];
    }
    header[layout::CHECKSUM_OFFSET] = checksum(&header[..layout::CHECKSUM_OFFSET]);
    header
}

/// Place serialized areas after the header, in fixed area order, and
/// return the complete image.
///
/// Each offset is the running byte position divided by 8. Area writers pad
/// to 8-byte blocks; a misaligned position here means an area broke that
/// contract.
pub fn assemble_image(
    format_version: u8,
    areas: &AreaTable<Vec<u8>>,
) -> Result<Vec<u8>, HeaderError> {
    let mut offsets = OffsetTable::default();
    let mut position = layout::HEADER_LEN;
    for (kind, bytes) in areas.iter() {
        if position % layout::BLOCK_SIZE != 0 {
            return Err(HeaderError::MisalignedArea {
                area: kind,
                position,
            });
        }
        let blocks = position / layout::BLOCK_SIZE;
        if blocks > layout::MAX_BLOCKS {
            return Err(HeaderError::OffsetOverflow {
                area: kind,
                position,
            });
        }
        offsets[kind] = blocks as u8;
        position += bytes.len();
    }

    let mut image = Vec::with_capacity(position);
    image.extend_from_slice(&build_header(format_version, &offsets));
    for (_, bytes) in areas.iter() {
        image.extend_from_slice(bytes);
    }
    Ok(image)
}
