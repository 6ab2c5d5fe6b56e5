use crate::AreaKind;

pub const HEADER_LEN: usize = 8;
/// Offsets and area lengths are counted in blocks of this many bytes.
pub const BLOCK_SIZE: usize = 8;
pub const MAX_BLOCKS: usize = u8::MAX as usize;

pub const FORMAT_VERSION_OFFSET: usize = 0;
pub const INTERNAL_USE_OFFSET: usize = 1;
pub const CHASSIS_OFFSET: usize = 2;
pub const BOARD_OFFSET: usize = 3;
pub const PRODUCT_OFFSET: usize = 4;
pub const MULTIRECORD_OFFSET: usize = 5;
pub const RESERVED_OFFSET: usize = 6;
pub const CHECKSUM_OFFSET: usize = 7;

pub const FORMAT_VERSION_MASK: u8 = 0x0F;

/// Header byte holding the offset of `kind`.
pub const fn offset_byte(kind: AreaKind) -> usize {
    match kind {
        AreaKind::Chassis => CHASSIS_OFFSET,
        AreaKind::Board => BOARD_OFFSET,
        AreaKind::Product => PRODUCT_OFFSET,
        AreaKind::MultiRecord => MULTIRECORD_OFFSET,
    }
}
