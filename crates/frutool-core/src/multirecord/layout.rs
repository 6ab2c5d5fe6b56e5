use std::ops::Range;

pub const RECORD_TYPE_OFFSET: usize = 0;
pub const VERSION_OFFSET: usize = 1;
pub const PAYLOAD_LEN_OFFSET: usize = 2;
pub const HEADER_CHECKSUM_OFFSET: usize = 3;
/// Record header including its checksum byte.
pub const HEADER_LEN: usize = 4;
pub const HEADER_RANGE: Range<usize> = 0..HEADER_LEN;
/// Header plus the trailing payload checksum.
pub const RECORD_OVERHEAD: usize = HEADER_LEN + 1;

pub const END_OF_LIST: u8 = 0x80;
pub const VERSION_MASK: u8 = 0x0F;

pub const OEM_RECORD_TYPE_MIN: u8 = 0xC0;
pub const MAX_PAYLOAD_LEN: usize = u8::MAX as usize;
