pub const SELECTOR_SHIFT: u8 = 6;
pub const SELECTOR_MASK: u8 = 0xC0;
pub const LENGTH_MASK: u8 = 0x3F;
pub const MAX_FIELD_LEN: usize = LENGTH_MASK as usize;

pub const SELECTOR_BINARY: u8 = 0b00;
pub const SELECTOR_BCD_PLUS: u8 = 0b01;
pub const SELECTOR_SIX_BIT_ASCII: u8 = 0b10;
pub const SELECTOR_TEXT: u8 = 0b11;

/// Type/length byte for an absent field (binary, zero length).
pub const EMPTY_FIELD: u8 = 0x00;
/// Type/length byte marking the end of the field list.
pub const END_OF_FIELDS: u8 = 0xC1;

pub const BCD_PLUS_SYMBOLS: &[u8; 13] = b"0123456789 -.";

pub const SIX_BIT_UNIT_BITS: u32 = 6;
pub const SIX_BIT_UNIT_MASK: u32 = 0x3F;
pub const SIX_BIT_ASCII_OFFSET: u8 = 0x20;
