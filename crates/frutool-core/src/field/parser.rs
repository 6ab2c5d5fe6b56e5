use super::error::FieldError;
use super::layout;
use crate::{Field, FieldEncoding};

/// Decode one type/length-prefixed field starting at `cursor`.
///
/// Returns the decoded field and the cursor positioned just after its data.
/// A zero-length field decodes to an empty value of the declared encoding.
///
/// # Examples
/// ```
/// use frutool_core::FieldEncoding;
/// use frutool_core::field::decode_field;
///
/// let bytes = [0xC4, b'D', b'e', b'l', b'l', 0xC1];
/// let (field, cursor) = decode_field(&bytes, 0).unwrap();
/// assert_eq!(field.encoding, FieldEncoding::Text);
/// assert_eq!(field.value, "Dell");
/// assert_eq!(cursor, 5);
/// ```
///
/// # Errors
/// Returns `FieldError::TruncatedData` when fewer bytes remain than the
/// type/length byte declares.
pub fn decode_field(bytes: &[u8], cursor: usize) -> Result<(Field, usize), FieldError> {
    let type_length = bytes
        .get(cursor)
        .copied()
        .ok_or(FieldError::TruncatedData {
            needed: cursor + 1,
            actual: bytes.len(),
        })?;
    let encoding = FieldEncoding::from_type_length(type_length);
    let start = cursor + 1;
    let end = start + (type_length & layout::LENGTH_MASK) as usize;
    let data = bytes.get(start..end).ok_or(FieldError::TruncatedData {
        needed: end,
        actual: bytes.len(),
    })?;

    let value = match encoding {
        FieldEncoding::Binary => decode_binary(data),
        FieldEncoding::BcdPlus => decode_bcd_plus(data)?,
        FieldEncoding::SixBitAscii => decode_six_bit_ascii(data),
        FieldEncoding::Text => decode_text(data),
    };

    Ok((Field { encoding, value }, end))
}

pub fn decode_binary(data: &[u8]) -> String {
    hex::encode(data)
}

/// Unpack BCD-plus digits, high nibble first.
pub fn decode_bcd_plus(data: &[u8]) -> Result<String, FieldError> {
    let mut value = String::with_capacity(data.len() * 2);
    for byte in data {
        for nibble in [byte >> 4, byte & 0x0F] {
            let symbol = layout::BCD_PLUS_SYMBOLS
                .get(nibble as usize)
                .ok_or(FieldError::InvalidBcdPlusNibble { nibble })?;
            value.push(*symbol as char);
        }
    }
    Ok(value)
}

/// Unpack 6-bit ASCII: four characters per three bytes, least significant
/// bits first, each unit offset by 0x20.
pub fn decode_six_bit_ascii(data: &[u8]) -> String {
    let mut value = String::with_capacity(data.len() * 4 / 3);
    let mut bits = 0u32;
    let mut pending = 0u32;
    for byte in data {
        bits |= u32::from(*byte) << pending;
        pending += 8;
        while pending >= layout::SIX_BIT_UNIT_BITS {
            let unit = (bits & layout::SIX_BIT_UNIT_MASK) as u8;
            value.push(char::from(unit + layout::SIX_BIT_ASCII_OFFSET));
            bits >>= layout::SIX_BIT_UNIT_BITS;
            pending -= layout::SIX_BIT_UNIT_BITS;
        }
    }
    value
}

/// Decode type `11` text. Bytes pass through as Latin-1 whatever the area
/// language code says, so any byte string decodes.
pub fn decode_text(data: &[u8]) -> String {
    data.iter().map(|b| char::from(*b)).collect()
}
