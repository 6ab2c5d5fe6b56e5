use super::error::FieldError;
use super::layout;
use crate::FieldEncoding;

/// Encode a value as `[type_length, data...]`.
///
/// # Examples
/// ```
/// use frutool_core::FieldEncoding;
/// use frutool_core::field::encode_field;
///
/// let bytes = encode_field("Dell", FieldEncoding::Text).unwrap();
/// assert_eq!(bytes, [0xC4, b'D', b'e', b'l', b'l']);
/// ```
///
/// # Errors
/// - `FieldError::FieldTooLong` when the encoded data exceeds 63 bytes.
/// - `FieldError::UnsupportedEncoding` for 6-bit packed ASCII.
/// - Value errors for input the chosen encoding cannot represent.
pub fn encode_field(value: &str, encoding: FieldEncoding) -> Result<Vec<u8>, FieldError> {
    let data = match encoding {
        FieldEncoding::Binary => encode_binary(value)?,
        FieldEncoding::BcdPlus => encode_bcd_plus(value)?,
        FieldEncoding::SixBitAscii => return Err(FieldError::UnsupportedEncoding { encoding }),
        FieldEncoding::Text => encode_text(value)?,
    };
    if data.len() > layout::MAX_FIELD_LEN {
        return Err(FieldError::FieldTooLong { length: data.len() });
    }

    let type_length = (encoding.selector() << layout::SELECTOR_SHIFT) | data.len() as u8;
    if type_length == layout::END_OF_FIELDS {
        return Err(FieldError::ReservedTypeLength);
    }

    let mut out = Vec::with_capacity(data.len() + 1);
    out.push(type_length);
    out.extend_from_slice(&data);
    Ok(out)
}

pub fn encode_binary(value: &str) -> Result<Vec<u8>, FieldError> {
    hex::decode(value).map_err(|_| FieldError::InvalidHex {
        value: value.to_string(),
    })
}

/// Pack BCD-plus symbols two per byte, high nibble first.
pub fn encode_bcd_plus(value: &str) -> Result<Vec<u8>, FieldError> {
    let nibbles = value
        .chars()
        .map(|symbol| {
            u8::try_from(symbol)
                .ok()
                .and_then(|byte| layout::BCD_PLUS_SYMBOLS.iter().position(|s| *s == byte))
                .map(|nibble| nibble as u8)
                .ok_or(FieldError::InvalidBcdPlusSymbol { symbol })
        })
        .collect::<Result<Vec<u8>, _>>()?;
    if nibbles.len() % 2 != 0 {
        return Err(FieldError::OddBcdPlusLength {
            length: nibbles.len(),
        });
    }
    Ok(nibbles
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}

/// Encode type `11` text as one Latin-1 byte per character.
pub fn encode_text(value: &str) -> Result<Vec<u8>, FieldError> {
    value
        .chars()
        .map(|character| {
            u8::try_from(character).map_err(|_| FieldError::UnencodableText { character })
        })
        .collect()
}
