use super::error::AreaError;
use super::layout;
use crate::checksum::checksum_mismatch;
use crate::field::{decode_field, layout as field_layout};
use crate::{AreaWarning, Field};

/// Fields of one area: the fixed slots in layout order, then any custom
/// fields that follow them.
#[derive(Debug, Default)]
pub struct AreaFields {
    pub named: Vec<Option<Field>>,
    pub custom: Vec<Field>,
}

pub struct AreaReader<'a> {
    area: &'a [u8],
}

impl<'a> AreaReader<'a> {
    pub fn new(area: &'a [u8]) -> Self {
        Self { area }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), AreaError> {
        if self.area.len() < needed {
            return Err(AreaError::TruncatedData {
                needed,
                actual: self.area.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, AreaError> {
        self.area
            .get(offset)
            .copied()
            .ok_or(AreaError::TruncatedData {
                needed: offset + 1,
                actual: self.area.len(),
            })
    }

    pub fn read_u24_le(&self, range: std::ops::Range<usize>) -> Result<u32, AreaError> {
        match self.area.get(range.clone()) {
            Some([b0, b1, b2]) => Ok(u32::from_le_bytes([*b0, *b1, *b2, 0])),
            _ => Err(AreaError::TruncatedData {
                needed: range.end,
                actual: self.area.len(),
            }),
        }
    }

    pub fn read_format_version(&self) -> Result<u8, AreaError> {
        Ok(self.read_u8(layout::FORMAT_VERSION_OFFSET)? & layout::FORMAT_VERSION_MASK)
    }

    /// Decode fields from `start` until the end-of-fields marker or the
    /// checksum byte, whichever comes first.
    ///
    /// Zero-length fields fill their fixed slot with `None`; zero-length
    /// custom fields are dropped.
    pub fn read_fields(
        &self,
        start: usize,
        names: &[&'static str],
    ) -> Result<AreaFields, AreaError> {
        let data = self.area.split_last().map(|(_, data)| data).unwrap_or(&[]);
        let mut fields = AreaFields::default();
        let mut cursor = start;
        let mut position = 0;

        while cursor < data.len() && data[cursor] != field_layout::END_OF_FIELDS {
            let name = names
                .get(position)
                .copied()
                .unwrap_or(layout::CUSTOM_FIELD_NAME);
            let (field, next) = decode_field(data, cursor).map_err(|error| AreaError::Field {
                position,
                name,
                error,
            })?;
            if position < names.len() {
                fields.named.push(Some(field).filter(|f| !f.is_empty()));
            } else if !field.is_empty() {
                fields.custom.push(field);
            }
            cursor = next;
            position += 1;
        }

        fields.named.resize(names.len(), None);
        Ok(fields)
    }

    pub fn checksum_warnings(&self) -> Vec<AreaWarning> {
        checksum_mismatch(self.area)
            .map(|(stored, expected)| AreaWarning::ChecksumMismatch { stored, expected })
            .into_iter()
            .collect()
    }
}
