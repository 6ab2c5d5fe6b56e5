use super::error::AreaError;
use super::layout;
use crate::checksum::checksum;
use crate::field::{encode_field, layout as field_layout};
use crate::header::layout::BLOCK_SIZE;
use crate::{AreaKind, BoardArea, ChassisArea, Field, ProductArea};

/// Shared shape of the chassis, board and product areas.
pub trait InfoArea {
    const KIND: AreaKind;

    fn format_version(&self) -> u8;

    /// Manufacture timestamp, for areas that carry one.
    fn mfg_date_time(&self) -> Option<u32> {
        None
    }

    /// Bytes between the length byte and the first field.
    fn write_fixed(&self, writer: &mut AreaWriter) -> Result<(), AreaError>;

    /// Fixed field slots, in layout order.
    fn named_fields(&self) -> Vec<(&'static str, Option<&Field>)>;

    fn custom_fields(&self) -> &[Field];
}

/// Accumulates one info area and seals it with padding, length and checksum.
pub struct AreaWriter {
    bytes: Vec<u8>,
    position: usize,
}

impl AreaWriter {
    pub fn new(format_version: u8) -> Self {
        Self {
            bytes: vec![format_version & layout::FORMAT_VERSION_MASK, 0],
            position: 0,
        }
    }

    pub fn push_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn push_u24_le(&mut self, value: u32) -> Result<(), AreaError> {
        if value > layout::MAX_MFG_DATE_TIME {
            return Err(AreaError::DateTimeOutOfRange { value });
        }
        self.bytes.extend_from_slice(&value.to_le_bytes()[..3]);
        Ok(())
    }

    /// Append one field. Absent and empty values become a zero-length
    /// placeholder so later fields keep their position.
    pub fn push_field(&mut self, name: &'static str, field: Option<&Field>) -> Result<(), AreaError> {
        let position = self.position;
        self.position += 1;
        match field.filter(|f| !f.is_empty()) {
            None => self.bytes.push(field_layout::EMPTY_FIELD),
            Some(field) => {
                let encoded =
                    encode_field(&field.value, field.encoding).map_err(|error| AreaError::Field {
                        position,
                        name,
                        error,
                    })?;
                self.bytes.extend_from_slice(&encoded);
            }
        }
        Ok(())
    }

    /// Terminate the field list, pad to a whole number of blocks, fill in the
    /// length byte and append the checksum.
    pub fn finish(mut self) -> Result<Vec<u8>, AreaError> {
        self.bytes.push(field_layout::END_OF_FIELDS);
        while (self.bytes.len() + 1) % BLOCK_SIZE != 0 {
            self.bytes.push(0);
        }

        let length = self.bytes.len() + 1;
        if length > layout::MAX_AREA_LEN {
            return Err(AreaError::TooLong {
                length,
                max: layout::MAX_AREA_LEN,
            });
        }
        self.bytes[layout::LENGTH_OFFSET] = (length / BLOCK_SIZE) as u8;
        let sum = checksum(&self.bytes);
        self.bytes.push(sum);
        Ok(self.bytes)
    }
}

/// Serialize an info area: fixed bytes, named fields, non-empty custom
/// fields, then the terminator, padding and checksum.
///
/// # Errors
/// Returns `AreaError::Field` for a value its encoding cannot represent and
/// `AreaError::TooLong` when the sealed area exceeds 255 blocks.
pub fn write_info_area<A: InfoArea>(area: &A) -> Result<Vec<u8>, AreaError> {
    let mut writer = AreaWriter::new(area.format_version());
    area.write_fixed(&mut writer)?;
    for (name, field) in area.named_fields() {
        writer.push_field(name, field)?;
    }
    for field in area.custom_fields().iter().filter(|f| !f.is_empty()) {
        writer.push_field(layout::CUSTOM_FIELD_NAME, Some(field))?;
    }
    writer.finish()
}

impl InfoArea for ChassisArea {
    const KIND: AreaKind = AreaKind::Chassis;

    fn format_version(&self) -> u8 {
        self.format_version
    }

    fn write_fixed(&self, writer: &mut AreaWriter) -> Result<(), AreaError> {
        writer.push_u8(self.chassis_type);
        Ok(())
    }

    fn named_fields(&self) -> Vec<(&'static str, Option<&Field>)> {
        let [part_number, serial_number] = layout::CHASSIS_FIELD_NAMES;
        vec![
            (part_number, self.part_number.as_ref()),
            (serial_number, self.serial_number.as_ref()),
        ]
    }

    fn custom_fields(&self) -> &[Field] {
        &self.custom_fields
    }
}

impl InfoArea for BoardArea {
    const KIND: AreaKind = AreaKind::Board;

    fn format_version(&self) -> u8 {
        self.format_version
    }

    fn mfg_date_time(&self) -> Option<u32> {
        Some(self.mfg_date_time)
    }

    fn write_fixed(&self, writer: &mut AreaWriter) -> Result<(), AreaError> {
        writer.push_u8(self.language_code);
        writer.push_u24_le(self.mfg_date_time)
    }

    fn named_fields(&self) -> Vec<(&'static str, Option<&Field>)> {
        let slots = [
            self.manufacturer.as_ref(),
            self.product_name.as_ref(),
            self.serial_number.as_ref(),
            self.part_number.as_ref(),
            self.fru_file_id.as_ref(),
        ];
        layout::BOARD_FIELD_NAMES.into_iter().zip(slots).collect()
    }

    fn custom_fields(&self) -> &[Field] {
        &self.custom_fields
    }
}

impl InfoArea for ProductArea {
    const KIND: AreaKind = AreaKind::Product;

    fn format_version(&self) -> u8 {
        self.format_version
    }

    fn write_fixed(&self, writer: &mut AreaWriter) -> Result<(), AreaError> {
        writer.push_u8(self.language_code);
        Ok(())
    }

    fn named_fields(&self) -> Vec<(&'static str, Option<&Field>)> {
        let slots = [
            self.manufacturer.as_ref(),
            self.product_name.as_ref(),
            self.part_number.as_ref(),
            self.product_version.as_ref(),
            self.serial_number.as_ref(),
            self.asset_tag.as_ref(),
            self.fru_file_id.as_ref(),
        ];
        layout::PRODUCT_FIELD_NAMES.into_iter().zip(slots).collect()
    }

    fn custom_fields(&self) -> &[Field] {
        &self.custom_fields
    }
}
