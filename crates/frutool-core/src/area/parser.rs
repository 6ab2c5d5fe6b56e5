use super::error::AreaError;
use super::layout;
use super::reader::{AreaFields, AreaReader};
use crate::{BoardArea, ChassisArea, Field, ProductArea};

/// Parse a chassis info area.
///
/// `area` is the full area slice located through the header, checksum byte
/// included. A checksum mismatch is reported in `warnings`, not as an error.
///
/// # Errors
/// Returns `AreaError::TruncatedData` when the fixed bytes are missing and
/// `AreaError::Field` when a field cannot be decoded.
pub fn parse_chassis_area(area: &[u8]) -> Result<ChassisArea, AreaError> {
    let reader = AreaReader::new(area);
    reader.require_len(layout::CHASSIS_FIELDS_OFFSET)?;

    let format_version = reader.read_format_version()?;
    let chassis_type = reader.read_u8(layout::CHASSIS_TYPE_OFFSET)?;
    let AreaFields { named, custom } =
        reader.read_fields(layout::CHASSIS_FIELDS_OFFSET, &layout::CHASSIS_FIELD_NAMES)?;
    let [part_number, serial_number] = take_named(named);

    Ok(ChassisArea {
        format_version,
        chassis_type,
        part_number,
        serial_number,
        custom_fields: custom,
        warnings: reader.checksum_warnings(),
    })
}

/// Parse a board info area.
///
/// The language code is kept as read; text fields are Latin-1 regardless.
pub fn parse_board_area(area: &[u8]) -> Result<BoardArea, AreaError> {
    let reader = AreaReader::new(area);
    reader.require_len(layout::BOARD_FIELDS_OFFSET)?;

    let format_version = reader.read_format_version()?;
    let language_code = reader.read_u8(layout::BOARD_LANGUAGE_OFFSET)?;
    let mfg_date_time = reader.read_u24_le(layout::BOARD_MFG_DATE_TIME_RANGE)?;
    let AreaFields { named, custom } =
        reader.read_fields(layout::BOARD_FIELDS_OFFSET, &layout::BOARD_FIELD_NAMES)?;
    let [manufacturer, product_name, serial_number, part_number, fru_file_id] = take_named(named);

    Ok(BoardArea {
        format_version,
        language_code,
        mfg_date_time,
        manufacturer,
        product_name,
        serial_number,
        part_number,
        fru_file_id,
        custom_fields: custom,
        warnings: reader.checksum_warnings(),
    })
}

pub fn parse_product_area(area: &[u8]) -> Result<ProductArea, AreaError> {
    let reader = AreaReader::new(area);
    reader.require_len(layout::PRODUCT_FIELDS_OFFSET)?;

    let format_version = reader.read_format_version()?;
    let language_code = reader.read_u8(layout::PRODUCT_LANGUAGE_OFFSET)?;
    let AreaFields { named, custom } =
        reader.read_fields(layout::PRODUCT_FIELDS_OFFSET, &layout::PRODUCT_FIELD_NAMES)?;
    let [
        manufacturer,
        product_name,
        part_number,
        product_version,
        serial_number,
        asset_tag,
        fru_file_id,
    ] = take_named(named);

    Ok(ProductArea {
        format_version,
        language_code,
        manufacturer,
        product_name,
        part_number,
        product_version,
        serial_number,
        asset_tag,
        fru_file_id,
        custom_fields: custom,
        warnings: reader.checksum_warnings(),
    })
}

// `read_fields` always yields exactly one slot per name.
fn take_named<const N: usize>(named: Vec<Option<Field>>) -> [Option<Field>; N] {
    let mut slots = named.into_iter();
    std::array::from_fn(|_| slots.next().flatten())
}
