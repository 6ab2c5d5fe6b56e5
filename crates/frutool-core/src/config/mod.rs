//! TOML configuration layer.
//!
//! `parse_config` turns a TOML document into a `Record` plus encoder
//! options; `render_config` goes the other way so a decoded image can be
//! edited and encoded again. Only sections whose `include_*` flag is set in
//! `[common]` become areas.

pub mod datetime;
pub mod document;
mod error;

use crate::image::EncodeOptions;
use crate::{BoardArea, ChassisArea, Field, MultiRecord, MultiRecordArea, ProductArea, Record};

use datetime::{format_mfg_date_time, parse_mfg_date_time};
use document::{
    BoardSection, ChassisSection, CommonSection, DateTimeValue, Document, FieldValue,
    MultiRecordSection, ProductSection, RecordData, RecordEntry,
};

pub use error::ConfigError;

const OEM_MANUFACTURER_ID_MAX: u32 = 0x00FF_FFFF;

const HEADER: &str = "\
# -------------------------------------------------------------------
# Generated by frutool
#
# Field values are plain strings, written as Latin-1 text, or tables
# that name an encoding explicitly:
#
#     part_number = { encoding = \"bcd-plus\", value = \"0123-456\" }
#
# Encodings: \"text\", \"binary\" (hex), \"bcd-plus\", \"six-bit-ascii\".
# An empty string leaves the field absent.
#
# mfg_date_time uses \"YYYY-MM-DD HH:MM\" (1996-01-01 00:00 to
# 2027-11-24 20:15), or 0 for the start of that range.
#
# A section is written to the FRU file only when its include_* flag
# in [common] is true.
# -------------------------------------------------------------------

";

/// A record loaded from TOML, with the settings that travel with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FruConfig {
    pub record: Record,
    /// Total image size requested by `[common] size`.
    pub image_size: Option<usize>,
}

impl FruConfig {
    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            image_size: self.image_size,
        }
    }
}

/// Parse a TOML document into a record.
///
/// # Examples
/// ```
/// use frutool_core::parse_config;
///
/// let config = parse_config(
///     r#"
///     [common]
///     include_board = true
///
///     [board]
///     mfg_date_time = "1996-01-02 01:01"
///     manufacturer = "Dell"
///     part_number = { encoding = "bcd-plus", value = "0123" }
///
///     [product]
///     manufacturer = "ignored: include_product is not set"
///     "#,
/// )?;
/// let board = config.record.board.as_ref().unwrap();
/// assert_eq!(board.mfg_date_time, 1501);
/// assert_eq!(board.manufacturer.as_ref().unwrap().value, "Dell");
/// assert!(config.record.product.is_none());
/// # Ok::<(), frutool_core::ConfigError>(())
/// ```
///
/// # Errors
/// Returns `ConfigError::Parse` for malformed TOML or mistyped values,
/// `ConfigError::DateTime` for an unusable `mfg_date_time` and
/// `ConfigError::InvalidValue` for out-of-range MultiRecord settings.
pub fn parse_config(text: &str) -> Result<FruConfig, ConfigError> {
    let document: Document = toml::from_str(text)?;
    let common = &document.common;

    let mut record = Record {
        format_version: common.format_version,
        ..Record::default()
    };
    if common.include_chassis {
        record.chassis = Some(chassis_area(document.chassis.unwrap_or_default()));
    }
    if common.include_board {
        record.board = Some(board_area(document.board.unwrap_or_default())?);
    }
    if common.include_product {
        record.product = Some(product_area(document.product.unwrap_or_default()));
    }
    if common.include_multirecord {
        record.multirecord = Some(multirecord_area(document.multirecord.unwrap_or_default())?);
    }

    Ok(FruConfig {
        record,
        image_size: Some(common.size).filter(|size| *size != 0),
    })
}

/// Render a record as a commented TOML document that `parse_config` loads
/// back to the same record. Decode warnings are not carried over.
pub fn render_config(record: &Record, image_size: Option<usize>) -> Result<String, ConfigError> {
    let document = Document {
        common: CommonSection {
            format_version: record.format_version,
            size: image_size.unwrap_or(0),
            include_board: record.board.is_some(),
            include_chassis: record.chassis.is_some(),
            include_product: record.product.is_some(),
            include_internal: false,
            include_multirecord: record.multirecord.is_some(),
        },
        board: record.board.as_ref().map(board_section).transpose()?,
        chassis: record.chassis.as_ref().map(chassis_section),
        product: record.product.as_ref().map(product_section),
        multirecord: record.multirecord.as_ref().map(multirecord_section),
    };
    Ok(format!("{HEADER}{}", toml::to_string_pretty(&document)?))
}

/// A blank template with every section present and nothing included.
pub fn sample_config() -> Result<String, ConfigError> {
    let document = Document {
        common: CommonSection::default(),
        board: Some(BoardSection::default()),
        chassis: Some(ChassisSection::default()),
        product: Some(ProductSection::default()),
        multirecord: Some(MultiRecordSection::default()),
    };
    Ok(format!("{HEADER}{}", toml::to_string_pretty(&document)?))
}

fn fields(values: &[FieldValue]) -> Vec<Field> {
    values.iter().filter_map(FieldValue::to_field).collect()
}

fn values(fields: &[Field]) -> Vec<FieldValue> {
    fields
        .iter()
        .map(|field| FieldValue::from_field(Some(field)))
        .collect()
}

fn chassis_area(section: ChassisSection) -> ChassisArea {
    ChassisArea {
        format_version: section.format_version,
        chassis_type: section.chassis_type,
        part_number: section.part_number.to_field(),
        serial_number: section.serial_number.to_field(),
        custom_fields: fields(&section.custom_fields),
        warnings: Vec::new(),
    }
}

fn chassis_section(area: &ChassisArea) -> ChassisSection {
    ChassisSection {
        format_version: area.format_version,
        chassis_type: area.chassis_type,
        part_number: FieldValue::from_field(area.part_number.as_ref()),
        serial_number: FieldValue::from_field(area.serial_number.as_ref()),
        custom_fields: values(&area.custom_fields),
    }
}

fn board_area(section: BoardSection) -> Result<BoardArea, ConfigError> {
    let mfg_date_time = match &section.mfg_date_time {
        DateTimeValue::Minutes(0) => 0,
        DateTimeValue::Stamp(stamp) if stamp.is_empty() => 0,
        DateTimeValue::Stamp(stamp) => parse_mfg_date_time(stamp)?,
        DateTimeValue::Minutes(_) => {
            return Err(ConfigError::InvalidValue {
                section: "board".to_string(),
                key: "mfg_date_time".to_string(),
                message: "must be a \"YYYY-MM-DD HH:MM\" string or 0".to_string(),
            });
        }
    };

    Ok(BoardArea {
        format_version: section.format_version,
        language_code: section.language_code,
        mfg_date_time,
        manufacturer: section.manufacturer.to_field(),
        product_name: section.product_name.to_field(),
        serial_number: section.serial_number.to_field(),
        part_number: section.part_number.to_field(),
        fru_file_id: section.fru_file_id.to_field(),
        custom_fields: fields(&section.custom_fields),
        warnings: Vec::new(),
    })
}

fn board_section(area: &BoardArea) -> Result<BoardSection, ConfigError> {
    Ok(BoardSection {
        format_version: area.format_version,
        language_code: area.language_code,
        mfg_date_time: DateTimeValue::Stamp(format_mfg_date_time(area.mfg_date_time)?),
        manufacturer: FieldValue::from_field(area.manufacturer.as_ref()),
        product_name: FieldValue::from_field(area.product_name.as_ref()),
        serial_number: FieldValue::from_field(area.serial_number.as_ref()),
        part_number: FieldValue::from_field(area.part_number.as_ref()),
        fru_file_id: FieldValue::from_field(area.fru_file_id.as_ref()),
        custom_fields: values(&area.custom_fields),
    })
}

fn product_area(section: ProductSection) -> ProductArea {
    ProductArea {
        format_version: section.format_version,
        language_code: section.language_code,
        manufacturer: section.manufacturer.to_field(),
        product_name: section.product_name.to_field(),
        part_number: section.part_number.to_field(),
        product_version: section.product_version.to_field(),
        serial_number: section.serial_number.to_field(),
        asset_tag: section.asset_tag.to_field(),
        fru_file_id: section.fru_file_id.to_field(),
        custom_fields: fields(&section.custom_fields),
        warnings: Vec::new(),
    }
}

fn product_section(area: &ProductArea) -> ProductSection {
    ProductSection {
        format_version: area.format_version,
        language_code: area.language_code,
        manufacturer: FieldValue::from_field(area.manufacturer.as_ref()),
        product_name: FieldValue::from_field(area.product_name.as_ref()),
        part_number: FieldValue::from_field(area.part_number.as_ref()),
        product_version: FieldValue::from_field(area.product_version.as_ref()),
        serial_number: FieldValue::from_field(area.serial_number.as_ref()),
        asset_tag: FieldValue::from_field(area.asset_tag.as_ref()),
        fru_file_id: FieldValue::from_field(area.fru_file_id.as_ref()),
        custom_fields: values(&area.custom_fields),
    }
}

fn multirecord_area(section: MultiRecordSection) -> Result<MultiRecordArea, ConfigError> {
    let invalid = |index: usize, key: &str, message: String| ConfigError::InvalidValue {
        section: "multirecord".to_string(),
        key: format!("records[{index}].{key}"),
        message,
    };

    let mut records = Vec::with_capacity(section.records.len());
    for (index, entry) in section.records.into_iter().enumerate() {
        let data = match entry.data {
            RecordData::Bytes(bytes) => bytes,
            RecordData::Hex(text) => hex::decode(text.trim())
                .map_err(|err| invalid(index, "data", format!("invalid hex string: {err}")))?,
        };
        let payload = match entry.manufacturer_id {
            Some(id) if id > OEM_MANUFACTURER_ID_MAX => {
                return Err(invalid(
                    index,
                    "manufacturer_id",
                    format!("0x{id:x} does not fit in 3 bytes"),
                ));
            }
            Some(id) => MultiRecord::oem(entry.record_type, id, &data).payload,
            None => data,
        };
        records.push(MultiRecord {
            record_type: entry.record_type,
            format_version: entry.format_version,
            payload,
        });
    }

    Ok(MultiRecordArea {
        records,
        warnings: Vec::new(),
    })
}

fn multirecord_section(area: &MultiRecordArea) -> MultiRecordSection {
    let records = area
        .records
        .iter()
        .map(|record| {
            let manufacturer_id = record.manufacturer_id();
            let data = match manufacturer_id {
                Some(_) => &record.payload[3..],
                None => &record.payload[..],
            };
            RecordEntry {
                record_type: record.record_type,
                format_version: record.format_version,
                manufacturer_id,
                data: RecordData::Hex(hex::encode(data)),
            }
        })
        .collect();
    MultiRecordSection { records }
}
