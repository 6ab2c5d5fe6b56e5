//! Serde shape of the TOML document.
//!
//! Every key has a default so a partial file loads; the `include_*` flags in
//! `[common]` decide which sections become areas.

use serde::{Deserialize, Serialize};

use crate::{Field, FieldEncoding, FORMAT_VERSION, MULTIRECORD_FORMAT_VERSION};

fn default_format_version() -> u8 {
    FORMAT_VERSION
}

fn default_record_format_version() -> u8 {
    MULTIRECORD_FORMAT_VERSION
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub common: CommonSection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<BoardSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chassis: Option<ChassisSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multirecord: Option<MultiRecordSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonSection {
    #[serde(default = "default_format_version")]
    pub format_version: u8,
    /// Total image size; 0 or absent means "as small as possible".
    #[serde(default)]
    pub size: usize,
    #[serde(default)]
    pub include_board: bool,
    #[serde(default)]
    pub include_chassis: bool,
    #[serde(default)]
    pub include_product: bool,
    /// Accepted for compatibility; the internal use area is never written.
    #[serde(default, skip_serializing_if = "is_false")]
    pub include_internal: bool,
    #[serde(default)]
    pub include_multirecord: bool,
}

impl Default for CommonSection {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            size: 0,
            include_board: false,
            include_chassis: false,
            include_product: false,
            include_internal: false,
            include_multirecord: false,
        }
    }
}

/// A field is either plain text or an explicit `{ encoding, value }` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Typed {
        encoding: FieldEncoding,
        value: String,
    },
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// Empty values mean "absent".
    pub fn to_field(&self) -> Option<Field> {
        let field = match self {
            FieldValue::Text(value) => Field::text(value.as_str()),
            FieldValue::Typed { encoding, value } => Field::new(*encoding, value.as_str()),
        };
        Some(field).filter(|field| !field.is_empty())
    }

    pub fn from_field(field: Option<&Field>) -> Self {
        match field {
            None => FieldValue::default(),
            Some(field) if field.encoding == FieldEncoding::Text => {
                FieldValue::Text(field.value.clone())
            }
            Some(field) => FieldValue::Typed {
                encoding: field.encoding,
                value: field.value.clone(),
            },
        }
    }
}

/// `mfg_date_time` is a `"YYYY-MM-DD HH:MM"` string, or `0` for the epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateTimeValue {
    Minutes(i64),
    Stamp(String),
}

impl Default for DateTimeValue {
    fn default() -> Self {
        DateTimeValue::Minutes(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSection {
    #[serde(default = "default_format_version")]
    pub format_version: u8,
    #[serde(default)]
    pub language_code: u8,
    #[serde(default)]
    pub mfg_date_time: DateTimeValue,
    #[serde(default)]
    pub manufacturer: FieldValue,
    #[serde(default)]
    pub product_name: FieldValue,
    #[serde(default)]
    pub serial_number: FieldValue,
    #[serde(default)]
    pub part_number: FieldValue,
    #[serde(default)]
    pub fru_file_id: FieldValue,
    #[serde(default)]
    pub custom_fields: Vec<FieldValue>,
}

impl Default for BoardSection {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            language_code: 0,
            mfg_date_time: DateTimeValue::default(),
            manufacturer: FieldValue::default(),
            product_name: FieldValue::default(),
            serial_number: FieldValue::default(),
            part_number: FieldValue::default(),
            fru_file_id: FieldValue::default(),
            custom_fields: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChassisSection {
    #[serde(default = "default_format_version")]
    pub format_version: u8,
    #[serde(default, rename = "type")]
    pub chassis_type: u8,
    #[serde(default)]
    pub part_number: FieldValue,
    #[serde(default)]
    pub serial_number: FieldValue,
    #[serde(default)]
    pub custom_fields: Vec<FieldValue>,
}

impl Default for ChassisSection {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            chassis_type: 0,
            part_number: FieldValue::default(),
            serial_number: FieldValue::default(),
            custom_fields: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSection {
    #[serde(default = "default_format_version")]
    pub format_version: u8,
    #[serde(default)]
    pub language_code: u8,
    #[serde(default)]
    pub manufacturer: FieldValue,
    #[serde(default)]
    pub product_name: FieldValue,
    #[serde(default)]
    pub part_number: FieldValue,
    #[serde(default)]
    pub product_version: FieldValue,
    #[serde(default)]
    pub serial_number: FieldValue,
    #[serde(default)]
    pub asset_tag: FieldValue,
    #[serde(default)]
    pub fru_file_id: FieldValue,
    #[serde(default)]
    pub custom_fields: Vec<FieldValue>,
}

impl Default for ProductSection {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            language_code: 0,
            manufacturer: FieldValue::default(),
            product_name: FieldValue::default(),
            part_number: FieldValue::default(),
            product_version: FieldValue::default(),
            serial_number: FieldValue::default(),
            asset_tag: FieldValue::default(),
            fru_file_id: FieldValue::default(),
            custom_fields: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiRecordSection {
    #[serde(default)]
    pub records: Vec<RecordEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordEntry {
    #[serde(rename = "type")]
    pub record_type: u8,
    #[serde(default = "default_record_format_version")]
    pub format_version: u8,
    /// OEM manufacturer id, written as the first three payload bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer_id: Option<u32>,
    #[serde(default)]
    pub data: RecordData,
}

/// Record payload as a list of byte values or a hex string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordData {
    Bytes(Vec<u8>),
    Hex(String),
}

impl Default for RecordData {
    fn default() -> Self {
        RecordData::Bytes(Vec::new())
    }
}
