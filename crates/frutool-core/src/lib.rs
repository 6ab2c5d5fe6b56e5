//! frutool core library for IPMI FRU inventory images.
//!
//! This crate implements the codec used by the CLI: a FRU image is a common
//! header followed by checksummed areas (chassis, board, product) and an
//! optional MultiRecord area of OEM sub-records. Decoding walks the header's
//! offset table and hands each area to its parser (layout/reader/parser);
//! encoding runs the writers in fixed area order and assembles the header.
//! Everything here is byte-oriented and side-effect free; file I/O belongs to
//! the caller, and the TOML text layer lives in `config`.
//!
//! Invariants:
//! - Every encoded header and area sums to zero modulo 256.
//! - Every encoded area length is a multiple of 8 bytes.
//! - Field positions inside an area follow the FRU layout; absent fields are
//!   written as zero-length placeholders.
//! - A corrupt header aborts decoding; a corrupt area checksum only flags
//!   that area.
//!
//! Version française (résumé):
//! Cette crate encode et décode les images FRU IPMI : en-tête commun, zones
//! châssis/carte/produit avec somme de contrôle, zone MultiRecord. Une
//! en-tête corrompue interrompt le décodage ; une zone corrompue est signalée
//! par un avertissement dans le `Record` retourné. Les E/S restent chez
//! l'appelant.
//!
//! # Examples
//! ```
//! use frutool_core::{BoardArea, Field, Record, decode, encode};
//!
//! let record = Record {
//!     board: Some(BoardArea {
//!         manufacturer: Some(Field::text("Dell")),
//!         product_name: Some(Field::text("PowerEdge R740")),
//!         ..BoardArea::default()
//!     }),
//!     ..Record::default()
//! };
//! let image = encode(&record)?;
//! assert_eq!(image.len() % 8, 0);
//! assert_eq!(decode(&image)?, record);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

mod area;
pub mod checksum;
pub mod config;
pub mod field;
mod header;
mod image;
mod multirecord;

pub use area::AreaError;
pub use config::{ConfigError, FruConfig, parse_config, render_config, sample_config};
pub use header::HeaderError;
pub use image::{
    EncodeOptions, FruError, Violation, decode, encode, encode_with, validate, validate_with,
};
pub use multirecord::MultiRecordError;

/// Format version written to the header and to each info area.
pub const FORMAT_VERSION: u8 = 1;
/// Format version of MultiRecord sub-records.
pub const MULTIRECORD_FORMAT_VERSION: u8 = 2;
/// Dell's IANA enterprise number, used in OEM MultiRecord payloads.
pub const DELL_MANUFACTURER_ID: u32 = 674;

/// Top-level areas in serialization order.
///
/// # Examples
/// ```
/// use frutool_core::AreaKind;
///
/// assert_eq!(AreaKind::ALL[1], AreaKind::Board);
/// assert_eq!(AreaKind::Product.to_string(), "product");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaKind {
    Chassis,
    Board,
    Product,
    MultiRecord,
}

impl AreaKind {
    /// All areas, in header and serialization order.
    pub const ALL: [AreaKind; 4] = [
        AreaKind::Chassis,
        AreaKind::Board,
        AreaKind::Product,
        AreaKind::MultiRecord,
    ];

    /// Position of this area in fixed-size area tables.
    pub const fn index(self) -> usize {
        match self {
            AreaKind::Chassis => 0,
            AreaKind::Board => 1,
            AreaKind::Product => 2,
            AreaKind::MultiRecord => 3,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            AreaKind::Chassis => "chassis",
            AreaKind::Board => "board",
            AreaKind::Product => "product",
            AreaKind::MultiRecord => "multirecord",
        }
    }
}

impl fmt::Display for AreaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field encoding selected by the top two bits of the type/length byte.
///
/// # Examples
/// ```
/// use frutool_core::FieldEncoding;
///
/// assert_eq!(FieldEncoding::from_type_length(0xC4), FieldEncoding::Text);
/// assert_eq!(FieldEncoding::BcdPlus.selector(), 0b01);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldEncoding {
    /// Binary or unspecified data, rendered as hex.
    Binary,
    /// Packed BCD digits plus space, minus and period.
    BcdPlus,
    /// 6-bit packed ASCII (decode only).
    SixBitAscii,
    /// Latin-1 text, one byte per character.
    Text,
}

impl FieldEncoding {
    pub const fn selector(self) -> u8 {
        match self {
            FieldEncoding::Binary => field::layout::SELECTOR_BINARY,
            FieldEncoding::BcdPlus => field::layout::SELECTOR_BCD_PLUS,
            FieldEncoding::SixBitAscii => field::layout::SELECTOR_SIX_BIT_ASCII,
            FieldEncoding::Text => field::layout::SELECTOR_TEXT,
        }
    }

    pub const fn from_type_length(type_length: u8) -> Self {
        match (type_length & field::layout::SELECTOR_MASK) >> field::layout::SELECTOR_SHIFT {
            field::layout::SELECTOR_BINARY => FieldEncoding::Binary,
            field::layout::SELECTOR_BCD_PLUS => FieldEncoding::BcdPlus,
            field::layout::SELECTOR_SIX_BIT_ASCII => FieldEncoding::SixBitAscii,
            _ => FieldEncoding::Text,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            FieldEncoding::Binary => "binary",
            FieldEncoding::BcdPlus => "bcd-plus",
            FieldEncoding::SixBitAscii => "six-bit-ascii",
            FieldEncoding::Text => "text",
        }
    }
}

impl fmt::Display for FieldEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A field value together with its wire encoding.
///
/// Binary values are carried as lowercase hex strings. An empty value is
/// the same as an absent field: it is written as a zero-length placeholder
/// and decodes to `None`, so records compare equal after a round trip only
/// when empty fields are already `None`.
///
/// # Examples
/// ```
/// use frutool_core::{Field, FieldEncoding};
///
/// let field = Field::binary(&[0xde, 0xad]);
/// assert_eq!(field.encoding, FieldEncoding::Binary);
/// assert_eq!(field.value, "dead");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub encoding: FieldEncoding,
    pub value: String,
}

impl Field {
    pub fn new(encoding: FieldEncoding, value: impl Into<String>) -> Self {
        Self {
            encoding,
            value: value.into(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(FieldEncoding::Text, value)
    }

    pub fn bcd_plus(value: impl Into<String>) -> Self {
        Self::new(FieldEncoding::BcdPlus, value)
    }

    pub fn binary(bytes: &[u8]) -> Self {
        Self::new(FieldEncoding::Binary, hex::encode(bytes))
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Non-fatal problem found while decoding an area.
///
/// # Examples
/// ```
/// use frutool_core::AreaWarning;
///
/// let warning = AreaWarning::ChecksumMismatch { stored: 0x12, expected: 0x34 };
/// assert!(warning.to_string().contains("checksum mismatch"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AreaWarning {
    /// The area checksum byte does not match its contents.
    ChecksumMismatch { stored: u8, expected: u8 },
    /// A MultiRecord sub-record header checksum does not match.
    RecordHeaderChecksumMismatch {
        index: usize,
        stored: u8,
        expected: u8,
    },
    /// A MultiRecord sub-record payload checksum does not match.
    RecordPayloadChecksumMismatch {
        index: usize,
        stored: u8,
        expected: u8,
    },
}

impl fmt::Display for AreaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AreaWarning::ChecksumMismatch { stored, expected } => write!(
                f,
                "checksum mismatch: stored 0x{stored:02x}, expected 0x{expected:02x}"
            ),
            AreaWarning::RecordHeaderChecksumMismatch {
                index,
                stored,
                expected,
            } => write!(
                f,
                "record {index} header checksum mismatch: stored 0x{stored:02x}, expected 0x{expected:02x}"
            ),
            AreaWarning::RecordPayloadChecksumMismatch {
                index,
                stored,
                expected,
            } => write!(
                f,
                "record {index} payload checksum mismatch: stored 0x{stored:02x}, expected 0x{expected:02x}"
            ),
        }
    }
}

/// A complete FRU inventory record.
///
/// An area is written only when it is `Some`; a record with every area
/// absent encodes to a bare common header.
///
/// # Examples
/// ```
/// use frutool_core::{ChassisArea, Record};
///
/// let record = Record {
///     chassis: Some(ChassisArea::default()),
///     ..Record::default()
/// };
/// assert_eq!(record.format_version, frutool_core::FORMAT_VERSION);
/// assert!(record.has_area(frutool_core::AreaKind::Chassis));
/// assert!(!record.has_warnings());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Common header format version (low nibble).
    pub format_version: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chassis: Option<ChassisArea>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<BoardArea>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductArea>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multirecord: Option<MultiRecordArea>,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            chassis: None,
            board: None,
            product: None,
            multirecord: None,
        }
    }
}

impl Record {
    pub fn has_area(&self, kind: AreaKind) -> bool {
        match kind {
            AreaKind::Chassis => self.chassis.is_some(),
            AreaKind::Board => self.board.is_some(),
            AreaKind::Product => self.product.is_some(),
            AreaKind::MultiRecord => self.multirecord.is_some(),
        }
    }

    /// Warnings recorded while decoding, in area order.
    pub fn warnings(&self) -> Vec<(AreaKind, &AreaWarning)> {
        let per_area: [(AreaKind, Option<&Vec<AreaWarning>>); 4] = [
            (AreaKind::Chassis, self.chassis.as_ref().map(|a| &a.warnings)),
            (AreaKind::Board, self.board.as_ref().map(|a| &a.warnings)),
            (AreaKind::Product, self.product.as_ref().map(|a| &a.warnings)),
            (
                AreaKind::MultiRecord,
                self.multirecord.as_ref().map(|a| &a.warnings),
            ),
        ];
        per_area
            .into_iter()
            .flat_map(|(kind, warnings)| {
                warnings
                    .into_iter()
                    .flatten()
                    .map(move |warning| (kind, warning))
            })
            .collect()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings().is_empty()
    }
}

/// Chassis info area.
///
/// # Examples
/// ```
/// use frutool_core::{ChassisArea, Field};
///
/// let chassis = ChassisArea {
///     chassis_type: 0x17,
///     serial_number: Some(Field::text("CHSN0001")),
///     ..ChassisArea::default()
/// };
/// assert!(chassis.part_number.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChassisArea {
    pub format_version: u8,
    /// SMBIOS chassis type code.
    pub chassis_type: u8,
    pub part_number: Option<Field>,
    pub serial_number: Option<Field>,
    #[serde(default)]
    pub custom_fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AreaWarning>,
}

impl Default for ChassisArea {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            chassis_type: 0,
            part_number: None,
            serial_number: None,
            custom_fields: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Board info area.
///
/// # Examples
/// ```
/// use frutool_core::BoardArea;
///
/// let board = BoardArea { mfg_date_time: 0xABCDEF, ..BoardArea::default() };
/// assert_eq!(board.language_code, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardArea {
    pub format_version: u8,
    pub language_code: u8,
    /// Minutes since 1996-01-01 00:00 (24 bits).
    pub mfg_date_time: u32,
    pub manufacturer: Option<Field>,
    pub product_name: Option<Field>,
    pub serial_number: Option<Field>,
    pub part_number: Option<Field>,
    pub fru_file_id: Option<Field>,
    #[serde(default)]
    pub custom_fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AreaWarning>,
}

impl Default for BoardArea {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            language_code: 0,
            mfg_date_time: 0,
            manufacturer: None,
            product_name: None,
            serial_number: None,
            part_number: None,
            fru_file_id: None,
            custom_fields: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Product info area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductArea {
    pub format_version: u8,
    pub language_code: u8,
    pub manufacturer: Option<Field>,
    pub product_name: Option<Field>,
    pub part_number: Option<Field>,
    pub product_version: Option<Field>,
    pub serial_number: Option<Field>,
    pub asset_tag: Option<Field>,
    pub fru_file_id: Option<Field>,
    #[serde(default)]
    pub custom_fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AreaWarning>,
}

impl Default for ProductArea {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            language_code: 0,
            manufacturer: None,
            product_name: None,
            part_number: None,
            product_version: None,
            serial_number: None,
            asset_tag: None,
            fru_file_id: None,
            custom_fields: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// MultiRecord area: an ordered list of sub-records.
///
/// The end-of-list flag is not stored; it is always written on the last
/// record, and decoding stops at the first record that carries it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiRecordArea {
    pub records: Vec<MultiRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AreaWarning>,
}

/// One MultiRecord sub-record.
///
/// # Examples
/// ```
/// use frutool_core::{DELL_MANUFACTURER_ID, MultiRecord};
///
/// let record = MultiRecord::oem(0xD0, DELL_MANUFACTURER_ID, &[0x01, 0x02]);
/// assert_eq!(record.payload, [0xA2, 0x02, 0x00, 0x01, 0x02]);
/// assert_eq!(record.manufacturer_id(), Some(DELL_MANUFACTURER_ID));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiRecord {
    pub record_type: u8,
    pub format_version: u8,
    pub payload: Vec<u8>,
}

impl MultiRecord {
    pub fn new(record_type: u8, payload: Vec<u8>) -> Self {
        Self {
            record_type,
            format_version: MULTIRECORD_FORMAT_VERSION,
            payload,
        }
    }

    /// Build an OEM record whose payload starts with the 3-byte little-endian
    /// manufacturer id.
    pub fn oem(record_type: u8, manufacturer_id: u32, data: &[u8]) -> Self {
        let mut payload = manufacturer_id.to_le_bytes()[..3].to_vec();
        payload.extend_from_slice(data);
        Self::new(record_type, payload)
    }

    /// Record types 0xC0..=0xFF are reserved for OEM records.
    pub fn is_oem(&self) -> bool {
        self.record_type >= multirecord::layout::OEM_RECORD_TYPE_MIN
    }

    pub fn manufacturer_id(&self) -> Option<u32> {
        if !self.is_oem() {
            return None;
        }
        match self.payload.get(..3) {
            Some([b0, b1, b2]) => Some(u32::from_le_bytes([*b0, *b1, *b2, 0])),
            _ => None,
        }
    }
}
