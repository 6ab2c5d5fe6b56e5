use std::fmt;

use serde::{Deserialize, Serialize};

use super::EncodeOptions;
use crate::area::layout::MAX_MFG_DATE_TIME;
use crate::area::{AreaError, InfoArea, write_info_area};
use crate::field::encode_field;
use crate::header::{AreaTable, HeaderError, assemble_image};
use crate::multirecord::{MultiRecordError, check_multirecord_area, write_multirecord_area};
use crate::{AreaKind, Record};

const MAX_FORMAT_VERSION: u8 = 0x0F;

/// One reason a record cannot be encoded.
///
/// `area` and `field` locate the problem when it belongs to a specific
/// area or field; image-wide problems leave them empty.
///
/// # Examples
/// ```
/// use frutool_core::{AreaKind, Violation};
///
/// let violation = Violation {
///     area: Some(AreaKind::Board),
///     field: Some("serial_number".to_string()),
///     message: "field too long: 70 bytes (max 63)".to_string(),
/// };
/// assert_eq!(
///     violation.to_string(),
///     "board.serial_number: field too long: 70 bytes (max 63)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub area: Option<AreaKind>,
    pub field: Option<String>,
    pub message: String,
}

impl Violation {
    fn image(message: impl fmt::Display) -> Self {
        Self {
            area: None,
            field: None,
            message: message.to_string(),
        }
    }

    fn area(area: AreaKind, field: Option<String>, message: impl fmt::Display) -> Self {
        Self {
            area: Some(area),
            field,
            message: message.to_string(),
        }
    }

    fn from_area_error(area: AreaKind, error: AreaError) -> Self {
        match error {
            AreaError::Field { name, error, .. } => Self::area(area, Some(name.to_string()), error),
            AreaError::DateTimeOutOfRange { .. } => {
                Self::area(area, Some("mfg_date_time".to_string()), error)
            }
            other => Self::area(area, None, other),
        }
    }

    fn from_multirecord_error(error: MultiRecordError) -> Self {
        let field = match error {
            MultiRecordError::PayloadTooLong { index, .. } => Some(format!("records[{index}]")),
            MultiRecordError::FormatVersionTooLarge { index, .. } => {
                Some(format!("records[{index}].format_version"))
            }
            _ => None,
        };
        Self::area(AreaKind::MultiRecord, field, error)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.area, &self.field) {
            (Some(area), Some(field)) => write!(f, "{area}.{field}: {}", self.message),
            (Some(area), None) => write!(f, "{area}: {}", self.message),
            _ => write!(f, "image: {}", self.message),
        }
    }
}

/// Check every constraint the encoder enforces, with default options.
///
/// Returns all violations at once; an empty list means `encode` succeeds.
///
/// # Examples
/// ```
/// use frutool_core::{BoardArea, Field, Record, validate};
///
/// let record = Record {
///     board: Some(BoardArea {
///         manufacturer: Some(Field::text("M".repeat(64))),
///         part_number: Some(Field::bcd_plus("12A")),
///         ..BoardArea::default()
///     }),
///     ..Record::default()
/// };
/// assert_eq!(validate(&record).len(), 2);
/// ```
pub fn validate(record: &Record) -> Vec<Violation> {
    validate_with(record, &EncodeOptions::default())
}

pub fn validate_with(record: &Record, options: &EncodeOptions) -> Vec<Violation> {
    build_image(record, options).err().unwrap_or_default()
}

/// Serialize `record`, or collect every reason it cannot be serialized.
pub(super) fn build_image(
    record: &Record,
    options: &EncodeOptions,
) -> Result<Vec<u8>, Vec<Violation>> {
    let mut violations = Vec::new();
    if record.format_version > MAX_FORMAT_VERSION {
        violations.push(Violation::image(format_args!(
            "format version {} does not fit in 4 bits",
            record.format_version
        )));
    }

    let mut areas = AreaTable::new();
    if let Some(chassis) = &record.chassis {
        areas[AreaKind::Chassis] = check_info_area(chassis, &mut violations);
    }
    if let Some(board) = &record.board {
        areas[AreaKind::Board] = check_info_area(board, &mut violations);
    }
    if let Some(product) = &record.product {
        areas[AreaKind::Product] = check_info_area(product, &mut violations);
    }
    if let Some(multirecord) = &record.multirecord {
        let problems = check_multirecord_area(multirecord);
        if problems.is_empty() {
            match write_multirecord_area(multirecord) {
                Ok(bytes) => areas[AreaKind::MultiRecord] = Some(bytes),
                Err(error) => violations.push(Violation::from_multirecord_error(error)),
            }
        } else {
            violations.extend(problems.into_iter().map(Violation::from_multirecord_error));
        }
    }
    if !violations.is_empty() {
        return Err(violations);
    }

    let mut image = assemble_image(record.format_version, &areas).map_err(|error| {
        let violation = match error {
            HeaderError::MisalignedArea { area, .. } | HeaderError::OffsetOverflow { area, .. } => {
                Violation::area(area, None, error)
            }
            other => Violation::image(other),
        };
        vec![violation]
    })?;

    if let Some(size) = options.image_size {
        if image.len() > size {
            return Err(vec![Violation::image(format_args!(
                "encoded image is {} bytes, larger than the configured size of {size}",
                image.len()
            ))]);
        }
        image.resize(size, 0);
    }
    Ok(image)
}

fn check_info_area<A: InfoArea>(area: &A, violations: &mut Vec<Violation>) -> Option<Vec<u8>> {
    let before = violations.len();
    if area.format_version() > MAX_FORMAT_VERSION {
        violations.push(Violation::area(
            A::KIND,
            Some("format_version".to_string()),
            format_args!("{} does not fit in 4 bits", area.format_version()),
        ));
    }
    if let Some(value) = area.mfg_date_time().filter(|value| *value > MAX_MFG_DATE_TIME) {
        violations.push(Violation::from_area_error(
            A::KIND,
            AreaError::DateTimeOutOfRange { value },
        ));
    }

    let named = area
        .named_fields()
        .into_iter()
        .filter_map(|(name, field)| field.map(|field| (name.to_string(), field)));
    let custom = area
        .custom_fields()
        .iter()
        .enumerate()
        .map(|(index, field)| (format!("custom_fields[{index}]"), field));
    for (name, field) in named.chain(custom).filter(|(_, field)| !field.is_empty()) {
        if let Err(error) = encode_field(&field.value, field.encoding) {
            violations.push(Violation::area(A::KIND, Some(name), error));
        }
    }
    if violations.len() > before {
        return None;
    }

    match write_info_area(area) {
        Ok(bytes) => Some(bytes),
        Err(error) => {
            violations.push(Violation::from_area_error(A::KIND, error));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{validate, validate_with};
    use crate::image::EncodeOptions;
    use crate::{
        AreaKind, BoardArea, ChassisArea, Field, FieldEncoding, MultiRecord, MultiRecordArea,
        ProductArea, Record,
    };

    #[test]
    fn valid_record_has_no_violations() {
        let record = Record {
            chassis: Some(ChassisArea::default()),
            product: Some(ProductArea {
                manufacturer: Some(Field::text("Dell")),
                ..ProductArea::default()
            }),
            ..Record::default()
        };
        assert!(validate(&record).is_empty());
    }

    #[test]
    fn violations_are_collected_across_areas() {
        let record = Record {
            chassis: Some(ChassisArea {
                serial_number: Some(Field::new(FieldEncoding::SixBitAscii, "ABC")),
                ..ChassisArea::default()
            }),
            board: Some(BoardArea {
                mfg_date_time: 0x0100_0000,
                ..BoardArea::default()
            }),
            product: Some(ProductArea {
                asset_tag: Some(Field::binary(&[1])),
                custom_fields: vec![Field::new(FieldEncoding::Binary, "xyz")],
                ..ProductArea::default()
            }),
            multirecord: Some(MultiRecordArea::default()),
            ..Record::default()
        };

        let violations = validate(&record);
        let located: Vec<(Option<AreaKind>, Option<&str>)> = violations
            .iter()
            .map(|v| (v.area, v.field.as_deref()))
            .collect();
        assert_eq!(
            located,
            [
                (Some(AreaKind::Chassis), Some("serial_number")),
                (Some(AreaKind::Board), Some("mfg_date_time")),
                (Some(AreaKind::Product), Some("custom_fields[0]")),
                (Some(AreaKind::MultiRecord), None),
            ]
        );
    }

    #[test]
    fn independent_problems_are_all_reported() {
        let record = Record {
            board: Some(BoardArea {
                mfg_date_time: 0x0100_0000,
                manufacturer: Some(Field::text("M".repeat(64))),
                ..BoardArea::default()
            }),
            multirecord: Some(MultiRecordArea {
                records: vec![
                    MultiRecord::new(0xC0, vec![0; 300]),
                    MultiRecord::new(0xC0, vec![0; 400]),
                ],
                ..MultiRecordArea::default()
            }),
            ..Record::default()
        };

        let fields: Vec<String> = validate(&record)
            .iter()
            .map(|v| v.to_string().split(':').next().unwrap_or_default().to_string())
            .collect();
        assert_eq!(
            fields,
            [
                "board.mfg_date_time",
                "board.manufacturer",
                "multirecord.records[0]",
                "multirecord.records[1]",
            ]
        );
    }

    #[test]
    fn record_format_version_must_fit_in_a_nibble() {
        let mut record = MultiRecord::new(0xC0, vec![0x01]);
        record.format_version = 0x12;
        let record = Record {
            multirecord: Some(MultiRecordArea {
                records: vec![record],
                ..MultiRecordArea::default()
            }),
            ..Record::default()
        };
        let violations = validate(&record);
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].field.as_deref(),
            Some("records[0].format_version")
        );
    }

    #[test]
    fn oversized_payload_names_the_record() {
        let record = Record {
            multirecord: Some(MultiRecordArea {
                records: vec![MultiRecord::new(0xC0, vec![0; 300])],
                ..MultiRecordArea::default()
            }),
            ..Record::default()
        };
        let violations = validate(&record);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field.as_deref(), Some("records[0]"));
    }

    #[test]
    fn offset_overflow_is_reported() {
        let record = Record {
            chassis: Some(ChassisArea {
                custom_fields: vec![Field::text("X".repeat(63)); 30],
                ..ChassisArea::default()
            }),
            board: Some(BoardArea {
                custom_fields: vec![Field::text("X".repeat(63)); 30],
                ..BoardArea::default()
            }),
            product: Some(ProductArea::default()),
            ..Record::default()
        };
        let violations = validate(&record);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].area, Some(AreaKind::Product));
        assert!(violations[0].message.contains("block offset"));
    }

    #[test]
    fn image_size_must_hold_the_content() {
        let record = Record {
            chassis: Some(ChassisArea::default()),
            ..Record::default()
        };
        let tight = EncodeOptions {
            image_size: Some(8),
        };
        let violations = validate_with(&record, &tight);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].area.is_none());
        assert!(violations[0].to_string().starts_with("image: "));
    }

    #[test]
    fn format_version_must_fit_in_a_nibble() {
        let record = Record {
            format_version: 0x10,
            board: Some(BoardArea {
                format_version: 0x20,
                ..BoardArea::default()
            }),
            ..Record::default()
        };
        assert_eq!(validate(&record).len(), 2);
    }
}
