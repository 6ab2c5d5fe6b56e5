//! Whole-image encode and decode.
//!
//! Decoding trusts nothing until the header checksum verifies, then hands
//! each located area to its parser. Area checksum problems are attached to
//! the decoded area as warnings; structural problems abort.
//!
//! Encoding validates the whole record first and only then writes bytes, so
//! a failed encode never produces a partial image.

mod validate;

use thiserror::Error;
use tracing::{debug, warn};

use crate::area::{AreaError, parse_board_area, parse_chassis_area, parse_product_area};
use crate::header::{HeaderError, locate_areas, parse_common_header};
use crate::multirecord::{MultiRecordError, parse_multirecord_area};
use crate::{AreaKind, Record};

pub use validate::{Violation, validate, validate_with};

/// Errors returned by `decode` and `encode`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FruError {
    #[error("invalid common header: checksum stored 0x{stored:02x}, expected 0x{expected:02x}")]
    InvalidHeader { stored: u8, expected: u8 },
    #[error("header error: {0}")]
    Header(HeaderError),
    #[error("{area} area: {error}")]
    Area { area: AreaKind, error: AreaError },
    #[error("multirecord area: {0}")]
    MultiRecord(#[from] MultiRecordError),
    #[error("record is not encodable: {}", describe(.violations))]
    InvalidRecord { violations: Vec<Violation> },
}

impl From<HeaderError> for FruError {
    fn from(error: HeaderError) -> Self {
        match error {
            HeaderError::ChecksumMismatch { stored, expected } => {
                FruError::InvalidHeader { stored, expected }
            }
            other => FruError::Header(other),
        }
    }
}

fn area_error(area: AreaKind) -> impl FnOnce(AreaError) -> FruError {
    move |error| FruError::Area { area, error }
}

fn describe(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Encoder settings that are not part of the record itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Total image size. The image is zero-padded up to it.
    pub image_size: Option<usize>,
}

/// Decode a FRU image.
///
/// # Examples
/// ```
/// use frutool_core::{FruError, decode};
///
/// let header_only = [0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF];
/// let record = decode(&header_only)?;
/// assert!(record.board.is_none());
///
/// let corrupt = [0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
/// assert!(matches!(decode(&corrupt), Err(FruError::InvalidHeader { .. })));
/// # Ok::<(), FruError>(())
/// ```
///
/// # Errors
/// - `FruError::InvalidHeader` when the header checksum fails.
/// - `FruError::Header` for offsets that are out of order or out of bounds.
/// - `FruError::Area` and `FruError::MultiRecord` for undecodable areas.
pub fn decode(bytes: &[u8]) -> Result<Record, FruError> {
    let header = parse_common_header(bytes)?;
    let spans = locate_areas(bytes, &header)?;
    let mut record = Record {
        format_version: header.format_version,
        ..Record::default()
    };
    if let Some(span) = spans[AreaKind::Chassis].clone() {
        let chassis = parse_chassis_area(&bytes[span]).map_err(area_error(AreaKind::Chassis))?;
        record.chassis = Some(chassis);
    }
    if let Some(span) = spans[AreaKind::Board].clone() {
        let board = parse_board_area(&bytes[span]).map_err(area_error(AreaKind::Board))?;
        record.board = Some(board);
    }
    if let Some(span) = spans[AreaKind::Product].clone() {
        let product = parse_product_area(&bytes[span]).map_err(area_error(AreaKind::Product))?;
        record.product = Some(product);
    }
    if let Some(span) = spans[AreaKind::MultiRecord].clone() {
        record.multirecord = Some(parse_multirecord_area(&bytes[span])?);
    }

    for (area, warning) in record.warnings() {
        warn!(area = %area, "{warning}");
    }
    Ok(record)
}

/// Encode a record into a FRU image.
///
/// # Errors
/// Returns `FruError::InvalidRecord` with every violation found; nothing is
/// written in that case.
pub fn encode(record: &Record) -> Result<Vec<u8>, FruError> {
    encode_with(record, &EncodeOptions::default())
}

pub fn encode_with(record: &Record, options: &EncodeOptions) -> Result<Vec<u8>, FruError> {
    let image = validate::build_image(record, options)
        .map_err(|violations| FruError::InvalidRecord { violations })?;
    debug!(bytes = image.len(), "encoded image");
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::{EncodeOptions, FruError, decode, encode, encode_with};
    use crate::checksum::verify_checksum;
    use crate::header::HeaderError;
    use crate::multirecord::MultiRecordError;
    use crate::{
        AreaKind, AreaWarning, BoardArea, ChassisArea, DELL_MANUFACTURER_ID, Field, MultiRecord,
        MultiRecordArea, ProductArea, Record,
    };

    fn full_record() -> Record {
        Record {
            chassis: Some(ChassisArea {
                chassis_type: 0x17,
                part_number: Some(Field::text("CH-PN-01")),
                serial_number: Some(Field::text("CHSN0001")),
                ..ChassisArea::default()
            }),
            board: Some(BoardArea {
                mfg_date_time: 14_000_000,
                manufacturer: Some(Field::text("Dell Inc.")),
                product_name: Some(Field::text("PowerEdge R740 Board")),
                serial_number: Some(Field::text("CN0123456789")),
                part_number: Some(Field::bcd_plus("0123-456")),
                custom_fields: vec![Field::binary(&[0xDE, 0xAD, 0xBE, 0xEF])],
                ..BoardArea::default()
            }),
            product: Some(ProductArea {
                manufacturer: Some(Field::text("Dell Inc.")),
                product_name: Some(Field::text("PowerEdge R740")),
                product_version: Some(Field::text("A01")),
                asset_tag: Some(Field::text("ASSET-42")),
                ..ProductArea::default()
            }),
            multirecord: Some(MultiRecordArea {
                records: vec![
                    MultiRecord::oem(0xD0, DELL_MANUFACTURER_ID, b"service-tag"),
                    MultiRecord::new(0x00, vec![0x01, 0x02]),
                ],
                ..MultiRecordArea::default()
            }),
            ..Record::default()
        }
    }

    #[test]
    fn encode_decode_round_trip() {
        let record = full_record();
        let image = encode(&record).unwrap();
        assert_eq!(decode(&image).unwrap(), record);
    }

    #[test]
    fn every_area_is_block_aligned_and_checksummed() {
        let image = encode(&full_record()).unwrap();
        assert_eq!(image.len() % 8, 0);
        assert!(verify_checksum(&image[..8]));

        let mut offsets: Vec<usize> = image[2..6]
            .iter()
            .filter(|o| **o != 0)
            .map(|o| *o as usize * 8)
            .collect();
        offsets.push(image.len());
        assert_eq!(offsets[0], 8);
        for pair in offsets.windows(2).take(3) {
            let area = &image[pair[0]..pair[1]];
            assert_eq!(area.len() % 8, 0);
            assert_eq!(area[1] as usize * 8, area.len());
            assert!(verify_checksum(area));
        }
    }

    #[test]
    fn absent_areas_have_zero_offsets() {
        let record = Record {
            product: Some(ProductArea::default()),
            ..Record::default()
        };
        let image = encode(&record).unwrap();
        assert_eq!(&image[1..6], [0, 0, 0, 1, 0]);
        let decoded = decode(&image).unwrap();
        assert!(decoded.chassis.is_none());
        assert!(decoded.board.is_none());
        assert!(decoded.multirecord.is_none());
        assert_eq!(decoded.product, record.product);
    }

    #[test]
    fn empty_record_is_a_bare_header() {
        let image = encode(&Record::default()).unwrap();
        assert_eq!(image, [0x01, 0, 0, 0, 0, 0, 0, 0xFF]);
    }

    #[test]
    fn image_is_padded_to_requested_size() {
        let options = EncodeOptions {
            image_size: Some(256),
        };
        let image = encode_with(&full_record(), &options).unwrap();
        assert_eq!(image.len(), 256);
        assert_eq!(decode(&image).unwrap(), full_record());
    }

    #[test]
    fn tampered_header_is_fatal() {
        let image = encode(&full_record()).unwrap();

        let mut checksum_flipped = image.clone();
        checksum_flipped[7] ^= 0x01;
        assert_eq!(
            decode(&checksum_flipped).unwrap_err(),
            FruError::InvalidHeader {
                stored: image[7] ^ 0x01,
                expected: image[7]
            }
        );

        let mut offset_flipped = image;
        offset_flipped[3] ^= 0x01;
        assert!(matches!(
            decode(&offset_flipped),
            Err(FruError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn tampered_area_only_warns() {
        let mut image = encode(&full_record()).unwrap();
        let board_start = image[3] as usize * 8;
        // Flip a byte of the manufacturer text so the field still decodes.
        image[board_start + 7] ^= 0x01;

        let record = decode(&image).unwrap();
        let board = record.board.as_ref().unwrap();
        assert!(matches!(
            board.warnings.as_slice(),
            [AreaWarning::ChecksumMismatch { .. }]
        ));
        assert!(record.chassis.as_ref().unwrap().warnings.is_empty());
        assert_eq!(record.warnings().len(), 1);
        assert_eq!(record.warnings()[0].0, AreaKind::Board);
    }

    #[test]
    fn truncated_area_is_reported() {
        let image = encode(&full_record()).unwrap();
        let product_start = image[4] as usize * 8;
        let err = decode(&image[..product_start + 4]).unwrap_err();
        assert!(matches!(
            err,
            FruError::Header(HeaderError::AreaOutOfBounds {
                area: AreaKind::Product,
                ..
            })
        ));
    }

    #[test]
    fn missing_end_of_list_is_fatal() {
        let record = Record {
            multirecord: Some(MultiRecordArea {
                records: vec![MultiRecord::new(0xC0, vec![0x01, 0x02, 0x03])],
                ..MultiRecordArea::default()
            }),
            ..Record::default()
        };
        let mut image = encode(&record).unwrap();
        // Clear the flag and fix the record header checksum.
        image[9] &= 0x7F;
        image[11] = image[11].wrapping_add(0x80);

        assert_eq!(
            decode(&image).unwrap_err(),
            FruError::MultiRecord(MultiRecordError::MissingEndOfList { records: 1 })
        );
    }

    #[test]
    fn invalid_record_reports_all_violations() {
        let record = Record {
            chassis: Some(ChassisArea {
                part_number: Some(Field::text("P".repeat(64))),
                ..ChassisArea::default()
            }),
            product: Some(ProductArea {
                serial_number: Some(Field::bcd_plus("12x4")),
                ..ProductArea::default()
            }),
            ..Record::default()
        };
        let FruError::InvalidRecord { violations } = encode(&record).unwrap_err() else {
            panic!("expected InvalidRecord");
        };
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].area, Some(AreaKind::Chassis));
        assert_eq!(violations[1].area, Some(AreaKind::Product));
        let message = FruError::InvalidRecord { violations }.to_string();
        assert!(message.contains("chassis.part_number"));
        assert!(message.contains("product.serial_number"));
    }
}
