use super::error::MultiRecordError;
use super::layout;
use crate::MultiRecordArea;
use crate::checksum::checksum;
use crate::header::layout::BLOCK_SIZE;

/// Every reason `area` cannot be written, in record order.
pub fn check_multirecord_area(area: &MultiRecordArea) -> Vec<MultiRecordError> {
    if area.records.is_empty() {
        return vec![MultiRecordError::Empty];
    }
    area.records
        .iter()
        .enumerate()
        .flat_map(|(index, record)| {
            let length = record.payload.len();
            let version = record.format_version;
            [
                (length > layout::MAX_PAYLOAD_LEN)
                    .then_some(MultiRecordError::PayloadTooLong { index, length }),
                (version > layout::VERSION_MASK)
                    .then_some(MultiRecordError::FormatVersionTooLarge { index, version }),
            ]
        })
        .flatten()
        .collect()
}

/// Serialize every sub-record, flag the last one as end-of-list and pad the
/// area with zeros to a whole number of blocks.
///
/// # Errors
/// Returns the first problem `check_multirecord_area` finds: an empty list,
/// a payload over 255 bytes or a format version over 0x0F.
pub fn write_multirecord_area(area: &MultiRecordArea) -> Result<Vec<u8>, MultiRecordError> {
    if let Some(error) = check_multirecord_area(area).into_iter().next() {
        return Err(error);
    }

    let last = area.records.len() - 1;
    let mut bytes = Vec::new();
    for (index, record) in area.records.iter().enumerate() {
        let length = record.payload.len();
        let mut version = record.format_version;
        if index == last {
            version |= layout::END_OF_LIST;
        }
        let header = [record.record_type, version, length as u8];
        bytes.extend_from_slice(&header);
        bytes.push(checksum(&header));
        bytes.extend_from_slice(&record.payload);
        bytes.push(checksum(&record.payload));
    }

    bytes.resize(bytes.len().next_multiple_of(BLOCK_SIZE), 0);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::{check_multirecord_area, write_multirecord_area};
    use crate::multirecord::{MultiRecordError, parse_multirecord_area};
    use crate::{DELL_MANUFACTURER_ID, MultiRecord, MultiRecordArea};

    #[test]
    fn write_flags_only_the_last_record() {
        let area = MultiRecordArea {
            records: vec![
                MultiRecord::new(0xD0, vec![0xAA]),
                MultiRecord::new(0xC0, vec![0x12, 0x34]),
            ],
            ..MultiRecordArea::default()
        };
        let bytes = write_multirecord_area(&area).unwrap();
        assert_eq!(
            bytes,
            [
                0xD0, 0x02, 0x01, 0x2D, 0xAA, 0x56, 0xC0, 0x82, 0x02, 0xBC, 0x12, 0x34, 0xBA, 0x00,
                0x00, 0x00,
            ]
        );
    }

    #[test]
    fn oem_records_round_trip() {
        let area = MultiRecordArea {
            records: vec![
                MultiRecord::oem(0xD0, DELL_MANUFACTURER_ID, &[0x01, 0x02, 0x03]),
                MultiRecord::new(0x01, Vec::new()),
                MultiRecord::oem(0xD1, DELL_MANUFACTURER_ID, &[0xFF; 20]),
            ],
            ..MultiRecordArea::default()
        };
        let bytes = write_multirecord_area(&area).unwrap();
        assert_eq!(bytes.len() % 8, 0);
        assert_eq!(parse_multirecord_area(&bytes).unwrap(), area);
    }

    #[test]
    fn write_rejects_empty_area() {
        assert_eq!(
            write_multirecord_area(&MultiRecordArea::default()).unwrap_err(),
            MultiRecordError::Empty
        );
    }

    #[test]
    fn write_rejects_long_payload() {
        let area = MultiRecordArea {
            records: vec![
                MultiRecord::new(0xC0, vec![0; 4]),
                MultiRecord::new(0xC0, vec![0; 256]),
            ],
            ..MultiRecordArea::default()
        };
        assert_eq!(
            write_multirecord_area(&area).unwrap_err(),
            MultiRecordError::PayloadTooLong {
                index: 1,
                length: 256
            }
        );
    }

    #[test]
    fn check_reports_every_record() {
        let mut bad_version = MultiRecord::new(0xC0, vec![0; 4]);
        bad_version.format_version = 0x12;
        let area = MultiRecordArea {
            records: vec![
                MultiRecord::new(0xC0, vec![0; 300]),
                bad_version,
                MultiRecord::new(0xC1, vec![0; 400]),
            ],
            ..MultiRecordArea::default()
        };
        assert_eq!(
            check_multirecord_area(&area),
            [
                MultiRecordError::PayloadTooLong {
                    index: 0,
                    length: 300
                },
                MultiRecordError::FormatVersionTooLarge {
                    index: 1,
                    version: 0x12
                },
                MultiRecordError::PayloadTooLong {
                    index: 2,
                    length: 400
                },
            ]
        );
        assert_eq!(
            write_multirecord_area(&area).unwrap_err(),
            MultiRecordError::PayloadTooLong {
                index: 0,
                length: 300
            }
        );
    }
}
