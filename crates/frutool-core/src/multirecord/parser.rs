use tracing::debug;

use super::error::MultiRecordError;
use super::layout;
use super::reader::MultiRecordReader;
use crate::MultiRecordArea;

/// Decode sub-records until one carries the end-of-list flag.
///
/// Bytes after the terminal record (padding, or records written after a
/// premature flag) are ignored. Checksum mismatches are reported as warnings.
///
/// # Errors
/// - `MultiRecordError::MissingEndOfList` when the area runs out before a
///   flagged record.
/// - `MultiRecordError::TruncatedData` when a record's declared payload runs
///   past the end of the area.
pub fn parse_multirecord_area(area: &[u8]) -> Result<MultiRecordArea, MultiRecordError> {
    let reader = MultiRecordReader::new(area);
    let mut parsed = MultiRecordArea::default();
    let mut cursor = 0;

    loop {
        let index = parsed.records.len();
        if reader.remaining(cursor) < layout::RECORD_OVERHEAD {
            return Err(MultiRecordError::MissingEndOfList { records: index });
        }

        let raw = reader.read_record(cursor, index)?;
        debug!(
            index,
            record_type = raw.record_type,
            length = raw.payload.len(),
            "read multirecord entry"
        );
        parsed.warnings.extend(raw.warnings(index));
        parsed.records.push(raw.to_record());
        cursor += raw.len();

        if raw.is_last() {
            return Ok(parsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::parse_multirecord_area;
    use crate::multirecord::MultiRecordError;
    use crate::AreaWarning;

    // type 0xC0, last, 2-byte payload.
    const LAST_RECORD: [u8; 7] = [0xC0, 0x82, 0x02, 0xBC, 0x12, 0x34, 0xBA];
    // type 0xD0, not last, 1-byte payload.
    const FIRST_RECORD: [u8; 6] = [0xD0, 0x02, 0x01, 0x2D, 0xAA, 0x56];

    #[test]
    fn parse_stops_at_end_of_list() {
        let mut area = FIRST_RECORD.to_vec();
        area.extend_from_slice(&LAST_RECORD);
        area.extend_from_slice(&[0, 0, 0]);

        let parsed = parse_multirecord_area(&area).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].record_type, 0xD0);
        assert_eq!(parsed.records[0].payload, [0xAA]);
        assert_eq!(parsed.records[1].format_version, 2);
        assert_eq!(parsed.records[1].payload, [0x12, 0x34]);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn records_after_end_of_list_are_not_consumed() {
        let mut area = LAST_RECORD.to_vec();
        area.extend_from_slice(&FIRST_RECORD);

        let parsed = parse_multirecord_area(&area).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].record_type, 0xC0);
    }

    #[test]
    fn missing_end_of_list_is_fatal() {
        let err = parse_multirecord_area(&FIRST_RECORD).unwrap_err();
        assert_eq!(err, MultiRecordError::MissingEndOfList { records: 1 });
        assert_eq!(
            parse_multirecord_area(&[]).unwrap_err(),
            MultiRecordError::MissingEndOfList { records: 0 }
        );
    }

    #[test]
    fn payload_past_area_end_is_truncated() {
        let err = parse_multirecord_area(&LAST_RECORD[..6]).unwrap_err();
        assert_eq!(
            err,
            MultiRecordError::TruncatedData {
                index: 0,
                needed: 7,
                actual: 6
            }
        );
    }

    #[test]
    fn checksum_mismatches_become_warnings() {
        let mut area = LAST_RECORD.to_vec();
        area[3] ^= 0x01;
        area[6] ^= 0x01;

        let parsed = parse_multirecord_area(&area).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert!(matches!(
            parsed.warnings.as_slice(),
            [
                AreaWarning::RecordHeaderChecksumMismatch { index: 0, .. },
                AreaWarning::RecordPayloadChecksumMismatch { index: 0, .. },
            ]
        ));
    }
}
