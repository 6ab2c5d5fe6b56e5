use super::error::MultiRecordError;
use super::layout;
use crate::checksum::checksum_mismatch;
use crate::{AreaWarning, MultiRecord};

/// One sub-record as found on the wire.
pub struct RawRecord<'a> {
    pub record_type: u8,
    pub version: u8,
    pub payload: &'a [u8],
    pub header: &'a [u8],
    /// Payload bytes followed by the payload checksum.
    pub sealed_payload: &'a [u8],
}

impl RawRecord<'_> {
    pub fn is_last(&self) -> bool {
        self.version & layout::END_OF_LIST != 0
    }

    pub fn len(&self) -> usize {
        self.sealed_payload.len() + layout::HEADER_LEN
    }

    pub fn warnings(&self, index: usize) -> Vec<AreaWarning> {
        let header = checksum_mismatch(self.header).map(|(stored, expected)| {
            AreaWarning::RecordHeaderChecksumMismatch {
                index,
                stored,
                expected,
            }
        });
        let payload = checksum_mismatch(self.sealed_payload).map(|(stored, expected)| {
            AreaWarning::RecordPayloadChecksumMismatch {
                index,
                stored,
                expected,
            }
        });
        header.into_iter().chain(payload).collect()
    }

    pub fn to_record(&self) -> MultiRecord {
        MultiRecord {
            record_type: self.record_type,
            format_version: self.version & layout::VERSION_MASK,
            payload: self.payload.to_vec(),
        }
    }
}

pub struct MultiRecordReader<'a> {
    area: &'a [u8],
}

impl<'a> MultiRecordReader<'a> {
    pub fn new(area: &'a [u8]) -> Self {
        Self { area }
    }

    pub fn remaining(&self, cursor: usize) -> usize {
        self.area.len().saturating_sub(cursor)
    }

    pub fn read_record(&self, cursor: usize, index: usize) -> Result<RawRecord<'a>, MultiRecordError> {
        let header = self.read_slice(cursor..cursor + layout::HEADER_LEN, index)?;
        let payload_len = header[layout::PAYLOAD_LEN_OFFSET] as usize;
        let payload_start = cursor + layout::HEADER_LEN;
        let sealed_payload = self.read_slice(payload_start..payload_start + payload_len + 1, index)?;

        Ok(RawRecord {
            record_type: header[layout::RECORD_TYPE_OFFSET],
            version: header[layout::VERSION_OFFSET],
            payload: &sealed_payload[..payload_len],
            header,
            sealed_payload,
        })
    }

    fn read_slice(
        &self,
        range: std::ops::Range<usize>,
        index: usize,
    ) -> Result<&'a [u8], MultiRecordError> {
        self.area
            .get(range.clone())
            .ok_or(MultiRecordError::TruncatedData {
                index,
                needed: range.end,
                actual: self.area.len(),
            })
    }
}
