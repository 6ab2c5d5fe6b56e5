//! MultiRecord area.
//!
//! A run of self-delimited sub-records. Each one carries a 4-byte header
//! (type, version with the end-of-list flag, payload length, header
//! checksum), the payload and a payload checksum. Only the last record has
//! the end-of-list flag set. The area is padded with zeros to 8 bytes.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;
pub mod writer;

pub use error::MultiRecordError;
pub use parser::parse_multirecord_area;
pub use writer::{check_multirecord_area, write_multirecord_area};
