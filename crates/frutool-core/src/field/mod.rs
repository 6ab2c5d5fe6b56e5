//! Primitive field codec.
//!
//! Every variable-length FRU field is a type/length byte followed by data.
//! The top two bits select the encoding and the low six bits carry the data
//! length, so a field holds at most 63 bytes. Longer input is rejected, never
//! truncated.
//!
//! Encodings:
//! - `00` binary, rendered as lowercase hex;
//! - `01` BCD-plus, two symbols per byte;
//! - `10` 6-bit packed ASCII, decode only;
//! - `11` text, one Latin-1 byte per character. The area language code is
//!   carried in the record but does not change how these bytes are read.

pub mod error;
pub mod layout;
pub mod parser;
pub mod writer;

pub use error::FieldError;
pub use parser::decode_field;
pub use writer::encode_field;
