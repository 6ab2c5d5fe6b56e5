//! Chassis, board and product info areas.
//!
//! All three share one frame: format version, length in 8-byte blocks,
//! area-specific fixed bytes, a run of type/length fields closed by `0xC1`,
//! zero padding and a trailing zero-sum checksum. The fixed field slots come
//! first in layout order; anything after them is a custom field.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;
pub mod writer;

pub use error::AreaError;
pub use parser::{parse_board_area, parse_chassis_area, parse_product_area};
pub use writer::{InfoArea, write_info_area};
