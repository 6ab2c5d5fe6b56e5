//! Common header and offset table.
//!
//! The 8-byte header carries a format version, one block offset per area
//! (0 = absent), a reserved byte and a zero-sum checksum. Decoding validates
//! the checksum before any offset is trusted, then checks that present areas
//! appear in order without overlapping. Encoding lays areas out back to back
//! in `AreaKind::ALL` order.

pub mod error;
pub mod layout;
pub mod parser;
pub mod writer;

use std::ops::{Index, IndexMut};

use crate::AreaKind;

pub use error::HeaderError;
pub use parser::{locate_areas, parse_common_header};
pub use writer::assemble_image;

/// Fixed-size table with one optional slot per area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaTable<T>([Option<T>; 4]);

impl<T> AreaTable<T> {
    pub fn new() -> Self {
        Self([None, None, None, None])
    }

    pub fn iter(&self) -> impl Iterator<Item = (AreaKind, &T)> {
        AreaKind::ALL
            .into_iter()
            .filter_map(move |kind| self[kind].as_ref().map(|value| (kind, value)))
    }
}

impl<T> Default for AreaTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<AreaKind> for AreaTable<T> {
    type Output = Option<T>;

    fn index(&self, kind: AreaKind) -> &Self::Output {
        &self.0[kind.index()]
    }
}

impl<T> IndexMut<AreaKind> for AreaTable<T> {
    fn index_mut(&mut self, kind: AreaKind) -> &mut Self::Output {
        &mut self.0[kind.index()]
    }
}

/// Block offsets read from or written to the header. Zero means absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OffsetTable {
    pub internal_use: u8,
    areas: [u8; 4],
}

impl Index<AreaKind> for OffsetTable {
    type Output = u8;

    fn index(&self, kind: AreaKind) -> &u8 {
        &self.areas[kind.index()]
    }
}

impl IndexMut<AreaKind> for OffsetTable {
    fn index_mut(&mut self, kind: AreaKind) -> &mut u8 {
        &mut self.areas[kind.index()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonHeader {
    pub format_version: u8,
    pub offsets: OffsetTable,
}
