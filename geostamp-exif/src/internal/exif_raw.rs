mod debug;
mod decode;
mod edit;
mod lookup;

use std::collections::BTreeMap;

use geostamp_common::math::*;

use super::*;
use crate::error::{Error, Result};

/// Size of one IFD entry
pub const ENTRY_SIZE: u32 = 12;

#[derive(Debug, Clone, Copy)]
pub struct EntryRef {
    /// Position of the entry inside the data
    pub position: u32,
    pub data_type: Type,
    pub count: u32,
    pub value_offset: ValueOffset,
    /// The value/offset field exactly as stored
    pub raw_value: [u8; 4],
}

impl EntryRef {
    pub fn value_offset_position(&self) -> Result<u32> {
        Ok(self.position.safe_add(8)?)
    }

    pub fn data_len(&self) -> Result<u32> {
        Ok(self.count.safe_mul(self.data_type.size())?)
    }

    /// Location of the entry's data, inline or behind the offset
    pub fn data_location(&self) -> Result<std::ops::Range<u32>> {
        let start = match self.value_offset {
            ValueOffset::Value(_) => self.value_offset_position()?,
            ValueOffset::Offset(offset) => offset,
        };

        Ok(start..start.safe_add(self.data_len()?)?)
    }
}

/// This can either be a value or an offset where to find the value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOffset {
    Value(u32),
    Offset(u32),
}

impl ValueOffset {
    pub fn new(data_type: Type, count: u32, value: u32) -> Result<Self> {
        let Some(size) = data_type.size().checked_mul(count) else {
            return Err(Error::DataSizeTooLarge);
        };
        Ok(if size <= 4 {
            Self::Value(value)
        } else {
            Self::Offset(value)
        })
    }

    pub fn u32(&self) -> u32 {
        match self {
            Self::Value(x) => *x,
            Self::Offset(x) => *x,
        }
    }
}

/// Low level Exif decoder
///
/// Keeps the locations of all entries of the decoded IFDs. `data` starts with
/// the TIFF header (`II*\0` or `MM\0*`).
#[derive(Debug, Clone)]
pub struct ExifRaw<'a> {
    pub raw: Raw<'a>,
    pub locations: BTreeMap<TagIfd, Vec<EntryRef>>,
    /// Offsets at which the IFDs start
    pub ifd_locations: BTreeMap<Ifd, u32>,
    /// Offset of the next IFD stored after the primary IFD
    pub primary_next: u32,
}

impl<'a> ExifRaw<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            raw: Raw::new(data),
            locations: Default::default(),
            ifd_locations: Default::default(),
            primary_next: 0,
        }
    }

    pub fn raw(&self) -> Raw<'a> {
        self.raw
    }

    pub fn data(&self) -> &'a [u8] {
        self.raw.data
    }

    pub fn big_endian(&self) -> bool {
        self.raw.big_endian
    }

    /// All entries of an IFD in the order of their tags
    pub fn ifd_entries(&self, ifd: Ifd) -> impl Iterator<Item = (Tag, &EntryRef)> {
        self.locations
            .iter()
            .filter(move |(tagifd, _)| tagifd.ifd == ifd)
            .filter_map(|(tagifd, entries)| entries.first().map(|entry| (tagifd.tag, entry)))
    }
}
