use std::ops::Range;

use geostamp_common::math::*;

use crate::error::{Error, Result};

/// Byte order aware view on the Exif data
#[derive(Debug, Clone, Copy)]
pub struct Raw<'a> {
    pub big_endian: bool,
    pub data: &'a [u8],
}

impl<'a> Raw<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            big_endian: false,
            data,
        }
    }

    pub fn get(&self, range: Range<u32>) -> Result<&'a [u8]> {
        let start = range.start.usize()?;
        let end = range.end.usize()?;

        self.data
            .get(start..end)
            .ok_or(Error::PositionOutOfBounds(range.end))
    }

    pub fn read_exact<const N: usize>(&self, pos: u32) -> Result<[u8; N]> {
        let end = pos.safe_add(N.u32()?)?;
        let mut bytes = [0; N];
        bytes.copy_from_slice(self.get(pos..end)?);
        Ok(bytes)
    }

    pub fn read_u16(&self, pos: u32) -> Result<u16> {
        Ok(self.u16_from(self.read_exact(pos)?))
    }

    pub fn read_u32(&self, pos: u32) -> Result<u32> {
        Ok(self.u32_from(self.read_exact(pos)?))
    }

    pub fn u16_from(&self, bytes: [u8; 2]) -> u16 {
        if self.big_endian {
            u16::from_be_bytes(bytes)
        } else {
            u16::from_le_bytes(bytes)
        }
    }

    pub fn u32_from(&self, bytes: [u8; 4]) -> u32 {
        if self.big_endian {
            u32::from_be_bytes(bytes)
        } else {
            u32::from_le_bytes(bytes)
        }
    }
}

/// Writes integers in the byte order of the Exif data
#[derive(Debug, Clone, Copy)]
pub struct Encoder {
    pub big_endian: bool,
}

impl Encoder {
    pub fn u16(&self, value: u16) -> [u8; 2] {
        if self.big_endian {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        }
    }

    pub fn u32(&self, value: u32) -> [u8; 4] {
        if self.big_endian {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        }
    }
}
