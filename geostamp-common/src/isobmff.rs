//! Minimal ISO base media file format (ISOBMFF) box walking
//!
//! Only walks one level of boxes. Nested boxes are read by creating a new
//! [`Document`] from a box's payload.

use std::io::Cursor;

use crate::math::*;
use crate::read::{ReadError, ReadExt};
use crate::utils;

#[derive(Clone, Debug)]
pub struct ObjectBox<'a> {
    box_type: BoxType,
    pos: usize,
    data: &'a [u8],
}

impl<'a> ObjectBox<'a> {
    pub fn box_type(&self) -> BoxType {
        self.box_type
    }

    /// Position of the box header relative to the walked data
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Payload after the box header
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Payload of a full box, with version and flags split off
    pub fn full_box(&self) -> Result<(u8, [u8; 3], &'a [u8]), BoxError> {
        let (&version, rest) = self.data.split_first().ok_or(BoxError::UnexpectedEof)?;
        let flags = rest.get(..3).ok_or(BoxError::UnexpectedEof)?;
        let payload = rest.get(3..).ok_or(BoxError::UnexpectedEof)?;

        Ok((version, [flags[0], flags[1], flags[2]], payload))
    }
}

#[derive(Debug, Clone)]
pub struct Document<'a> {
    boxes: Vec<ObjectBox<'a>>,
}

impl<'a> Document<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self, BoxError> {
        let boxes = Self::find_boxes(data)?;
        Ok(Self { boxes })
    }

    pub fn boxes(&self) -> &[ObjectBox<'a>] {
        &self.boxes
    }

    /// List all boxes with the given type
    pub fn boxes_type(&self, box_type: BoxType) -> impl Iterator<Item = &ObjectBox<'a>> {
        self.boxes.iter().filter(move |x| x.box_type == box_type)
    }

    pub fn first(&self, box_type: BoxType) -> Option<&ObjectBox<'a>> {
        self.boxes_type(box_type).next()
    }

    fn find_boxes(data: &'a [u8]) -> Result<Vec<ObjectBox<'a>>, BoxError> {
        let mut boxes = Vec::new();
        let mut box_start = 0_usize;

        while box_start < data.len() {
            let mut header = Cursor::new(data.get(box_start..).ok_or(BoxError::UnexpectedEof)?);

            let size = header.read_be_u32()?;
            let box_type = BoxType::from(header.read_be_u32()?);

            let size: usize = match size {
                // Box extends to the end of the data
                0 => data.len().safe_sub(box_start)?,
                // 64 bit size follows
                1 => header.read_be_u64()?.usize()?,
                size => size.usize()?,
            };

            let header_len = header.position().usize()?;
            let box_end = box_start.safe_add(size)?;

            let payload = data
                .get(box_start.safe_add(header_len)?..box_end)
                .ok_or(BoxError::BoxOutOfBounds { box_type, box_end })?;

            tracing::debug!("Found box {box_type:?} of size {size} at {box_start}");

            boxes.push(ObjectBox {
                box_type,
                pos: box_start,
                data: payload,
            });

            box_start = box_end;
        }

        Ok(boxes)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BoxError {
    #[error("Unexpected end of data")]
    UnexpectedEof,
    #[error("Box {box_type:?} ends at {box_end} which is outside of the data")]
    BoxOutOfBounds { box_type: BoxType, box_end: usize },
    #[error("Math: {0}")]
    Math(#[from] MathError),
    #[error("Read: {0}")]
    Read(#[from] ReadError),
}

utils::convertible_enum!(
    #[repr(u32)]
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
    /// Four character code of a box
    ///
    /// The value is stored as big endian [`u32`] of the original byte string.
    pub enum BoxType {
        File = b(b"ftyp"),
        Meta = b(b"meta"),
        Handler = b(b"hdlr"),
        PrimaryItem = b(b"pitm"),
        ItemInfo = b(b"iinf"),
        ItemInfoEntry = b(b"infe"),
        ItemLocation = b(b"iloc"),
        ItemData = b(b"idat"),
        MediaData = b(b"mdat"),
    }
);

impl BoxType {
    /// Returns the byte string of the box type
    pub fn bytes(self) -> [u8; 4] {
        u32::to_be_bytes(self.into())
    }
}

/// Convert bytes to u32
const fn b(d: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*d)
}
