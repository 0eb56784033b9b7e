#![doc = include_str!("../README.md")]

use std::io::Cursor;

use geostamp_common::error::ErrorKind;
use geostamp_common::isobmff::{BoxError, BoxType, Document};
use geostamp_common::math::*;
use geostamp_common::read::{ReadError, ReadExt, SliceExt};

/// Brands of the `ftyp` box that are accepted as HEIF
pub const BRANDS: &[&[u8; 4]] = &[
    b"heic", b"heix", b"heim", b"heis", b"hevc", b"hevx", b"mif1", b"msf1",
];

const EXIF_ITEM_TYPE: &[u8; 4] = b"Exif";

#[derive(Debug, Clone)]
pub struct Heif<'a> {
    data: &'a [u8],
    document: Document<'a>,
}

impl<'a> Heif<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self, Error> {
        if !Self::is_filetype(data) {
            return Err(Error::NotHeif);
        }

        let document = Document::new(data)?;

        Ok(Self { data, document })
    }

    /// Checks for an `ftyp` box with a HEIF major brand
    pub fn is_filetype(data: &[u8]) -> bool {
        data.get(4..8) == Some(BoxType::File.bytes().as_slice())
            && data
                .get(8..12)
                .is_some_and(|brand| BRANDS.iter().any(|x| x.as_slice() == brand))
    }

    /// Exif block of the `Exif` item, starting with the TIFF header
    ///
    /// Returns `None` if the file has no `Exif` item.
    pub fn exif(&self) -> Result<Option<&'a [u8]>, Error> {
        let Some(meta) = self.document.first(BoxType::Meta) else {
            tracing::debug!("No meta box found");
            return Ok(None);
        };

        let (_, _, meta_payload) = meta.full_box()?;
        let meta = Document::new(meta_payload)?;

        let Some(item_id) = Self::exif_item_id(&meta)? else {
            return Ok(None);
        };
        tracing::debug!("Exif item has ID {item_id}");

        let item = Self::item_data(&meta, item_id, self.data)?;

        // Item starts with the offset to the TIFF header
        let mut cur = Cursor::new(item);
        let header_offset = cur.read_be_u32()?.usize()?;
        let start = header_offset.safe_add(4)?;

        item.get(start..).ok_or(Error::ExifOutOfBounds).map(Some)
    }

    fn exif_item_id(meta: &Document<'a>) -> Result<Option<u32>, Error> {
        let Some(iinf) = meta.first(BoxType::ItemInfo) else {
            return Ok(None);
        };

        let (version, _, payload) = iinf.full_box()?;
        let entries_start = if version == 0 { 2 } else { 4 };
        let entries = payload.get(entries_start..).ok_or(Error::UnexpectedEof)?;

        for infe in Document::new(entries)?.boxes_type(BoxType::ItemInfoEntry) {
            let (version, _, payload) = infe.full_box()?;
            if version < 2 {
                // Older entries carry no item type
                continue;
            }

            let mut cur = Cursor::new(payload);
            let item_id = if version == 2 {
                u32::from(cur.read_be_u16()?)
            } else {
                cur.read_be_u32()?
            };
            let _protection_index = cur.read_be_u16()?;
            let item_type: [u8; 4] = cur.read_array()?;
            let item_name = cur.slice_until(0).unwrap_or_default();
            tracing::debug!(
                "Item {item_id} of type {:?} named {:?}",
                String::from_utf8_lossy(&item_type),
                String::from_utf8_lossy(item_name)
            );

            if &item_type == EXIF_ITEM_TYPE {
                return Ok(Some(item_id));
            }
        }

        Ok(None)
    }

    /// Concatenated extents of an item
    fn item_data(meta: &Document<'a>, item_id: u32, data: &'a [u8]) -> Result<&'a [u8], Error> {
        let iloc = meta
            .first(BoxType::ItemLocation)
            .ok_or(Error::ItemLocationMissing)?;
        let (version, _, payload) = iloc.full_box()?;

        let mut cur = Cursor::new(payload);
        let [sizes_1, sizes_2]: [u8; 2] = cur.read_array()?;
        let offset_size = sizes_1 >> 4;
        let length_size = sizes_1 & 0xF;
        let base_offset_size = sizes_2 >> 4;
        let index_size = if version == 1 || version == 2 {
            sizes_2 & 0xF
        } else {
            0
        };

        let item_count = if version < 2 {
            u32::from(cur.read_be_u16()?)
        } else {
            cur.read_be_u32()?
        };

        for _ in 0..item_count {
            let id = if version < 2 {
                u32::from(cur.read_be_u16()?)
            } else {
                cur.read_be_u32()?
            };

            let construction_method = if version == 1 || version == 2 {
                cur.read_be_u16()? & 0xF
            } else {
                0
            };

            let _data_reference_index = cur.read_be_u16()?;
            let base_offset = cur.read_be_uint(base_offset_size)?;
            let extent_count = cur.read_be_u16()?;

            let mut extents = Vec::new();
            for _ in 0..extent_count {
                let _extent_index = cur.read_be_uint(index_size)?;
                let offset = cur.read_be_uint(offset_size)?;
                let length = cur.read_be_uint(length_size)?;
                extents.push((offset, length));
            }

            if id != item_id {
                continue;
            }

            let source = match construction_method {
                0 => data,
                1 => meta
                    .first(BoxType::ItemData)
                    .ok_or(Error::ItemDataMissing)?
                    .data(),
                method => return Err(Error::UnsupportedConstructionMethod(method)),
            };

            // Nearly all writers use a single extent
            let [(offset, length)] = extents.as_slice() else {
                return Err(Error::UnsupportedExtentCount(extents.len()));
            };

            let start = base_offset.safe_add(*offset)?.usize()?;
            let end = if *length == 0 {
                source.len()
            } else {
                start.safe_add(length.usize()?)?
            };

            return source.get(start..end).ok_or(Error::ExifOutOfBounds);
        }

        Err(Error::ItemLocationMissing)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not a HEIF file")]
    NotHeif,
    #[error("Unexpected end of data")]
    UnexpectedEof,
    #[error("Box: {0}")]
    Box(#[from] BoxError),
    #[error("Read: {0}")]
    Read(#[from] ReadError),
    #[error("Math: {0}")]
    Math(#[from] MathError),
    #[error("Location of the Exif item missing")]
    ItemLocationMissing,
    #[error("Item data box missing")]
    ItemDataMissing,
    #[error("Unsupported item construction method {0}")]
    UnsupportedConstructionMethod(u16),
    #[error("Unsupported number of extents {0}")]
    UnsupportedExtentCount(usize),
    #[error("Exif item extends beyond the end of the data")]
    ExifOutOfBounds,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedConstructionMethod(_) | Self::UnsupportedExtentCount(_) => {
                ErrorKind::MalformedField
            }
            _ => ErrorKind::CorruptContainer,
        }
    }
}
