use std::io::Cursor;

use geostamp_common::read::{ReadExt, SliceExt};

use crate::*;

#[derive(Debug, Clone)]
pub struct Chunk<'a> {
    chunk_type: ChunkType,
    /// Data between type and CRC
    chunk_data: &'a [u8],
    crc: [u8; 4],
    /// Complete chunk including length, type and CRC
    complete: &'a [u8],
}

/// Content of an [`iTXt`](ChunkType::iTXt) chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itxt<'a> {
    pub keyword: &'a [u8],
    pub compressed: bool,
    pub compression_method: u8,
    pub language_tag: &'a [u8],
    pub translated_keyword: &'a [u8],
    /// UTF-8 text, still compressed if `compressed` is set
    pub text: &'a [u8],
}

impl<'a> Chunk<'a> {
    /// Splits a complete chunk
    pub(crate) fn from_complete(chunk_type: ChunkType, complete: &'a [u8]) -> Result<Self, Error> {
        let crc_start = complete
            .len()
            .checked_sub(4)
            .ok_or(Error::UnexpectedEof)?;

        let chunk_data = complete.get(8..crc_start).ok_or(Error::UnexpectedEof)?;
        let crc = complete.get(crc_start..).ok_or(Error::UnexpectedEof)?;

        Ok(Self {
            chunk_type,
            chunk_data,
            crc: [crc[0], crc[1], crc[2], crc[3]],
            complete,
        })
    }

    pub fn chunk_type(&self) -> ChunkType {
        self.chunk_type
    }

    pub fn chunk_data(&self) -> &'a [u8] {
        self.chunk_data
    }

    pub fn crc(&self) -> u32 {
        u32::from_be_bytes(self.crc)
    }

    /// Whether the stored CRC matches type and data
    pub fn crc_is_valid(&self) -> bool {
        crc::chunk_crc(self.chunk_type.bytes(), self.chunk_data) == self.crc()
    }

    /// Complete chunk as stored in the file
    pub fn raw(&self) -> &'a [u8] {
        self.complete
    }

    pub fn keyword(&self) -> Result<&'a [u8], Error> {
        let data = self.chunk_data;

        let keyword_length = data.iter().take_while(|x| **x != 0).count();

        data.get(..keyword_length)
            .ok_or(Error::UnexpectedEndOfChunkData)
    }

    /// Returns keyword and value of a [`tEXt`](ChunkType::tEXt) chunk
    ///
    /// Both are Latin-1 encoded.
    pub fn text(&self) -> Result<(&'a [u8], &'a [u8]), Error> {
        let mut cur = Cursor::new(self.chunk_data);
        let keyword = cur
            .slice_until(0)
            .map_err(|_| Error::UnexpectedEndOfChunkData)?;
        let text = cur.slice_to_end()?;

        Ok((keyword, text))
    }

    /// Returns the content of an [`iTXt`](ChunkType::iTXt) chunk
    pub fn itxt(&self) -> Result<Itxt<'a>, Error> {
        let mut cur = Cursor::new(self.chunk_data);

        let keyword = cur
            .slice_until(0)
            .map_err(|_| Error::UnexpectedEndOfChunkData)?;
        let compressed = cur.read_byte()? != 0;
        let compression_method = cur.read_byte()?;
        let language_tag = cur
            .slice_until(0)
            .map_err(|_| Error::UnexpectedEndOfChunkData)?;
        let translated_keyword = cur
            .slice_until(0)
            .map_err(|_| Error::UnexpectedEndOfChunkData)?;
        let text = cur.slice_to_end()?;

        Ok(Itxt {
            keyword,
            compressed,
            compression_method,
            language_tag,
            translated_keyword,
            text,
        })
    }
}
