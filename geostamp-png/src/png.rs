use geostamp_common::math::*;

use crate::*;

pub const MAGIC_BYTES: &[u8] = &[137, 80, 78, 71, 13, 10, 26, 10];

/// Representation of a PNG image
#[derive(Debug, Clone)]
pub struct Png<'a> {
    data: &'a [u8],
    /// Chunks in the order in which they appear in the data
    chunks: Vec<Chunk<'a>>,
    /// Data after the `IEND` chunk
    trailing: &'a [u8],
}

impl<'a> Png<'a> {
    /// Returns PNG image representation
    ///
    /// * `data`: PNG image data starting with magic byte
    pub fn new(data: &'a [u8]) -> Result<Self, Error> {
        let (chunks, chunks_end) = Self::find_chunks(data)?;
        let trailing = data.get(chunks_end..).ok_or(Error::UnexpectedEof)?;

        if !trailing.is_empty() {
            tracing::debug!("{} bytes of data after IEND", trailing.len());
        }

        Ok(Self {
            data,
            chunks,
            trailing,
        })
    }

    /// Checks if passed data have PNG magic bytes
    pub fn is_filetype(data: &[u8]) -> bool {
        data.starts_with(MAGIC_BYTES)
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Returns all chunks
    pub fn chunks(&self) -> &[Chunk<'a>] {
        &self.chunks
    }

    pub fn chunks_type(&self, chunk_type: ChunkType) -> impl Iterator<Item = &Chunk<'a>> {
        self.chunks
            .iter()
            .filter(move |x| x.chunk_type() == chunk_type)
    }

    /// Data after the `IEND` chunk
    pub fn trailing(&self) -> &'a [u8] {
        self.trailing
    }

    /// Returns raw Exif data of the [`eXIf`](ChunkType::eXIf) chunk
    pub fn exif(&self) -> Option<&'a [u8]> {
        self.chunks_type(ChunkType::eXIf)
            .next()
            .map(|x| x.chunk_data())
    }

    /// List all chunks in the data up to `IEND`
    fn find_chunks(data: &'a [u8]) -> Result<(Vec<Chunk<'a>>, usize), Error> {
        let magic_bytes = data
            .get(..MAGIC_BYTES.len())
            .ok_or(Error::UnexpectedEof)?;
        if magic_bytes != MAGIC_BYTES {
            return Err(Error::InvalidMagicBytes(magic_bytes.to_vec()));
        }

        let mut chunks = Vec::new();
        let mut chunk_start = MAGIC_BYTES.len();

        loop {
            if chunk_start == data.len() {
                return Err(Error::NoIendChunk);
            }

            // First 4 bytes are length, next 4 bytes are chunk type
            let header = data
                .get(checked_range(chunk_start, 8)?)
                .ok_or(Error::UnexpectedEof)?;
            let length = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
            let chunk_type =
                ChunkType::from(u32::from_be_bytes([header[4], header[5], header[6], header[7]]));

            // Data followed by 4 bytes CRC
            let data_start = chunk_start.safe_add(8)?;
            let data_end = data_start.safe_add(length.usize()?)?;
            let chunk_end = data_end.safe_add(4)?;

            let complete = data
                .get(chunk_start..chunk_end)
                .ok_or(Error::ChunkOutOfBounds {
                    chunk_type,
                    pos: chunk_start,
                })?;

            let chunk = Chunk::from_complete(chunk_type, complete)?;

            tracing::debug!("Found chunk {chunk_type:?} of length {length} at {chunk_start}");
            if !chunk.crc_is_valid() {
                tracing::debug!("CRC of chunk {chunk_type:?} at {chunk_start} is invalid");
            }

            chunks.push(chunk);
            chunk_start = chunk_end;

            if chunk_type == ChunkType::IEND {
                break;
            }
        }

        Ok((chunks, chunk_start))
    }
}
