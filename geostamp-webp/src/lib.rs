#![doc = include_str!("../README.md")]

use geostamp_common::error::ErrorKind;
use geostamp_common::math::*;

pub const RIFF_MAGIC_BYTES: &[u8] = b"RIFF";
pub const WEBP_MAGIC_BYTES: &[u8] = b"WEBP";

/// Prefix that some writers put in front of the TIFF header
pub const EXIF_IDENTIFIER_STRING: &[u8] = b"Exif\0\0";

/// Flags in the first byte of the [`VP8X`](FourCC::VP8X) payload
pub mod flags {
    pub const ICC: u8 = 0x20;
    pub const ALPHA: u8 = 0x10;
    pub const EXIF: u8 = 0x08;
    pub const XMP: u8 = 0x04;
    pub const ANIMATION: u8 = 0x02;
}

const VP8X_LEN: usize = 10;
const VP8_START_CODE: [u8; 3] = [0x9D, 0x01, 0x2A];
const VP8L_SIGNATURE: u8 = 0x2F;

/// Representation of a WEBP image
#[derive(Debug, Clone)]
pub struct WebP<'a> {
    data: &'a [u8],
    chunks: Vec<Chunk<'a>>,
}

impl<'a> WebP<'a> {
    /// Returns WEBP image representation
    ///
    /// * `data`: WEBP image data starting with RIFF magic byte
    pub fn new(data: &'a [u8]) -> Result<Self, Error> {
        let chunks = Self::find_chunks(data)?;

        Ok(Self { data, chunks })
    }

    /// Checks if passed data have RIFF and WEBP magic bytes
    pub fn is_filetype(data: &[u8]) -> bool {
        data.starts_with(RIFF_MAGIC_BYTES) && data.get(8..12) == Some(WEBP_MAGIC_BYTES)
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Returns all chunks
    pub fn chunks(&self) -> &[Chunk<'a>] {
        &self.chunks
    }

    pub fn chunks_four_cc(&self, four_cc: FourCC) -> impl Iterator<Item = &Chunk<'a>> {
        self.chunks.iter().filter(move |x| x.four_cc() == four_cc)
    }

    /// Payload of the first [`EXIF`](FourCC::EXIF) chunk
    ///
    /// An `Exif\0\0` prefix is removed.
    pub fn exif(&self) -> Option<&'a [u8]> {
        let payload = self.chunks_four_cc(FourCC::EXIF).next()?.payload();

        Some(
            payload
                .strip_prefix(EXIF_IDENTIFIER_STRING)
                .unwrap_or(payload),
        )
    }

    /// Canvas width and height from the first image bitstream
    pub fn canvas_size(&self) -> Result<(u32, u32), Error> {
        if let Some(vp8x) = self.chunks_four_cc(FourCC::VP8X).next() {
            return vp8x_canvas_size(vp8x.payload());
        }

        let chunk = self
            .chunks
            .iter()
            .find(|x| matches!(x.four_cc(), FourCC::VP8 | FourCC::VP8L))
            .ok_or(Error::NoImageData)?;

        bitstream_canvas_size(chunk)
    }

    /// Returns a new image with `exif` as the only EXIF chunk
    ///
    /// The chunk is placed after the last image data chunk. The EXIF flag of
    /// the `VP8X` chunk is set. Images in the simple format get a new `VP8X`
    /// chunk.
    pub fn replace_exif(&self, exif: &[u8]) -> Result<Vec<u8>, Error> {
        let last_image_data = self
            .chunks
            .iter()
            .rposition(|x| x.four_cc().is_image_data())
            .ok_or(Error::NoImageData)?;

        let has_vp8x = self.chunks_four_cc(FourCC::VP8X).next().is_some();

        let mut chunks = Vec::new();

        if !has_vp8x {
            tracing::debug!("Converting simple format to extended format");
            chunks.extend(create_chunk(FourCC::VP8X, &self.synthesize_vp8x()?)?);
        }

        for (n, chunk) in self.chunks.iter().enumerate() {
            match chunk.four_cc() {
                FourCC::EXIF => {
                    tracing::debug!("Dropping existing EXIF chunk at {}", chunk.pos());
                }
                FourCC::VP8X => {
                    let mut payload = chunk.payload().to_vec();
                    let features = payload.first_mut().ok_or(Error::InvalidVp8x)?;
                    *features |= flags::EXIF;
                    chunks.extend(create_chunk(FourCC::VP8X, &payload)?);
                }
                four_cc => {
                    chunks.extend(create_chunk(four_cc, chunk.payload())?);
                }
            }

            if n == last_image_data {
                chunks.extend(create_chunk(FourCC::EXIF, exif)?);
            }
        }

        let riff_size = chunks.len().safe_add(WEBP_MAGIC_BYTES.len())?.u32()?;

        let mut out = Vec::with_capacity(chunks.len().safe_add(12)?);
        out.extend_from_slice(RIFF_MAGIC_BYTES);
        out.extend_from_slice(&riff_size.to_le_bytes());
        out.extend_from_slice(WEBP_MAGIC_BYTES);
        out.extend(chunks);

        Ok(out)
    }

    /// `VP8X` payload for an image in the simple format
    fn synthesize_vp8x(&self) -> Result<[u8; VP8X_LEN], Error> {
        let chunk = self
            .chunks
            .iter()
            .find(|x| matches!(x.four_cc(), FourCC::VP8 | FourCC::VP8L))
            .ok_or(Error::NoImageData)?;

        let (width, height) = bitstream_canvas_size(chunk)?;

        let mut features = flags::EXIF;
        if chunk.four_cc() == FourCC::VP8L && vp8l_has_alpha(chunk.payload())? {
            features |= flags::ALPHA;
        }

        let width = width.safe_sub(1)?.to_le_bytes();
        let height = height.safe_sub(1)?.to_le_bytes();

        Ok([
            features, 0, 0, 0, width[0], width[1], width[2], height[0], height[1], height[2],
        ])
    }

    /// List all chunks in the data
    fn find_chunks(data: &'a [u8]) -> Result<Vec<Chunk<'a>>, Error> {
        let header = data.get(..12).ok_or(Error::UnexpectedEof)?;

        let riff_magic_bytes = [header[0], header[1], header[2], header[3]];
        if riff_magic_bytes != RIFF_MAGIC_BYTES {
            return Err(Error::RiffMagicBytesMissing(riff_magic_bytes));
        }

        let riff_size = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

        let webp_magic_bytes = [header[8], header[9], header[10], header[11]];
        if webp_magic_bytes != WEBP_MAGIC_BYTES {
            return Err(Error::WebpMagicBytesMissing(webp_magic_bytes));
        }

        // The RIFF size counts from behind the size field
        let riff_end = riff_size.usize()?.safe_add(8)?;
        if riff_end != data.len() {
            tracing::debug!(
                "RIFF size ends at {riff_end} but data has {} bytes",
                data.len()
            );
        }
        let end = riff_end.min(data.len());

        let mut chunks = Vec::new();
        let mut pos = 12;

        while pos < end {
            // 4 bytes FourCC followed by 4 bytes size
            let header = data
                .get(checked_range(pos, 8)?)
                .ok_or(Error::UnexpectedEof)?;
            let four_cc = FourCC::from(u32::from_le_bytes([
                header[0], header[1], header[2], header[3],
            ]));
            let size = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

            let payload_start = pos.safe_add(8)?;
            let payload = data
                .get(checked_range(payload_start, size.usize()?)?)
                .ok_or(Error::ChunkOutOfBounds { four_cc, pos })?;

            tracing::debug!("Found chunk {four_cc:?} of size {size} at {pos}");

            chunks.push(Chunk {
                four_cc,
                pos,
                payload,
            });

            // Payloads of odd size are followed by one byte padding
            pos = payload_start
                .safe_add(payload.len())?
                .safe_add(payload.len() & 1)?;
        }

        Ok(chunks)
    }
}

#[derive(Debug, Clone)]
pub struct Chunk<'a> {
    four_cc: FourCC,
    pos: usize,
    payload: &'a [u8],
}

impl<'a> Chunk<'a> {
    pub fn four_cc(&self) -> FourCC {
        self.four_cc
    }

    /// Position of the chunk header
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Length including header and padding
    pub fn total_len(&self) -> Result<usize, Error> {
        Ok(self
            .payload
            .len()
            .safe_add(8)?
            .safe_add(self.payload.len() & 1)?)
    }
}

/// Creates a complete chunk with header and padding
pub fn create_chunk(four_cc: FourCC, payload: &[u8]) -> Result<Vec<u8>, Error> {
    let size = payload.len().u32()?;
    let padding = payload.len() & 1;

    let mut chunk = Vec::with_capacity(payload.len().safe_add(8)?.safe_add(padding)?);
    chunk.extend_from_slice(&four_cc.bytes());
    chunk.extend_from_slice(&size.to_le_bytes());
    chunk.extend_from_slice(payload);
    if padding == 1 {
        chunk.push(0);
    }

    Ok(chunk)
}

fn vp8x_canvas_size(payload: &[u8]) -> Result<(u32, u32), Error> {
    let canvas = payload.get(4..VP8X_LEN).ok_or(Error::InvalidVp8x)?;

    let width = u32::from_le_bytes([canvas[0], canvas[1], canvas[2], 0]);
    let height = u32::from_le_bytes([canvas[3], canvas[4], canvas[5], 0]);

    Ok((width.safe_add(1)?, height.safe_add(1)?))
}

fn bitstream_canvas_size(chunk: &Chunk) -> Result<(u32, u32), Error> {
    let payload = chunk.payload();
    let invalid = || Error::InvalidBitstream(chunk.four_cc());

    match chunk.four_cc() {
        FourCC::VP8 => {
            // 3 bytes frame tag, 3 bytes start code, then 14 bit dimensions
            let header = payload.get(..10).ok_or_else(invalid)?;
            if header[3..6] != VP8_START_CODE {
                return Err(invalid());
            }

            let width = u16::from_le_bytes([header[6], header[7]]) & 0x3FFF;
            let height = u16::from_le_bytes([header[8], header[9]]) & 0x3FFF;

            Ok((width.into(), height.into()))
        }
        FourCC::VP8L => {
            let bits = vp8l_header(payload).ok_or_else(invalid)?;

            let width = (bits & 0x3FFF).safe_add(1)?;
            let height = (bits.checked_shr(14).unwrap_or_default() & 0x3FFF).safe_add(1)?;

            Ok((width, height))
        }
        _ => Err(invalid()),
    }
}

fn vp8l_has_alpha(payload: &[u8]) -> Result<bool, Error> {
    let bits = vp8l_header(payload).ok_or(Error::InvalidBitstream(FourCC::VP8L))?;

    Ok(bits & 0x1000_0000 != 0)
}

/// Signature byte followed by width, height and alpha bits
fn vp8l_header(payload: &[u8]) -> Option<u32> {
    let header = payload.get(..5)?;
    if header[0] != VP8L_SIGNATURE {
        return None;
    }

    Some(u32::from_le_bytes([header[1], header[2], header[3], header[4]]))
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("RIFF magic bytes missing: {0:?}")]
    RiffMagicBytesMissing([u8; 4]),
    #[error("WEBP magic bytes missing: {0:?}")]
    WebpMagicBytesMissing([u8; 4]),
    #[error("Unexpected end of file")]
    UnexpectedEof,
    #[error("Chunk {four_cc:?} at {pos} exceeds data")]
    ChunkOutOfBounds { four_cc: FourCC, pos: usize },
    #[error("No image data chunk (VP8, VP8L, ALPH, ANMF)")]
    NoImageData,
    #[error("Invalid VP8X chunk")]
    InvalidVp8x,
    #[error("Invalid {0:?} bitstream header")]
    InvalidBitstream(FourCC),
    #[error("Math: {0}")]
    Math(#[from] MathError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::CorruptContainer
    }
}

geostamp_common::utils::convertible_enum!(
    #[repr(u32)]
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
    #[non_exhaustive]
    #[allow(non_camel_case_types)]
    /// Type of a chunk
    ///
    /// The value is stored as little endian [`u32`] of the original byte
    /// string.
    pub enum FourCC {
        /// Information about features used in the file
        VP8X = b(b"VP8X"),
        /// Embedded ICC color profile
        ICCP = b(b"ICCP"),
        /// Global parameters of the animation.
        ANIM = b(b"ANIM"),

        /// Information about a single frame
        ANMF = b(b"ANMF"),
        /// Alpha data for this frame (only with [`VP8`](Self::VP8))
        ALPH = b(b"ALPH"),
        /// Lossy data for this frame
        VP8 = b(b"VP8 "),
        /// Lossless data for this frame
        VP8L = b(b"VP8L"),

        EXIF = b(b"EXIF"),
        XMP = b(b"XMP "),
    }
);

impl FourCC {
    /// Returns the byte string of the chunk
    pub fn bytes(self) -> [u8; 4] {
        u32::to_le_bytes(self.into())
    }

    /// Chunks that carry image or frame data
    pub fn is_image_data(self) -> bool {
        matches!(self, Self::VP8 | Self::VP8L | Self::ALPH | Self::ANMF)
    }
}

/// Convert bytes to u32
const fn b(d: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*d)
}
