#![doc = include_str!("../README.md")]

use geostamp_common::error::ErrorKind;
use geostamp_common::math::*;

pub const EXIF_IDENTIFIER_STRING: &[u8] = b"Exif\0\0";

/// Largest payload of a segment, the length field includes its own two bytes
pub const MAX_SEGMENT_PAYLOAD: usize = 65533;

const MARKER_START: u8 = 0xFF;
const SOI: [u8; 2] = [MARKER_START, 0xD8];

#[derive(Clone, Debug)]
pub struct Segment<'a> {
    marker: Marker,
    pos: usize,
    /// Complete segment including marker and length
    raw: &'a [u8],
    data: &'a [u8],
}

impl<'a> Segment<'a> {
    pub fn marker(&self) -> Marker {
        self.marker
    }

    /// Position of the marker
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Payload after the length field
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn raw(&self) -> &'a [u8] {
        self.raw
    }

    pub fn is_exif(&self) -> bool {
        self.marker == Marker::APP1 && self.data.starts_with(EXIF_IDENTIFIER_STRING)
    }
}

#[derive(Clone, Debug)]
pub struct Jpeg<'a> {
    data: &'a [u8],
    segments: Vec<Segment<'a>>,
    /// Start of the data that follows the last segment
    segments_end: usize,
}

impl<'a> Jpeg<'a> {
    /// Walks all segments up to and including the start of scan
    pub fn new(data: &'a [u8]) -> Result<Self, Error> {
        if !data.starts_with(&SOI) {
            return Err(Error::NoStartOfImage);
        }

        let (segments, segments_end) = Self::find_segments(data)?;

        Ok(Self {
            data,
            segments,
            segments_end,
        })
    }

    pub fn is_filetype(data: &[u8]) -> bool {
        data.starts_with(&[MARKER_START, 0xD8, MARKER_START])
    }

    /// List all segments in their order of appearance
    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    /// List all segments with the given marker
    pub fn segments_marker(&self, marker: Marker) -> impl Iterator<Item = &Segment<'a>> {
        self.segments.iter().filter(move |x| x.marker == marker)
    }

    pub fn exif(&self) -> impl Iterator<Item = &Segment<'a>> {
        self.segments.iter().filter(|x| x.is_exif())
    }

    /// Exif blocks without the identifier, starting with the TIFF header
    pub fn exif_data(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        self.exif()
            .filter_map(|x| x.data().get(EXIF_IDENTIFIER_STRING.len()..))
    }

    /// Returns new data with `exif` as the only Exif segment
    ///
    /// An existing Exif segment is replaced in place and further Exif
    /// segments are dropped. Without an existing segment, the new one is
    /// placed after the start of image and a leading `APP0` (JFIF) segment.
    pub fn replace_exif(&self, exif: &[u8]) -> Result<Vec<u8>, Error> {
        let payload_len = EXIF_IDENTIFIER_STRING.len().safe_add(exif.len())?;
        if payload_len > MAX_SEGMENT_PAYLOAD {
            return Err(Error::ExifTooLarge(payload_len));
        }

        let mut new_segment = Vec::with_capacity(payload_len.safe_add(4)?);
        new_segment.extend_from_slice(&[MARKER_START, Marker::APP1.into()]);
        new_segment.extend_from_slice(&payload_len.safe_add(2)?.u16()?.to_be_bytes());
        new_segment.extend_from_slice(EXIF_IDENTIFIER_STRING);
        new_segment.extend_from_slice(exif);

        let has_exif = self.segments.iter().any(Segment::is_exif);
        let insert_after_app0 = self
            .segments
            .first()
            .is_some_and(|x| x.marker == Marker::APP0);

        let mut out = Vec::with_capacity(self.data.len().safe_add(new_segment.len())?);
        out.extend_from_slice(&SOI);

        if !has_exif && !insert_after_app0 {
            out.extend_from_slice(&new_segment);
        }

        let mut exif_written = false;
        for (i, segment) in self.segments.iter().enumerate() {
            if segment.is_exif() {
                if !exif_written {
                    out.extend_from_slice(&new_segment);
                    exif_written = true;
                } else {
                    tracing::debug!("Dropping additional Exif segment at {}", segment.pos);
                }
                continue;
            }

            out.extend_from_slice(segment.raw);

            if i == 0 && !has_exif && insert_after_app0 {
                out.extend_from_slice(&new_segment);
            }
        }

        let rest = self
            .data
            .get(self.segments_end..)
            .ok_or(Error::UnexpectedEof)?;
        out.extend_from_slice(rest);

        Ok(out)
    }

    fn find_segments(data: &'a [u8]) -> Result<(Vec<Segment<'a>>, usize), Error> {
        let mut segments = Vec::new();
        let mut pos = SOI.len();

        loop {
            if pos == data.len() {
                tracing::debug!("Data ended without start of scan");
                break;
            }

            let prefix = *data.get(pos).ok_or(Error::UnexpectedEof)?;
            if prefix != MARKER_START {
                return Err(Error::MarkerExpected(pos));
            }

            let marker_byte = *data.get(pos.safe_add(1)?).ok_or(Error::UnexpectedEof)?;
            if marker_byte == MARKER_START {
                // Fill byte
                pos = pos.safe_add(1)?;
                continue;
            }

            let marker = Marker::from(marker_byte);

            if marker == Marker::EOI {
                break;
            }

            if !marker.has_length() {
                let end = pos.safe_add(2)?;
                segments.push(Segment {
                    marker,
                    pos,
                    raw: data.get(pos..end).ok_or(Error::UnexpectedEof)?,
                    data: &[],
                });
                pos = end;
                continue;
            }

            let len_start = pos.safe_add(2)?;
            let len_bytes = data
                .get(len_start..len_start.safe_add(2)?)
                .ok_or(Error::UnexpectedEof)?;
            let len = u16::from_be_bytes([len_bytes[0], len_bytes[1]]);

            if len < 2 {
                return Err(Error::InvalidSegmentLength(len));
            }

            let end = len_start.safe_add(len.usize()?)?;
            let raw = data
                .get(pos..end)
                .ok_or(Error::SegmentOutOfBounds { marker, pos })?;
            let payload = raw.get(4..).ok_or(Error::UnexpectedEof)?;

            tracing::debug!("Found segment {marker:?} of length {len} at {pos}");

            segments.push(Segment {
                marker,
                pos,
                raw,
                data: payload,
            });

            pos = end;

            if marker == Marker::SOS {
                break;
            }
        }

        Ok((segments, pos))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Start of image marker missing")]
    NoStartOfImage,
    #[error("Expected marker at position {0}")]
    MarkerExpected(usize),
    #[error("Unexpected end of data")]
    UnexpectedEof,
    #[error("Segment {marker:?} at {pos} extends beyond the end of the data")]
    SegmentOutOfBounds { marker: Marker, pos: usize },
    #[error("Invalid segment length {0}")]
    InvalidSegmentLength(u16),
    #[error("Exif data of {0} bytes does not fit into an APP1 segment")]
    ExifTooLarge(usize),
    #[error("Math: {0}")]
    Math(#[from] MathError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ExifTooLarge(_) => ErrorKind::MalformedField,
            _ => ErrorKind::CorruptContainer,
        }
    }
}

geostamp_common::utils::convertible_enum!(
    #[repr(u8)]
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub enum Marker {
        /// Temporary use in arithmetic coding
        TEM = 0x01,
        SOF0 = 0xC0,
        SOF1 = 0xC1,
        SOF2 = 0xC2,
        /// Define Huffman table
        DHT = 0xC4,
        RST0 = 0xD0,
        RST1 = 0xD1,
        RST2 = 0xD2,
        RST3 = 0xD3,
        RST4 = 0xD4,
        RST5 = 0xD5,
        RST6 = 0xD6,
        RST7 = 0xD7,
        /// Start of image
        SOI = 0xD8,
        /// End of image
        EOI = 0xD9,
        /// Start of scan
        SOS = 0xDA,
        DQT = 0xDB,
        APP0 = 0xE0,
        /// Exif, XMP
        APP1 = 0xE1,
        /// ICC color profile
        APP2 = 0xE2,
        APP3 = 0xE3,
        APP4 = 0xE4,
        APP5 = 0xE5,
        APP6 = 0xE6,
        APP7 = 0xE7,
        APP8 = 0xE8,
        /// Comment
        COM = 0xFE,
    }
);

impl Marker {
    /// Whether the marker is followed by a length field
    pub fn has_length(self) -> bool {
        !matches!(
            self,
            Self::TEM
                | Self::RST0
                | Self::RST1
                | Self::RST2
                | Self::RST3
                | Self::RST4
                | Self::RST5
                | Self::RST6
                | Self::RST7
                | Self::SOI
                | Self::EOI
        )
    }
}
