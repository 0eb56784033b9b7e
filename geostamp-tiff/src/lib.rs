#![doc = include_str!("../README.md")]

use geostamp_common::error::ErrorKind;
use geostamp_common::metadata::MetadataInfo;

const LE_MAGIC_BYTES: &[u8] = b"II*\0";
const BE_MAGIC_BYTES: &[u8] = b"MM\0*";

#[derive(Debug, Clone)]
pub struct Tiff<'a> {
    data: &'a [u8],
}

/// Representation of a TIFF image
impl<'a> Tiff<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self, Error> {
        if !Self::is_filetype(data) {
            return Err(Error::InvalidMagicBytes);
        }

        Ok(Self { data })
    }

    pub fn is_filetype(data: &[u8]) -> bool {
        data.starts_with(LE_MAGIC_BYTES) || data.starts_with(BE_MAGIC_BYTES)
    }

    pub fn exif(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the file with `metadata` written into its primary IFD
    ///
    /// Fails if the file's directories can't be decoded.
    pub fn write_metadata(&self, metadata: &MetadataInfo) -> Result<Vec<u8>, Error> {
        Ok(geostamp_exif::write_metadata_strict(self.data, metadata)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid TIFF magic bytes")]
    InvalidMagicBytes,
    #[error("Exif: {0}")]
    Exif(#[from] geostamp_exif::error::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidMagicBytes => ErrorKind::CorruptContainer,
            Self::Exif(err) => err.kind(),
        }
    }
}
