use geostamp_common::error::ErrorKind;
use geostamp_common::math::MathError;

use crate::internal::{Ifd, TagIfd, Type};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown byte order {0:x?}")]
    UnknownByteOrder([u8; 2]),
    #[error("Wrong magic bytes {0}, expected 42")]
    MagicBytesWrong(u16),
    #[error("Unexpected end of data in TIFF header")]
    HeaderEof,
    #[error("IFD {0:?} extends past the end of the data")]
    IfdEof(Ifd),
    #[error("Data of {0:?} extends past the end of the data")]
    LookupEof(TagIfd),
    #[error("Position {0} is outside of the data")]
    PositionOutOfBounds(u32),
    #[error("Data size too large")]
    DataSizeTooLarge,
    #[error("Exif data larger than 4 GiB")]
    OffsetTooLarge,
    #[error("Wrong type for {tagifd:?}: expected {expected:?}, found {actual:?}")]
    WrongType {
        tagifd: TagIfd,
        expected: (Option<u32>, &'static [Type]),
        actual: (u32, Type),
    },
    #[error("Rational with zero denominator in {0:?}")]
    ZeroDenominator(TagIfd),
    #[error("Text for {0:?} contains a NUL byte")]
    InvalidText(TagIfd),
    #[error("Invalid GPS reference {0:?}")]
    InvalidRef(String),
    #[error("Math: {0}")]
    Math(#[from] MathError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownByteOrder(_)
            | Self::MagicBytesWrong(_)
            | Self::HeaderEof
            | Self::IfdEof(_)
            | Self::PositionOutOfBounds(_)
            | Self::DataSizeTooLarge
            | Self::OffsetTooLarge
            | Self::Math(_) => ErrorKind::CorruptContainer,
            Self::LookupEof(_)
            | Self::WrongType { .. }
            | Self::ZeroDenominator(_)
            | Self::InvalidText(_)
            | Self::InvalidRef(_) => ErrorKind::MalformedField,
        }
    }
}

pub(crate) trait ResultExt<T> {
    fn e(self, err: Error) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E> {
    fn e(self, err: Error) -> Result<T> {
        self.map_err(|_| err)
    }
}

impl<T> ResultExt<T> for Option<T> {
    fn e(self, err: Error) -> Result<T> {
        self.ok_or(err)
    }
}
