use geostamp_common::error::ErrorKind;
use geostamp_common::math::MathError;
use geostamp_common::read::ReadError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unexpected end of file")]
    UnexpectedEof,
    #[error("Invalid magic bytes: {0:x?}")]
    InvalidMagicBytes(Vec<u8>),
    #[error("Chunk {chunk_type:?} at {pos} extends beyond the end of the data")]
    ChunkOutOfBounds {
        chunk_type: crate::ChunkType,
        pos: usize,
    },
    #[error("IEND chunk missing")]
    NoIendChunk,
    #[error("Unexpected end of chunk data")]
    UnexpectedEndOfChunkData,
    #[error("Invalid keyword of length {0}")]
    InvalidKeyword(usize),
    #[error("Text for keyword {0:?} contains a NUL byte")]
    InvalidText(String),
    #[error("Read: {0}")]
    Read(#[from] ReadError),
    #[error("Math: {0}")]
    Math(#[from] MathError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnexpectedEndOfChunkData | Self::InvalidKeyword(_) | Self::InvalidText(_) => {
                ErrorKind::MalformedField
            }
            Self::Read(_) => ErrorKind::MalformedField,
            _ => ErrorKind::CorruptContainer,
        }
    }
}
