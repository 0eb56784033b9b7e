use std::fmt::Debug;

geostamp_common::utils::convertible_enum!(
    #[repr(u32)]
    #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
    #[non_exhaustive]
    #[allow(non_camel_case_types)]
    /// Type of a chunk
    ///
    /// The value is stored as big endian [`u32`] of the original byte string.
    pub enum ChunkType {
        /// Header
        IHDR = b(b"IHDR"),
        /// Image Data
        IDAT = b(b"IDAT"),
        /// End of file
        IEND = b(b"IEND"),

        /// Exif
        eXIf = b(b"eXIf"),
        /// Embedded ICC profile
        iCCP = b(b"iCCP"),
        /// International textual data
        iTXt = b(b"iTXt"),
        /// Physical pixel dimensions
        pHYs = b(b"pHYs"),
        /// Textual information
        tEXt = b(b"tEXt"),
        /// Image last-modification time
        tIME = b(b"tIME"),
        /// Compressed textual data
        zTXt = b(b"zTXt"),
    }
);

impl Debug for ChunkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes = self.bytes();
        let name = String::from_utf8_lossy(&bytes);

        match self {
            Self::Unknown(_) => write!(f, "Unknown({name:?})"),
            _ => f.write_str(&name),
        }
    }
}

impl ChunkType {
    /// Returns the byte string of the chunk
    pub fn bytes(self) -> [u8; 4] {
        u32::to_be_bytes(self.into())
    }

    /// Chunks that can carry text metadata
    pub fn is_text(self) -> bool {
        matches!(self, Self::tEXt | Self::iTXt | Self::zTXt)
    }
}

/// Convert bytes to u32
const fn b(d: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*d)
}
