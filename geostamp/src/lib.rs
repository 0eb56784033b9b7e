//! Read and write GPS position, description and keywords of images
//!
//! The container format is selected by MIME type via the [`registry`].
//!
//! ```
//! let support = geostamp::registry::get_format_support("image/heic");
//! assert!(!support.can_write_metadata);
//!
//! let metadata = geostamp::MetadataInfo::new().with_description("Test");
//! let err = geostamp::write_metadata(vec![1, 2, 3], &metadata, "image/heic").unwrap_err();
//! assert_eq!(err.into_inner(), vec![1, 2, 3]);
//! ```

mod read;
pub mod registry;
mod write;

pub use geostamp_common::error::{ErrorKind, ErrorWithData};
pub use geostamp_common::geography::Location;
pub use geostamp_common::metadata::MetadataInfo;
pub use read::*;
pub use write::*;

use registry::FormatSupport;

/// 256 MiB
pub const DEFAULT_MAX_INPUT_LEN: usize = 268_435_456;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Inputs larger than this are rejected before parsing
    pub max_input_len: usize,
    /// Text of the PNG `Software` chunk
    pub software: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_input_len: DEFAULT_MAX_INPUT_LEN,
            software: format!("geostamp {}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Options {
    fn check_len(&self, data: &[u8]) -> Result<(), Error> {
        if data.len() > self.max_input_len {
            return Err(Error::InputTooLarge {
                len: data.len(),
                max: self.max_input_len,
            });
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Format {0:?} is not supported for this operation")]
    UnsupportedFormat(String),
    #[error("Input of {len} bytes is larger than the limit of {max} bytes")]
    InputTooLarge { len: usize, max: usize },
    #[error("PNG: {0}")]
    Png(#[from] geostamp_png::Error),
    #[error("WebP: {0}")]
    WebP(#[from] geostamp_webp::Error),
    #[error("JPEG: {0}")]
    Jpeg(#[from] geostamp_jpeg::Error),
    #[error("TIFF: {0}")]
    Tiff(#[from] geostamp_tiff::Error),
    #[error("HEIF: {0}")]
    Heif(#[from] geostamp_heif::Error),
    #[error("Exif: {0}")]
    Exif(#[from] geostamp_exif::error::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedFormat(_) | Self::InputTooLarge { .. } => ErrorKind::UnsupportedFormat,
            Self::Png(err) => err.kind(),
            Self::WebP(err) => err.kind(),
            Self::Jpeg(err) => err.kind(),
            Self::Tiff(err) => err.kind(),
            Self::Heif(err) => err.kind(),
            Self::Exif(err) => err.kind(),
        }
    }

    fn unsupported(mime_type: &str, support: &FormatSupport) -> Self {
        tracing::debug!("{mime_type}: {}", support.notes);
        Self::UnsupportedFormat(mime_type.to_string())
    }
}

static_assertions::assert_impl_all!(MetadataInfo: Send, Sync);
static_assertions::assert_impl_all!(Location: Send, Sync);
static_assertions::assert_impl_all!(FormatSupport: Send, Sync);
static_assertions::assert_impl_all!(Options: Send, Sync);
static_assertions::assert_impl_all!(Error: Send, Sync);
static_assertions::assert_impl_all!(ErrorWithData<Error>: Send, Sync);
