//! Capabilities per MIME type

/// How metadata is stored in a format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Method {
    /// EXIF/TIFF tag block
    Exif,
    /// EXIF chunk inside a RIFF container
    Riff,
    /// Format specific storage like PNG text chunks
    Custom,
}

/// Container format that a MIME type maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Format {
    Jpeg,
    Tiff,
    Heif,
    WebP,
    Png,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FormatSupport {
    pub can_read_gps: bool,
    pub can_write_gps: bool,
    pub can_read_metadata: bool,
    pub can_write_metadata: bool,
    pub method: Method,
    pub notes: &'static str,
    pub format: Option<Format>,
}

impl FormatSupport {
    pub const UNSUPPORTED: Self = Self {
        can_read_gps: false,
        can_write_gps: false,
        can_read_metadata: false,
        can_write_metadata: false,
        method: Method::Custom,
        notes: "Format not supported",
        format: None,
    };

    const fn read_write(method: Method, format: Format, notes: &'static str) -> Self {
        Self {
            can_read_gps: true,
            can_write_gps: true,
            can_read_metadata: true,
            can_write_metadata: true,
            method,
            notes,
            format: Some(format),
        }
    }

    const fn read_only(method: Method, format: Format, notes: &'static str) -> Self {
        Self {
            can_read_gps: true,
            can_write_gps: false,
            can_read_metadata: true,
            can_write_metadata: false,
            method,
            notes,
            format: Some(format),
        }
    }
}

static FORMATS: &[(&str, FormatSupport)] = &[
    (
        "image/jpeg",
        FormatSupport::read_write(Method::Exif, Format::Jpeg, "EXIF in APP1 segment"),
    ),
    (
        "image/jpg",
        FormatSupport::read_write(Method::Exif, Format::Jpeg, "EXIF in APP1 segment"),
    ),
    (
        "image/tiff",
        FormatSupport::read_write(Method::Exif, Format::Tiff, "File is a TIFF tag block"),
    ),
    (
        "image/webp",
        FormatSupport::read_write(Method::Riff, Format::WebP, "EXIF chunk in RIFF container"),
    ),
    (
        "image/png",
        FormatSupport::read_write(Method::Custom, Format::Png, "tEXt and iTXt chunks"),
    ),
    (
        "image/heic",
        FormatSupport::read_only(Method::Exif, Format::Heif, "Writing is not supported"),
    ),
    (
        "image/heif",
        FormatSupport::read_only(Method::Exif, Format::Heif, "Writing is not supported"),
    ),
];

/// Looks up the capabilities for a MIME type
///
/// Case and parameters like `; charset=…` are ignored.
///
/// ```
/// # use geostamp::registry::*;
/// let support = get_format_support("image/heic");
/// assert!(support.can_read_gps);
/// assert!(!support.can_write_gps);
///
/// assert_eq!(get_format_support("IMAGE/PNG").format, Some(Format::Png));
/// assert_eq!(get_format_support("image/gif"), FormatSupport::UNSUPPORTED);
/// ```
pub fn get_format_support(mime_type: &str) -> FormatSupport {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    FORMATS
        .iter()
        .find(|(mime_type, _)| *mime_type == essence)
        .map(|(_, support)| *support)
        .unwrap_or(FormatSupport::UNSUPPORTED)
}

/// All MIME types with an entry
pub fn mime_types() -> impl Iterator<Item = &'static str> {
    FORMATS.iter().map(|(mime_type, _)| *mime_type)
}
