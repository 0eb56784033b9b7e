use geostamp_exif::Exif;

use crate::registry::{get_format_support, Format};
use crate::*;

/// Reads the metadata of an image
///
/// Errors are logged and result in an empty record.
pub fn read_metadata(data: &[u8], mime_type: &str) -> MetadataInfo {
    read_metadata_with(data, mime_type, &Options::default())
}

pub fn read_metadata_with(data: &[u8], mime_type: &str, options: &Options) -> MetadataInfo {
    match try_read_metadata_with(data, mime_type, options) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == ErrorKind::UnsupportedFormat => {
            tracing::debug!("Not reading metadata: {err}");
            MetadataInfo::default()
        }
        Err(err) => {
            tracing::warn!("Failed to read metadata from {mime_type} image: {err}");
            MetadataInfo::default()
        }
    }
}

/// Reads the metadata of an image and reports structural errors
///
/// Fields that can't be decoded are left empty.
pub fn try_read_metadata(data: &[u8], mime_type: &str) -> Result<MetadataInfo, Error> {
    try_read_metadata_with(data, mime_type, &Options::default())
}

pub fn try_read_metadata_with(
    data: &[u8],
    mime_type: &str,
    options: &Options,
) -> Result<MetadataInfo, Error> {
    let support = get_format_support(mime_type);
    let format = match support.format {
        Some(format) if support.can_read_metadata => format,
        _ => return Err(Error::unsupported(mime_type, &support)),
    };

    options.check_len(data)?;

    match format {
        Format::Jpeg => read_jpeg(data),
        Format::Tiff => read_tiff(data),
        Format::Heif => read_heif(data),
        Format::WebP => read_webp(data),
        Format::Png => read_png(data),
    }
}

fn read_exif(exif: Option<&[u8]>) -> Result<MetadataInfo, Error> {
    match exif {
        Some(exif) => Ok(Exif::new(exif)?.metadata()),
        None => {
            tracing::debug!("No Exif data found");
            Ok(MetadataInfo::default())
        }
    }
}

fn read_jpeg(data: &[u8]) -> Result<MetadataInfo, Error> {
    let jpeg = geostamp_jpeg::Jpeg::new(data)?;
    let exif = jpeg.exif_data().next();
    read_exif(exif)
}

fn read_tiff(data: &[u8]) -> Result<MetadataInfo, Error> {
    let tiff = geostamp_tiff::Tiff::new(data)?;
    read_exif(Some(tiff.exif()))
}

fn read_heif(data: &[u8]) -> Result<MetadataInfo, Error> {
    let heif = geostamp_heif::Heif::new(data)?;
    read_exif(heif.exif()?)
}

fn read_webp(data: &[u8]) -> Result<MetadataInfo, Error> {
    let webp = geostamp_webp::WebP::new(data)?;
    read_exif(webp.exif())
}

/// Text chunks with values from `eXIf` for missing fields
fn read_png(data: &[u8]) -> Result<MetadataInfo, Error> {
    let png = geostamp_png::Png::new(data)?;
    let mut metadata = geostamp_png::read_metadata(&png);

    if let Some(exif) = png.exif() {
        match Exif::new(exif) {
            Ok(exif) => metadata.merge_missing(exif.metadata()),
            Err(err) => tracing::debug!("Ignoring undecodable eXIf chunk: {err}"),
        }
    }

    Ok(metadata)
}
