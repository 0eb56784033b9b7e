use crate::registry::{get_format_support, Format};
use crate::*;

/// Writes GPS position, description and keywords into an image
///
/// On failure the untouched `data` are returned with the error.
pub fn write_metadata(
    data: Vec<u8>,
    metadata: &MetadataInfo,
    mime_type: &str,
) -> Result<Vec<u8>, ErrorWithData<Error>> {
    write_metadata_with(data, metadata, mime_type, &Options::default())
}

pub fn write_metadata_with(
    data: Vec<u8>,
    metadata: &MetadataInfo,
    mime_type: &str,
    options: &Options,
) -> Result<Vec<u8>, ErrorWithData<Error>> {
    match write(&data, metadata, mime_type, options) {
        Ok(new_data) => Ok(new_data),
        Err(err) => Err(ErrorWithData::new(err, data)),
    }
}

fn write(
    data: &[u8],
    metadata: &MetadataInfo,
    mime_type: &str,
    options: &Options,
) -> Result<Vec<u8>, Error> {
    let support = get_format_support(mime_type);
    let format = match support.format {
        Some(format) if support.can_write_metadata => format,
        _ => return Err(Error::unsupported(mime_type, &support)),
    };

    options.check_len(data)?;

    tracing::debug!("Writing metadata as {:?} via {:?}", format, support.method);

    match format {
        Format::Jpeg => {
            let jpeg = geostamp_jpeg::Jpeg::new(data)?;
            let exif = geostamp_exif::write_metadata(jpeg.exif_data().next(), metadata)?;
            Ok(jpeg.replace_exif(&exif)?)
        }
        Format::Tiff => {
            let tiff = geostamp_tiff::Tiff::new(data)?;
            Ok(tiff.write_metadata(metadata)?)
        }
        Format::WebP => {
            let webp = geostamp_webp::WebP::new(data)?;
            let exif = geostamp_exif::new_block(metadata)?;
            Ok(webp.replace_exif(&exif)?)
        }
        Format::Png => {
            let png = geostamp_png::Png::new(data)?;
            Ok(geostamp_png::write_metadata(
                &png,
                metadata,
                &options.software,
            )?)
        }
        Format::Heif => Err(Error::unsupported(mime_type, &support)),
    }
}
