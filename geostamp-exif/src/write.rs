use geostamp_common::metadata::MetadataInfo;

use crate::entry::Entry;
use crate::error::Result;
use crate::internal::ExifRaw;

/// Value of `GPSVersionID` written with GPS data
pub const GPS_VERSION: [u8; 4] = [2, 3, 0, 0];

/// Block that only consists of a little endian header and an empty IFD
///
/// ```
/// let block = geostamp_exif::empty_block();
/// assert_eq!(block, [b'I', b'I', 42, 0, 8, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
/// ```
pub fn empty_block() -> Vec<u8> {
    let mut data = Vec::with_capacity(14);
    data.extend_from_slice(b"II");
    data.extend_from_slice(&42_u16.to_le_bytes());
    data.extend_from_slice(&8_u32.to_le_bytes());
    // no entries
    data.extend_from_slice(&0_u16.to_le_bytes());
    // no next IFD
    data.extend_from_slice(&0_u32.to_le_bytes());
    data
}

/// Entries that are written for `metadata`
///
/// Provenance fields like date and camera are never written.
pub fn entries_for(metadata: &MetadataInfo) -> Vec<Entry> {
    let mut entries = Vec::new();

    if let Some(gps) = metadata.gps {
        let (lat_ref, lat) = gps.lat_ref_dms();
        let (lon_ref, lon) = gps.lon_ref_dms();

        entries.push(Entry::GpsVersionId(GPS_VERSION));
        entries.push(Entry::GpsLatitudeRef(lat_ref));
        entries.push(Entry::GpsLatitude(lat));
        entries.push(Entry::GpsLongitudeRef(lon_ref));
        entries.push(Entry::GpsLongitude(lon));
    }

    if let Some(description) = &metadata.description {
        entries.push(Entry::ImageDescription(description.clone()));
    }

    if let Some(keywords) = &metadata.keywords {
        entries.push(Entry::XpKeywords(keywords.clone()));
    }

    entries
}

/// Writes `metadata` into an existing block or a new one
///
/// If `existing` is missing or can't be decoded, the result is built from
/// [`empty_block`].
pub fn write_metadata(existing: Option<&[u8]>, metadata: &MetadataInfo) -> Result<Vec<u8>> {
    if let Some(existing) = existing {
        match write_metadata_strict(existing, metadata) {
            Ok(block) => return Ok(block),
            Err(err) => tracing::info!("Replacing undecodable Exif block: {err}"),
        }
    }

    new_block(metadata)
}

/// Writes `metadata` into `block` and fails if `block` can't be decoded
pub fn write_metadata_strict(block: &[u8], metadata: &MetadataInfo) -> Result<Vec<u8>> {
    let mut decoder = ExifRaw::new(block);
    decoder.decode()?;

    decoder.rewrite(&entries_for(metadata))
}

/// New block that only contains the entries for `metadata`
pub fn new_block(metadata: &MetadataInfo) -> Result<Vec<u8>> {
    write_metadata_strict(&empty_block(), metadata)
}
