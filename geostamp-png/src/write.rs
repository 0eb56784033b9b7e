use chrono::{DateTime, SecondsFormat, Utc};
use geostamp_common::math::*;
use geostamp_common::metadata::MetadataInfo;

use crate::*;

/// Maximum keyword length in bytes
pub const MAX_KEYWORD_LEN: usize = 79;

/// Creates a complete text chunk
///
/// Uses [`iTXt`](ChunkType::iTXt) if keyword or text are not ASCII and
/// [`tEXt`](ChunkType::tEXt) otherwise.
///
/// ```
/// # use geostamp_png::*;
/// let chunk = create_text_chunk("Title", "Bridge").unwrap();
/// assert_eq!(&chunk[4..8], b"tEXt");
///
/// let chunk = create_text_chunk("Title", "Brücke").unwrap();
/// assert_eq!(&chunk[4..8], b"iTXt");
/// ```
pub fn create_text_chunk(keyword: &str, text: &str) -> Result<Vec<u8>, Error> {
    if keyword.is_empty() || keyword.len() > MAX_KEYWORD_LEN || keyword.contains('\0') {
        return Err(Error::InvalidKeyword(keyword.len()));
    }

    if text.contains('\0') {
        return Err(Error::InvalidText(keyword.to_string()));
    }

    let (chunk_type, data) = if keyword.is_ascii() && text.is_ascii() {
        let mut data = Vec::with_capacity(keyword.len().safe_add(text.len())?.safe_add(1)?);
        data.extend_from_slice(keyword.as_bytes());
        data.push(0);
        data.extend_from_slice(text.as_bytes());
        (ChunkType::tEXt, data)
    } else {
        let mut data = Vec::with_capacity(keyword.len().safe_add(text.len())?.safe_add(5)?);
        data.extend_from_slice(keyword.as_bytes());
        data.push(0);
        // not compressed, compression method
        data.extend_from_slice(&[0, 0]);
        // empty language tag and translated keyword
        data.extend_from_slice(&[0, 0]);
        data.extend_from_slice(text.as_bytes());
        (ChunkType::iTXt, data)
    };

    create_chunk(chunk_type, &data)
}

/// Creates a complete chunk with length and CRC
pub fn create_chunk(chunk_type: ChunkType, data: &[u8]) -> Result<Vec<u8>, Error> {
    let length = data.len().u32()?;

    let mut chunk = Vec::with_capacity(data.len().safe_add(12)?);
    chunk.extend_from_slice(&length.to_be_bytes());
    chunk.extend_from_slice(&chunk_type.bytes());
    chunk.extend_from_slice(data);
    chunk.extend_from_slice(&crc::chunk_crc(chunk_type.bytes(), data).to_be_bytes());

    Ok(chunk)
}

/// Keyword and text of all chunks written for `metadata`
pub fn text_chunks_for(
    metadata: &MetadataInfo,
    software: &str,
    timestamp: DateTime<Utc>,
) -> Vec<(&'static str, String)> {
    let timestamp = timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut chunks = Vec::new();

    if let Some(gps) = metadata.gps {
        let (lat, lon) = (gps.lat(), gps.lon());
        let json = serde_json::json!({
            "lat": lat,
            "lon": lon,
            "timestamp": timestamp,
        });

        chunks.push(("GPS_Location", json.to_string()));
        chunks.push(("GPS_Coordinates", format!("{lat},{lon}")));
        chunks.push(("Location", format!("lat={lat};lon={lon}")));
        chunks.push(("Geolocation", format!("{lat}|{lon}")));
    }

    if let Some(description) = &metadata.description {
        for keyword in ["Description", "Comment", "Title"] {
            chunks.push((keyword, description.clone()));
        }
    }

    if let Some(keywords) = &metadata.keywords {
        for keyword in ["Keywords", "Subject"] {
            chunks.push((keyword, keywords.clone()));
        }
    }

    chunks.push(("Creation Time", timestamp));
    chunks.push(("Software", software.to_string()));

    chunks
}

/// Returns a new PNG with `metadata` in text chunks, timestamped now
pub fn write_metadata(png: &Png, metadata: &MetadataInfo, software: &str) -> Result<Vec<u8>, Error> {
    write_metadata_at(png, metadata, software, Utc::now())
}

/// Returns a new PNG with `metadata` in text chunks
///
/// Existing text chunks with a keyword that [`classify`](text::classify)
/// recognizes are dropped. The new chunks are placed directly behind `IHDR`.
/// All other chunks and data after `IEND` are copied unchanged.
pub fn write_metadata_at(
    png: &Png,
    metadata: &MetadataInfo,
    software: &str,
    timestamp: DateTime<Utc>,
) -> Result<Vec<u8>, Error> {
    let mut new_chunks = Vec::new();
    for (keyword, text) in text_chunks_for(metadata, software, timestamp) {
        new_chunks.extend(create_text_chunk(keyword, &text)?);
    }

    let mut out = Vec::with_capacity(png.data().len().safe_add(new_chunks.len())?);
    out.extend_from_slice(MAGIC_BYTES);

    let mut inserted = false;
    for chunk in png.chunks() {
        if text::is_metadata_chunk(chunk) {
            tracing::debug!("Dropping existing {:?} metadata chunk", chunk.chunk_type());
            continue;
        }

        out.extend_from_slice(chunk.raw());

        if chunk.chunk_type() == ChunkType::IHDR && !inserted {
            out.extend_from_slice(&new_chunks);
            inserted = true;
        }
    }

    if !inserted {
        tracing::warn!("No IHDR chunk found, metadata not written");
    }

    out.extend_from_slice(png.trailing());

    Ok(out)
}
