//! Metadata in text chunks
//!
//! Text chunks are identified by their keyword. Writers use many different
//! keywords for the same information, hence keywords are matched by
//! substrings.

use geostamp_common::geography::Location;
use geostamp_common::metadata::MetadataInfo;

use crate::*;

/// Kind of information a text chunk carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Gps,
    Description,
    Keywords,
    CameraMake,
    CameraModel,
    DateTime,
    /// Only used to remove old chunks when writing
    Software,
}

/// Substrings of lowercase keywords, checked in this order
const CATEGORIES: &[(Category, &[&str])] = &[
    (
        Category::Gps,
        &["gps", "location", "coordinates", "geolocation"],
    ),
    (
        Category::Description,
        &["description", "comment", "title", "caption"],
    ),
    (Category::Keywords, &["keywords", "subject", "tags"]),
    (Category::CameraMake, &["make", "manufacturer"]),
    (Category::CameraModel, &["model", "camera"]),
    (Category::DateTime, &["creation", "date", "time"]),
    (Category::Software, &["software"]),
];

/// Category of a text chunk keyword
///
/// ```
/// # use geostamp_png::text::*;
/// assert_eq!(classify("GPS_Location"), Some(Category::Gps));
/// assert_eq!(classify("Creation Time"), Some(Category::DateTime));
/// assert_eq!(classify("Camera Make"), Some(Category::CameraMake));
/// assert_eq!(classify("Raw profile type icc"), None);
/// ```
pub fn classify(keyword: &str) -> Option<Category> {
    let keyword = keyword.to_lowercase();

    CATEGORIES
        .iter()
        .find(|(_, needles)| needles.iter().any(|x| keyword.contains(x)))
        .map(|(category, _)| *category)
}

/// Keyword and text of an uncompressed text chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEntry {
    pub keyword: String,
    pub text: String,
}

/// Decodes [`tEXt`](ChunkType::tEXt) and uncompressed
/// [`iTXt`](ChunkType::iTXt) chunks
///
/// Returns `None` for other chunks and compressed text.
pub fn text_entry(chunk: &Chunk) -> Result<Option<TextEntry>, Error> {
    match chunk.chunk_type() {
        ChunkType::tEXt => {
            let (keyword, text) = chunk.text()?;
            Ok(Some(TextEntry {
                keyword: latin1(keyword),
                text: latin1(text),
            }))
        }
        ChunkType::iTXt => {
            let itxt = chunk.itxt()?;
            if itxt.compressed {
                tracing::debug!("Skipping compressed iTXt chunk");
                return Ok(None);
            }

            Ok(Some(TextEntry {
                keyword: latin1(itxt.keyword),
                text: String::from_utf8_lossy(itxt.text).into_owned(),
            }))
        }
        ChunkType::zTXt => {
            tracing::debug!("Skipping compressed zTXt chunk");
            Ok(None)
        }
        _ => Ok(None),
    }
}

/// Keyword of a text chunk that is removed when writing
pub(crate) fn is_metadata_chunk(chunk: &Chunk) -> bool {
    if !matches!(chunk.chunk_type(), ChunkType::tEXt | ChunkType::iTXt) {
        return false;
    }

    match chunk.keyword() {
        Ok(keyword) => classify(&String::from_utf8_lossy(keyword)).is_some(),
        Err(_) => false,
    }
}

fn latin1(data: &[u8]) -> String {
    let (text, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(data);
    text.into_owned()
}

/// Metadata from all text chunks
///
/// The first value that can be parsed wins for every field.
pub fn read_metadata(png: &Png) -> MetadataInfo {
    let mut metadata = MetadataInfo::default();

    for chunk in png.chunks().iter().filter(|x| x.chunk_type().is_text()) {
        let entry = match text_entry(chunk) {
            Ok(Some(entry)) => entry,
            Ok(None) => continue,
            Err(err) => {
                tracing::debug!("Ignoring malformed {:?} chunk: {err}", chunk.chunk_type());
                continue;
            }
        };

        let Some(category) = classify(&entry.keyword) else {
            continue;
        };

        let text = entry.text.trim();
        if text.is_empty() {
            continue;
        }

        let field = match category {
            Category::Gps => {
                if metadata.gps.is_none() {
                    metadata.gps = parse_gps(text);
                }
                continue;
            }
            Category::Description => &mut metadata.description,
            Category::Keywords => &mut metadata.keywords,
            Category::CameraMake => &mut metadata.camera_make,
            Category::CameraModel => &mut metadata.camera_model,
            Category::DateTime => &mut metadata.date_time,
            Category::Software => continue,
        };

        if field.is_none() {
            *field = Some(text.to_string());
        }
    }

    metadata
}

/// Parses the different notations of positions in text chunks
///
/// ```
/// # use geostamp_png::text::parse_gps;
/// for text in [
///     r#"{"lat": 37.7749, "lon": -122.4194}"#,
///     "37.7749,-122.4194",
///     "lat=37.7749;lon=-122.4194",
///     "latitude=37.7749&longitude=-122.4194",
///     "37.7749|-122.4194",
/// ] {
///     let location = parse_gps(text).unwrap();
///     assert_eq!((location.lat(), location.lon()), (37.7749, -122.4194));
/// }
///
/// assert!(parse_gps("somewhere").is_none());
/// assert!(parse_gps("91,0").is_none());
/// ```
pub fn parse_gps(text: &str) -> Option<Location> {
    parse_gps_json(text)
        .or_else(|| parse_gps_pair(text, ','))
        .or_else(|| parse_gps_key_value(text))
        .or_else(|| parse_gps_pair(text, '|'))
}

fn parse_gps_json(text: &str) -> Option<Location> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    let object = value.as_object()?;

    let number = |keys: &[&str]| {
        keys.iter().find_map(|key| {
            let value = object.get(*key)?;
            value
                .as_f64()
                .or_else(|| value.as_str().and_then(|x| x.trim().parse().ok()))
        })
    };

    Location::from_parts(
        number(&["lat", "latitude"]),
        number(&["lon", "lng", "longitude"]),
    )
}

fn parse_gps_pair(text: &str, separator: char) -> Option<Location> {
    let (lat, lon) = text.split_once(separator)?;

    Location::from_parts(lat.trim().parse().ok(), lon.trim().parse().ok())
}

fn parse_gps_key_value(text: &str) -> Option<Location> {
    let mut lat = None;
    let mut lon = None;

    for pair in text.split([';', '&', '|']) {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };

        let value = value.trim().parse::<f64>().ok();
        match key.trim().to_lowercase().as_str() {
            "lat" | "latitude" => lat = lat.or(value),
            "lon" | "lng" | "longitude" => lon = lon.or(value),
            _ => {}
        }
    }

    Location::from_parts(lat, lon)
}
