use geostamp_common::exif::Field;
use geostamp_common::field;
use geostamp_common::geography::{Dms, LatRef, LonRef};
use geostamp_common::math::*;

use crate::error::{Error, Result};
use crate::internal::{Encoder, TagIfd, Type};

/// Value of a tag that can be written
///
/// Tags that are not listed here are never decoded into an [`Entry`]. When
/// rewriting a block, their entries are copied byte for byte.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    GpsVersionId([u8; 4]),
    GpsLatitudeRef(LatRef),
    GpsLatitude(Dms),
    GpsLongitudeRef(LonRef),
    GpsLongitude(Dms),
    ImageDescription(String),
    Make(String),
    Model(String),
    DateTime(String),
    /// Stored as UTF-16LE
    XpKeywords(String),
}

/// Encoded value of an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedEntry {
    pub data_type: Type,
    pub count: u32,
    pub data: Vec<u8>,
}

impl Entry {
    pub fn tag_ifd(&self) -> TagIfd {
        match self {
            Self::GpsVersionId(_) => field::GPSVersionID.into(),
            Self::GpsLatitudeRef(_) => field::GPSLatitudeRef.into(),
            Self::GpsLatitude(_) => field::GPSLatitude.into(),
            Self::GpsLongitudeRef(_) => field::GPSLongitudeRef.into(),
            Self::GpsLongitude(_) => field::GPSLongitude.into(),
            Self::ImageDescription(_) => field::ImageDescription.into(),
            Self::Make(_) => field::Make.into(),
            Self::Model(_) => field::Model.into(),
            Self::DateTime(_) => field::DateTime.into(),
            Self::XpKeywords(_) => field::XPKeywords.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::GpsVersionId(_) => field::GPSVersionID::NAME,
            Self::GpsLatitudeRef(_) => field::GPSLatitudeRef::NAME,
            Self::GpsLatitude(_) => field::GPSLatitude::NAME,
            Self::GpsLongitudeRef(_) => field::GPSLongitudeRef::NAME,
            Self::GpsLongitude(_) => field::GPSLongitude::NAME,
            Self::ImageDescription(_) => field::ImageDescription::NAME,
            Self::Make(_) => field::Make::NAME,
            Self::Model(_) => field::Model::NAME,
            Self::DateTime(_) => field::DateTime::NAME,
            Self::XpKeywords(_) => field::XPKeywords::NAME,
        }
    }

    /// Encodes the value in the byte order of `encoder`
    pub fn encode(&self, encoder: Encoder) -> Result<EncodedEntry> {
        if let Self::ImageDescription(s)
        | Self::Make(s)
        | Self::Model(s)
        | Self::DateTime(s)
        | Self::XpKeywords(s) = self
        {
            if s.contains('\0') {
                return Err(Error::InvalidText(self.tag_ifd()));
            }
        }

        let (data_type, data) = match self {
            Self::GpsVersionId(version) => (Type::Byte, version.to_vec()),
            Self::GpsLatitudeRef(r) => (Type::Ascii, ascii(&r.to_string())),
            Self::GpsLongitudeRef(r) => (Type::Ascii, ascii(&r.to_string())),
            Self::GpsLatitude(dms) | Self::GpsLongitude(dms) => {
                let mut data = Vec::with_capacity(24);
                for rational in dms.to_rationals() {
                    data.extend_from_slice(&encoder.u32(rational.numerator));
                    data.extend_from_slice(&encoder.u32(rational.denominator));
                }
                (Type::Rational, data)
            }
            Self::ImageDescription(s) | Self::Make(s) | Self::Model(s) | Self::DateTime(s) => {
                (Type::Ascii, ascii(s))
            }
            Self::XpKeywords(s) => {
                let mut data = s
                    .encode_utf16()
                    .flat_map(u16::to_le_bytes)
                    .collect::<Vec<_>>();
                data.extend_from_slice(&[0, 0]);
                (Type::Byte, data)
            }
        };

        let count = data.len().u32()?.safe_div(data_type.size())?;

        Ok(EncodedEntry {
            data_type,
            count,
            data,
        })
    }
}

/// NUL terminated string data
///
/// The bytes are written as UTF-8. Pure ASCII input yields standard
/// conforming data.
fn ascii(s: &str) -> Vec<u8> {
    let mut data = s.as_bytes().to_vec();
    data.push(0);
    data
}
