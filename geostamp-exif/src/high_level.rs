use geostamp_common::field;
use geostamp_common::geography::{dms_to_decimal, LatRef, LonRef, Location};
use geostamp_common::metadata::MetadataInfo;

use crate::error::{Error, Result};
use crate::internal::*;

/// Decoded Exif block
#[derive(Debug, Clone)]
pub struct Exif<'a> {
    decoder: ExifRaw<'a>,
}

impl<'a> Exif<'a> {
    /// Decode a block that starts with the TIFF header
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let mut decoder = ExifRaw::new(data);
        decoder.decode()?;

        Ok(Self { decoder })
    }

    pub fn raw(&self) -> &ExifRaw<'a> {
        &self.decoder
    }

    /// GPS position
    ///
    /// Missing reference tags are treated as northern or eastern hemisphere.
    pub fn gps_location(&self) -> Result<Option<Location>> {
        let lat = self.coordinate(field::GPSLatitude, field::GPSLatitudeRef, |r| {
            LatRef::try_from(r)
                .map(|x| x.as_sign())
                .map_err(|err| Error::InvalidRef(err.to_string()))
        })?;

        let lon = self.coordinate(field::GPSLongitude, field::GPSLongitudeRef, |r| {
            LonRef::try_from(r)
                .map(|x| x.as_sign())
                .map_err(|err| Error::InvalidRef(err.to_string()))
        })?;

        Ok(Location::from_parts(lat, lon))
    }

    fn coordinate(
        &self,
        value: impl Into<TagIfd>,
        reference: impl Into<TagIfd>,
        sign: impl Fn(&str) -> Result<f64>,
    ) -> Result<Option<f64>> {
        let Some(components) = self.decoder.lookup_rationals_f64::<3>(value)? else {
            return Ok(None);
        };

        let sign = match self.decoder.lookup_string(reference)? {
            Some(r) => sign(&r)?,
            None => 1.,
        };

        Ok(Some(dms_to_decimal(&components, sign)))
    }

    /// Image description
    pub fn description(&self) -> Option<String> {
        self.string(field::ImageDescription)
    }

    /// Comma separated keywords from `XPKeywords`
    pub fn keywords(&self) -> Option<String> {
        self.decoder
            .lookup_utf16(field::XPKeywords)
            .ok()
            .flatten()
            .filter(|x| !x.is_empty())
    }

    /// Camera manufacturer
    pub fn make(&self) -> Option<String> {
        self.string(field::Make)
    }

    /// Camera model
    pub fn model(&self) -> Option<String> {
        self.string(field::Model)
    }

    /// Date and time as stored, `YYYY:MM:DD HH:MM:SS`
    ///
    /// Uses `DateTime` and falls back to `DateTimeOriginal`.
    pub fn date_time(&self) -> Option<String> {
        self.string(field::DateTime)
            .or_else(|| self.string(field::DateTimeOriginal))
    }

    fn string(&self, tagifd: impl Into<TagIfd>) -> Option<String> {
        let tagifd = tagifd.into();
        match self.decoder.lookup_string(tagifd) {
            Ok(value) => value
                .map(|x| x.trim().to_string())
                .filter(|x| !x.is_empty()),
            Err(err) => {
                tracing::debug!("Ignoring {tagifd:?}: {err}");
                None
            }
        }
    }

    /// All readable fields
    ///
    /// Fields that can't be decoded are left empty.
    pub fn metadata(&self) -> MetadataInfo {
        let gps = self.gps_location().unwrap_or_else(|err| {
            tracing::debug!("Ignoring GPS data: {err}");
            None
        });

        MetadataInfo {
            gps,
            keywords: self.keywords(),
            description: self.description(),
            date_time: self.date_time(),
            camera_make: self.make(),
            camera_model: self.model(),
        }
    }
}
