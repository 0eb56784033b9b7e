use crate::exif::Rational;

/// Denominator used for the seconds component when encoding rationals
///
/// Seconds are rounded to three decimals by [`decimal_to_dms`] and stored as
/// `seconds * 1000 / 1000`, so encoding and decoding use the same precision.
pub const SECONDS_DENOMINATOR: u32 = 1000;

/// A validated GPS position in decimal degrees
///
/// Latitude is within `[-90, 90]`, longitude within `[-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "UncheckedLocation"))]
pub struct Location {
    lat: f64,
    lon: f64,
}

impl Location {
    /// ```
    /// # use geostamp_common::geography::*;
    /// assert!(Location::new(37.7749, -122.4194).is_ok());
    /// assert!(Location::new(91., 0.).is_err());
    /// assert!(Location::new(0., f64::NAN).is_err());
    /// ```
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidLocation> {
        if !lat.is_finite() || !(-90. ..=90.).contains(&lat) {
            return Err(InvalidLocation::Latitude(lat));
        }

        if !lon.is_finite() || !(-180. ..=180.).contains(&lon) {
            return Err(InvalidLocation::Longitude(lon));
        }

        Ok(Self { lat, lon })
    }

    /// Builds a location from both parts if both exist and are in range
    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        Self::new(lat?, lon?).ok()
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat_ref_dms(&self) -> (LatRef, Dms) {
        (LatRef::from_sign(self.lat), decimal_to_dms(self.lat))
    }

    pub fn lon_ref_dms(&self) -> (LonRef, Dms) {
        (LonRef::from_sign(self.lon), decimal_to_dms(self.lon))
    }

    /// Locations as `geo:` URI
    ///
    /// The precision of the coordinates is limited to six decimal places.
    pub fn geo_uri(&self) -> String {
        // six decimal places gives as more than a meter accuracy
        format!("geo:{:.6},{:.6}", self.lat, self.lon)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct UncheckedLocation {
    lat: f64,
    lon: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<UncheckedLocation> for Location {
    type Error = InvalidLocation;

    fn try_from(value: UncheckedLocation) -> Result<Self, Self::Error> {
        Self::new(value.lat, value.lon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum InvalidLocation {
    #[error("Latitude {0} is outside of [-90, 90]")]
    Latitude(f64),
    #[error("Longitude {0} is outside of [-180, 180]")]
    Longitude(f64),
}

/// Unsigned degrees, minutes, seconds
///
/// The sign is carried separately by [`LatRef`] or [`LonRef`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dms {
    pub degrees: u32,
    pub minutes: u32,
    /// Rounded to three decimals
    pub seconds: f64,
}

impl Dms {
    /// Three rationals as stored in Exif GPS tags
    ///
    /// ```
    /// # use geostamp_common::geography::*;
    /// # use geostamp_common::exif::Rational;
    /// let dms = decimal_to_dms(-33.8688);
    /// assert_eq!(
    ///     dms.to_rationals(),
    ///     [Rational::new(33, 1), Rational::new(52, 1), Rational::new(7680, 1000)]
    /// );
    /// ```
    pub fn to_rationals(&self) -> [Rational; 3] {
        let seconds = saturating_u32((self.seconds * f64::from(SECONDS_DENOMINATOR)).round());

        [
            Rational::new(self.degrees, 1),
            Rational::new(self.minutes, 1),
            Rational::new(seconds, SECONDS_DENOMINATOR),
        ]
    }
}

/// Converts decimal degrees into unsigned degrees, minutes, seconds
///
/// Operates on the absolute value. Seconds are rounded to three decimals and a
/// rounded value of 60 seconds carries into the minutes.
///
/// ```
/// # use geostamp_common::geography::*;
/// let dms = decimal_to_dms(-122.4194);
/// assert_eq!((dms.degrees, dms.minutes, dms.seconds), (122, 25, 9.84));
///
/// let dms = decimal_to_dms(10.9999999);
/// assert_eq!((dms.degrees, dms.minutes, dms.seconds), (11, 0, 0.));
/// ```
pub fn decimal_to_dms(decimal: f64) -> Dms {
    let abs = decimal.abs();

    let mut degrees = abs.trunc();
    let total_minutes = (abs - degrees) * 60.;
    let mut minutes = total_minutes.trunc();
    let scale = f64::from(SECONDS_DENOMINATOR);
    let mut seconds = ((total_minutes - minutes) * 60. * scale).round() / scale;

    if seconds >= 60. {
        seconds -= 60.;
        minutes += 1.;
    }

    if minutes >= 60. {
        minutes -= 60.;
        degrees += 1.;
    }

    Dms {
        degrees: saturating_u32(degrees),
        minutes: saturating_u32(minutes),
        seconds,
    }
}

/// Converts degrees, minutes, seconds into decimal degrees
///
/// `sign` is `-1.` for southern and western hemispheres. Fewer than three
/// components yield `0.`.
///
/// ```
/// # use geostamp_common::geography::*;
/// let lat = dms_to_decimal(&[89., 24., 2.2], LatRef::South.as_sign());
/// assert_eq!((lat * 100_000.).round() / 100_000., -89.40061);
/// assert_eq!(dms_to_decimal(&[12., 30.], 1.), 0.);
/// ```
pub fn dms_to_decimal(components: &[f64], sign: f64) -> f64 {
    let [degrees, minutes, seconds, ..] = components else {
        return 0.;
    };

    sign * (degrees + minutes / 60. + seconds / 3600.)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn saturating_u32(value: f64) -> u32 {
    // `as` saturates and maps NaN to zero
    value as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatRef {
    North,
    South,
}

impl LatRef {
    pub fn from_sign(sign: f64) -> Self {
        if sign.is_sign_negative() && sign != 0. {
            Self::South
        } else {
            Self::North
        }
    }

    pub fn as_sign(&self) -> f64 {
        match self {
            Self::North => 1.,
            Self::South => -1.,
        }
    }
}

impl TryFrom<&str> for LatRef {
    type Error = InvalidLatRef;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim_matches(|c: char| c == '\0' || c.is_whitespace()) {
            "N" | "n" => Ok(Self::North),
            "S" | "s" => Ok(Self::South),
            v => Err(Self::Error::InvalidLatitudeRef(v.to_string())),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum InvalidLatRef {
    #[error("Invalid latitude reference: '{0}'. Must be 'N' or 'S'.")]
    InvalidLatitudeRef(String),
}

impl std::fmt::Display for LatRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::North => f.write_str("N"),
            Self::South => f.write_str("S"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LonRef {
    East,
    West,
}

impl LonRef {
    pub fn from_sign(sign: f64) -> Self {
        if sign.is_sign_negative() && sign != 0. {
            Self::West
        } else {
            Self::East
        }
    }

    pub fn as_sign(&self) -> f64 {
        match self {
            Self::East => 1.,
            Self::West => -1.,
        }
    }
}

impl TryFrom<&str> for LonRef {
    type Error = InvalidLonRef;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim_matches(|c: char| c == '\0' || c.is_whitespace()) {
            "E" | "e" => Ok(Self::East),
            "W" | "w" => Ok(Self::West),
            v => Err(Self::Error::InvalidLonRef(v.to_string())),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum InvalidLonRef {
    #[error("Invalid longitude reference: '{0}'. Must be 'E' or 'W'.")]
    InvalidLonRef(String),
}

impl std::fmt::Display for LonRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::East => f.write_str("E"),
            Self::West => f.write_str("W"),
        }
    }
}
