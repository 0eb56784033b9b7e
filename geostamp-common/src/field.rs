//! Metadata fields
//!
//! Exif fields that geostamp reads or writes, identified by tag and IFD.

mod macros;

use crate::exif::Ifd;

macros::make_tags![
    // GPS
    (0x0, GPSVersionID, Ifd::Gps),
    (0x1, GPSLatitudeRef, Ifd::Gps),
    (0x2, GPSLatitude, Ifd::Gps),
    (0x3, GPSLongitudeRef, Ifd::Gps),
    (0x4, GPSLongitude, Ifd::Gps),

    // Primary
    (0x10E, ImageDescription, Ifd::Primary),
    (0x10F, Make, Ifd::Primary),
    (0x110, Model, Ifd::Primary),
    (0x131, Software, Ifd::Primary),
    /// Date and time of the last file change, `YYYY:MM:DD HH:MM:SS`
    (0x132, DateTime, Ifd::Primary),
    /// Windows keywords, UTF-16LE encoded bytes
    (0x9C9E, XPKeywords, Ifd::Primary),
    (0x8769, ExifIfdPointer, Ifd::Primary),
    (0x8825, GpsInfoIfdPointer, Ifd::Primary),

    // Exif
    (0x9003, DateTimeOriginal, Ifd::Exif),
];
