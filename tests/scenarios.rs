#![allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]

mod utils;

use geostamp::registry::get_format_support;
use geostamp::{ErrorKind, Location, MetadataInfo};
use geostamp_common::field;
use geostamp_webp::{FourCC, WebP};
use utils::*;

#[test]
fn png_gps_location_json() {
    let metadata = MetadataInfo::new().with_gps(Location::new(37.7749, -122.4194).unwrap());

    let data = geostamp::write_metadata(png(), &metadata, "image/png").unwrap();

    let png = geostamp_png::Png::new(&data).unwrap();
    let entry = png
        .chunks()
        .iter()
        .filter_map(|x| geostamp_png::text::text_entry(x).unwrap())
        .find(|x| x.keyword == "GPS_Location")
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&entry.text).unwrap();
    assert_eq!(json["lat"], 37.7749);
    assert_eq!(json["lon"], -122.4194);
    assert!(json["timestamp"].is_string());

    let gps = geostamp::read_metadata(&data, "image/png").gps.unwrap();
    assert_eq!((gps.lat(), gps.lon()), (37.7749, -122.4194));
}

#[test]
fn webp_exif_after_vp8() {
    let metadata = MetadataInfo::new().with_gps(Location::new(51.5007, -0.1246).unwrap());

    let data = geostamp::write_metadata(webp(true), &metadata, "image/webp").unwrap();
    let webp = WebP::new(&data).unwrap();

    let four_ccs = webp
        .chunks()
        .iter()
        .map(|x| x.four_cc())
        .collect::<Vec<_>>();
    assert_eq!(four_ccs, [FourCC::VP8X, FourCC::VP8, FourCC::EXIF]);

    let riff_size = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    let chunks_size = webp
        .chunks()
        .iter()
        .map(|x| x.total_len().unwrap())
        .sum::<usize>();
    assert_eq!(riff_size as usize, chunks_size + 4);
    assert_eq!(riff_size as usize, data.len() - 8);
}

#[test]
fn jpeg_southern_hemisphere() {
    let metadata = MetadataInfo::new().with_gps(Location::new(-33.8688, 151.2093).unwrap());

    let data = geostamp::write_metadata(jpeg(), &metadata, "image/jpeg").unwrap();

    let jpeg = geostamp_jpeg::Jpeg::new(&data).unwrap();
    let exif = geostamp_exif::Exif::new(jpeg.exif_data().next().unwrap()).unwrap();
    let raw = exif.raw();
    assert_eq!(
        raw.lookup_string(field::GPSLatitudeRef).unwrap().as_deref(),
        Some("S")
    );
    assert_eq!(
        raw.lookup_string(field::GPSLongitudeRef).unwrap().as_deref(),
        Some("E")
    );

    let gps = geostamp::read_metadata(&data, "image/jpeg").gps.unwrap();
    assert!(gps.lat() < 0.);
    assert!(gps.lon() > 0.);
    assert_close(gps.lat(), -33.8688);
    assert_close(gps.lon(), 151.2093);
}

#[test]
fn png_chunk_past_end() {
    let mut data = png();
    // IDAT length field
    data[33..37].copy_from_slice(&1000_u32.to_be_bytes());

    let err = geostamp::try_read_metadata(&data, "image/png").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CorruptContainer);
    assert!(geostamp::read_metadata(&data, "image/png").is_empty());
}

#[test]
fn heic_read_only() {
    let support = get_format_support("image/heic");
    assert!(!support.can_write_gps);

    let metadata = MetadataInfo::new().with_gps(Location::new(1., 2.).unwrap());
    let data = heic(&metadata);

    let err = geostamp::write_metadata(data.clone(), &metadata, "image/heic").unwrap_err();
    assert_eq!(err.err().kind(), ErrorKind::UnsupportedFormat);
    assert_eq!(err.into_inner(), data);

    let gps = geostamp::read_metadata(&data, "image/heic").gps.unwrap();
    assert_close(gps.lat(), 1.);
    assert_close(gps.lon(), 2.);
}
