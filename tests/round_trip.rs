#![allow(clippy::arithmetic_side_effects)]

mod utils;

use geostamp::{Location, MetadataInfo};
use utils::*;

const LOCATIONS: &[(f64, f64)] = &[
    (37.7749, -122.4194),
    (-33.8688, 151.2093),
    (0., 0.),
    (89.999999, -179.999999),
    (-90., 180.),
];

fn metadata(lat: f64, lon: f64) -> MetadataInfo {
    MetadataInfo::new()
        .with_gps(Location::new(lat, lon).unwrap())
        .with_description("Über den Wolken")
        .with_keywords("sky,clouds")
}

fn round_trip(data: Vec<u8>, mime_type: &str) {
    for (lat, lon) in LOCATIONS {
        let written =
            geostamp::write_metadata(data.clone(), &metadata(*lat, *lon), mime_type).unwrap();
        let read = geostamp::try_read_metadata(&written, mime_type).unwrap();

        let gps = read.gps.unwrap();
        assert_close(gps.lat(), *lat);
        assert_close(gps.lon(), *lon);
        assert_eq!(read.description.as_deref(), Some("Über den Wolken"));
        assert_eq!(read.keywords.as_deref(), Some("sky,clouds"));
    }
}

#[test]
fn jpeg_round_trip() {
    round_trip(jpeg(), "image/jpeg");
}

#[test]
fn png_round_trip() {
    round_trip(png(), "image/png");
}

#[test]
fn webp_round_trip() {
    round_trip(webp(true), "image/webp");
    round_trip(webp(false), "image/webp");
}

#[test]
fn tiff_round_trip() {
    round_trip(tiff(), "image/tiff");
}

#[test]
fn repeated_writes() {
    for (data, mime_type) in [
        (jpeg(), "image/jpeg"),
        (png(), "image/png"),
        (webp(false), "image/webp"),
        (tiff(), "image/tiff"),
    ] {
        let first = geostamp::write_metadata(data, &metadata(10., 20.), mime_type).unwrap();
        let second =
            geostamp::write_metadata(first.clone(), &metadata(-10., -20.), mime_type).unwrap();

        let gps = geostamp::read_metadata(&second, mime_type).gps.unwrap();
        assert_close(gps.lat(), -10.);
        assert_close(gps.lon(), -20.);

        if mime_type == "image/png" {
            let png = geostamp_png::Png::new(&second).unwrap();
            let gps_chunks = png
                .chunks()
                .iter()
                .filter_map(|x| geostamp_png::text::text_entry(x).unwrap())
                .filter(|x| x.keyword == "GPS_Location")
                .count();
            assert_eq!(gps_chunks, 1);
        }
    }
}

#[test]
fn existing_camera_fields_kept() {
    let empty = geostamp_exif::empty_block();
    let mut raw = geostamp_exif::internal::ExifRaw::new(&empty);
    raw.decode().unwrap();
    let exif = raw
        .rewrite(&[
            geostamp_exif::Entry::Make(String::from("Canon")),
            geostamp_exif::Entry::Model(String::from("Canon EOS 400D DIGITAL")),
        ])
        .unwrap();

    let data = geostamp::write_metadata(
        jpeg_with_exif(&exif),
        &metadata(45., 7.),
        "image/jpeg",
    )
    .unwrap();

    let read = geostamp::read_metadata(&data, "image/jpeg");
    assert_close(read.gps.unwrap().lat(), 45.);
    assert_eq!(read.camera_make.as_deref(), Some("Canon"));
    assert_eq!(read.camera_model.as_deref(), Some("Canon EOS 400D DIGITAL"));
}

#[test]
fn identical_writes_keep_size() {
    let metadata = MetadataInfo::new()
        .with_gps(Location::new(52.52, 13.405).unwrap())
        .with_description("d".repeat(300))
        .with_keywords("k".repeat(200));

    for (data, mime_type) in [(jpeg(), "image/jpeg"), (tiff(), "image/tiff")] {
        let first = geostamp::write_metadata(data, &metadata, mime_type).unwrap();

        let mut data = first.clone();
        for _ in 0..100 {
            data = geostamp::write_metadata(data, &metadata, mime_type).unwrap();
        }

        assert_eq!(data.len(), first.len(), "{mime_type}");
        assert_eq!(data, first, "{mime_type}");
    }
}

#[test]
fn nearly_full_app1_segment() {
    let description = "w".repeat(65_000);
    let metadata = MetadataInfo::new()
        .with_gps(Location::new(-33.8688, 151.2093).unwrap())
        .with_description(description.clone());

    let exif = geostamp_exif::new_block(&metadata).unwrap();
    assert!(exif.len() > 65_000 && exif.len() <= 65_533);

    let mut data = jpeg_with_exif(&exif);
    for lat in [1., 2., 3.] {
        let metadata = MetadataInfo {
            gps: Some(Location::new(lat, 151.2093).unwrap()),
            ..metadata.clone()
        };
        data = geostamp::write_metadata(data, &metadata, "image/jpeg").unwrap();
    }

    let read = geostamp::try_read_metadata(&data, "image/jpeg").unwrap();
    assert_close(read.gps.unwrap().lat(), 3.);
    assert_eq!(read.description, Some(description));

    // a shorter text frees space
    let metadata = MetadataInfo::new().with_description("short");
    let shorter = geostamp::write_metadata(data.clone(), &metadata, "image/jpeg").unwrap();
    assert!(shorter.len() < data.len() - 60_000);
}
