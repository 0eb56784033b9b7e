#![allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]

mod utils;

use geostamp_common::field;
use geostamp_common::geography::Location;
use geostamp_common::metadata::MetadataInfo;
use geostamp_exif::{Exif, GPS_VERSION};
use utils::*;

fn metadata() -> MetadataInfo {
    MetadataInfo::new()
        .with_gps(Location::new(37.7749, -122.4194).unwrap())
        .with_description("Golden Gate, nebelig")
        .with_keywords("bridge,fog,Brücke")
}

#[test]
fn new_block() {
    let block = geostamp_exif::new_block(&metadata()).unwrap();
    let exif = Exif::new(&block).unwrap();

    let read = exif.metadata();
    let gps = read.gps.unwrap();
    assert!((gps.lat() - 37.7749).abs() < 1e-5);
    assert!((gps.lon() - -122.4194).abs() < 1e-5);
    assert_eq!(read.description.as_deref(), Some("Golden Gate, nebelig"));
    assert_eq!(read.keywords.as_deref(), Some("bridge,fog,Brücke"));

    let raw = exif.raw();
    assert_eq!(
        raw.lookup_binary(field::GPSVersionID).unwrap(),
        Some(GPS_VERSION.as_slice())
    );
    assert_eq!(
        raw.lookup_string(field::GPSLongitudeRef).unwrap().as_deref(),
        Some("W")
    );
    assert_eq!(
        raw.lookup_data(field::XPKeywords).unwrap().map(|(t, _)| t),
        Some(Type::Byte)
    );
}

#[test]
fn provenance_is_not_written() {
    let metadata = MetadataInfo {
        camera_make: Some(String::from("Canon")),
        date_time: Some(String::from("2024:01:01 00:00:00")),
        ..metadata()
    };

    let block = geostamp_exif::new_block(&metadata).unwrap();
    let read = Exif::new(&block).unwrap().metadata();

    assert_eq!(read.camera_make, None);
    assert_eq!(read.date_time, None);
}

#[test]
fn existing_entries_are_kept() {
    for big_endian in [false, true] {
        let original = camera_block(big_endian);

        let block = geostamp_exif::write_metadata_strict(&original, &metadata()).unwrap();

        let exif = Exif::new(&block).unwrap();
        assert_eq!(exif.raw().big_endian(), big_endian);

        let read = exif.metadata();
        assert_eq!(read.camera_make.as_deref(), Some("Canon"));
        assert_eq!(read.camera_model.as_deref(), Some("Canon EOS 400D DIGITAL"));
        assert_eq!(read.date_time.as_deref(), Some("2007:10:19 19:57:06"));
        assert!((read.gps.unwrap().lat() - 37.7749).abs() < 1e-5);

        let raw = exif.raw();
        assert_eq!(
            raw.lookup_short(TagIfd::new(Tag(0x112), Ifd::Primary)).unwrap(),
            Some(6)
        );
        // GPSAltitude is carried into the new GPS IFD
        let altitude = raw
            .lookup_rationals::<1>(TagIfd::new(Tag(0x6), Ifd::Gps))
            .unwrap()
            .unwrap();
        assert_eq!(altitude[0].numerator, 58);
    }
}

#[test]
fn entries_are_sorted() {
    let original = camera_block(false);
    let block = geostamp_exif::write_metadata_strict(&original, &metadata()).unwrap();

    let mut decoder = ExifRaw::new(&block);
    decoder.decode().unwrap();

    let ifd_positions = |ifd| {
        decoder
            .ifd_entries(ifd)
            .map(|(_, entry)| entry.position)
            .collect::<Vec<_>>()
    };

    for ifd in [Ifd::Primary, Ifd::Gps] {
        let positions = ifd_positions(ifd);
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }
}

#[test]
fn repeated_writes_do_not_accumulate() {
    let mut block = camera_block(false);

    for lat in [1., 2., 3.] {
        let metadata = MetadataInfo::new().with_gps(Location::new(lat, 4.).unwrap());
        block = geostamp_exif::write_metadata(Some(block.as_slice()), &metadata).unwrap();
    }

    let mut decoder = ExifRaw::new(&block);
    decoder.decode().unwrap();

    assert_eq!(decoder.locations[&TagIfd::from(field::GPSLatitude)].len(), 1);
    assert_eq!(decoder.ifd_entries(Ifd::Gps).count(), 6);

    let gps = Exif::new(&block).unwrap().gps_location().unwrap().unwrap();
    assert_eq!(gps.lat(), 3.);
}

#[test]
fn next_ifd_is_kept() {
    let original = build_block(false, vec![TestEntry::ascii(0x10F, "Make")], None, 1234);

    let block = geostamp_exif::write_metadata_strict(&original, &metadata()).unwrap();

    let mut decoder = ExifRaw::new(&block);
    decoder.decode().unwrap();
    assert_eq!(decoder.primary_next, 1234);
}

#[test]
fn undecodable_block() {
    let garbage = b"not an exif block";

    assert!(geostamp_exif::write_metadata_strict(garbage, &metadata()).is_err());

    let block = geostamp_exif::write_metadata(Some(garbage.as_slice()), &metadata()).unwrap();
    assert_eq!(&block[..4], &geostamp_exif::empty_block()[..4]);
    assert!(Exif::new(&block).unwrap().metadata().gps.is_some());
}

#[test]
fn only_description() {
    let metadata = MetadataInfo::new().with_description("Only text");
    let block = geostamp_exif::write_metadata(None, &metadata).unwrap();

    let mut decoder = ExifRaw::new(&block);
    decoder.decode().unwrap();
    assert!(!decoder.ifd_locations.contains_key(&Ifd::Gps));
    assert_eq!(
        decoder.lookup_string(field::ImageDescription).unwrap().as_deref(),
        Some("Only text")
    );
}

#[test]
fn identical_writes_keep_size() {
    for big_endian in [false, true] {
        let first = geostamp_exif::write_metadata_strict(&camera_block(big_endian), &metadata())
            .unwrap();
        let second = geostamp_exif::write_metadata_strict(&first, &metadata()).unwrap();

        assert_eq!(second.len(), first.len());
        assert_eq!(second, first);
    }

    let first = geostamp_exif::new_block(&metadata()).unwrap();
    let mut block = first.clone();
    for _ in 0..10 {
        block = geostamp_exif::write_metadata_strict(&block, &metadata()).unwrap();
    }
    assert_eq!(block, first);
}

#[test]
fn replaced_space_is_reused() {
    let big_endian = false;
    let original = build_block(
        big_endian,
        vec![
            TestEntry::ascii(0x10E, &"Old description ".repeat(19)),
            TestEntry::ascii(0x10F, "Canon"),
            TestEntry::ascii(0x110, "Canon EOS 400D DIGITAL"),
            TestEntry::ascii(0x132, "2007:10:19 19:57:06"),
            TestEntry::short(0x112, big_endian, 6),
            // PrintIM filling most of an APP1 segment
            TestEntry {
                tag: 0xC4A5,
                data_type: Type::Undefined,
                count: 64_000,
                data: vec![0x5A; 64_000],
            },
        ],
        Some(vec![
            TestEntry::ascii(0x1, "S"),
            TestEntry::rationals(0x2, big_endian, &[(33, 1), (52, 1), (768, 100)]),
            TestEntry::ascii(0x3, "E"),
            TestEntry::rationals(0x4, big_endian, &[(151, 1), (12, 1), (3000, 100)]),
            TestEntry::rationals(0x6, big_endian, &[(58, 1)]),
        ]),
        0,
    );

    let block = geostamp_exif::write_metadata_strict(&original, &metadata()).unwrap();
    assert_eq!(block.len(), original.len());
    assert!(!block.windows(15).any(|x| x == b"Old description"));

    let exif = Exif::new(&block).unwrap();
    let read = exif.metadata();
    assert!((read.gps.unwrap().lon() - -122.4194).abs() < 1e-5);
    assert_eq!(read.description.as_deref(), Some("Golden Gate, nebelig"));
    assert_eq!(read.keywords.as_deref(), Some("bridge,fog,Brücke"));
    assert_eq!(read.camera_model.as_deref(), Some("Canon EOS 400D DIGITAL"));

    let filler = exif
        .raw()
        .lookup_binary(TagIfd::new(Tag(0xC4A5), Ifd::Primary))
        .unwrap()
        .unwrap();
    assert_eq!(filler, vec![0x5A; 64_000].as_slice());
}

#[test]
fn replaced_values_are_cleared() {
    let long = MetadataInfo::new().with_description("Meeting point behind the old mill");
    let first = geostamp_exif::write_metadata_strict(&camera_block(false), &long).unwrap();
    assert!(first.windows(8).any(|x| x == b"old mill"));

    let short = MetadataInfo::new().with_description("Mill");
    let second = geostamp_exif::write_metadata_strict(&first, &short).unwrap();
    assert!(!second.windows(8).any(|x| x == b"old mill"));

    let read = Exif::new(&second).unwrap().metadata();
    assert_eq!(read.description.as_deref(), Some("Mill"));
    assert_eq!(read.camera_make.as_deref(), Some("Canon"));
}

fn strip_block(strip_offset: u32) -> Vec<u8> {
    let entries = vec![
        TestEntry::ascii(0x10E, "Old description"),
        TestEntry {
            tag: 0x111,
            data_type: Type::Long,
            count: 1,
            data: u32_bytes(false, strip_offset).to_vec(),
        },
        TestEntry {
            tag: 0x117,
            data_type: Type::Long,
            count: 1,
            data: u32_bytes(false, 64).to_vec(),
        },
    ];

    build_block(false, entries, None, 0)
}

#[test]
fn strips_are_kept() {
    // strip data directly after the primary IFD's values
    let strip_offset = strip_block(0).len();
    let mut block = strip_block(strip_offset as u32);
    block.extend_from_slice(&[0xEE; 64]);

    let mut decoder = ExifRaw::new(&block);
    decoder.decode().unwrap();

    for description in ["x".repeat(60), String::from("y")] {
        let new = decoder
            .rewrite(&[geostamp_exif::Entry::ImageDescription(description.clone())])
            .unwrap();

        assert_eq!(&new[strip_offset..strip_offset + 64], &[0xEE; 64]);
        assert_eq!(
            Exif::new(&new).unwrap().metadata().description,
            Some(description)
        );
    }
}

#[test]
fn gps_precision() {
    for (lat, lon) in [
        (37.7749295, -122.4194155),
        (-33.86882, 151.20929),
        (0.0000001, -0.0000001),
        (89.9999999, 179.9999999),
    ] {
        let metadata = MetadataInfo::new().with_gps(Location::new(lat, lon).unwrap());
        let block = geostamp_exif::new_block(&metadata).unwrap();
        let gps = Exif::new(&block).unwrap().gps_location().unwrap().unwrap();

        assert!((gps.lat() - lat).abs() < 1e-6, "{lat} != {}", gps.lat());
        assert!((gps.lon() - lon).abs() < 1e-6, "{lon} != {}", gps.lon());
    }
}
