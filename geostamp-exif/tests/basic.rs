mod utils;

use geostamp_common::error::ErrorKind;
use geostamp_common::exif::{Field, Rational};
use geostamp_common::field;
use geostamp_exif::error::Error;
use geostamp_exif::Exif;
use utils::*;

#[test]
fn basic_low_level() {
    for big_endian in [false, true] {
        let data = camera_block(big_endian);
        let mut decoder = ExifRaw::new(&data);
        decoder.decode().unwrap();

        assert_eq!(decoder.big_endian(), big_endian);
        assert_eq!(
            decoder.lookup_string(field::Make).unwrap().as_deref(),
            Some("Canon")
        );
        assert_eq!(
            decoder.lookup_short(TagIfd::new(Tag(0x112), Ifd::Primary)).unwrap(),
            Some(6)
        );
        assert_eq!(
            decoder.lookup_rationals::<3>(field::GPSLatitude).unwrap(),
            Some([
                Rational::new(33, 1),
                Rational::new(52, 1),
                Rational::new(768, 100)
            ])
        );

        let missing = TagIfd::new(field::Make::TAG, Ifd::Thumbnail);
        assert!(decoder.lookup_data(missing).unwrap().is_none());
    }
}

#[test]
fn basic_high_level() {
    let data = camera_block(false);
    let exif = Exif::new(&data).unwrap();
    let metadata = exif.metadata();

    assert_eq!(metadata.camera_make.as_deref(), Some("Canon"));
    assert_eq!(metadata.camera_model.as_deref(), Some("Canon EOS 400D DIGITAL"));
    assert_eq!(metadata.date_time.as_deref(), Some("2007:10:19 19:57:06"));
    assert_eq!(metadata.description, None);
    assert_eq!(metadata.keywords, None);

    let gps = metadata.gps.unwrap();
    assert!((gps.lat() - -33.8688).abs() < 1e-5);
    assert!((gps.lon() - 151.2083333).abs() < 1e-5);
}

#[test]
fn missing_ref_is_positive() {
    let data = build_block(
        false,
        vec![],
        Some(vec![
            TestEntry::rationals(0x2, false, &[(10, 1), (30, 1), (0, 100)]),
            TestEntry::rationals(0x4, false, &[(20, 1), (15, 1), (0, 100)]),
        ]),
        0,
    );

    let gps = Exif::new(&data).unwrap().gps_location().unwrap().unwrap();
    assert_eq!(gps.lat(), 10.5);
    assert_eq!(gps.lon(), 20.25);
}

#[test]
fn invalid_ref() {
    let data = build_block(
        false,
        vec![],
        Some(vec![
            TestEntry::ascii(0x1, "X"),
            TestEntry::rationals(0x2, false, &[(10, 1), (30, 1), (0, 100)]),
            TestEntry::ascii(0x3, "E"),
            TestEntry::rationals(0x4, false, &[(20, 1), (15, 1), (0, 100)]),
        ]),
        0,
    );

    let exif = Exif::new(&data).unwrap();
    let err = exif.gps_location().unwrap_err();
    assert!(matches!(err, Error::InvalidRef(_)));
    assert_eq!(err.kind(), ErrorKind::MalformedField);

    assert_eq!(exif.metadata().gps, None);
}

#[test]
fn zero_denominator() {
    let data = build_block(
        true,
        vec![TestEntry::ascii(0x10F, "Make")],
        Some(vec![
            TestEntry::rationals(0x2, true, &[(10, 0), (30, 1), (0, 100)]),
            TestEntry::rationals(0x4, true, &[(20, 1), (15, 1), (0, 100)]),
        ]),
        0,
    );

    let exif = Exif::new(&data).unwrap();
    assert!(matches!(
        exif.gps_location(),
        Err(Error::ZeroDenominator(_))
    ));

    let metadata = exif.metadata();
    assert_eq!(metadata.gps, None);
    assert_eq!(metadata.camera_make.as_deref(), Some("Make"));
}

#[test]
fn wrong_type_is_ignored() {
    let data = build_block(
        false,
        vec![
            TestEntry::short(0x10F, false, 1),
            TestEntry::ascii(0x110, "Model"),
        ],
        None,
        0,
    );

    let exif = Exif::new(&data).unwrap();
    assert!(matches!(
        exif.raw().lookup_string(field::Make),
        Err(Error::WrongType { .. })
    ));
    assert_eq!(exif.make(), None);
    assert_eq!(exif.model().as_deref(), Some("Model"));
}

#[test]
fn unknown_byte_order() {
    let mut data = camera_block(false);
    data[0..2].copy_from_slice(b"XY");

    let err = Exif::new(&data).unwrap_err();
    assert!(matches!(err, Error::UnknownByteOrder(_)));
    assert_eq!(err.kind(), ErrorKind::CorruptContainer);
}

#[test]
fn wrong_magic() {
    let mut data = camera_block(false);
    data[2] = 43;

    assert!(matches!(
        Exif::new(&data),
        Err(Error::MagicBytesWrong(43))
    ));
}

#[test]
fn truncated() {
    assert!(matches!(Exif::new(b"II*\0"), Err(Error::HeaderEof)));

    let mut data = camera_block(false);
    let primary_offset = u32::from_le_bytes(data[4..8].try_into().unwrap()) as usize;
    data.truncate(primary_offset + 10);
    let err = Exif::new(&data).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CorruptContainer);
}

#[test]
fn broken_gps_pointer_is_skipped() {
    let data = build_block(
        false,
        vec![
            TestEntry::ascii(0x10F, "Make"),
            TestEntry {
                tag: 0x8825,
                data_type: Type::Long,
                count: 1,
                data: 0xFFFF_0000_u32.to_le_bytes().to_vec(),
            },
        ],
        None,
        0,
    );

    let exif = Exif::new(&data).unwrap();
    assert_eq!(exif.make().as_deref(), Some("Make"));
    assert_eq!(exif.gps_location().unwrap(), None);
}

#[test]
fn broken_thumbnail_ifd_is_skipped() {
    let data = build_block(false, vec![TestEntry::ascii(0x10F, "Make")], None, 5000);

    let mut decoder = ExifRaw::new(&data);
    decoder.decode().unwrap();
    assert_eq!(decoder.primary_next, 5000);
    assert_eq!(decoder.ifd_entries(Ifd::Thumbnail).count(), 0);
}

#[test]
fn debug_dump() {
    let data = camera_block(false);
    let mut decoder = ExifRaw::new(&data);
    decoder.decode().unwrap();

    let dump = decoder.debug_dump();
    assert!(dump.contains("Make Ascii(6)"));
    assert!(dump.contains("Canon EOS 400D DIGITAL"));
    assert!(dump.contains("33/1 52/1 768/100"));
}
