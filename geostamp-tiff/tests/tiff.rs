use geostamp_common::error::ErrorKind;
use geostamp_common::geography::Location;
use geostamp_common::metadata::MetadataInfo;
use geostamp_exif::Exif;
use geostamp_tiff::{Error, Tiff};

/// Little endian TIFF with one strip of pixel data
fn tiff() -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"II*\0");
    data.extend_from_slice(&8_u32.to_le_bytes());

    let entries: [(u16, u16, u32, u32); 4] = [
        // ImageWidth
        (0x100, 3, 1, 1),
        // ImageLength
        (0x101, 3, 1, 1),
        // StripOffsets
        (0x111, 4, 1, 62),
        // StripByteCounts
        (0x117, 4, 1, 3),
    ];

    data.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for (tag, data_type, count, value) in entries {
        data.extend_from_slice(&tag.to_le_bytes());
        data.extend_from_slice(&data_type.to_le_bytes());
        data.extend_from_slice(&count.to_le_bytes());
        data.extend_from_slice(&value.to_le_bytes());
    }
    data.extend_from_slice(&0_u32.to_le_bytes());

    assert_eq!(data.len(), 62);
    data.extend_from_slice(&[0xAA, 0xBB, 0xCC]);
    data
}

#[test]
fn write_and_read() {
    let data = tiff();
    assert!(Tiff::is_filetype(&data));

    let metadata = MetadataInfo::new()
        .with_gps(Location::new(-33.8688, 151.2093).unwrap())
        .with_description("Harbour");

    let tiff = Tiff::new(&data).unwrap();
    let new = tiff.write_metadata(&metadata).unwrap();

    // strip stays where the offset points
    assert_eq!(&new[62..65], &[0xAA, 0xBB, 0xCC]);

    let read = Exif::new(Tiff::new(&new).unwrap().exif()).unwrap().metadata();
    let gps = read.gps.unwrap();
    assert!((gps.lat() - -33.8688).abs() < 1e-5);
    assert!((gps.lon() - 151.2093).abs() < 1e-5);
    assert_eq!(read.description.as_deref(), Some("Harbour"));
}

#[test]
fn not_a_tiff() {
    assert!(matches!(Tiff::new(b"RIFF"), Err(Error::InvalidMagicBytes)));
}

#[test]
fn undecodable_directory() {
    let mut data = tiff();
    // primary IFD offset outside of the data
    data[4..8].copy_from_slice(&1000_u32.to_le_bytes());

    let err = Tiff::new(&data)
        .unwrap()
        .write_metadata(&MetadataInfo::new().with_description("x"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CorruptContainer);
}

#[test]
fn repeated_writes_keep_size() {
    let metadata = MetadataInfo::new()
        .with_gps(Location::new(-33.8688, 151.2093).unwrap())
        .with_description("Harbour");

    let first = Tiff::new(&tiff()).unwrap().write_metadata(&metadata).unwrap();
    let mut data = first.clone();
    for _ in 0..5 {
        data = Tiff::new(&data).unwrap().write_metadata(&metadata).unwrap();
    }

    assert_eq!(data, first);
    assert_eq!(&data[62..65], &[0xAA, 0xBB, 0xCC]);
}
