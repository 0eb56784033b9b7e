#![allow(dead_code, clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]

pub use geostamp_exif::internal::*;

/// Entry for building test blocks
#[derive(Debug, Clone)]
pub struct TestEntry {
    pub tag: u16,
    pub data_type: Type,
    pub count: u32,
    pub data: Vec<u8>,
}

impl TestEntry {
    pub fn ascii(tag: u16, s: &str) -> Self {
        let mut data = s.as_bytes().to_vec();
        data.push(0);
        Self {
            tag,
            data_type: Type::Ascii,
            count: data.len() as u32,
            data,
        }
    }

    pub fn rationals(tag: u16, big_endian: bool, values: &[(u32, u32)]) -> Self {
        let mut data = Vec::new();
        for (n, d) in values {
            data.extend_from_slice(&u32_bytes(big_endian, *n));
            data.extend_from_slice(&u32_bytes(big_endian, *d));
        }
        Self {
            tag,
            data_type: Type::Rational,
            count: values.len() as u32,
            data,
        }
    }

    pub fn short(tag: u16, big_endian: bool, value: u16) -> Self {
        Self {
            tag,
            data_type: Type::Short,
            count: 1,
            data: u16_bytes(big_endian, value).to_vec(),
        }
    }
}

pub fn u16_bytes(big_endian: bool, value: u16) -> [u8; 2] {
    if big_endian {
        value.to_be_bytes()
    } else {
        value.to_le_bytes()
    }
}

pub fn u32_bytes(big_endian: bool, value: u32) -> [u8; 4] {
    if big_endian {
        value.to_be_bytes()
    } else {
        value.to_le_bytes()
    }
}

/// Builds a block with a primary IFD and an optional GPS IFD
///
/// The GPS IFD is written first, directly after the header.
pub fn build_block(
    big_endian: bool,
    mut primary: Vec<TestEntry>,
    gps: Option<Vec<TestEntry>>,
    next_ifd: u32,
) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(if big_endian { b"MM" } else { b"II" });
    data.extend_from_slice(&u16_bytes(big_endian, 42));
    data.extend_from_slice(&[0; 4]);

    if let Some(gps) = gps {
        let gps_offset = write_ifd(&mut data, big_endian, gps, 0);
        primary.push(TestEntry {
            tag: 0x8825,
            data_type: Type::Long,
            count: 1,
            data: u32_bytes(big_endian, gps_offset).to_vec(),
        });
    }

    let primary_offset = write_ifd(&mut data, big_endian, primary, next_ifd);
    data[4..8].copy_from_slice(&u32_bytes(big_endian, primary_offset));

    data
}

pub fn write_ifd(
    data: &mut Vec<u8>,
    big_endian: bool,
    mut entries: Vec<TestEntry>,
    next_ifd: u32,
) -> u32 {
    entries.sort_by_key(|x| x.tag);

    if data.len() % 2 != 0 {
        data.push(0);
    }

    let offset = data.len() as u32;
    let mut data_offset = offset + 2 + entries.len() as u32 * 12 + 4;
    let mut data_area = Vec::new();

    data.extend_from_slice(&u16_bytes(big_endian, entries.len() as u16));
    for entry in &entries {
        data.extend_from_slice(&u16_bytes(big_endian, entry.tag));
        data.extend_from_slice(&u16_bytes(big_endian, entry.data_type.u16()));
        data.extend_from_slice(&u32_bytes(big_endian, entry.count));
        if entry.data.len() <= 4 {
            let mut value = [0; 4];
            value[..entry.data.len()].copy_from_slice(&entry.data);
            data.extend_from_slice(&value);
        } else {
            data.extend_from_slice(&u32_bytes(big_endian, data_offset));
            data_area.extend_from_slice(&entry.data);
            if data_area.len() % 2 != 0 {
                data_area.push(0);
            }
            data_offset = offset + 2 + entries.len() as u32 * 12 + 4 + data_area.len() as u32;
        }
    }
    data.extend_from_slice(&u32_bytes(big_endian, next_ifd));
    data.extend_from_slice(&data_area);

    offset
}

/// Block with camera data and a position in the southern hemisphere
pub fn camera_block(big_endian: bool) -> Vec<u8> {
    build_block(
        big_endian,
        vec![
            TestEntry::ascii(0x10F, "Canon"),
            TestEntry::ascii(0x110, "Canon EOS 400D DIGITAL"),
            TestEntry::ascii(0x132, "2007:10:19 19:57:06"),
            TestEntry::short(0x112, big_endian, 6),
        ],
        Some(vec![
            TestEntry::ascii(0x1, "S"),
            TestEntry::rationals(0x2, big_endian, &[(33, 1), (52, 1), (768, 100)]),
            TestEntry::ascii(0x3, "E"),
            TestEntry::rationals(0x4, big_endian, &[(151, 1), (12, 1), (3000, 100)]),
            TestEntry::rationals(0x6, big_endian, &[(58, 1)]),
        ]),
        0,
    )
}
