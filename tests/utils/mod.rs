//! Minimal images for all supported formats
#![allow(dead_code, clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]

use geostamp_common::metadata::MetadataInfo;

pub fn png() -> Vec<u8> {
    use geostamp_png::{create_chunk, ChunkType};

    let mut data = geostamp_png::MAGIC_BYTES.to_vec();
    let ihdr = [0, 0, 0, 2, 0, 0, 0, 2, 8, 6, 0, 0, 0];
    data.extend(create_chunk(ChunkType::IHDR, &ihdr).unwrap());
    data.extend(create_chunk(ChunkType::IDAT, &[0x78, 0x9C, 0x63, 0x00, 0x00]).unwrap());
    data.extend(create_chunk(ChunkType::IEND, &[]).unwrap());
    data
}

fn segment(marker: u8, payload: &[u8]) -> Vec<u8> {
    let mut data = vec![0xFF, marker];
    data.extend_from_slice(&(payload.len() as u16 + 2).to_be_bytes());
    data.extend_from_slice(payload);
    data
}

/// JFIF image without Exif
pub fn jpeg() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    data.extend(segment(0xE0, b"JFIF\0\x01\x02\0\0\x01\0\x01\0\0"));
    data.extend(segment(0xDB, &[0; 65]));
    data.extend(segment(0xC0, &[8, 0, 2, 0, 2, 1, 1, 0x11, 0]));
    data.extend(segment(0xDA, &[1, 1, 0, 0, 63, 0]));
    data.extend_from_slice(&[0x12, 0x34, 0xFF, 0x00, 0x56]);
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

/// JPEG with the given Exif block
pub fn jpeg_with_exif(exif: &[u8]) -> Vec<u8> {
    let data = jpeg();
    geostamp_jpeg::Jpeg::new(&data)
        .unwrap()
        .replace_exif(exif)
        .unwrap()
}

/// Lossy bitstream of a 2x2 image
fn vp8() -> Vec<u8> {
    let mut payload = vec![0x30, 0x01, 0x00, 0x9D, 0x01, 0x2A];
    payload.extend_from_slice(&2_u16.to_le_bytes());
    payload.extend_from_slice(&2_u16.to_le_bytes());
    payload.extend_from_slice(&[0; 8]);
    payload
}

pub fn webp(vp8x: bool) -> Vec<u8> {
    use geostamp_webp::{create_chunk, FourCC};

    let mut body = geostamp_webp::WEBP_MAGIC_BYTES.to_vec();
    if vp8x {
        body.extend(create_chunk(FourCC::VP8X, &[0, 0, 0, 0, 1, 0, 0, 1, 0, 0]).unwrap());
    }
    body.extend(create_chunk(FourCC::VP8, &vp8()).unwrap());

    let mut data = geostamp_webp::RIFF_MAGIC_BYTES.to_vec();
    data.extend_from_slice(&(body.len() as u32).to_le_bytes());
    data.extend(body);
    data
}

/// Little endian TIFF with one IFD and no image data
pub fn tiff() -> Vec<u8> {
    geostamp_exif::empty_block()
}

fn boxed(box_type: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&(payload.len() as u32 + 8).to_be_bytes());
    data.extend_from_slice(box_type);
    data.extend_from_slice(payload);
    data
}

fn full_box(box_type: &[u8; 4], version: u8, payload: &[u8]) -> Vec<u8> {
    let mut data = vec![version, 0, 0, 0];
    data.extend_from_slice(payload);
    boxed(box_type, &data)
}

/// HEIC with the Exif item stored in `idat`
pub fn heic(metadata: &MetadataInfo) -> Vec<u8> {
    let mut item = 0_u32.to_be_bytes().to_vec();
    item.extend(geostamp_exif::new_block(metadata).unwrap());

    let mut infe = 1_u16.to_be_bytes().to_vec();
    infe.extend_from_slice(&0_u16.to_be_bytes());
    infe.extend_from_slice(b"Exif");
    infe.push(0);

    let mut iinf = 1_u16.to_be_bytes().to_vec();
    iinf.extend(full_box(b"infe", 2, &infe));

    let mut iloc = vec![0x44, 0x00];
    iloc.extend_from_slice(&1_u16.to_be_bytes());
    iloc.extend_from_slice(&1_u16.to_be_bytes());
    // construction method 1: idat
    iloc.extend_from_slice(&1_u16.to_be_bytes());
    iloc.extend_from_slice(&0_u16.to_be_bytes());
    iloc.extend_from_slice(&1_u16.to_be_bytes());
    iloc.extend_from_slice(&0_u32.to_be_bytes());
    iloc.extend_from_slice(&(item.len() as u32).to_be_bytes());

    let mut meta = full_box(b"hdlr", 0, b"\0\0\0\0pict\0\0\0\0\0\0\0\0\0\0\0\0\0");
    meta.extend(full_box(b"iinf", 0, &iinf));
    meta.extend(full_box(b"iloc", 1, &iloc));
    meta.extend(boxed(b"idat", &item));

    let mut data = boxed(b"ftyp", b"heic\0\0\0\0mif1heic");
    data.extend(full_box(b"meta", 0, &meta));
    data.extend(boxed(b"mdat", b"pixels"));
    data
}

pub fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-5, "{a} != {b}");
}
