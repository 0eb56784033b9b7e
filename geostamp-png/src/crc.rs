//! CRC-32 as used by PNG chunks

/// Checksum over chunk type followed by chunk data
///
/// ```
/// let crc = geostamp_png::crc::chunk_crc(*b"IEND", &[]);
/// assert_eq!(crc, 0xAE42_6082);
/// ```
pub fn chunk_crc(chunk_type: [u8; 4], data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&chunk_type);
    hasher.update(data);
    hasher.finalize()
}
