use std::ops::Range;

use super::*;
use crate::entry::{EncodedEntry, Entry};

/// Tags whose values point to data outside of any IFD, with the tag of the
/// corresponding lengths
const OFFSET_TAGS: [(Tag, Tag); 3] = [
    // StripOffsets, StripByteCounts
    (Tag(0x111), Tag(0x117)),
    // TileOffsets, TileByteCounts
    (Tag(0x144), Tag(0x145)),
    // JPEGInterchangeFormat, JPEGInterchangeFormatLength
    (Tag(0x201), Tag(0x202)),
];

/// Entry of an IFD that is about to be written
enum IfdItem {
    /// Copied unchanged from the existing block
    Existing([u8; 12]),
    New(EncodedEntry),
}

/// Space of the block that is written
///
/// `holes` are sorted, disjoint and unused. Everything from `end` on is free.
#[derive(Debug)]
struct Layout {
    holes: Vec<Range<u32>>,
    end: u32,
}

impl Layout {
    /// Returns an even offset with `len` free bytes and marks them used
    fn alloc(&mut self, len: u32) -> Result<u32> {
        for i in 0..self.holes.len() {
            let Some(hole) = self.holes.get_mut(i) else {
                break;
            };

            let start = even(hole.start)?;
            let end = start.safe_add(len)?;
            if end <= hole.end {
                hole.start = end;
                if hole.is_empty() {
                    self.holes.remove(i);
                }
                return Ok(start);
            }
        }

        let start = even(self.end)?;
        self.end = start.safe_add(len)?;
        Ok(start)
    }
}

impl<'a> super::ExifRaw<'a> {
    /// Returns a new block with `entries` set
    ///
    /// A new primary IFD and, if GPS entries are given, a new GPS IFD are
    /// written and the header is pointed to the new primary IFD. Offsets
    /// stored in untouched entries, like the Exif IFD, strips or thumbnails,
    /// remain valid.
    ///
    /// The space of the replaced IFDs and of replaced values is reused. If it
    /// sits at the end of the block, the block is shortened. Unused space is
    /// zeroed.
    ///
    /// The block has to be decoded before.
    pub fn rewrite(&self, entries: &[Entry]) -> Result<Vec<u8>> {
        let encoder = Encoder {
            big_endian: self.big_endian(),
        };

        let mut primary = BTreeMap::new();
        let mut gps = BTreeMap::new();
        for entry in entries {
            let tagifd = entry.tag_ifd();
            let target = match tagifd.ifd {
                Ifd::Primary => &mut primary,
                Ifd::Gps => &mut gps,
                ifd => {
                    tracing::info!("Not writing {} into unsupported IFD '{ifd:?}'", entry.name());
                    continue;
                }
            };
            target.insert(tagifd.tag, IfdItem::New(entry.encode(encoder)?));
        }

        let rewrite_gps = !gps.is_empty();
        if rewrite_gps {
            // placeholder, the offset is known after the GPS IFD is placed
            primary.insert(
                Tag::GPS_INFO_IFD_POINTER,
                IfdItem::New(EncodedEntry {
                    data_type: Type::Long,
                    count: 1,
                    data: encoder.u32(0).to_vec(),
                }),
            );
        }

        let mut layout = self.layout(&primary, rewrite_gps.then_some(&gps))?;

        let mut out = self.data().to_vec();
        out.truncate(layout.end.usize()?);
        for hole in &layout.holes {
            out.get_mut(hole.start.usize()?..hole.end.usize()?)
                .ok_or(Error::PositionOutOfBounds(hole.end))?
                .fill(0);
        }

        if rewrite_gps {
            for (tag, entry) in self.ifd_entries(Ifd::Gps) {
                if !gps.contains_key(&tag) {
                    gps.insert(tag, IfdItem::Existing(self.raw().read_exact(entry.position)?));
                }
            }

            let gps_offset = Self::write_ifd(&mut out, &mut layout, encoder, gps, 0)?;
            tracing::debug!("New GPS IFD at {gps_offset}");

            primary.insert(
                Tag::GPS_INFO_IFD_POINTER,
                IfdItem::New(EncodedEntry {
                    data_type: Type::Long,
                    count: 1,
                    data: encoder.u32(gps_offset).to_vec(),
                }),
            );
        }

        for (tag, entry) in self.ifd_entries(Ifd::Primary) {
            if !primary.contains_key(&tag) {
                primary.insert(tag, IfdItem::Existing(self.raw().read_exact(entry.position)?));
            }
        }

        let primary_offset =
            Self::write_ifd(&mut out, &mut layout, encoder, primary, self.primary_next)?;
        tracing::debug!("New primary IFD at {primary_offset}");

        let header = out.get_mut(4..8).ok_or(Error::HeaderEof)?;
        header.copy_from_slice(&encoder.u32(primary_offset));

        Ok(out)
    }

    /// Finds the space that is free once `primary` and `gps` replace the
    /// existing IFDs
    fn layout(
        &self,
        primary: &BTreeMap<Tag, IfdItem>,
        gps: Option<&BTreeMap<Tag, IfdItem>>,
    ) -> Result<Layout> {
        let len = self.data().len().u32().map_err(|_| Error::OffsetTooLarge)?;

        let mut replaced = Vec::new();
        for (ifd, items) in [(Ifd::Primary, Some(primary)), (Ifd::Gps, gps)] {
            let Some(items) = items else {
                continue;
            };
            for (tag, item) in items {
                if let IfdItem::New(_) = item {
                    if let Some(entry) = self.lookup_entry(TagIfd::new(*tag, ifd)) {
                        replaced.push(entry.position);
                    }
                }
            }
        }

        let mut freed = Vec::new();
        let mut used = vec![0..8];

        for (ifd, offset) in &self.ifd_locations {
            let range = self.ifd_range(*offset)?;
            if *ifd == Ifd::Primary || (*ifd == Ifd::Gps && gps.is_some()) {
                freed.push(range);
            } else {
                used.push(range);
            }
        }

        for entries in self.locations.values() {
            for entry in entries {
                let ValueOffset::Offset(_) = entry.value_offset else {
                    continue;
                };
                let Ok(range) = entry.data_location() else {
                    continue;
                };
                if replaced.contains(&entry.position) {
                    freed.push(range);
                } else {
                    used.push(range);
                }
            }
        }

        for ifd in self.ifd_locations.keys() {
            for (offset_tag, length_tag) in OFFSET_TAGS {
                let offsets = self.lookup_u32s(TagIfd::new(offset_tag, *ifd));
                let lengths = self.lookup_u32s(TagIfd::new(length_tag, *ifd));
                for (i, offset) in offsets.iter().enumerate() {
                    // unknown length, keep everything behind
                    let end = lengths
                        .get(i)
                        .and_then(|length| offset.checked_add(*length))
                        .unwrap_or(len);
                    used.push(*offset..end);
                }
            }
        }

        let mut holes = Vec::<Range<u32>>::new();
        freed.sort_by_key(|x| x.start);
        let is_free = |hole: &Range<u32>| {
            hole.start >= 8
                && hole.end <= len
                && !hole.is_empty()
                && !used.iter().any(|x| x.start < hole.end && hole.start < x.end)
        };

        for hole in freed {
            // including the padding after odd sized data
            let padded = hole.start..even(hole.end)?.min(len);
            let hole = if is_free(&padded) {
                padded
            } else if is_free(&hole) {
                hole
            } else {
                continue;
            };

            match holes.last_mut() {
                Some(last) if hole.start <= last.end => last.end = last.end.max(hole.end),
                _ => holes.push(hole),
            }
        }

        let mut end = len;
        if let Some(last) = holes.last() {
            if last.end == len {
                end = last.start;
                holes.pop();
            }
        }

        tracing::debug!("Reusing {} holes, new data starts at {end}", holes.len());

        Ok(Layout { holes, end })
    }

    /// Range of the IFD at `offset` including the next IFD offset
    fn ifd_range(&self, offset: u32) -> Result<Range<u32>> {
        let len = self.data().len().u32().map_err(|_| Error::OffsetTooLarge)?;

        let ifd_len = match self.raw().read_u16(offset) {
            Ok(n_entries) => u32::from(n_entries).safe_mul(ENTRY_SIZE)?.safe_add(6)?,
            Err(_) => 2,
        };

        let end = offset.saturating_add(ifd_len).min(len);
        Ok(offset..end.max(offset))
    }

    /// Values of a [`Type::Short`] or [`Type::Long`] entry
    ///
    /// Missing or undecodable entries are empty.
    fn lookup_u32s(&self, tagifd: TagIfd) -> Vec<u32> {
        let raw = self.raw();
        match self.lookup_data(tagifd) {
            Ok(Some((Type::Short, data))) => data
                .chunks_exact(2)
                .map(|x| u32::from(raw.u16_from([x[0], x[1]])))
                .collect(),
            Ok(Some((Type::Long, data))) => data
                .chunks_exact(4)
                .map(|x| raw.u32_from([x[0], x[1], x[2], x[3]]))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Places an IFD with its values and returns the IFD's offset
    fn write_ifd(
        out: &mut Vec<u8>,
        layout: &mut Layout,
        encoder: Encoder,
        items: BTreeMap<Tag, IfdItem>,
        next_ifd: u32,
    ) -> Result<u32> {
        let n_entries = items.len().u16().map_err(|_| Error::DataSizeTooLarge)?;

        let mut ifd = Vec::new();
        ifd.extend_from_slice(&encoder.u16(n_entries));

        for (tag, item) in items {
            match item {
                IfdItem::Existing(raw) => ifd.extend_from_slice(&raw),
                IfdItem::New(encoded) => {
                    ifd.extend_from_slice(&encoder.u16(tag.0));
                    ifd.extend_from_slice(&encoder.u16(encoded.data_type.u16()));
                    ifd.extend_from_slice(&encoder.u32(encoded.count));

                    if encoded.data.len() <= 4 {
                        let mut value = [0; 4];
                        value
                            .get_mut(..encoded.data.len())
                            .ok_or(Error::DataSizeTooLarge)?
                            .copy_from_slice(&encoded.data);
                        ifd.extend_from_slice(&value);
                    } else {
                        let len = encoded.data.len().u32().map_err(|_| Error::OffsetTooLarge)?;
                        let offset = layout.alloc(len)?;
                        place(out, offset, &encoded.data)?;
                        ifd.extend_from_slice(&encoder.u32(offset));
                    }
                }
            }
        }

        ifd.extend_from_slice(&encoder.u32(next_ifd));

        let len = ifd.len().u32().map_err(|_| Error::OffsetTooLarge)?;
        let offset = layout.alloc(len)?;
        place(out, offset, &ifd)?;

        Ok(offset)
    }
}

/// Copies `bytes` to `offset`, extending `out` if needed
fn place(out: &mut Vec<u8>, offset: u32, bytes: &[u8]) -> Result<()> {
    let range = checked_range(offset.usize()?, bytes.len())?;
    if out.len() < range.end {
        out.resize(range.end, 0);
    }

    out.get_mut(range)
        .ok_or(Error::PositionOutOfBounds(offset))?
        .copy_from_slice(bytes);

    Ok(())
}

/// Rounds up to an even offset
fn even(offset: u32) -> Result<u32> {
    Ok(offset.safe_add(offset & 1)?)
}
