use super::*;
use crate::error::ResultExt;

impl<'a> super::ExifRaw<'a> {
    /// Decode data in buffer
    ///
    /// See 4.5.2 in v3.0 standard
    pub fn decode(&mut self) -> Result<()> {
        self.locations = Default::default();
        self.ifd_locations = Default::default();
        self.primary_next = 0;

        let ifd_offset = self.decode_header()?;

        self.primary_next = self.decode_ifd_entries(Ifd::Primary, ifd_offset)?;

        if self.primary_next != 0 {
            self.decode_ifd_entries_error_silenced(Ifd::Thumbnail, self.primary_next);
        }

        Ok(())
    }

    /// Reads byte order and magic bytes, returns the offset of the primary IFD
    pub fn decode_header(&mut self) -> Result<u32> {
        self.read_byte_order()?;
        self.read_magic_42()?;

        self.raw().read_u32(4).e(Error::HeaderEof)
    }

    pub fn read_byte_order(&mut self) -> Result<()> {
        let big_endian = match &self.raw().read_exact(0).e(Error::HeaderEof)? {
            b"II" => false,
            b"MM" => true,
            bo => return Err(Error::UnknownByteOrder(*bo)),
        };

        self.raw.big_endian = big_endian;

        Ok(())
    }

    pub fn read_magic_42(&mut self) -> Result<()> {
        match self.raw().read_u16(2).e(Error::HeaderEof)? {
            42 => Ok(()),
            magic => Err(Error::MagicBytesWrong(magic)),
        }
    }

    /// Sometimes, not all IFD locations are actually valid
    pub fn decode_ifd_entries_error_silenced(&mut self, ifd: Ifd, ifd_offset: u32) {
        if let Err(err) = self.decode_ifd_entries(ifd, ifd_offset) {
            tracing::info!("Failed to load IFD '{ifd:?}' at {ifd_offset}: {err}");
        }
    }

    /// Decodes all entries of an IFD and returns the offset of the next IFD
    pub fn decode_ifd_entries(&mut self, ifd: Ifd, ifd_offset: u32) -> Result<u32> {
        if self.add_ifd_location(ifd, ifd_offset) {
            tracing::info!("Ignoring duplicate IFD '{ifd:?}'");
            return Ok(0);
        }

        let n_entries = self.raw().read_u16(ifd_offset).e(Error::IfdEof(ifd))?;
        tracing::debug!("Reading IFD '{ifd:?}' with {n_entries} entries at byte {ifd_offset}");

        let entries_start = ifd_offset.safe_add(2)?;
        let entries_len = u32::from(n_entries).safe_mul(ENTRY_SIZE)?;
        let offset_location = entries_start.safe_add(entries_len)?;

        let mut exif_specific_ifd_offsets = Vec::new();
        for i in 0..u32::from(n_entries) {
            let position = entries_start.safe_add(i.safe_mul(ENTRY_SIZE)?)?;
            let (tag, entry) = self.read_entry(position).e(Error::IfdEof(ifd))?;

            if let Some(sub_ifd) = tag.exif_specific_ifd() {
                exif_specific_ifd_offsets.push((sub_ifd, entry));
            }

            self.locations
                .entry(TagIfd::new(tag, ifd))
                .or_default()
                .push(entry);
        }

        tracing::debug!("All entries in IFD '{ifd:?}' read");

        // Some writers omit the next IFD offset after the last IFD
        let next_ifd = self.raw().read_u32(offset_location).unwrap_or_else(|_| {
            tracing::info!("IFD '{ifd:?}' has no next IFD offset");
            0
        });

        // Load entries for every found Exif specific IFD
        for (sub_ifd, entry) in exif_specific_ifd_offsets {
            if !Self::sub_ifd_allowed(ifd, sub_ifd) {
                tracing::info!("Ignoring IFD pointer to '{sub_ifd:?}' inside '{ifd:?}'");
                continue;
            }

            tracing::debug!("Reading Exif specific IFD '{sub_ifd:?}'");
            let offset = self.raw().u32_from(entry.raw_value);
            self.decode_ifd_entries_error_silenced(sub_ifd, offset);
        }

        Ok(next_ifd)
    }

    /// Read a single entry from IFD
    pub fn read_entry(&self, position: u32) -> Result<(Tag, EntryRef)> {
        let raw = self.raw();

        let tag_id = raw.read_u16(position)?;
        let data_type = Type::from(raw.read_u16(position.safe_add(2)?)?);
        let count = raw.read_u32(position.safe_add(4)?)?;
        let raw_value: [u8; 4] = raw.read_exact(position.safe_add(8)?)?;
        let value_offset = ValueOffset::new(data_type, count, raw.u32_from(raw_value))?;

        Ok((
            Tag(tag_id),
            EntryRef {
                position,
                data_type,
                count,
                value_offset,
                raw_value,
            },
        ))
    }

    /// Adds location of IFD, returns `true` if the IFD was already known
    pub fn add_ifd_location(&mut self, ifd: Ifd, location: u32) -> bool {
        if self.ifd_locations.contains_key(&ifd) {
            return true;
        }

        self.ifd_locations.insert(ifd, location);
        false
    }

    fn sub_ifd_allowed(parent: Ifd, sub_ifd: Ifd) -> bool {
        matches!(
            (parent, sub_ifd),
            (Ifd::Primary, Ifd::Exif) | (Ifd::Primary, Ifd::Gps) | (Ifd::Exif, Ifd::Interoperability)
        )
    }
}
