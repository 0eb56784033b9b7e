use geostamp_common::exif::Rational;

use super::*;
use crate::error::ResultExt;

impl<'a> super::ExifRaw<'a> {
    pub fn lookup_entry(&self, tagifd: impl Into<TagIfd>) -> Option<EntryRef> {
        self.locations
            .get(&tagifd.into())
            .and_then(|entries| entries.first())
            .copied()
    }

    /// Returns the data of an entry as stored, inline values included
    pub fn lookup_data(&self, tagifd: impl Into<TagIfd>) -> Result<Option<(Type, &'a [u8])>> {
        let tagifd = tagifd.into();
        let Some(entry) = self.lookup_entry(tagifd) else {
            return Ok(None);
        };

        let data = self
            .raw()
            .get(entry.data_location()?)
            .e(Error::LookupEof(tagifd))?;

        Ok(Some((entry.data_type, data)))
    }

    pub fn lookup_binary(&self, tagifd: impl Into<TagIfd>) -> Result<Option<&'a [u8]>> {
        Ok(self.lookup_data(tagifd)?.map(|(_, data)| data))
    }

    /// Returns a field of [`Type::Ascii`] or [`Type::Utf8`]
    ///
    /// All NULL bytes are removed, not only the terminating one. Some writers
    /// put NULL bytes at the end or beginning of the data.
    pub fn lookup_string(&self, tagifd: impl Into<TagIfd>) -> Result<Option<String>> {
        let tagifd = tagifd.into();
        let Some((data_type, data)) = self.lookup_data(tagifd)? else {
            return Ok(None);
        };

        Self::check_data_type(tagifd, data_type, &[Type::Ascii, Type::Utf8])?;

        let data = data.iter().copied().filter(|x| *x != 0).collect::<Vec<_>>();

        Ok(Some(String::from_utf8_lossy(&data).into_owned()))
    }

    /// Returns `XPKeywords` style UTF-16LE data stored as [`Type::Byte`]
    pub fn lookup_utf16(&self, tagifd: impl Into<TagIfd>) -> Result<Option<String>> {
        let tagifd = tagifd.into();
        let Some((data_type, data)) = self.lookup_data(tagifd)? else {
            return Ok(None);
        };

        Self::check_data_type(tagifd, data_type, &[Type::Byte, Type::Undefined])?;

        let units = data
            .chunks_exact(2)
            .map(|x| u16::from_le_bytes([x[0], x[1]]))
            .take_while(|x| *x != 0)
            .collect::<Vec<_>>();

        Ok(Some(String::from_utf16_lossy(&units)))
    }

    pub fn lookup_short(&self, tagifd: impl Into<TagIfd>) -> Result<Option<u16>> {
        let tagifd = tagifd.into();
        let Some(entry) = self.lookup_entry(tagifd) else {
            return Ok(None);
        };

        Self::check_type(tagifd, &entry, Some(1), &[Type::Short])?;

        Ok(Some(self.raw().u16_from([entry.raw_value[0], entry.raw_value[1]])))
    }

    pub fn lookup_rationals<const N: usize>(
        &self,
        tagifd: impl Into<TagIfd>,
    ) -> Result<Option<[Rational; N]>> {
        let tagifd = tagifd.into();
        let Some(entry) = self.lookup_entry(tagifd) else {
            return Ok(None);
        };

        Self::check_type(tagifd, &entry, Some(N.u32()?), &[Type::Rational])?;

        let raw = self.raw();
        let data = raw
            .get(entry.data_location()?)
            .e(Error::LookupEof(tagifd))?;

        let mut rationals = [Rational::new(0, 0); N];
        for (rational, bytes) in rationals.iter_mut().zip(data.chunks_exact(8)) {
            let numerator = raw.u32_from([bytes[0], bytes[1], bytes[2], bytes[3]]);
            let denominator = raw.u32_from([bytes[4], bytes[5], bytes[6], bytes[7]]);
            *rational = Rational::new(numerator, denominator);
        }

        Ok(Some(rationals))
    }

    /// Rationals converted to floating point
    ///
    /// A zero denominator is reported as [`Error::ZeroDenominator`].
    pub fn lookup_rationals_f64<const N: usize>(
        &self,
        tagifd: impl Into<TagIfd>,
    ) -> Result<Option<[f64; N]>> {
        let tagifd = tagifd.into();
        let Some(rationals): Option<[Rational; N]> = self.lookup_rationals(tagifd)? else {
            return Ok(None);
        };

        let mut floats = [0.; N];
        for (float, rational) in floats.iter_mut().zip(rationals) {
            if rational.denominator == 0 {
                return Err(Error::ZeroDenominator(tagifd));
            }
            *float = rational.to_f64()?;
        }

        Ok(Some(floats))
    }

    fn check_type(
        tagifd: TagIfd,
        entry: &EntryRef,
        count: Option<u32>,
        data_types: &'static [Type],
    ) -> Result<()> {
        let count_matches = count.map_or(true, |count| count == entry.count);

        if count_matches && data_types.contains(&entry.data_type) {
            Ok(())
        } else {
            Err(Error::WrongType {
                tagifd,
                expected: (count, data_types),
                actual: (entry.count, entry.data_type),
            })
        }
    }

    fn check_data_type(tagifd: TagIfd, data_type: Type, data_types: &'static [Type]) -> Result<()> {
        if data_types.contains(&data_type) {
            Ok(())
        } else {
            Err(Error::WrongType {
                tagifd,
                expected: (None, data_types),
                actual: (0, data_type),
            })
        }
    }
}
