use std::collections::BTreeMap;
use std::fmt::Write;

use geostamp_common::field;

use super::{Ifd, TagIfd, Type};
use crate::error::Result;

impl<'a> super::ExifRaw<'a> {
    /// Human readable listing of all decoded IFDs and their entries
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();

        let mut ifd_locations: BTreeMap<Ifd, Option<u32>> = self
            .ifd_locations
            .iter()
            .map(|(ifd, location)| (*ifd, Some(*location)))
            .collect();

        for tagifd in self.locations.keys() {
            ifd_locations.entry(tagifd.ifd).or_default();
        }

        for (ifd, ifd_location) in ifd_locations {
            let _ = writeln!(out, "\n{ifd:?} - Defined {ifd_location:?}");
            out.push_str("------------------------------\n");

            for (tagifd, entries) in self.locations.iter().filter(|(x, _)| x.ifd == ifd) {
                let tag = tagifd.tag.0;
                let name = geostamp_common::exif::lookup_tag_name(*tagifd)
                    .map(ToString::to_string)
                    .unwrap_or_else(|| format!("0x{tag:X}"));

                for entry in entries {
                    let _ = writeln!(
                        out,
                        "{name} {:?}({}): {:?}",
                        entry.data_type, entry.count, entry.value_offset
                    );
                }
                out.push_str(&self.debug_dump_entry(*tagifd));
                out.push('\n');
            }
        }

        out
    }

    pub fn debug_dump_entry(&self, tagifd: TagIfd) -> String {
        fn show(x: Result<Option<impl ToString>>) -> String {
            match x {
                Ok(Some(x)) => x.to_string(),
                Ok(None) => String::from("None"),
                Err(err) => format!("Error: {err}"),
            }
        }

        let Some(entry) = self.lookup_entry(tagifd) else {
            return String::from("Not found");
        };

        match entry.data_type {
            Type::Ascii | Type::Utf8 => show(self.lookup_string(tagifd)),
            Type::Short if entry.count == 1 => show(self.lookup_short(tagifd)),
            Type::Long if entry.count == 1 => show(Ok(Some(entry.value_offset.u32()))),
            Type::Rational if entry.count == 3 => show(
                self.lookup_rationals::<3>(tagifd)
                    .map(|x| x.map(|x| x.map(|r| r.to_string()).join(" "))),
            ),
            Type::Byte if tagifd == TagIfd::from(field::XPKeywords) => {
                show(self.lookup_utf16(tagifd))
            }
            Type::Byte | Type::Undefined if entry.count <= 16 => show(
                self.lookup_binary(tagifd)
                    .map(|x| x.map(|x| format!("{x:02X?}"))),
            ),
            data_type => format!("Not shown: {data_type:?}"),
        }
    }
}
