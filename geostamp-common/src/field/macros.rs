macro_rules! make_tags {
    ($($(#[$($attrss:tt)*])*($tag:literal, $id:ident, $ifd:expr)),*$(,)?) => {
        $(
            $(#[$($attrss)*])*
            #[derive(Copy, Clone, Debug)]
            pub struct $id;

            impl $crate::exif::Field for $id {
                const NAME: &'static str = stringify!($id);
                const TAG: $crate::exif::Tag = $crate::exif::Tag($tag);
                const IFD: Ifd = $ifd;
            }
        )*

        pub(crate) fn tag_name(tag: u16, ifd: Ifd) -> Option<&'static str> {
            $(
                if (tag, ifd) == ($tag, $ifd) {
                    return Some(stringify!($id));
                }
            )*
            None
        }
    };
}

pub(crate) use make_tags;
